use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::{
    arbitrage::calculator,
    types::{pair_label, ArbitrageOpportunity, ArbitragePair, BookmakerDataset, JoinKey, PairReport},
};

/// Binary markets only; any other play count in a group means the
/// exclusion set let a multi-way market through.
const EXPECTED_PLAYS: usize = 2;

/// Inner join on (home_team, away_team, date_key, market, market_play).
/// Output follows the row order of `a`.
pub fn join_datasets<'a>(a: &'a BookmakerDataset, b: &BookmakerDataset) -> Vec<ArbitragePair<'a>> {
    let mut index: HashMap<JoinKey<'_>, Vec<f64>> = HashMap::new();
    for row in &b.rows {
        index.entry(row.join_key()).or_default().push(row.odds);
    }

    let mut joined = Vec::new();
    for row in &a.rows {
        if let Some(odds) = index.get(&row.join_key()) {
            for &odds_b in odds {
                joined.push(ArbitragePair { row_a: row, odds_b });
            }
        }
    }

    joined
}

struct MarketGroup<'a> {
    home_team: &'a str,
    away_team: &'a str,
    market: &'a str,
    plays: Vec<&'a str>,
    odds: Vec<f64>,
    bookmakers: Vec<&'a str>,
    total_inverse_odds: f64,
}

impl MarketGroup<'_> {
    fn into_opportunity(self) -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            home_team: self.home_team.to_string(),
            away_team: self.away_team.to_string(),
            market: self.market.to_string(),
            plays: self.plays.into_iter().map(str::to_string).collect(),
            odds: self.odds,
            bookmakers: self.bookmakers.into_iter().map(str::to_string).collect(),
            total_inverse_odds: self.total_inverse_odds,
            arbitrage_profit_percent: calculator::profit_percent(self.total_inverse_odds),
        }
    }
}

/// Groups joined rows by (home_team, away_team, market) in first-seen order,
/// keeping the better price of each row.
fn group_by_market<'a>(
    joined: &[ArbitragePair<'a>],
    name_a: &'a str,
    name_b: &'a str,
) -> Vec<MarketGroup<'a>> {
    let mut groups: Vec<MarketGroup<'a>> = Vec::new();
    let mut positions: HashMap<(&'a str, &'a str, &'a str), usize> = HashMap::new();

    for pair in joined {
        let row = pair.row_a;
        let best = calculator::best_odds(row.odds, pair.odds_b, name_a, name_b);

        let key = (row.home_team.as_str(), row.away_team.as_str(), row.market.as_str());
        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(MarketGroup {
                home_team: key.0,
                away_team: key.1,
                market: key.2,
                plays: Vec::new(),
                odds: Vec::new(),
                bookmakers: Vec::new(),
                total_inverse_odds: 0.0,
            });
            groups.len() - 1
        });

        let group = &mut groups[position];
        group.plays.push(&row.market_play);
        group.odds.push(best.odds);
        group.bookmakers.push(best.bookmaker);
        group.total_inverse_odds += calculator::implied_probability(best.odds);
    }

    groups
}

/// Profitable market groups between two bookmakers, best first. An empty
/// join or a join with no profitable group yields an empty list.
pub fn find_arbitrage_between_pair(
    dataset_a: &BookmakerDataset,
    dataset_b: &BookmakerDataset,
    name_a: &str,
    name_b: &str,
) -> Vec<ArbitrageOpportunity> {
    let joined = join_datasets(dataset_a, dataset_b);
    if joined.is_empty() {
        debug!("No common selections between {} and {}", name_a, name_b);
        return Vec::new();
    }

    let groups = group_by_market(&joined, name_a, name_b);
    debug!(
        "{} vs {}: {} joined rows in {} market groups",
        name_a,
        name_b,
        joined.len(),
        groups.len()
    );

    let mut opportunities: Vec<ArbitrageOpportunity> = groups
        .into_iter()
        .filter(|g| calculator::is_arbitrage(g.total_inverse_odds))
        .map(|g| {
            if g.plays.len() != EXPECTED_PLAYS {
                warn!(
                    "{} vs {}: market {} for {} - {} has {} plays, passing through unchanged",
                    name_a,
                    name_b,
                    g.market,
                    g.home_team,
                    g.away_team,
                    g.plays.len()
                );
            }
            g.into_opportunity()
        })
        .collect();

    opportunities.sort_by(|x, y| y.arbitrage_profit_percent.total_cmp(&x.arbitrage_profit_percent));
    opportunities
}

/// Runs the pairwise search over every unordered pair of datasets in
/// iteration order, keeping only pairs that produced opportunities.
pub fn find_all_arbitrage_opportunities(datasets: &[BookmakerDataset]) -> Vec<PairReport> {
    let mut reports = Vec::new();

    for (i, dataset_a) in datasets.iter().enumerate() {
        for dataset_b in &datasets[i + 1..] {
            let opportunities = find_arbitrage_between_pair(
                dataset_a,
                dataset_b,
                &dataset_a.bookmaker,
                &dataset_b.bookmaker,
            );

            if opportunities.is_empty() {
                continue;
            }

            let bookmaker_pair = pair_label(&dataset_a.bookmaker, &dataset_b.bookmaker);
            info!(
                "Found {} arbitrage opportunities for {}",
                opportunities.len(),
                bookmaker_pair
            );

            reports.push(PairReport {
                bookmaker_pair,
                opportunities,
            });
        }
    }

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OddsRow;

    fn create_test_row(home: &str, away: &str, market: &str, play: &str, odds: f64) -> OddsRow {
        OddsRow {
            home_team: home.to_string(),
            away_team: away.to_string(),
            date_key: "17-03".to_string(),
            market: market.to_string(),
            market_play: play.to_string(),
            odds,
        }
    }

    fn dataset(name: &str, rows: Vec<OddsRow>) -> BookmakerDataset {
        BookmakerDataset::new(name, rows)
    }

    #[test]
    fn test_cross_bookmaker_arbitrage_is_reported() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 2.10),
                create_test_row("AEK", "PAOK", "WINNER", "away", 1.80),
            ],
        );
        let y = dataset(
            "y",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 1.95),
                create_test_row("AEK", "PAOK", "WINNER", "away", 2.05),
            ],
        );

        let opportunities = find_arbitrage_between_pair(&x, &y, "x", "y");
        assert_eq!(opportunities.len(), 1);

        let opp = &opportunities[0];
        assert_eq!(opp.plays, vec!["home", "away"]);
        assert_eq!(opp.odds, vec![2.10, 2.05]);
        assert_eq!(opp.bookmakers, vec!["x", "y"]);
        assert!((opp.total_inverse_odds - (1.0 / 2.10 + 1.0 / 2.05)).abs() < 1e-12);
        assert_eq!(
            opp.arbitrage_profit_percent,
            (1.0 - opp.total_inverse_odds) * 100.0
        );
        assert!(opp.arbitrage_profit_percent > 3.5 && opp.arbitrage_profit_percent < 3.7);
    }

    #[test]
    fn test_overround_market_is_filtered_out() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 1.90),
                create_test_row("AEK", "PAOK", "WINNER", "away", 1.90),
            ],
        );
        let y = x.clone();

        assert!(find_arbitrage_between_pair(&x, &y, "x", "y").is_empty());
    }

    #[test]
    fn test_break_even_is_excluded() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 2.0),
                create_test_row("AEK", "PAOK", "WINNER", "away", 1.5),
            ],
        );
        let y = dataset(
            "y",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 1.5),
                create_test_row("AEK", "PAOK", "WINNER", "away", 2.0),
            ],
        );

        assert!(find_arbitrage_between_pair(&x, &y, "x", "y").is_empty());
    }

    #[test]
    fn test_tie_attributes_first_named_bookmaker() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 2.20),
                create_test_row("AEK", "PAOK", "WINNER", "away", 2.20),
            ],
        );
        let y = x.clone();

        let opportunities = find_arbitrage_between_pair(&x, &y, "x", "y");
        assert_eq!(opportunities[0].bookmakers, vec!["x", "x"]);
    }

    #[test]
    fn test_unmatched_rows_are_dropped() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 2.10),
                create_test_row("AEK", "PAOK", "WINNER", "away", 2.10),
            ],
        );
        let mut other_day = create_test_row("AEK", "PAOK", "WINNER", "away", 2.10);
        other_day.date_key = "18-03".to_string();
        let y = dataset(
            "y",
            vec![create_test_row("AEK", "PAOK", "WINNER", "home", 2.00), other_day],
        );

        let joined = join_datasets(&x, &y);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].row_a.market_play, "home");

        // a one-sided group is passed through as-is, it is not completed
        let opportunities = find_arbitrage_between_pair(&x, &y, "x", "y");
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].plays, vec!["home"]);
        assert_eq!(opportunities[0].odds, vec![2.10]);
    }

    #[test]
    fn test_results_sorted_by_profit_descending() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 2.05),
                create_test_row("AEK", "PAOK", "WINNER", "away", 2.05),
                create_test_row("OFI", "ARIS", "OVER_UNDER", "over", 2.30),
                create_test_row("OFI", "ARIS", "OVER_UNDER", "under", 2.30),
                create_test_row("PAS", "ATROMITOS", "WINNER", "home", 2.15),
                create_test_row("PAS", "ATROMITOS", "WINNER", "away", 2.15),
            ],
        );
        let y = x.clone();

        let opportunities = find_arbitrage_between_pair(&x, &y, "x", "y");
        let markets: Vec<&str> = opportunities.iter().map(|o| o.home_team.as_str()).collect();
        assert_eq!(markets, vec!["OFI", "PAS", "AEK"]);

        for window in opportunities.windows(2) {
            assert!(window[0].arbitrage_profit_percent >= window[1].arbitrage_profit_percent);
        }
        for opp in &opportunities {
            assert!(opp.arbitrage_profit_percent > 0.0);
        }
    }

    #[test]
    fn test_detection_is_deterministic() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "WINNER", "home", 2.10),
                create_test_row("AEK", "PAOK", "WINNER", "away", 2.10),
                create_test_row("OFI", "ARIS", "WINNER", "home", 2.10),
                create_test_row("OFI", "ARIS", "WINNER", "away", 2.10),
            ],
        );
        let y = x.clone();

        let first = find_arbitrage_between_pair(&x, &y, "x", "y");
        let second = find_arbitrage_between_pair(&x, &y, "x", "y");
        assert_eq!(first, second);
        // equal profits keep their grouping order
        assert_eq!(first[0].home_team, "AEK");
        assert_eq!(first[1].home_team, "OFI");
    }

    #[test]
    fn test_three_way_group_passes_all_plays_through() {
        let x = dataset(
            "x",
            vec![
                create_test_row("AEK", "PAOK", "RESULT", "home", 4.0),
                create_test_row("AEK", "PAOK", "RESULT", "draw", 4.0),
                create_test_row("AEK", "PAOK", "RESULT", "away", 4.0),
            ],
        );
        let y = x.clone();

        let opportunities = find_arbitrage_between_pair(&x, &y, "x", "y");
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].plays, vec!["home", "draw", "away"]);
        assert_eq!(opportunities[0].odds.len(), 3);
    }

    #[test]
    fn test_all_pairs_skip_empty_dataset() {
        let rows = vec![
            create_test_row("AEK", "PAOK", "WINNER", "home", 2.10),
            create_test_row("AEK", "PAOK", "WINNER", "away", 2.10),
        ];
        let datasets = vec![
            dataset("stoiximan", rows.clone()),
            dataset("novibet", Vec::new()),
            dataset("fonbet", rows),
        ];

        let reports = find_all_arbitrage_opportunities(&datasets);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].bookmaker_pair, "stoiximan vs fonbet");
    }

    #[test]
    fn test_all_pairs_visits_each_unordered_pair_once() {
        let rows = vec![
            create_test_row("AEK", "PAOK", "WINNER", "home", 2.10),
            create_test_row("AEK", "PAOK", "WINNER", "away", 2.10),
        ];
        let datasets: Vec<BookmakerDataset> = ["a", "b", "c", "d"]
            .iter()
            .map(|name| dataset(name, rows.clone()))
            .collect();

        let labels: Vec<String> = find_all_arbitrage_opportunities(&datasets)
            .into_iter()
            .map(|r| r.bookmaker_pair)
            .collect();

        assert_eq!(
            labels,
            vec!["a vs b", "a vs c", "a vs d", "b vs c", "b vs d", "c vs d"]
        );
    }
}
