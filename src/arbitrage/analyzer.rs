use serde::{Deserialize, Serialize};

use crate::types::PairReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestOpportunity {
    pub bookmaker_pair: String,
    pub home_team: String,
    pub away_team: String,
    pub market: String,
    pub arbitrage_profit_percent: f64,
}

/// Run-level figures for the end-of-run log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub pairs_evaluated: usize,
    pub pairs_with_opportunities: usize,
    pub total_opportunities: usize,
    pub average_profit_percent: f64,
    pub best: Option<BestOpportunity>,
}

impl ReportSummary {
    pub fn from_reports(bookmaker_count: usize, reports: &[PairReport]) -> Self {
        let pairs_evaluated = bookmaker_count * bookmaker_count.saturating_sub(1) / 2;

        let mut total_opportunities = 0;
        let mut profit_sum = 0.0;
        let mut best: Option<BestOpportunity> = None;

        for report in reports {
            for opp in &report.opportunities {
                total_opportunities += 1;
                profit_sum += opp.arbitrage_profit_percent;

                let better = best
                    .as_ref()
                    .map_or(true, |b| opp.arbitrage_profit_percent > b.arbitrage_profit_percent);
                if better {
                    best = Some(BestOpportunity {
                        bookmaker_pair: report.bookmaker_pair.clone(),
                        home_team: opp.home_team.clone(),
                        away_team: opp.away_team.clone(),
                        market: opp.market.clone(),
                        arbitrage_profit_percent: opp.arbitrage_profit_percent,
                    });
                }
            }
        }

        let average_profit_percent = if total_opportunities > 0 {
            profit_sum / total_opportunities as f64
        } else {
            0.0
        };

        Self {
            pairs_evaluated,
            pairs_with_opportunities: reports.len(),
            total_opportunities,
            average_profit_percent,
            best,
        }
    }
}
