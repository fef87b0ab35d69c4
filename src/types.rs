use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One normalized odds line: a single selection on a single market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRow {
    pub home_team: String,
    pub away_team: String,
    pub date_key: String,
    pub market: String,
    pub market_play: String,
    pub odds: f64,
}

/// Cross-bookmaker identity of a row. No shared event id exists between
/// feeds, so team names and date keys must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey<'a> {
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub date_key: &'a str,
    pub market: &'a str,
    pub market_play: &'a str,
}

impl OddsRow {
    pub fn join_key(&self) -> JoinKey<'_> {
        JoinKey {
            home_team: &self.home_team,
            away_team: &self.away_team,
            date_key: &self.date_key,
            market: &self.market,
            market_play: &self.market_play,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmakerDataset {
    pub bookmaker: String,
    pub rows: Vec<OddsRow>,
}

impl BookmakerDataset {
    pub fn new(bookmaker: impl Into<String>, rows: Vec<OddsRow>) -> Self {
        Self {
            bookmaker: bookmaker.into(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// A joined row: the same selection quoted by both bookmakers of a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitragePair<'a> {
    pub row_a: &'a OddsRow,
    pub odds_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub home_team: String,
    pub away_team: String,
    pub market: String,
    pub plays: Vec<String>,
    pub odds: Vec<f64>,
    pub bookmakers: Vec<String>,
    pub total_inverse_odds: f64,
    pub arbitrage_profit_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub bookmaker_pair: String,
    pub opportunities: Vec<ArbitrageOpportunity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub pairs: Vec<PairReport>,
}

impl RunReport {
    pub fn new(pairs: Vec<PairReport>) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            pairs,
        }
    }

    pub fn opportunity_count(&self) -> usize {
        self.pairs.iter().map(|p| p.opportunities.len()).sum()
    }
}

pub fn pair_label(name_a: &str, name_b: &str) -> String {
    format!("{} vs {}", name_a, name_b)
}
