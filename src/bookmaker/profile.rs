use chrono::{DateTime, Duration};

use super::schema::{FieldSpec, FieldType, Record, Schema};
use crate::error::NormalizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    Equals,
    NotEquals,
}

/// A literal comparison against a field's textual form.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: &'static str,
    pub op: ConditionOp,
    pub literal: &'static str,
}

impl Condition {
    pub const fn equals(field: &'static str, literal: &'static str) -> Self {
        Self { field, op: ConditionOp::Equals, literal }
    }

    pub const fn not_equals(field: &'static str, literal: &'static str) -> Self {
        Self { field, op: ConditionOp::NotEquals, literal }
    }

    /// A missing value satisfies neither operator.
    pub fn holds(&self, record: &Record) -> bool {
        match record.get(self.field) {
            Some(value) => {
                let text = value.as_text();
                match self.op {
                    ConditionOp::Equals => text == self.literal,
                    ConditionOp::NotEquals => text != self.literal,
                }
            }
            None => false,
        }
    }
}

/// A row is available when every condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Availability(pub Vec<Condition>);

impl Availability {
    pub fn is_available(&self, record: &Record) -> bool {
        self.0.iter().all(|c| c.holds(record))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateKeyRule {
    /// First `chars` characters of a fixed-format text timestamp.
    TextPrefix { field: &'static str, chars: usize },
    /// Unix epoch seconds held as text, shifted by `offset_hours` and
    /// formatted with a chrono format string.
    EpochSeconds {
        field: &'static str,
        offset_hours: i64,
        format: &'static str,
    },
}

impl DateKeyRule {
    pub fn field(&self) -> &'static str {
        match self {
            DateKeyRule::TextPrefix { field, .. } => *field,
            DateKeyRule::EpochSeconds { field, .. } => *field,
        }
    }

    pub fn extract(
        &self,
        bookmaker: &str,
        index: usize,
        record: &Record,
    ) -> Result<String, NormalizeError> {
        let raw = record.text(self.field()).ok_or_else(|| NormalizeError::SchemaViolation {
            bookmaker: bookmaker.to_string(),
            record: index,
            field: self.field().to_string(),
            expected: "text",
            found: "missing".to_string(),
        })?;

        match self {
            DateKeyRule::TextPrefix { chars, .. } => Ok(raw.chars().take(*chars).collect()),
            DateKeyRule::EpochSeconds { offset_hours, format, .. } => {
                let invalid = || NormalizeError::InvalidTimestamp {
                    bookmaker: bookmaker.to_string(),
                    record: index,
                    value: raw.to_string(),
                };

                let seconds: i64 = raw.trim().parse().map_err(|_| invalid())?;
                let instant = DateTime::from_timestamp(seconds, 0).ok_or_else(invalid)?;
                let shifted = instant
                    .naive_utc()
                    .checked_add_signed(Duration::hours(*offset_hours))
                    .ok_or_else(invalid)?;

                Ok(shifted.format(format).to_string())
            }
        }
    }
}

/// Everything needed to turn one bookmaker's feed into odds rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmakerProfile {
    pub id: &'static str,
    pub schema: Schema,
    pub availability: Availability,
    pub date_key: DateKeyRule,
    pub odds_field: &'static str,
    pub excluded_markets: Vec<String>,
}

impl BookmakerProfile {
    pub fn is_excluded_market(&self, market: &str) -> bool {
        self.excluded_markets.iter().any(|m| m == market)
    }

    pub fn with_excluded_markets(mut self, markets: &[String]) -> Self {
        self.excluded_markets = markets.to_vec();
        self
    }
}

const TEXT: FieldType = FieldType::Text;
const BOOLEAN: FieldType = FieldType::Boolean;
const FLOAT64: FieldType = FieldType::Float64;

pub fn stoiximan() -> BookmakerProfile {
    BookmakerProfile {
        id: "stoiximan",
        schema: Schema::new(vec![
            FieldSpec::optional("stoiximan_sport", TEXT),
            FieldSpec::required("start_date_time", TEXT),
            FieldSpec::optional("url", TEXT),
            FieldSpec::required("home_team", TEXT),
            FieldSpec::required("away_team", TEXT),
            FieldSpec::required("market_suspended", TEXT),
            FieldSpec::required("market", TEXT),
            FieldSpec::required("market_play", TEXT),
            FieldSpec::required("stoiximan_odds", FLOAT64),
        ]),
        availability: Availability(vec![Condition::not_equals("market_suspended", "true")]),
        date_key: DateKeyRule::TextPrefix { field: "start_date_time", chars: 5 },
        odds_field: "stoiximan_odds",
        excluded_markets: Vec::new(),
    }
}

pub fn novibet() -> BookmakerProfile {
    BookmakerProfile {
        id: "novibet",
        schema: Schema::new(vec![
            FieldSpec::optional("novibet_sport", TEXT),
            FieldSpec::required("start_date_time", TEXT),
            FieldSpec::optional("url", TEXT),
            FieldSpec::required("home_team", TEXT),
            FieldSpec::required("away_team", TEXT),
            FieldSpec::required("market_available", BOOLEAN),
            FieldSpec::required("market", TEXT),
            FieldSpec::required("market_play", TEXT),
            FieldSpec::required("novibet_odds", FLOAT64),
        ]),
        // Boolean column compared against the string literal, as upstream does.
        availability: Availability(vec![Condition::equals("market_available", "true")]),
        date_key: DateKeyRule::TextPrefix { field: "start_date_time", chars: 5 },
        odds_field: "novibet_odds",
        excluded_markets: Vec::new(),
    }
}

pub fn pamestoixima() -> BookmakerProfile {
    BookmakerProfile {
        id: "pamestoixima",
        schema: Schema::new(vec![
            FieldSpec::optional("url_id", TEXT),
            FieldSpec::optional("url_game", TEXT),
            FieldSpec::optional("url_sport", TEXT),
            FieldSpec::optional("url_competition", TEXT),
            FieldSpec::required("start_date_time", TEXT),
            FieldSpec::required("home_team", TEXT),
            FieldSpec::required("away_team", TEXT),
            FieldSpec::required("game_status", TEXT),
            FieldSpec::required("market_status", TEXT),
            FieldSpec::required("market", TEXT),
            FieldSpec::required("market_play", TEXT),
            FieldSpec::required("pamestoixima_odds", FLOAT64),
        ]),
        availability: Availability(vec![
            Condition::equals("game_status", "ACTIVE"),
            Condition::equals("market_status", "ACTIVE"),
        ]),
        date_key: DateKeyRule::TextPrefix { field: "start_date_time", chars: 5 },
        odds_field: "pamestoixima_odds",
        excluded_markets: Vec::new(),
    }
}

pub fn fonbet() -> BookmakerProfile {
    BookmakerProfile {
        id: "fonbet",
        schema: Schema::new(vec![
            FieldSpec::required("start_date_time", TEXT),
            FieldSpec::optional("url_game_id", TEXT),
            FieldSpec::optional("url_sport_id", TEXT),
            FieldSpec::required("home_team", TEXT),
            FieldSpec::required("away_team", TEXT),
            FieldSpec::required("game_status", TEXT),
            FieldSpec::required("market", TEXT),
            FieldSpec::required("market_play", TEXT),
            FieldSpec::required("fonbet_odds", FLOAT64),
        ]),
        // "line" marks pregame events
        availability: Availability(vec![Condition::equals("game_status", "line")]),
        date_key: DateKeyRule::EpochSeconds {
            field: "start_date_time",
            offset_hours: 2,
            format: "%d-%m",
        },
        odds_field: "fonbet_odds",
        excluded_markets: Vec::new(),
    }
}
