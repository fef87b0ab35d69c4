use tracing::debug;

use crate::{
    bookmaker::{BookmakerProfile, RawRecord, Record},
    error::NormalizeError,
    types::{BookmakerDataset, OddsRow},
};

/// Turns raw bookmaker records into join-ready odds rows.
///
/// Any record that breaks its schema fails the whole load: a partially
/// loaded bookmaker would silently hide opportunities.
pub struct Normalizer;

impl Normalizer {
    pub fn validate(
        profile: &BookmakerProfile,
        records: &[RawRecord],
    ) -> Result<Vec<Record>, NormalizeError> {
        records
            .iter()
            .enumerate()
            .map(|(i, raw)| profile.schema.validate(profile.id, i, raw))
            .collect()
    }

    /// Availability predicate, then market exclusion. Both are pure
    /// predicates, so filtering twice keeps the same records.
    pub fn filter(profile: &BookmakerProfile, records: Vec<Record>) -> Vec<Record> {
        records
            .into_iter()
            .filter(|r| Self::keeps(profile, r))
            .collect()
    }

    fn keeps(profile: &BookmakerProfile, record: &Record) -> bool {
        if !profile.availability.is_available(record) {
            return false;
        }
        match record.text("market") {
            Some(market) => !profile.is_excluded_market(market),
            None => false,
        }
    }

    pub fn date_key(profile: &BookmakerProfile, record: &Record) -> Result<String, NormalizeError> {
        profile.date_key.extract(profile.id, record.index(), record)
    }

    pub fn normalize(
        profile: &BookmakerProfile,
        records: &[RawRecord],
    ) -> Result<BookmakerDataset, NormalizeError> {
        let validated = Self::validate(profile, records)?;
        let rows = Self::filter(profile, validated)
            .iter()
            .map(|record| Self::to_row(profile, record))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Normalized {}: {} raw records, {} rows kept",
            profile.id,
            records.len(),
            rows.len()
        );

        Ok(BookmakerDataset::new(profile.id, rows))
    }

    fn to_row(profile: &BookmakerProfile, record: &Record) -> Result<OddsRow, NormalizeError> {
        let index = record.index();
        let text = |field: &str| {
            record
                .text(field)
                .map(str::to_string)
                .ok_or_else(|| missing(profile, index, field, "text"))
        };

        let odds = record
            .float(profile.odds_field)
            .ok_or_else(|| missing(profile, index, profile.odds_field, "float64"))?;

        // decimal odds never return less than the stake
        if !odds.is_finite() || odds < 1.0 {
            return Err(NormalizeError::InvalidOdds {
                bookmaker: profile.id.to_string(),
                record: index,
                odds,
            });
        }

        Ok(OddsRow {
            home_team: text("home_team")?,
            away_team: text("away_team")?,
            date_key: Self::date_key(profile, record)?,
            market: text("market")?,
            market_play: text("market_play")?,
            odds,
        })
    }
}

fn missing(
    profile: &BookmakerProfile,
    index: usize,
    field: &str,
    expected: &'static str,
) -> NormalizeError {
    NormalizeError::SchemaViolation {
        bookmaker: profile.id.to_string(),
        record: index,
        field: field.to_string(),
        expected,
        found: "missing".to_string(),
    }
}
