use thiserror::Error;

/// Failures while turning a bookmaker snapshot into odds rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("{bookmaker} record {record}: field '{field}' expected {expected}, found {found}")]
    SchemaViolation {
        bookmaker: String,
        record: usize,
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("{bookmaker} record {record}: invalid epoch timestamp '{value}'")]
    InvalidTimestamp {
        bookmaker: String,
        record: usize,
        value: String,
    },

    #[error("{bookmaker} record {record}: odds must be finite decimal odds of at least 1.0, got {odds}")]
    InvalidOdds {
        bookmaker: String,
        record: usize,
        odds: f64,
    },
}

/// Failures reading from the snapshot store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no snapshot for bookmaker '{0}'")]
    NotFound(String),

    #[error("failed to read snapshot for '{bookmaker}': {source}")]
    Io {
        bookmaker: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode snapshot for '{bookmaker}': {source}")]
    Decode {
        bookmaker: String,
        #[source]
        source: serde_json::Error,
    },
}
