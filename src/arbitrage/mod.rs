pub mod detector;
pub mod calculator;
pub mod analyzer;

pub use detector::{find_all_arbitrage_opportunities, find_arbitrage_between_pair, join_datasets};
pub use analyzer::ReportSummary;
