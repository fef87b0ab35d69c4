pub mod orchestrator;
pub mod report;

pub use orchestrator::ArbitrageScanner;
pub use report::{export_json, render_text};
