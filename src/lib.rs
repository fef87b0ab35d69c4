pub mod config;
pub mod types;
pub mod error;
pub mod bookmaker;
pub mod store;
pub mod normalizer;
pub mod arbitrage;
pub mod scanner;

pub use config::Config;
pub use types::*;
