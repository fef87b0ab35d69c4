use anyhow::Result;
use surebet_scanner::{
    config::Config,
    scanner::{export_json, render_text, ArbitrageScanner},
    store::JsonFileStore,
    RunReport,
};
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting cross-bookmaker arbitrage scanner");

    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    let json_output = config.output.format == "json";
    let store = JsonFileStore::new(config.snapshots.clone());
    let mut scanner = ArbitrageScanner::new(config, Box::new(store));

    let print_report = move |report: &RunReport| {
        if json_output {
            match export_json(report) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("{}", e),
            }
        } else {
            print!("{}", render_text(report));
        }
    };

    let shutdown_signal = tokio::signal::ctrl_c();

    // Ctrl-C drops the scan future; a run already in progress finishes first.
    tokio::select! {
        result = scanner.start(print_report) => {
            if let Err(e) = result {
                error!("Scanner error: {:#}", e);
                return Err(e);
            }
        }
        _ = shutdown_signal => {
            info!("Shutdown signal received");
        }
    }

    info!("Scanner shutdown complete");
    Ok(())
}
