use anyhow::Result;

use crate::types::{ArbitrageOpportunity, RunReport};

pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "########### Calculations: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    if report.pairs.is_empty() {
        out.push_str("\nNo arbitrage opportunities found\n");
        return out;
    }

    for pair in &report.pairs {
        out.push_str(&format!(
            "\nArbitrage opportunities for {}:\n",
            pair.bookmaker_pair
        ));
        for opportunity in &pair.opportunities {
            out.push_str(&render_opportunity(opportunity));
        }
    }

    out
}

fn render_opportunity(opp: &ArbitrageOpportunity) -> String {
    let odds: Vec<String> = opp.odds.iter().map(|o| format!("{:.2}", o)).collect();

    format!(
        "  {} - {} | {} | plays: {} | odds: {} | bookmakers: {} | total inverse: {:.4} | profit: {:.2}%\n",
        opp.home_team,
        opp.away_team,
        opp.market,
        opp.plays.join(", "),
        odds.join(", "),
        opp.bookmakers.join(", "),
        opp.total_inverse_odds,
        opp.arbitrage_profit_percent
    )
}

pub fn export_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| anyhow::anyhow!("Failed to serialize report: {}", e))
}
