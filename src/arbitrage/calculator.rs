/// Implied probability of a decimal price.
pub fn implied_probability(odds: f64) -> f64 {
    1.0 / odds
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestOdds<'a> {
    pub odds: f64,
    pub bookmaker: &'a str,
}

/// The better-paying side of a quote pair. Equal prices go to the
/// first-named bookmaker.
pub fn best_odds<'a>(odds_a: f64, odds_b: f64, name_a: &'a str, name_b: &'a str) -> BestOdds<'a> {
    if odds_b > odds_a {
        BestOdds { odds: odds_b, bookmaker: name_b }
    } else {
        BestOdds { odds: odds_a, bookmaker: name_a }
    }
}

pub fn total_inverse_odds(odds: &[f64]) -> f64 {
    odds.iter().map(|o| implied_probability(*o)).sum()
}

/// Break-even (exactly 1.0) is not an opportunity.
pub fn is_arbitrage(total_inverse_odds: f64) -> bool {
    total_inverse_odds < 1.0
}

pub fn profit_percent(total_inverse_odds: f64) -> f64 {
    (1.0 - total_inverse_odds) * 100.0
}
