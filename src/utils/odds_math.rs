use crate::models::{OddsPair, Side};

/// Convert decimal odds to the bookmaker's implied probability.
/// A quote of 2.00 implies a 50% chance; 1.65 implies about 60.6%.
pub fn decimal_odds_to_probability(odds: f64) -> f64 {
    1.0 / odds
}

/// The bookmaker's overround: how far the summed implied probabilities
/// of the two sides exceed a fair book
pub fn bookmaker_margin(quote: OddsPair) -> f64 {
    decimal_odds_to_probability(quote.p1) + decimal_odds_to_probability(quote.p2) - 1.0
}

/// Fair win probabilities for both sides after the vig is removed
#[derive(Debug, Clone, Copy)]
pub struct FairProbabilities {
    pub p1: f64,
    pub p2: f64,
    pub margin: f64,
}

impl FairProbabilities {
    pub fn for_side(&self, side: Side) -> f64 {
        match side {
            Side::P1 => self.p1,
            Side::P2 => self.p2,
        }
    }
}

/// Remove the bookmaker's margin by proportional scaling.
/// fair = implied / (1 + margin), so the two fair probabilities sum to 1.
pub fn remove_vig(quote: OddsPair) -> FairProbabilities {
    let implied_p1 = decimal_odds_to_probability(quote.p1);
    let implied_p2 = decimal_odds_to_probability(quote.p2);
    let margin = implied_p1 + implied_p2 - 1.0;

    FairProbabilities {
        p1: implied_p1 / (1.0 + margin),
        p2: implied_p2 / (1.0 + margin),
        margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_odds_to_probability() {
        let prob = decimal_odds_to_probability(2.00);
        assert!((prob - 0.5).abs() < 1e-12);

        let prob = decimal_odds_to_probability(1.65);
        assert!((prob - 0.6061).abs() < 0.0001);

        let prob = decimal_odds_to_probability(2.24);
        assert!((prob - 0.4464).abs() < 0.0001);
    }

    #[test]
    fn test_bookmaker_margin() {
        // 1.65 / 2.24 is roughly a 5.2% book
        let margin = bookmaker_margin(OddsPair { p1: 1.65, p2: 2.24 });
        assert!((margin - 0.0524).abs() < 0.0001);

        // A perfectly fair book carries no margin
        let margin = bookmaker_margin(OddsPair { p1: 2.00, p2: 2.00 });
        assert!(margin.abs() < 1e-12);
    }

    #[test]
    fn test_remove_vig_scenario() {
        let fair = remove_vig(OddsPair { p1: 1.65, p2: 2.24 });

        assert!((fair.p1 - 0.576).abs() < 0.001);
        assert!((fair.margin - 0.0524).abs() < 0.0001);
    }

    #[test]
    fn test_fair_probabilities_sum_to_one() {
        for quote in [
            OddsPair { p1: 1.65, p2: 2.24 },
            OddsPair { p1: 1.01, p2: 15.0 },
            OddsPair { p1: 3.40, p2: 1.30 },
            OddsPair { p1: 1.90, p2: 1.90 },
        ] {
            let fair = remove_vig(quote);
            assert!(
                (fair.p1 + fair.p2 - 1.0).abs() < 1e-9,
                "fair probabilities should sum to 1 for {:?}",
                quote
            );
        }
    }
}
