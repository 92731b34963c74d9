use crate::models::{AnalysisConfig, ConsensusTable, OddsPair, Side};
use crate::utils::odds_math::remove_vig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Minimum number of expert votes before a consensus is trusted
pub const MIN_SAMPLE_SIZE: u32 = 5;

/// Maximum number of value bets one analysis run returns
pub const MAX_SELECTIONS: usize = 6;

/// A recommended bet with its value analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub match_number: u8,
    pub side: Side,
    pub confidence: f64,
    /// Expert confidence minus the de-vigged fair probability
    pub value: f64,
    pub odds: f64,
    /// Votes for the recommended side over total votes, e.g. "5/6"
    pub votes: String,
    /// Vote shares of both sides, e.g. "83.3% vs 16.7%"
    pub expert_consensus: String,
}

impl ValueBet {
    /// Format the recommendation as a readable string
    pub fn format(&self) -> String {
        format!(
            "Match {} | Bet: {} @ {:.2} | Value: {:+.3} | Confidence: {:.1}% | Votes: {} | Consensus: {}",
            self.match_number,
            self.side,
            self.odds,
            self.value,
            self.confidence * 100.0,
            self.votes,
            self.expert_consensus
        )
    }
}

/// Join expert consensus with bookmaker odds and return the ranked value
/// bets: matches where a side's vote share clears the confidence floor and
/// exceeds its fair probability, quoted inside the configured odds range.
/// Never fails; non-qualifying matches are simply omitted.
pub fn find_value_bets(
    consensus: &ConsensusTable,
    odds: &BTreeMap<u8, OddsPair>,
    config: AnalysisConfig,
) -> Vec<ValueBet> {
    let mut bets = Vec::new();

    for (match_number, tally) in consensus.iter() {
        let quote = match odds.get(&match_number) {
            Some(quote) => *quote,
            None => continue,
        };
        if tally.total_votes < MIN_SAMPLE_SIZE {
            debug!(
                match_number,
                total_votes = tally.total_votes,
                "consensus sample too small"
            );
            continue;
        }

        let fair = remove_vig(quote);
        let value_p1 = tally.p1_confidence - fair.p1;
        let value_p2 = tally.p2_confidence - fair.p2;

        // P1 is tested first; when it qualifies, P2 is never considered
        let side = if tally.p1_confidence >= config.min_confidence && value_p1 > 0.0 {
            Side::P1
        } else if tally.p2_confidence >= config.min_confidence && value_p2 > 0.0 {
            Side::P2
        } else {
            continue;
        };

        let side_odds = quote.for_side(side);
        if side_odds < config.min_odds || side_odds > config.max_odds {
            debug!(
                match_number,
                odds = side_odds,
                "quoted odds outside the configured range"
            );
            continue;
        }

        bets.push(ValueBet {
            match_number,
            side,
            confidence: tally.confidence(side),
            value: tally.confidence(side) - fair.for_side(side),
            odds: side_odds,
            votes: format!("{}/{}", tally.votes(side), tally.total_votes),
            expert_consensus: format!(
                "{:.1}% vs {:.1}%",
                tally.p1_confidence * 100.0,
                tally.p2_confidence * 100.0
            ),
        });
    }

    // Stable sort: equal values keep ascending match order
    bets.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    bets.truncate(MAX_SELECTIONS);
    bets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consensus_with(entries: &[(u8, u32, u32)]) -> ConsensusTable {
        let mut consensus = ConsensusTable::new();
        for &(match_number, p1_votes, p2_votes) in entries {
            let tally = consensus.get_mut(match_number).unwrap();
            for _ in 0..p1_votes {
                tally.record(Side::P1);
            }
            for _ in 0..p2_votes {
                tally.record(Side::P2);
            }
        }
        consensus.update_confidences();
        consensus
    }

    fn odds_with(entries: &[(u8, f64, f64)]) -> BTreeMap<u8, OddsPair> {
        entries
            .iter()
            .map(|&(match_number, p1, p2)| (match_number, OddsPair { p1, p2 }))
            .collect()
    }

    #[test]
    fn test_selects_confident_value_side() {
        let consensus = consensus_with(&[(1, 5, 1)]);
        let odds = odds_with(&[(1, 1.95, 1.85)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());

        assert_eq!(bets.len(), 1);
        let bet = &bets[0];
        assert_eq!(bet.match_number, 1);
        assert_eq!(bet.side, Side::P1);
        assert!((bet.confidence - 5.0 / 6.0).abs() < 1e-9);
        assert!(bet.value > 0.0);
        assert_eq!(bet.votes, "5/6");
        assert_eq!(bet.expert_consensus, "83.3% vs 16.7%");
    }

    #[test]
    fn test_odds_floor_rejects_short_price() {
        // Confidence and value both qualify, but 1.65 sits under the
        // 1.70 floor
        let consensus = consensus_with(&[(1, 5, 1)]);
        let odds = odds_with(&[(1, 1.65, 2.24)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());
        assert!(bets.is_empty());
    }

    #[test]
    fn test_odds_range_is_inclusive() {
        let consensus = consensus_with(&[(1, 5, 1), (2, 1, 5)]);
        let odds = odds_with(&[(1, 1.70, 2.10), (2, 1.10, 3.50)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());

        assert_eq!(bets.len(), 2);
        assert!(bets.iter().any(|bet| bet.match_number == 1));
        assert!(bets.iter().any(|bet| bet.match_number == 2));
    }

    #[test]
    fn test_unquoted_match_is_skipped() {
        let consensus = consensus_with(&[(1, 6, 0)]);
        let odds = BTreeMap::new();

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());
        assert!(bets.is_empty());
    }

    #[test]
    fn test_small_sample_is_skipped() {
        // 4 unanimous votes still sit under the sample-size floor of 5
        let consensus = consensus_with(&[(1, 4, 0)]);
        let odds = odds_with(&[(1, 2.10, 1.75)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());
        assert!(bets.is_empty());
    }

    #[test]
    fn test_low_confidence_is_skipped() {
        // 60/40 split with generous odds: value is there, confidence is not
        let consensus = consensus_with(&[(1, 6, 4)]);
        let odds = odds_with(&[(1, 2.50, 1.55)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());
        assert!(bets.is_empty());
    }

    #[test]
    fn test_p2_is_selected_when_p1_fails() {
        let consensus = consensus_with(&[(1, 1, 5)]);
        let odds = odds_with(&[(1, 1.85, 1.95)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());

        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].side, Side::P2);
        assert_eq!(bets[0].votes, "5/6");
        assert!((bets[0].odds - 1.95).abs() < 1e-12);
    }

    #[test]
    fn test_negative_value_is_skipped() {
        // 5/6 consensus on a heavy favourite quoted at 1.15: fair
        // probability exceeds the vote share
        let consensus = consensus_with(&[(1, 5, 1)]);
        let odds = odds_with(&[(1, 1.05, 8.00)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());
        assert!(bets.is_empty());
    }

    #[test]
    fn test_ranked_by_value_and_truncated_to_six() {
        // Eight qualifying matches with increasingly lopsided consensus
        let consensus = consensus_with(&[
            (1, 7, 3),
            (2, 8, 2),
            (3, 9, 1),
            (4, 10, 0),
            (5, 7, 2),
            (6, 8, 1),
            (7, 9, 0),
            (8, 17, 3),
        ]);
        let odds: BTreeMap<u8, OddsPair> = (1..=8)
            .map(|number| (number, OddsPair { p1: 2.10, p2: 1.75 }))
            .collect();
        let config = AnalysisConfig {
            min_confidence: 0.65,
            ..AnalysisConfig::default()
        };

        let bets = find_value_bets(&consensus, &odds, config);

        assert_eq!(bets.len(), MAX_SELECTIONS);
        for pair in bets.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        // The two weakest qualifiers fall off the shortlist
        assert!(!bets.iter().any(|bet| bet.match_number == 1));
        assert!(!bets.iter().any(|bet| bet.match_number == 5));
    }

    #[test]
    fn test_equal_values_keep_match_order() {
        let consensus = consensus_with(&[(4, 5, 1), (9, 5, 1), (2, 5, 1)]);
        let odds = odds_with(&[(4, 1.95, 1.85), (9, 1.95, 1.85), (2, 1.95, 1.85)]);

        let bets = find_value_bets(&consensus, &odds, AnalysisConfig::default());

        let order: Vec<u8> = bets.iter().map(|bet| bet.match_number).collect();
        assert_eq!(order, vec![2, 4, 9]);
    }
}
