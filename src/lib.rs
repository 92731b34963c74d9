pub mod models;
pub mod parsers;
pub mod utils;

pub use models::*;
pub use parsers::*;
pub use utils::*;

use models::{AnalysisConfig, ConsensusTable, MatchStatus, MatchSummary, OddsPair};
use parsers::odds::parse_odds;
use parsers::predictions::PredictionParser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utils::value_analysis::{find_value_bets, ValueBet};

/// Raised when the caller hands the pipeline unusable input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("prediction input is empty")]
    EmptyPredictions,
}

/// Everything one analysis run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub consensus: ConsensusTable,
    pub odds: BTreeMap<u8, OddsPair>,
    pub total_experts: usize,
    pub value_bets: Vec<ValueBet>,
}

impl AnalysisReport {
    /// Derive the per-match summary table rendered by the shells
    pub fn match_summaries(&self) -> Vec<MatchSummary> {
        self.consensus
            .iter()
            .map(|(match_number, tally)| {
                let quote = self.odds.get(&match_number);
                let status = if quote.is_none() {
                    MatchStatus::NoOdds
                } else if self
                    .value_bets
                    .iter()
                    .any(|bet| bet.match_number == match_number)
                {
                    MatchStatus::Recommended
                } else {
                    MatchStatus::NotRecommended
                };

                MatchSummary {
                    match_number,
                    p1_votes: tally.p1_votes,
                    p2_votes: tally.p2_votes,
                    total_votes: tally.total_votes,
                    p1_confidence: tally.p1_confidence,
                    p2_confidence: tally.p2_confidence,
                    p1_odds: quote.map(|quote| quote.p1),
                    p2_odds: quote.map(|quote| quote.p2),
                    status,
                }
            })
            .collect()
    }
}

/// Run the full parse-and-score pipeline over one snapshot of input text.
///
/// The pipeline is stateless and synchronous: identical inputs and
/// thresholds always produce an identical report. Empty or whitespace-only
/// prediction text is rejected here, at the boundary; the parsers
/// themselves never fail.
pub fn run_analysis(
    prediction_text: &str,
    odds_text: &str,
    config: AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    if prediction_text.trim().is_empty() {
        return Err(AnalysisError::EmptyPredictions);
    }

    let parser = PredictionParser::new();
    let (consensus, total_experts) = parser.parse(prediction_text);
    let odds = parse_odds(odds_text);
    let value_bets = find_value_bets(&consensus, &odds, config);

    tracing::info!(
        total_experts,
        quoted_matches = odds.len(),
        value_bets = value_bets.len(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        consensus,
        odds,
        total_experts,
        value_bets,
    })
}
