use serde::{Deserialize, Serialize};

/// Number of match slots on one coupon
pub const MATCH_COUNT: u8 = 14;

/// The side of a match a vote or recommendation points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::P1 => write!(f, "P1"),
            Side::P2 => write!(f, "P2"),
        }
    }
}

/// One accepted outcome label and the side it counts for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeLabel {
    pub text: String,
    pub side: Side,
}

/// The closed set of outcome labels the prediction parser accepts.
/// Owned by the parser so tests can substitute an alternate set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeSet {
    labels: Vec<OutcomeLabel>,
}

impl OutcomeSet {
    pub fn new(labels: Vec<OutcomeLabel>) -> Self {
        Self { labels }
    }

    /// Map a raw label to its side, or None if the label is not accepted
    pub fn classify(&self, raw: &str) -> Option<Side> {
        self.labels
            .iter()
            .find(|label| label.text == raw)
            .map(|label| label.side)
    }
}

impl Default for OutcomeSet {
    /// Two-set tennis score lines: 2:0 and 2:1 are player-one wins,
    /// 1:2 and 0:2 are player-two wins
    fn default() -> Self {
        let label = |text: &str, side: Side| OutcomeLabel {
            text: text.to_string(),
            side,
        };
        Self::new(vec![
            label("2:0", Side::P1),
            label("2:1", Side::P1),
            label("1:2", Side::P2),
            label("0:2", Side::P2),
        ])
    }
}

/// Vote counts and derived confidences for one match slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchTally {
    pub p1_votes: u32,
    pub p2_votes: u32,
    pub total_votes: u32,
    pub p1_confidence: f64,
    pub p2_confidence: f64,
}

impl MatchTally {
    /// Count one vote for a side
    pub fn record(&mut self, side: Side) {
        match side {
            Side::P1 => self.p1_votes += 1,
            Side::P2 => self.p2_votes += 1,
        }
        self.total_votes += 1;
    }

    pub fn votes(&self, side: Side) -> u32 {
        match side {
            Side::P1 => self.p1_votes,
            Side::P2 => self.p2_votes,
        }
    }

    pub fn confidence(&self, side: Side) -> f64 {
        match side {
            Side::P1 => self.p1_confidence,
            Side::P2 => self.p2_confidence,
        }
    }

    /// Recompute vote shares. Both confidences stay exactly 0.0 (never NaN)
    /// while no votes have been cast.
    pub fn update_confidences(&mut self) {
        if self.total_votes > 0 {
            self.p1_confidence = self.p1_votes as f64 / self.total_votes as f64;
            self.p2_confidence = self.p2_votes as f64 / self.total_votes as f64;
        }
    }
}

/// Vote tallies for the full coupon, one entry per match slot 1..=14
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusTable {
    matches: Vec<MatchTally>,
}

impl ConsensusTable {
    pub fn new() -> Self {
        Self {
            matches: vec![MatchTally::default(); MATCH_COUNT as usize],
        }
    }

    /// Look up a slot's tally; None when the number is off the coupon
    pub fn get(&self, match_number: u8) -> Option<&MatchTally> {
        if (1..=MATCH_COUNT).contains(&match_number) {
            self.matches.get(match_number as usize - 1)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, match_number: u8) -> Option<&mut MatchTally> {
        if (1..=MATCH_COUNT).contains(&match_number) {
            self.matches.get_mut(match_number as usize - 1)
        } else {
            None
        }
    }

    /// Iterate all slots in ascending match order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &MatchTally)> {
        self.matches
            .iter()
            .enumerate()
            .map(|(i, tally)| (i as u8 + 1, tally))
    }

    pub fn update_confidences(&mut self) {
        for tally in &mut self.matches {
            tally.update_confidences();
        }
    }
}

impl Default for ConsensusTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Quoted decimal odds for the two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsPair {
    pub p1: f64,
    pub p2: f64,
}

impl OddsPair {
    pub fn for_side(&self, side: Side) -> f64 {
        match side {
            Side::P1 => self.p1,
            Side::P2 => self.p2,
        }
    }
}

/// Selection thresholds, passed by value with every analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum vote share a side needs before it can be recommended
    pub min_confidence: f64,
    /// Lowest quoted odds worth backing
    pub min_odds: f64,
    /// Highest quoted odds worth backing
    pub max_odds: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.65,
            min_odds: 1.70,
            max_odds: 3.50,
        }
    }
}

/// How a match slot fared in selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Recommended,
    NotRecommended,
    NoOdds,
}

impl MatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Recommended => "Recommended",
            MatchStatus::NotRecommended => "Not recommended",
            MatchStatus::NoOdds => "No odds quoted",
        }
    }
}

/// One row of the per-match summary table rendered by the shells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_number: u8,
    pub p1_votes: u32,
    pub p2_votes: u32,
    pub total_votes: u32,
    pub p1_confidence: f64,
    pub p2_confidence: f64,
    pub p1_odds: Option<f64>,
    pub p2_odds: Option<f64>,
    pub status: MatchStatus,
}

impl MatchSummary {
    pub fn p1_odds_display(&self) -> String {
        Self::odds_display(self.p1_odds)
    }

    pub fn p2_odds_display(&self) -> String {
        Self::odds_display(self.p2_odds)
    }

    fn odds_display(odds: Option<f64>) -> String {
        match odds {
            Some(value) => format!("{:.2}", value),
            None => "-".to_string(),
        }
    }
}
