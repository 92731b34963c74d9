use crate::models::{ConsensusTable, OutcomeSet};
use tracing::debug;

/// Parses freeform expert-prediction text into per-match vote tallies.
///
/// The accepted grammar per meaningful line is one or more
/// `<match>-(<label>, <label>, ...)` tokens, with arbitrary separators
/// between tokens. Blank lines and lines starting with `#` are ignored.
/// The parse is lenient: malformed tokens, off-coupon match numbers and
/// unrecognized labels are dropped without error.
pub struct PredictionParser {
    outcomes: OutcomeSet,
}

impl PredictionParser {
    pub fn new() -> Self {
        Self {
            outcomes: OutcomeSet::default(),
        }
    }

    /// Build a parser over an alternate outcome-label set
    pub fn with_outcomes(outcomes: OutcomeSet) -> Self {
        Self { outcomes }
    }

    /// Tally every vote in the text. Returns the consensus table and the
    /// number of experts recognized, where an expert is a line carrying at
    /// least one structurally well-formed prediction token.
    pub fn parse(&self, text: &str) -> (ConsensusTable, usize) {
        let mut consensus = ConsensusTable::new();
        let mut total_experts = 0;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let tokens = extract_tokens(line);
            if tokens.is_empty() {
                continue;
            }
            // A line is one expert no matter how many tokens it carries,
            // and even when every token is later dropped.
            total_experts += 1;

            for token in tokens {
                self.apply_token(&token, &mut consensus);
            }
        }

        consensus.update_confidences();
        (consensus, total_experts)
    }

    fn apply_token(&self, token: &RawToken<'_>, consensus: &mut ConsensusTable) {
        let match_number = match token.number.parse::<u8>() {
            Ok(number) => number,
            Err(_) => {
                debug!(number = token.number, "match number not parseable");
                return;
            }
        };

        let tally = match consensus.get_mut(match_number) {
            Some(tally) => tally,
            None => {
                debug!(match_number, "match number off the coupon");
                return;
            }
        };

        for raw in token.labels.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match self.outcomes.classify(raw) {
                // One token may legally vote both sides, e.g. `8-(2:1,1:2)`
                Some(side) => tally.record(side),
                None => debug!(label = raw, "unrecognized outcome label"),
            }
        }
    }
}

impl Default for PredictionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One structurally well-formed `<int>-(<labels>)` token lifted from a line
#[derive(Debug, PartialEq, Eq)]
struct RawToken<'a> {
    number: &'a str,
    labels: &'a str,
}

/// Scan a line for `<int>-(<labels>)` tokens, tolerating whitespace around
/// the number, the hyphen and the parentheses. The parenthesized body must
/// be non-empty and closed for the token to count.
fn extract_tokens(line: &str) -> Vec<RawToken<'_>> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].1.is_ascii_digit() {
            i += 1;
            continue;
        }

        let number_start = chars[i].0;
        let mut j = i;
        while j < chars.len() && chars[j].1.is_ascii_digit() {
            j += 1;
        }
        let number_end = if j < chars.len() { chars[j].0 } else { line.len() };

        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        if k >= chars.len() || chars[k].1 != '-' {
            i = j;
            continue;
        }
        k += 1;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        if k >= chars.len() || chars[k].1 != '(' {
            i = j;
            continue;
        }
        k += 1;

        let body_start = if k < chars.len() { chars[k].0 } else { line.len() };
        let mut m = k;
        while m < chars.len() && chars[m].1 != ')' {
            m += 1;
        }
        if m >= chars.len() {
            // Unbalanced parenthesis: keep scanning after the number
            i = j;
            continue;
        }
        let body_end = chars[m].0;
        if body_start == body_end {
            i = m + 1;
            continue;
        }

        tokens.push(RawToken {
            number: &line[number_start..number_end],
            labels: &line[body_start..body_end],
        });
        i = m + 1;
    }

    tokens
}
