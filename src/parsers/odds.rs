use crate::models::{OddsPair, MATCH_COUNT};
use std::collections::BTreeMap;
use tracing::debug;

/// Parse tab-separated odds text into a per-match odds map.
///
/// Expected line shape: `<match> TAB <p1 odds> TAB <p2 odds>`, with extra
/// trailing fields ignored. The tab is the structural delimiter that sets
/// this format apart from prediction text. Malformed lines are skipped;
/// a later line for the same match overwrites an earlier one.
pub fn parse_odds(text: &str) -> BTreeMap<u8, OddsPair> {
    let mut odds = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || !line.contains('\t') {
            continue;
        }

        let fields: Vec<&str> = line
            .split('\t')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect();
        if fields.len() < 3 {
            debug!(line, "odds line has too few fields");
            continue;
        }

        let match_number = match fields[0].parse::<u8>() {
            Ok(number) if (1..=MATCH_COUNT).contains(&number) => number,
            _ => {
                debug!(field = fields[0], "odds line match number rejected");
                continue;
            }
        };
        let (p1, p2) = match (fields[1].parse::<f64>(), fields[2].parse::<f64>()) {
            (Ok(p1), Ok(p2)) => (p1, p2),
            _ => {
                debug!(line, "odds line has non-numeric odds");
                continue;
            }
        };
        if !(p1.is_finite() && p1 > 0.0 && p2.is_finite() && p2 > 0.0) {
            debug!(line, "odds must be positive payout multiples");
            continue;
        }

        odds.insert(match_number, OddsPair { p1, p2 });
    }

    odds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_odds_scenario() {
        let odds = parse_odds("1\t1.65\t2.24");

        assert_eq!(odds.len(), 1);
        let quote = odds.get(&1).unwrap();
        assert!((quote.p1 - 1.65).abs() < 1e-12);
        assert!((quote.p2 - 2.24).abs() < 1e-12);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let odds = parse_odds("3\t1.80\t2.00\tPlayer A\tPlayer B");

        let quote = odds.get(&3).unwrap();
        assert!((quote.p1 - 1.80).abs() < 1e-12);
        assert!((quote.p2 - 2.00).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "\n\
                    no tabs on this line\n\
                    2\t1.90\n\
                    abc\t1.90\t1.90\n\
                    4\tx\t1.90\n\
                    5\t-1.50\t1.90\n\
                    6\t1.95\t1.85\n";
        let odds = parse_odds(text);

        assert_eq!(odds.len(), 1);
        assert!(odds.contains_key(&6));
    }

    #[test]
    fn test_last_line_wins_for_duplicate_match() {
        let odds = parse_odds("7\t1.95\t1.85\n7\t2.05\t1.78");

        let quote = odds.get(&7).unwrap();
        assert!((quote.p1 - 2.05).abs() < 1e-12);
        assert!((quote.p2 - 1.78).abs() < 1e-12);
    }

    #[test]
    fn test_off_coupon_match_numbers_are_dropped() {
        let odds = parse_odds("0\t1.90\t1.90\n15\t1.90\t1.90");
        assert!(odds.is_empty());
    }

    #[test]
    fn test_internal_whitespace_is_trimmed() {
        let odds = parse_odds(" 9 \t 2.40 \t 1.55 ");

        let quote = odds.get(&9).unwrap();
        assert!((quote.p1 - 2.40).abs() < 1e-12);
        assert!((quote.p2 - 1.55).abs() < 1e-12);
    }
}
