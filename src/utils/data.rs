use crate::models::MatchSummary;
use crate::utils::value_analysis::ValueBet;
use crate::AnalysisReport;
use anyhow::{Context, Result};

/// Save the ranked value bets to CSV
pub fn save_value_bets_to_csv(bets: &[ValueBet], filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;
    for bet in bets {
        writer
            .serialize(bet)
            .context("Failed to write value bet row")?;
    }
    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Save the per-match summary table to CSV
pub fn save_match_summaries_to_csv(summaries: &[MatchSummary], filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;
    for summary in summaries {
        writer
            .serialize(summary)
            .context("Failed to write match summary row")?;
    }
    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Save a full analysis report to a JSON file
pub fn save_report_to_json(report: &AnalysisReport, filename: &str) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize analysis report")?;
    std::fs::write(filename, json).context("Failed to write report file")?;
    Ok(())
}

/// Load a previously saved analysis report from JSON
pub fn load_report_from_json(filename: &str) -> Result<AnalysisReport> {
    let json = std::fs::read_to_string(filename).context("Failed to read report file")?;
    let report: AnalysisReport =
        serde_json::from_str(&json).context("Failed to deserialize analysis report")?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisConfig;
    use crate::run_analysis;

    #[test]
    fn test_report_json_round_trip() {
        let report = run_analysis(
            "1-(2:0)\n1-(2:0)\n1-(2:0)\n1-(2:0)\n1-(2:0)\n1-(1:2)",
            "1\t1.95\t1.85",
            AnalysisConfig::default(),
        )
        .unwrap();

        let path = std::env::temp_dir().join("tennis_value_ev_report_test.json");
        let path = path.to_str().unwrap();
        save_report_to_json(&report, path).unwrap();
        let loaded = load_report_from_json(path).unwrap();

        assert_eq!(loaded.total_experts, report.total_experts);
        assert_eq!(loaded.value_bets, report.value_bets);
        assert_eq!(loaded.consensus, report.consensus);
        assert_eq!(loaded.odds, report.odds);
        std::fs::remove_file(path).ok();
    }
}
