use anyhow::{Context, Result};
use chrono::prelude::*;
use clap::Parser;
use tennis_value_ev::data::{
    save_match_summaries_to_csv, save_report_to_json, save_value_bets_to_csv,
};
use tennis_value_ev::models::AnalysisConfig;
use tennis_value_ev::run_analysis;

/// Find value bets in pasted expert predictions and bookmaker odds
#[derive(Parser, Debug)]
#[command(name = "tennis-value-ev")]
struct Args {
    /// File with expert prediction lines, e.g. `1-(2:0); 4-(1:2,0:2)`
    #[arg(long)]
    predictions: String,

    /// File with tab-separated odds lines, e.g. `1<TAB>1.65<TAB>2.24`
    #[arg(long)]
    odds: Option<String>,

    /// Minimum vote share a side needs before it can be recommended
    #[arg(long, default_value_t = AnalysisConfig::default().min_confidence)]
    min_confidence: f64,

    /// Lowest quoted odds worth backing
    #[arg(long, default_value_t = AnalysisConfig::default().min_odds)]
    min_odds: f64,

    /// Highest quoted odds worth backing
    #[arg(long, default_value_t = AnalysisConfig::default().max_odds)]
    max_odds: f64,

    /// Write the full analysis report to this JSON file
    #[arg(long)]
    json: Option<String>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    println!("Tennis Consensus Value Calculator\n");

    let prediction_text =
        std::fs::read_to_string(&args.predictions).context("Failed to read predictions file")?;
    let odds_text = match &args.odds {
        Some(path) => std::fs::read_to_string(path).context("Failed to read odds file")?,
        None => String::new(),
    };

    let config = AnalysisConfig {
        min_confidence: args.min_confidence,
        min_odds: args.min_odds,
        max_odds: args.max_odds,
    };

    let report = run_analysis(&prediction_text, &odds_text, config)
        .context("Prediction input was rejected")?;

    println!("Recognized {} expert lines\n", report.total_experts);

    println!("VALUE BETS\n");
    if report.value_bets.is_empty() {
        println!("No qualifying value bets found.");
    } else {
        println!("Top {} Value Bets:\n", report.value_bets.len());
        for (i, bet) in report.value_bets.iter().enumerate() {
            println!("{}. {}", i + 1, bet.format());
        }
    }

    println!("\nMATCH SUMMARY\n");
    let summaries = report.match_summaries();
    println!(
        "{:<6} {:>4} {:>4} {:>6} {:>8} {:>8} {:>8} {:>8}  {}",
        "Match", "P1", "P2", "Total", "P1 conf", "P2 conf", "P1 odds", "P2 odds", "Status"
    );
    for row in &summaries {
        println!(
            "{:<6} {:>4} {:>4} {:>6} {:>7.1}% {:>7.1}% {:>8} {:>8}  {}",
            row.match_number,
            row.p1_votes,
            row.p2_votes,
            row.total_votes,
            row.p1_confidence * 100.0,
            row.p2_confidence * 100.0,
            row.p1_odds_display(),
            row.p2_odds_display(),
            row.status.label()
        );
    }

    let save_csv = std::env::var("SAVE_CSV").unwrap_or_default() == "1";
    if save_csv {
        if !report.value_bets.is_empty() {
            save_value_bets_to_csv(&report.value_bets, "value_bets.csv")?;
            println!("\nSaved value bets to value_bets.csv");
        }
        save_match_summaries_to_csv(&summaries, "match_summary.csv")?;
        println!("Saved match summary to match_summary.csv");
    }

    if let Some(path) = &args.json {
        save_report_to_json(&report, path)?;
        println!("\nSaved analysis report to {}", path);
    }

    println!(
        "\nAnalysis completed at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}
