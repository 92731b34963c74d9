use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::prelude::*;
use serde::Deserialize;
use tennis_value_ev::models::{AnalysisConfig, MatchSummary};
use tennis_value_ev::value_analysis::ValueBet;
use tennis_value_ev::{run_analysis, AnalysisError};
use tower_http::{services::ServeDir, trace::TraceLayer};

// Custom filters for formatting
mod filters {
    pub fn format_percent(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.1}%", value * 100.0))
    }

    pub fn format_value(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:+.3}", value))
    }

    pub fn format_odds(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.2}", value))
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    error: Option<String>,
    config: AnalysisConfig,
    predictions: String,
    odds: String,
}

impl HomeTemplate {
    fn blank() -> Self {
        Self {
            error: None,
            config: AnalysisConfig::default(),
            predictions: String::new(),
            odds: String::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate {
    total_experts: usize,
    value_bets: Vec<ValueBet>,
    summaries: Vec<MatchSummary>,
    generated_at: String,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeForm {
    predictions: String,
    #[serde(default)]
    odds: String,
    min_confidence: f64,
    min_odds: f64,
    max_odds: f64,
}

async fn home() -> impl IntoResponse {
    HtmlTemplate(HomeTemplate::blank())
}

async fn analyze(Form(form): Form<AnalyzeForm>) -> Response {
    let config = AnalysisConfig {
        min_confidence: form.min_confidence,
        min_odds: form.min_odds,
        max_odds: form.max_odds,
    };

    match run_analysis(&form.predictions, &form.odds, config) {
        Ok(report) => {
            let summaries = report.match_summaries();
            HtmlTemplate(ResultsTemplate {
                total_experts: report.total_experts,
                value_bets: report.value_bets,
                summaries,
                generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            })
            .into_response()
        }
        Err(AnalysisError::EmptyPredictions) => HtmlTemplate(HomeTemplate {
            error: Some("Paste at least one expert prediction line.".to_string()),
            config,
            predictions: form.predictions,
            odds: form.odds,
        })
        .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ApiAnalyzeRequest {
    predictions: String,
    #[serde(default)]
    odds: String,
    #[serde(default)]
    config: Option<AnalysisConfig>,
}

async fn api_analyze(Json(request): Json<ApiAnalyzeRequest>) -> Response {
    let config = request.config.unwrap_or_default();
    match run_analysis(&request.predictions, &request.odds, config) {
        Ok(report) => Json(report).into_response(),
        Err(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response(),
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Each request runs the pipeline on its own inputs; there is no shared
    // state to protect
    let app = Router::new()
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(home))
        .route("/analyze", post(analyze))
        .route("/api/analyze", post(api_analyze))
        .layer(TraceLayer::new_for_http());

    println!("\nStarting web server at http://127.0.0.1:3000");
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
