use aiscout_core::{AiscoutError, ComparisonEntry, Report, RewriteReport};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CompetitiveRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default = "direct")]
    pub analysis_type: String,
}

fn direct() -> String {
    "direct".to_string()
}

#[derive(Debug, Serialize)]
pub struct CompetitiveResponse {
    pub analysis_type: String,
    pub results: Vec<ComparisonEntry>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RewritesResponse {
    #[serde(flatten)]
    pub report: RewriteReport,
    pub timestamp: Option<String>,
}

/// A report with the id it was stored under.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub report: Report,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub advisor_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", advisor_configured: state.advisor.is_some() })
}

pub async fn analyze(
    State(state): State<AppState>, Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let url = normalize_url(&request.url).map_err(bad_request)?;
    tracing::info!(%url, "analyze requested");

    let analysis = state.analyzer.fetch_and_analyze(&url).await.map_err(|e| {
        tracing::warn!(%url, error = %e, "page fetch failed");
        bad_request(fetch_failure_message(&e))
    })?;

    let mut report = state.analyzer.report_with_advisor(analysis, state.advisor.as_deref()).await;
    report.timestamp = now();

    let id = state.store.put(report.clone());
    Ok(Json(AnalysisResponse { id, report }))
}

/// Compares two or more pages. Pages that cannot be fetched are reported in
/// `results` rather than failing the request.
pub async fn analyze_competitive(
    State(state): State<AppState>, Json(request): Json<CompetitiveRequest>,
) -> Result<Json<CompetitiveResponse>, ApiError> {
    match request.analysis_type.as_str() {
        "direct" => {}
        "topic" => return Err(error(StatusCode::NOT_IMPLEMENTED, "Topic-based analysis coming soon")),
        _ => return Err(bad_request("Invalid analysis type")),
    }

    let urls: Vec<&str> = request.urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()).collect();
    if urls.len() < 2 {
        return Err(bad_request("Please provide at least 2 URLs for comparison"));
    }
    let urls = urls.into_iter().map(normalize_url).collect::<Result<Vec<_>, _>>().map_err(bad_request)?;
    tracing::info!(pages = urls.len(), "comparison requested");

    let results = state.analyzer.compare(&urls, state.advisor.as_deref()).await;
    Ok(Json(CompetitiveResponse { analysis_type: request.analysis_type, results, timestamp: now() }))
}

pub async fn generate_rewrites(
    State(state): State<AppState>, Json(request): Json<AnalyzeRequest>,
) -> Result<Json<RewritesResponse>, ApiError> {
    let url = normalize_url(&request.url).map_err(bad_request)?;
    tracing::info!(%url, "rewrites requested");

    let report = state.analyzer.rewrites(&url, state.advisor.as_deref()).await.map_err(|e| {
        tracing::warn!(%url, error = %e, "page fetch failed");
        bad_request(fetch_failure_message(&e))
    })?;

    Ok(Json(RewritesResponse { report, timestamp: now() }))
}

pub async fn get_analysis(
    State(state): State<AppState>, Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let stored = Uuid::parse_str(&id).ok().and_then(|id| state.store.get(&id)).ok_or_else(not_found)?;
    Ok(Json(AnalysisResponse { id: stored.id, report: stored.report }))
}

/// Trims the input, adds `https://` when no scheme is given, and rejects
/// anything that is not an http(s) page.
pub fn normalize_url(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("URL is required".to_string());
    }

    let candidate = if raw.contains("://") { raw.to_string() } else { format!("https://{}", raw) };
    let url = Url::parse(&candidate).map_err(|_| format!("Invalid URL: {}", raw))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("Unsupported URL scheme: {}", url.scheme()));
    }
    if url.path().to_ascii_lowercase().ends_with(".pdf") {
        return Err("PDF documents are not supported, please submit an HTML page".to_string());
    }

    Ok(url.to_string())
}

fn now() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}

fn fetch_failure_message(err: &AiscoutError) -> String {
    match err {
        AiscoutError::Timeout { timeout } => format!("The page did not respond within {} seconds", timeout),
        AiscoutError::EmptyDocument(_) => "The page returned no content".to_string(),
        AiscoutError::InvalidUrl(_) => "The URL could not be used".to_string(),
        _ => "Could not fetch the page. Check that the URL is reachable and try again".to_string(),
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    error(StatusCode::BAD_REQUEST, message)
}

fn not_found() -> ApiError {
    error(StatusCode::NOT_FOUND, "Analysis not found")
}
