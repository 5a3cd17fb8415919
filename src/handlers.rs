use crate::config::Config;
use crate::csv_parser::parse_csv;
use crate::errors::AppError;
use crate::mapping::{CanonicalField, MappingProposal};
use crate::models::*;
use crate::normalize::normalize_rows;
use crate::scoring;
use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// The pipeline itself is stateless; only the immutable configuration rides
/// along, so concurrent batches never interact.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
}

/// The API routes. Kept separate from the health route so the binary can
/// wrap them in rate-limiting and body-size layers while tests drive them
/// directly.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/score", post(score_leads))
        .route("/api/v1/csv/inspect", post(inspect_csv))
        .route("/api/v1/csv/process", post(process_csv))
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "leadscore-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/score
///
/// Scores a batch of leads. Accepts `{ "leads": Lead[] }` and answers
/// `{ "leads": ScoredLead[] }` in the same order.
///
/// The body is taken as raw JSON so the shape check happens before any
/// per-lead work: a missing or non-array `leads` is a 400, not a
/// deserialization 422. Individual leads are converted leniently, so one
/// malformed element never aborts the rest of the batch.
///
/// # Arguments
///
/// * `payload` - The raw JSON request body.
///
/// # Returns
///
/// * `Result<Json<ScoreResponse>, AppError>` - The scored leads or an error.
pub async fn score_leads(Json(payload): Json<Value>) -> Result<Json<ScoreResponse>, AppError> {
    let items = payload
        .get("leads")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::InvalidRequest("Invalid leads data".to_string()))?;

    tracing::info!("POST /api/v1/score - {} lead(s)", items.len());

    let leads: Vec<Lead> = items.iter().map(Lead::from_value).collect();
    let scored = scoring::score_leads(leads);

    Ok(Json(ScoreResponse { leads: scored }))
}

/// POST /api/v1/csv/inspect
///
/// Parses an uploaded CSV and proposes a field mapping for operator review.
/// Nothing is normalized or scored here; the response is the confirmation
/// surface (mapping with `confirmed: false`) plus a small row preview.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - The raw CSV text and optional file name.
///
/// # Returns
///
/// * `Result<Json<CsvInspectResponse>, AppError>` - The proposal or an error.
pub async fn inspect_csv(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CsvInspectRequest>,
) -> Result<Json<CsvInspectResponse>, AppError> {
    validate_file_name(req.file_name.as_deref())?;

    let parsed = parse_csv(&req.csv)?;
    tracing::info!(
        "POST /api/v1/csv/inspect - {} header(s), {} row(s)",
        parsed.headers.len(),
        parsed.rows.len()
    );

    let mut proposal = MappingProposal::propose(&parsed.headers);
    proposal.await_confirmation();

    if !proposal.mapping().has_title() {
        tracing::warn!("No title column auto-detected; operator input required");
    }

    let preview: Vec<RawRow> = parsed
        .rows
        .iter()
        .take(state.config.preview_rows)
        .cloned()
        .collect();

    Ok(Json(CsvInspectResponse {
        row_count: parsed.rows.len(),
        headers: parsed.headers,
        mapping: proposal.surface(),
        preview,
    }))
}

/// POST /api/v1/csv/process
///
/// Runs the full pipeline on an uploaded CSV: parse, propose, apply the
/// operator's overrides, confirm, normalize, score. Confirmation fails with
/// 422 while `title` has no header; the operator assigns one and calls
/// again - the session is not aborted.
///
/// # Arguments
///
/// * `req` - The raw CSV text plus the operator-confirmed mapping overrides.
///
/// # Returns
///
/// * `Result<Json<ScoreResponse>, AppError>` - The scored leads or an error.
pub async fn process_csv(
    Json(req): Json<CsvProcessRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    validate_file_name(req.file_name.as_deref())?;

    let parsed = parse_csv(&req.csv)?;
    tracing::info!(
        "POST /api/v1/csv/process - {} header(s), {} row(s)",
        parsed.headers.len(),
        parsed.rows.len()
    );

    let mut proposal = MappingProposal::propose(&parsed.headers);
    proposal.await_confirmation();
    apply_overrides(&mut proposal, &req.mapping, &parsed.headers)?;

    let confirmed = proposal.confirm()?;
    let leads = normalize_rows(&parsed.rows, &confirmed);
    let scored = scoring::score_leads(leads);

    tracing::info!("Scored {} lead(s) from CSV", scored.len());

    Ok(Json(ScoreResponse { leads: scored }))
}

/// Applies operator overrides onto a proposal. An override must name a
/// header that exists in the file; an empty string clears the assignment.
fn apply_overrides(
    proposal: &mut MappingProposal,
    overrides: &MappingOverrides,
    headers: &[String],
) -> Result<(), AppError> {
    let entries: [(CanonicalField, &Option<String>); 6] = [
        (CanonicalField::Name, &overrides.name),
        (CanonicalField::Title, &overrides.title),
        (CanonicalField::Company, &overrides.company),
        (CanonicalField::Website, &overrides.website),
        (CanonicalField::Email, &overrides.email),
        (CanonicalField::Phone, &overrides.phone),
    ];

    for (field, value) in entries {
        let Some(raw) = value else {
            continue;
        };
        let header = raw.trim();
        if header.is_empty() {
            proposal.clear(field);
            continue;
        }
        if !headers.iter().any(|h| h == header) {
            return Err(AppError::InvalidRequest(format!(
                "Unknown header '{}' for field '{}'",
                header,
                field.key()
            )));
        }
        proposal.set(field, header.to_string());
    }

    Ok(())
}

/// Uploads must carry a `.csv` extension when a file name is supplied at all.
fn validate_file_name(file_name: Option<&str>) -> Result<(), AppError> {
    let Some(name) = file_name else {
        return Ok(());
    };
    if name.to_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!(
            "Expected a .csv file, got '{}'",
            name
        )))
    }
}
