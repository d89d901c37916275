//! Axum route handlers for the session API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::models::StructuredAnalysis;
use crate::errors::AppError;
use crate::llm_client::AwsSettings;
use crate::session::flow::{self, SuggestionsView, TextPreview};
use crate::session::SessionSnapshot;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeJobRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct JobTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Multipart field carrying the PDF.
const CV_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state.sessions.with_session(id, |s| s.snapshot(id)).await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/settings
///
/// Overrides the AWS region and credential profile for this session only.
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SettingsRequest>,
) -> Result<Json<AwsSettings>, AppError> {
    let settings = flow::update_settings(&state, id, request.region, request.profile).await?;
    Ok(Json(settings))
}

/// POST /api/v1/sessions/:id/cv
///
/// Accepts a multipart upload with the PDF in the `file` field and returns the extracted text.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<TextPreview>, AppError> {
    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(CV_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            document = Some(bytes);
            break;
        }
    }

    let document = document
        .ok_or_else(|| AppError::Validation(format!("Multipart field '{CV_FIELD}' is required")))?;

    let preview = flow::upload_cv(&state, id, document).await?;
    Ok(Json(preview))
}

/// POST /api/v1/sessions/:id/cv/analyze
pub async fn handle_analyze_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StructuredAnalysis>, AppError> {
    Ok(Json(flow::analyze_cv(&state, id).await?))
}

/// POST /api/v1/sessions/:id/job/scrape
///
/// Fetches the posting and stores the located job description excerpt.
pub async fn handle_scrape_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScrapeJobRequest>,
) -> Result<Json<TextPreview>, AppError> {
    Ok(Json(flow::scrape_job(&state, id, &request.url).await?))
}

/// POST /api/v1/sessions/:id/job/text
///
/// Stores pasted job description text and analyzes it immediately.
pub async fn handle_job_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobTextRequest>,
) -> Result<Json<StructuredAnalysis>, AppError> {
    Ok(Json(flow::submit_job_text(&state, id, request.text).await?))
}

/// POST /api/v1/sessions/:id/job/analyze
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StructuredAnalysis>, AppError> {
    Ok(Json(flow::analyze_job(&state, id).await?))
}

/// POST /api/v1/sessions/:id/suggestions
pub async fn handle_generate_suggestions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionsView>, AppError> {
    Ok(Json(flow::generate_suggestions(&state, id).await?))
}

/// GET /api/v1/sessions/:id/suggestions
pub async fn handle_get_suggestions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionsView>, AppError> {
    Ok(Json(flow::rendered_suggestions(&state, id).await?))
}
