//! Session steps. Each reads what it needs from the session, releases the
//! lock, does its slow work (PDF parsing, HTTP, LLM), then writes back.

use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{StructuredAnalysis, SuggestionSet};
use crate::analysis::AnalysisClient;
use crate::errors::AppError;
use crate::extract::{extract_text_from_pdf, ExtractionError};
use crate::llm_client::{AwsSettings, BedrockGenerator};
use crate::session::render::{render_suggestions, RenderedSection};
use crate::session::SessionAws;
use crate::state::AppState;

/// Text produced by an extract or fetch step, echoed back for preview.
#[derive(Debug, Serialize)]
pub struct TextPreview {
    pub text: String,
    pub characters: usize,
}

impl TextPreview {
    fn new(text: String) -> Self {
        let characters = text.chars().count();
        Self { text, characters }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionsView {
    pub suggestions: SuggestionSet,
    pub sections: Vec<RenderedSection>,
}

impl SuggestionsView {
    fn new(suggestions: SuggestionSet) -> Self {
        let sections = render_suggestions(&suggestions);
        Self {
            suggestions,
            sections,
        }
    }
}

/// Client for this session: its own AWS override if set, else the server default.
async fn analysis_client(state: &AppState, id: Uuid) -> Result<AnalysisClient, AppError> {
    let generator = state.sessions.with_session(id, |s| s.generator()).await?;
    Ok(AnalysisClient::new(generator.unwrap_or_else(|| state.llm.clone())))
}

pub async fn upload_cv(
    state: &AppState,
    id: Uuid,
    document: Bytes,
) -> Result<TextPreview, AppError> {
    // Fail fast on an unknown session before parsing the document.
    state.sessions.with_session(id, |_| ()).await?;

    info!("Extracting text from PDF ({} bytes)", document.len());
    let cv_text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&document))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::Extraction(ExtractionError::Malformed)
            } else {
                AppError::Internal(e.into())
            }
        })??;

    let preview = TextPreview::new(cv_text.clone());
    state
        .sessions
        .with_session(id, |s| s.set_cv_text(cv_text))
        .await?;
    Ok(preview)
}

pub async fn analyze_cv(state: &AppState, id: Uuid) -> Result<StructuredAnalysis, AppError> {
    let cv_text = state
        .sessions
        .with_session(id, |s| s.cv_text.clone())
        .await?
        .ok_or_else(|| AppError::Validation("Upload a CV before analyzing it".to_string()))?;

    let analysis = analysis_client(state, id).await?.analyze_cv(&cv_text).await?;

    let stored = state
        .sessions
        .with_session(id, |s| {
            let unchanged = s.cv_text.as_deref() == Some(cv_text.as_str());
            if unchanged {
                s.set_cv_analysis(analysis.clone());
            }
            unchanged
        })
        .await?;
    if !stored {
        return Err(AppError::Conflict(
            "The CV was replaced while it was being analyzed; analyze it again".to_string(),
        ));
    }
    Ok(analysis)
}

pub async fn scrape_job(state: &AppState, id: Uuid, url: &str) -> Result<TextPreview, AppError> {
    if url.trim().is_empty() {
        return Err(AppError::Validation("Job posting URL cannot be empty".to_string()));
    }
    state.sessions.with_session(id, |_| ()).await?;

    let job_description = state.fetcher.fetch_job_description(url).await?;

    let preview = TextPreview::new(job_description.clone());
    state
        .sessions
        .with_session(id, |s| s.set_job_description(job_description))
        .await?;
    Ok(preview)
}

/// Stores pasted posting text and analyzes it in one step.
pub async fn submit_job_text(
    state: &AppState,
    id: Uuid,
    text: String,
) -> Result<StructuredAnalysis, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Job description cannot be empty".to_string()));
    }

    state
        .sessions
        .with_session(id, |s| s.set_job_description(text))
        .await?;
    analyze_job(state, id).await
}

pub async fn analyze_job(state: &AppState, id: Uuid) -> Result<StructuredAnalysis, AppError> {
    let job_description = state
        .sessions
        .with_session(id, |s| s.job_description.clone())
        .await?
        .ok_or_else(|| {
            AppError::Validation("Provide a job description before analyzing it".to_string())
        })?;

    let analysis = analysis_client(state, id)
        .await?
        .analyze_job_description(&job_description)
        .await?;

    let stored = state
        .sessions
        .with_session(id, |s| {
            let unchanged = s.job_description.as_deref() == Some(job_description.as_str());
            if unchanged {
                s.set_job_analysis(analysis.clone());
            }
            unchanged
        })
        .await?;
    if !stored {
        return Err(AppError::Conflict(
            "The job description was replaced while it was being analyzed; analyze it again"
                .to_string(),
        ));
    }
    Ok(analysis)
}

pub async fn generate_suggestions(
    state: &AppState,
    id: Uuid,
) -> Result<SuggestionsView, AppError> {
    let (cv_analysis, job_analysis) = state
        .sessions
        .with_session(id, |s| s.analyses())
        .await?
        .ok_or_else(|| {
            AppError::Validation(
                "Complete both CV analysis and job description analysis before generating suggestions"
                    .to_string(),
            )
        })?;

    let suggestions = analysis_client(state, id)
        .await?
        .generate_suggestions(&cv_analysis, &job_analysis)
        .await?;

    let stored = state
        .sessions
        .with_session(id, |s| {
            let unchanged = s.cv_analysis.as_ref() == Some(&cv_analysis)
                && s.job_analysis.as_ref() == Some(&job_analysis);
            if unchanged {
                s.suggestions = Some(suggestions.clone());
            }
            unchanged
        })
        .await?;
    if !stored {
        return Err(AppError::Conflict(
            "An analysis changed while suggestions were being generated; generate them again"
                .to_string(),
        ));
    }
    Ok(SuggestionsView::new(suggestions))
}

pub async fn rendered_suggestions(
    state: &AppState,
    id: Uuid,
) -> Result<SuggestionsView, AppError> {
    state
        .sessions
        .with_session(id, |s| s.suggestions.clone())
        .await?
        .map(SuggestionsView::new)
        .ok_or_else(|| AppError::NotFound(format!("No suggestions generated for session {id}")))
}

/// Points this session at a different AWS region/profile. Blank fields fall
/// back to the server configuration; both blank clears the override.
pub async fn update_settings(
    state: &AppState,
    id: Uuid,
    region: Option<String>,
    profile: Option<String>,
) -> Result<AwsSettings, AppError> {
    let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let (region, profile) = (non_blank(region), non_blank(profile));

    state.sessions.with_session(id, |_| ()).await?;

    if region.is_none() && profile.is_none() {
        state.sessions.with_session(id, |s| s.aws = None).await?;
        return Ok(AwsSettings {
            region: state.config.aws_region.clone(),
            profile: state.config.aws_profile.clone(),
        });
    }

    let settings = AwsSettings {
        region: region.unwrap_or_else(|| state.config.aws_region.clone()),
        profile: profile.unwrap_or_else(|| state.config.aws_profile.clone()),
    };
    let generator = BedrockGenerator::connect(settings.clone(), state.config.model_id.clone()).await;

    let aws = SessionAws {
        settings: settings.clone(),
        generator: std::sync::Arc::new(generator),
    };
    state.sessions.with_session(id, |s| s.aws = Some(aws)).await?;
    Ok(settings)
}
