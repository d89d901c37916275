//! Interactive Flow — per-session state and the steps that move it forward:
//! upload CV → analyze CV, scrape or paste job → analyze job, then suggestions.

pub mod flow;
pub mod handlers;
pub mod render;
pub mod store;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::models::{StructuredAnalysis, SuggestionSet};
use crate::llm_client::{AwsSettings, TextGenerator};

/// AWS override chosen for one session, with the generator built from it.
#[derive(Clone)]
pub struct SessionAws {
    pub settings: AwsSettings,
    pub generator: Arc<dyn TextGenerator>,
}

/// Everything one user has produced so far. Lives only in memory.
#[derive(Clone)]
pub struct Session {
    pub created_at: DateTime<Utc>,
    /// Refreshed on every access; idle sessions are evicted by the store.
    pub last_active: DateTime<Utc>,
    pub cv_text: Option<String>,
    pub job_description: Option<String>,
    pub cv_analysis: Option<StructuredAnalysis>,
    pub job_analysis: Option<StructuredAnalysis>,
    pub suggestions: Option<SuggestionSet>,
    pub aws: Option<SessionAws>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            last_active: now,
            cv_text: None,
            job_description: None,
            cv_analysis: None,
            job_analysis: None,
            suggestions: None,
            aws: None,
        }
    }

    /// Replaces the CV text; its analysis and any suggestions derived from it are stale.
    pub fn set_cv_text(&mut self, cv_text: String) {
        self.cv_text = Some(cv_text);
        self.cv_analysis = None;
        self.suggestions = None;
    }

    /// Replaces the job description; its analysis and any suggestions are stale.
    pub fn set_job_description(&mut self, job_description: String) {
        self.job_description = Some(job_description);
        self.job_analysis = None;
        self.suggestions = None;
    }

    pub fn set_cv_analysis(&mut self, analysis: StructuredAnalysis) {
        self.cv_analysis = Some(analysis);
        self.suggestions = None;
    }

    pub fn set_job_analysis(&mut self, analysis: StructuredAnalysis) {
        self.job_analysis = Some(analysis);
        self.suggestions = None;
    }

    /// Both analyses, once they exist.
    pub fn analyses(&self) -> Option<(StructuredAnalysis, StructuredAnalysis)> {
        Some((self.cv_analysis.clone()?, self.job_analysis.clone()?))
    }

    pub fn generator(&self) -> Option<Arc<dyn TextGenerator>> {
        self.aws.as_ref().map(|aws| aws.generator.clone())
    }

    pub fn snapshot(&self, session_id: Uuid) -> SessionSnapshot {
        SessionSnapshot {
            session_id,
            created_at: self.created_at,
            last_active: self.last_active,
            cv_text: self.cv_text.clone(),
            job_description: self.job_description.clone(),
            cv_analysis: self.cv_analysis.clone(),
            job_analysis: self.job_analysis.clone(),
            suggestions: self.suggestions.clone(),
            aws_settings: self.aws.as_ref().map(|aws| aws.settings.clone()),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub cv_text: Option<String>,
    pub job_description: Option<String>,
    pub cv_analysis: Option<StructuredAnalysis>,
    pub job_analysis: Option<StructuredAnalysis>,
    pub suggestions: Option<SuggestionSet>,
    /// `None` means the server's configured region and profile are used.
    pub aws_settings: Option<AwsSettings>,
}
