//! Analysis Client — résumé analysis, job analysis, and tailoring suggestions.
//!
//! Every operation renders a prompt, calls the `TextGenerator` with fixed decoding
//! parameters and parses the reply best-effort. Invocation errors propagate;
//! unparseable replies never do, they degrade to a single raw-text field.

pub mod models;
pub mod prompts;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::models::{ModelOutput, StructuredAnalysis, SuggestionSet};
use crate::analysis::prompts::{
    fill_template, CV_ANALYSIS_PROMPT_TEMPLATE, JOB_ANALYSIS_PROMPT_TEMPLATE,
    SUGGESTIONS_PROMPT_TEMPLATE,
};
use crate::llm_client::{InferenceParams, LlmError, TextGenerator};

const ANALYSIS_MAX_TOKENS: i32 = 2000;
const SUGGESTIONS_MAX_TOKENS: i32 = 4000;

#[derive(Clone)]
pub struct AnalysisClient {
    llm: Arc<dyn TextGenerator>,
}

impl AnalysisClient {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn analyze_cv(&self, cv_text: &str) -> Result<StructuredAnalysis, LlmError> {
        info!("Analyzing CV ({} chars)", cv_text.chars().count());
        let prompt = fill_template(CV_ANALYSIS_PROMPT_TEMPLATE, &[("{cv_text}", cv_text)]);
        let analysis = StructuredAnalysis::from_model_output(
            self.invoke(&prompt, ANALYSIS_MAX_TOKENS).await?,
        );
        if analysis.is_raw() {
            warn!("CV analysis was not structured; keeping raw model output");
        }
        Ok(analysis)
    }

    pub async fn analyze_job_description(
        &self,
        job_description: &str,
    ) -> Result<StructuredAnalysis, LlmError> {
        info!(
            "Analyzing job description ({} chars)",
            job_description.chars().count()
        );
        let prompt = fill_template(
            JOB_ANALYSIS_PROMPT_TEMPLATE,
            &[("{job_description}", job_description)],
        );
        let analysis = StructuredAnalysis::from_model_output(
            self.invoke(&prompt, ANALYSIS_MAX_TOKENS).await?,
        );
        if analysis.is_raw() {
            warn!("Job analysis was not structured; keeping raw model output");
        }
        Ok(analysis)
    }

    pub async fn generate_suggestions(
        &self,
        cv_analysis: &StructuredAnalysis,
        job_analysis: &StructuredAnalysis,
    ) -> Result<SuggestionSet, LlmError> {
        info!("Generating CV improvement suggestions");
        let prompt = fill_template(
            SUGGESTIONS_PROMPT_TEMPLATE,
            &[
                ("{cv_analysis}", pretty_json(cv_analysis).as_str()),
                ("{job_analysis}", pretty_json(job_analysis).as_str()),
            ],
        );
        let suggestions =
            SuggestionSet::from_model_output(self.invoke(&prompt, SUGGESTIONS_MAX_TOKENS).await?);
        if suggestions.raw_text().is_some() {
            warn!("Suggestions were not structured; keeping raw model output");
        }
        Ok(suggestions)
    }

    async fn invoke(&self, prompt: &str, max_tokens: i32) -> Result<ModelOutput, LlmError> {
        let text = self
            .llm
            .generate(prompt, InferenceParams::with_max_tokens(max_tokens))
            .await?;
        debug!(
            "Model {} returned {} chars",
            self.llm.model_id(),
            text.chars().count()
        );
        Ok(ModelOutput::parse(&text))
    }
}

fn pretty_json(analysis: &StructuredAnalysis) -> String {
    // A map of JSON values always serializes.
    serde_json::to_string_pretty(analysis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use serde_json::json;

    fn client(generator: &Arc<ScriptedGenerator>) -> AnalysisClient {
        AnalysisClient::new(generator.clone())
    }

    #[tokio::test]
    async fn test_analyze_cv_embeds_text_and_parses_json() {
        let generator = Arc::new(ScriptedGenerator::new([
            "Sure! {\"name\": \"Jane Doe\", \"skills\": [\"Rust\", \"SQL\"]} Hope that helps.",
        ]));
        let analysis = client(&generator)
            .analyze_cv("Jane Doe\nRust engineer")
            .await
            .unwrap();

        assert_eq!(analysis.0["name"], json!("Jane Doe"));
        assert_eq!(analysis.0["skills"], json!(["Rust", "SQL"]));

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("Jane Doe\nRust engineer"));
        assert!(calls[0].0.contains("Analyze the following CV/resume"));
        assert_eq!(calls[0].1.max_tokens, 2000);
    }

    #[tokio::test]
    async fn test_analyze_job_falls_back_to_raw_analysis() {
        let reply = "The role needs Rust and Kubernetes.";
        let generator = Arc::new(ScriptedGenerator::new([reply]));
        let analysis = client(&generator)
            .analyze_job_description("Job Description: Rust, Kubernetes")
            .await
            .unwrap();

        assert!(analysis.is_raw());
        assert_eq!(analysis.0["raw_analysis"], json!(reply));
        assert!(generator.calls()[0].0.contains("Job Description: Rust, Kubernetes"));
    }

    #[tokio::test]
    async fn test_suggestions_embed_both_analyses_and_use_larger_budget() {
        let generator = Arc::new(ScriptedGenerator::new([
            r#"{"skills_gap_analysis": ["Kubernetes"], "experience_alignment": "Lead with Rust"}"#,
        ]));
        let cv = StructuredAnalysis(json!({"skills": ["Rust"]}).as_object().unwrap().clone());
        let job = StructuredAnalysis(
            json!({"required_skills": ["Rust", "Kubernetes"]})
                .as_object()
                .unwrap()
                .clone(),
        );

        let set = client(&generator).generate_suggestions(&cv, &job).await.unwrap();
        assert_eq!(set.category("skills_gap_analysis"), Some(&json!(["Kubernetes"])));
        assert!(set.raw_text().is_none());

        let calls = generator.calls();
        let (prompt, params) = &calls[0];
        assert!(prompt.contains("\"skills\": [\n    \"Rust\"\n  ]"));
        assert!(prompt.contains("\"required_skills\""));
        assert_eq!(params.max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_cv_analysis_mentioning_placeholder_is_embedded_verbatim() {
        let generator = Arc::new(ScriptedGenerator::new(["{}"]));
        let cv = StructuredAnalysis(
            json!({"summary": "see {job_analysis}"})
                .as_object()
                .unwrap()
                .clone(),
        );
        let job = StructuredAnalysis(
            json!({"job_title": "Platform Lead"})
                .as_object()
                .unwrap()
                .clone(),
        );

        client(&generator).generate_suggestions(&cv, &job).await.unwrap();

        let calls = generator.calls();
        let prompt = &calls[0].0;
        assert!(prompt.contains("\"summary\": \"see {job_analysis}\""));
        assert_eq!(prompt.matches("Platform Lead").count(), 1);
    }

    #[tokio::test]
    async fn test_suggestions_fall_back_to_suggestions_key() {
        let generator = Arc::new(ScriptedGenerator::new(["Add a projects section."]));
        let set = client(&generator)
            .generate_suggestions(&StructuredAnalysis::default(), &StructuredAnalysis::default())
            .await
            .unwrap();
        assert_eq!(set.raw_text(), Some("Add a projects section."));
    }

    #[tokio::test]
    async fn test_invocation_error_propagates() {
        let generator = Arc::new(ScriptedGenerator::failing(LlmError::Invocation {
            model_id: "scripted".to_string(),
            message: "ThrottlingException".to_string(),
        }));
        let err = client(&generator).analyze_cv("cv").await.unwrap_err();
        assert!(matches!(err, LlmError::Invocation { .. }));
    }
}
