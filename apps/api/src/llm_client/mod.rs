/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call Bedrock directly.
/// All LLM interactions MUST go through a `TextGenerator`.
///
/// Requests use the Bedrock Converse API: one user-role message plus an
/// `inferenceConfig` of max tokens, temperature and top-p. Failures are
/// returned as-is; there is no retry.
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::{
    error::DisplayErrorContext,
    types::{ContentBlock, ConversationRole, InferenceConfiguration, Message},
    Client,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Error invoking model {model_id}: {message}")]
    Invocation { model_id: String, message: String },

    #[error("Invalid model request: {0}")]
    Request(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Fixed decoding parameters for a single call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    pub max_tokens: i32,
    pub temperature: f32,
    pub top_p: f32,
}

impl InferenceParams {
    pub fn with_max_tokens(max_tokens: i32) -> Self {
        Self {
            max_tokens,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

/// A remote text-generation capability. Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` as a single user message and returns the generated text.
    async fn generate(&self, prompt: &str, params: InferenceParams) -> Result<String, LlmError>;

    fn model_id(&self) -> &str;
}

/// Region and credential profile a Bedrock client was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwsSettings {
    pub region: String,
    pub profile: String,
}

/// `TextGenerator` backed by Amazon Bedrock's Converse API.
#[derive(Clone)]
pub struct BedrockGenerator {
    client: Client,
    model_id: String,
}

impl BedrockGenerator {
    /// Loads AWS configuration for the given region and named credential profile.
    /// Credentials are resolved lazily, on the first call.
    pub async fn connect(settings: AwsSettings, model_id: impl Into<String>) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .profile_name(&settings.profile)
            .load()
            .await;

        let model_id = model_id.into();
        info!(
            "Bedrock client ready (model: {}, region: {}, profile: {})",
            model_id, settings.region, settings.profile
        );

        Self {
            client: Client::new(&sdk_config),
            model_id,
        }
    }
}

#[async_trait]
impl TextGenerator for BedrockGenerator {
    async fn generate(&self, prompt: &str, params: InferenceParams) -> Result<String, LlmError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let inference_config = InferenceConfiguration::builder()
            .max_tokens(params.max_tokens)
            .temperature(params.temperature)
            .top_p(params.top_p)
            .build();

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .inference_config(inference_config)
            .send()
            .await
            .map_err(|e| LlmError::Invocation {
                model_id: self.model_id.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        if let Some(usage) = response.usage() {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens(),
                usage.output_tokens()
            );
        }

        response
            .output()
            .and_then(|output| output.as_message().ok())
            .and_then(|message| message.content().iter().find_map(|b| b.as_text().ok()))
            .cloned()
            .ok_or(LlmError::EmptyContent)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
