//! Inference provider abstraction and the Gemini implementation.

mod error;
mod gemini;
mod retry_hint;


pub use error::ProviderError;
pub use gemini::GeminiProvider;
pub use retry_hint::parse_retry_delay;

use async_trait::async_trait;
use halal_types::ImagePayload;

use crate::credential_pool::ApiKey;

/// What the model is asked to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferencePayload {
    Text(String),
    Image(ImagePayload),
}

/// One provider call: a fixed system instruction plus the user payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceInput {
    pub system_instruction: String,
    pub payload: InferencePayload,
}

impl InferenceInput {
    pub fn text(system_instruction: &str, text: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.to_string(),
            payload: InferencePayload::Text(text.into()),
        }
    }
}

/// A generative model reachable with any key from the credential pool.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Run one generation with `key` and return the model's raw text.
    async fn generate(&self, key: &ApiKey, input: &InferenceInput) -> Result<String, ProviderError>;

    /// Short name for logs.
    fn provider_name(&self) -> &'static str;
}
