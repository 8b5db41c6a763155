//! Google Generative Language (Gemini) provider.

use async_trait::async_trait;
use base64::Engine;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use super::{InferenceInput, InferencePayload, InferenceProvider, ProviderError};
use crate::credential_pool::ApiKey;

const API_KEY_HEADER: &str = "x-goog-api-key";
const IMAGE_INSTRUCTION: &str = "Analyse the ingredient list shown in this photo.";

pub struct GeminiProvider {
    http_client: Client,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Accepts a pre-built client so TLS setup happens once at startup.
    pub fn new(http_client: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        build_url(&self.base_url, &self.model)
    }
}

pub(super) fn build_url(base_url: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", base_url, model)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    InlineData(InlineData),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

pub(super) fn build_body(input: &InferenceInput) -> serde_json::Value {
    let user_parts = match &input.payload {
        InferencePayload::Text(text) => vec![Part::Text(text)],
        InferencePayload::Image(image) => vec![
            Part::Text(IMAGE_INSTRUCTION),
            Part::InlineData(InlineData {
                mime_type: image.mime_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
            }),
        ],
    };

    let request = GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part::Text(&input.system_instruction)],
        },
        contents: vec![Content { role: Some("user"), parts: user_parts }],
    };

    serde_json::to_value(request).unwrap_or_default()
}

pub(super) fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|_| ProviderError::EmptyResponse)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match response.prompt_feedback.and_then(|f| f.block_reason) {
        Some(reason) => Err(ProviderError::Blocked { reason }),
        None => Err(ProviderError::EmptyResponse),
    }
}

#[async_trait]
impl InferenceProvider for GeminiProvider {
    async fn generate(&self, key: &ApiKey, input: &InferenceInput) -> Result<String, ProviderError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, key.expose())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&build_body(input))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &body, retry_after.as_deref()));
        }

        extract_text(&body)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
