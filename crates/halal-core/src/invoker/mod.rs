//! Drives provider calls across the credential pool.
//!
//! Each call keeps its own exclusion set: a credential that failed is never
//! retried within the same call, and at most `min(pool size, max_attempts)`
//! provider calls are made. The pool additionally cools the failed
//! credential down so unrelated calls steer away from it for a while.

pub mod prompts;

#[cfg(test)]
mod tests;

use halal_types::{ClassificationVerdict, ClassifyError, DailyInsight};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::credential_pool::CredentialPool;
use crate::parser;
use crate::upstream::{InferenceInput, InferencePayload, InferenceProvider, ProviderError};

/// Retry bounds for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokerSettings {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self { max_attempts: 3, attempt_timeout: Duration::from_secs(30) }
    }
}

impl From<&halal_types::models::config::InferenceConfig> for InvokerSettings {
    fn from(config: &halal_types::models::config::InferenceConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvokeError {
    /// No credential produced a response
    #[error("all credentials exhausted after {attempts} attempt(s)")]
    Exhausted { attempts: u32 },

    /// The provider refused the request itself
    #[error("provider rejected request: {0}")]
    Rejected(ProviderError),
}

impl From<InvokeError> for ClassifyError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::Exhausted { attempts } => Self::AllCredentialsExhausted { attempts },
            InvokeError::Rejected(e) => Self::ProviderRejected {
                message: crate::common::sanitize_provider_error(&e),
            },
        }
    }
}

pub struct InferenceInvoker {
    pool: Arc<CredentialPool>,
    provider: Arc<dyn InferenceProvider>,
    settings: InvokerSettings,
}

impl InferenceInvoker {
    pub fn new(
        pool: Arc<CredentialPool>,
        provider: Arc<dyn InferenceProvider>,
        settings: InvokerSettings,
    ) -> Self {
        Self { pool, provider, settings }
    }

    pub fn pool(&self) -> &Arc<CredentialPool> {
        &self.pool
    }

    /// Classify ingredient text or a label photo. Model output is parsed leniently.
    pub async fn classify(
        &self,
        payload: InferencePayload,
    ) -> Result<ClassificationVerdict, InvokeError> {
        let input = InferenceInput {
            system_instruction: prompts::CLASSIFICATION_RUBRIC.to_string(),
            payload,
        };
        let raw = self.invoke(&input).await?;
        Ok(parser::parse_verdict(&raw))
    }

    /// Advisory chat. Returns the model's free text as-is.
    pub async fn chat(&self, message: &str) -> Result<String, InvokeError> {
        let input = InferenceInput::text(prompts::ADVISOR_PERSONA, message);
        self.invoke(&input).await
    }

    /// Daily verse/hadith. Falls back to a built-in card on any failure.
    pub async fn daily_insight(&self) -> DailyInsight {
        let input = InferenceInput::text(
            prompts::DAILY_INSIGHT_INSTRUCTION,
            prompts::DAILY_INSIGHT_REQUEST,
        );
        match self.invoke(&input).await {
            Ok(raw) => parser::parse_daily_insight(&raw).unwrap_or_else(|| {
                debug!("Daily insight not parseable, using fallback");
                DailyInsight::default()
            }),
            Err(e) => {
                debug!("Daily insight unavailable ({}), using fallback", e);
                DailyInsight::default()
            },
        }
    }

    async fn invoke(&self, input: &InferenceInput) -> Result<String, InvokeError> {
        let trace_id = uuid::Uuid::new_v4().simple().to_string();
        let trace_id = &trace_id[..8];
        let max_attempts = (self.settings.max_attempts as usize).min(self.pool.len());

        let mut excluded: HashSet<String> = HashSet::new();
        let mut attempts: u32 = 0;

        while (attempts as usize) < max_attempts {
            let Ok(lease) = self.pool.acquire(&excluded) else {
                break;
            };
            attempts += 1;

            debug!(
                "[{}] {} attempt {}/{} with {}",
                trace_id,
                self.provider.provider_name(),
                attempts,
                max_attempts,
                lease.id()
            );

            let call = self.provider.generate(lease.key(), input);
            let outcome = tokio::time::timeout(self.settings.attempt_timeout, call)
                .await
                .unwrap_or(Err(ProviderError::Timeout {
                    secs: self.settings.attempt_timeout.as_secs(),
                }));

            match outcome {
                Ok(text) => {
                    self.pool.report_success(lease.id());
                    if attempts > 1 {
                        info!(
                            "[{}] Failover succeeded on attempt {} ({})",
                            trace_id,
                            attempts,
                            lease.id()
                        );
                    }
                    return Ok(text);
                },
                Err(e) if e.should_rotate() => {
                    warn!("[{}] {} failed: {}, rotating", trace_id, lease.id(), e);
                    self.pool.report_failure(lease.id(), e.retry_after());
                    excluded.insert(lease.id().to_string());
                },
                Err(e) => {
                    warn!("[{}] {} rejected request: {}", trace_id, lease.id(), e);
                    return Err(InvokeError::Rejected(e));
                },
            }
        }

        warn!("[{}] All credentials exhausted after {} attempt(s)", trace_id, attempts);
        Err(InvokeError::Exhausted { attempts })
    }
}
