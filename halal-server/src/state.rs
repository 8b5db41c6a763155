//! Application State
//!
//! Holds the classification pipeline and the configuration it was built from.

use anyhow::Result;
use std::sync::Arc;

use halal_core::ClassificationOrchestrator;
use halal_types::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub orchestrator: Arc<ClassificationOrchestrator>,
    pub config: AppConfig,
}

impl AppState {
    /// Build the production pipeline from configuration.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let orchestrator = Arc::new(ClassificationOrchestrator::from_config(&config)?);
        Ok(Self::new_with_components(orchestrator, config))
    }

    pub fn new_with_components(
        orchestrator: Arc<ClassificationOrchestrator>,
        config: AppConfig,
    ) -> Self {
        Self { inner: Arc::new(AppStateInner { orchestrator, config }) }
    }

    pub fn orchestrator(&self) -> &ClassificationOrchestrator {
        &self.inner.orchestrator
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Number of inference credentials in rotation.
    pub fn credential_count(&self) -> usize {
        self.inner.orchestrator.invoker().pool().len()
    }
}
