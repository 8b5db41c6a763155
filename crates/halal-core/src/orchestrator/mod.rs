//! Entry points of the classification pipeline.
//!
//! Every classification call is validated, then charged against the caller's
//! daily quota, then executed. Barcode calls go through the catalog first;
//! photo and text calls go straight to inference. Chat and the daily insight
//! share the inference backend but are not metered.

mod builder;
pub mod photo;


use halal_types::models::CatalogLookupResult;
use halal_types::{
    BarcodeOutcome, ClassificationRequest, ClassificationVerdict, ClassifyError, DailyInsight,
    ImagePayload, QuotaStatus,
};
use std::sync::Arc;

use crate::catalog::{normalize_barcode, CatalogLookup};
use crate::invoker::{prompts, InferenceInvoker};
use crate::quota::QuotaGuard;
use crate::upstream::InferencePayload;

pub struct ClassificationOrchestrator {
    catalog: Arc<dyn CatalogLookup>,
    invoker: Arc<InferenceInvoker>,
    quota: Arc<QuotaGuard>,
}

impl ClassificationOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogLookup>,
        invoker: Arc<InferenceInvoker>,
        quota: Arc<QuotaGuard>,
    ) -> Self {
        Self { catalog, invoker, quota }
    }

    pub fn invoker(&self) -> &Arc<InferenceInvoker> {
        &self.invoker
    }

    /// Run any classification request.
    pub async fn classify(
        &self,
        user_id: &str,
        request: ClassificationRequest,
    ) -> Result<Classification, ClassifyError> {
        tracing::debug!(user_id, kind = request.kind(), "Classification request");
        match request {
            ClassificationRequest::Barcode(code) => {
                self.classify_by_barcode(user_id, &code).await.map(Classification::Barcode)
            },
            ClassificationRequest::Photo(image) => {
                self.classify_by_photo(user_id, image).await.map(Classification::Verdict)
            },
            ClassificationRequest::Text(text) => {
                self.classify_by_text(user_id, &text).await.map(Classification::Verdict)
            },
        }
    }

    pub async fn classify_by_barcode(
        &self,
        user_id: &str,
        code: &str,
    ) -> Result<BarcodeOutcome, ClassifyError> {
        let code = normalize_barcode(code)?;
        self.quota
            .guard(user_id, move || async move {
                let record = match self.catalog.lookup(&code).await? {
                    CatalogLookupResult::NotFound => {
                        tracing::info!(user_id, barcode = %code, "Product not in catalog");
                        return Ok(BarcodeOutcome::NotFound);
                    },
                    CatalogLookupResult::Found(record) => record,
                };

                let Some(ingredients) = record.raw_ingredient_text.as_deref() else {
                    tracing::info!(user_id, barcode = %code, "Product has no ingredient text");
                    return Ok(BarcodeOutcome::NeedsPhoto { name: record.name });
                };

                let message = prompts::ingredients_message(Some(&record.name), ingredients);
                let verdict = self
                    .infer(user_id, "barcode", InferencePayload::Text(message))
                    .await?
                    .with_product_name(record.name.clone());
                Ok(BarcodeOutcome::Classified { name: record.name, verdict })
            })
            .await
    }

    pub async fn classify_by_photo(
        &self,
        user_id: &str,
        image: ImagePayload,
    ) -> Result<ClassificationVerdict, ClassifyError> {
        let image = photo::validate_image(image)?;
        self.quota
            .guard(user_id, move || self.infer(user_id, "photo", InferencePayload::Image(image)))
            .await
    }

    pub async fn classify_by_text(
        &self,
        user_id: &str,
        ingredient_text: &str,
    ) -> Result<ClassificationVerdict, ClassifyError> {
        if ingredient_text.trim().is_empty() {
            return Err(ClassifyError::invalid("ingredient text is empty"));
        }
        let message = prompts::ingredients_message(None, ingredient_text);
        self.quota
            .guard(user_id, move || self.infer(user_id, "text", InferencePayload::Text(message)))
            .await
    }

    /// Advisory chat. Not metered.
    pub async fn chat(&self, message: &str) -> Result<String, ClassifyError> {
        if message.trim().is_empty() {
            return Err(ClassifyError::invalid("message is empty"));
        }
        Ok(self.invoker.chat(message.trim()).await?)
    }

    pub async fn daily_insight(&self) -> DailyInsight {
        self.invoker.daily_insight().await
    }

    pub async fn quota_status(&self, user_id: &str) -> Result<QuotaStatus, ClassifyError> {
        self.quota.status(user_id).await
    }

    async fn infer(
        &self,
        user_id: &str,
        kind: &'static str,
        payload: InferencePayload,
    ) -> Result<ClassificationVerdict, ClassifyError> {
        let verdict = self.invoker.classify(payload).await?;
        tracing::info!(
            user_id,
            kind,
            status = %verdict.status,
            flagged = verdict.flagged_ingredients.len(),
            "Classification complete"
        );
        Ok(verdict)
    }
}

/// Result of [`ClassificationOrchestrator::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Barcode(BarcodeOutcome),
    Verdict(ClassificationVerdict),
}
