//! Domain models.

mod catalog;
pub mod config;
mod insight;
mod outcome;
mod quota;
mod request;
mod verdict;

pub use catalog::{CatalogLookupResult, CatalogRecord};
pub use config::AppConfig;
pub use insight::DailyInsight;
pub use outcome::BarcodeOutcome;
pub use quota::{QuotaStatus, UserQuotaState};
pub use request::{ClassificationRequest, ImagePayload, SUPPORTED_IMAGE_TYPES};
pub use verdict::{ClassificationVerdict, VerdictStatus};
