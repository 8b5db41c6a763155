//! # Halal Types
//!
//! Core types, models, and error definitions for the Halal Guide classifier.
//!
//! - **`error`** - Typed error hierarchy for classification and configuration
//! - **`models`** - Domain models (verdict, request, quota state, catalog record, config)
//!
//! ## Architecture Role
//!
//! ```text
//!                halal-types (this crate)
//!                        │
//!                        ▼
//!                   halal-core
//!                        │
//!                        ▼
//!                  halal-server
//! ```
//!
//! Everything here is plain data: serializable via serde, cheap to clone
//! across async boundaries, and comparable in tests.

pub mod error;
pub mod models;

pub use error::{ClassifyError, ConfigError};

pub use models::{
    AppConfig, BarcodeOutcome, CatalogRecord, ClassificationRequest, ClassificationVerdict,
    DailyInsight, ImagePayload, QuotaStatus, UserQuotaState, VerdictStatus,
};
