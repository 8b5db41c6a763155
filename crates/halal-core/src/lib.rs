//! # Halal Core
//!
//! Classification pipeline for the Halal Guide service.
//!
//! ```text
//! request ──► ClassificationOrchestrator ──► QuotaGuard
//!                    │
//!                    ├──► CatalogLookup (barcode only)
//!                    ▼
//!             InferenceInvoker ──► CredentialPool ──► InferenceProvider
//!                    │
//!                    ▼
//!              ResultParser ──► ClassificationVerdict
//! ```
//!
//! Shared mutable state lives in two places only: the credential pool's
//! cool-down table and the quota guard's per-user counters. Both are owned
//! structures injected into the orchestrator at construction.

pub mod catalog;
pub mod common;
pub mod credential_pool;
pub mod error;
pub mod invoker;
pub mod modules;
pub mod orchestrator;
pub mod parser;
pub mod quota;
pub mod upstream;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export commonly used types
pub use catalog::{CatalogLookup, OpenFoodFactsCatalog};
pub use credential_pool::{CredentialLease, CredentialPool};
pub use error::{AppError, AppResult};
pub use invoker::InferenceInvoker;
pub use orchestrator::{Classification, ClassificationOrchestrator};
pub use parser::parse_verdict;
pub use quota::{InMemoryQuotaStore, QuotaGuard, QuotaStore, SqliteQuotaStore};
pub use upstream::{GeminiProvider, InferenceProvider, ProviderError};
