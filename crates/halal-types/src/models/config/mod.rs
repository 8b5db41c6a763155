//! Configuration models.

mod app;
mod catalog;
mod inference;
mod quota;
mod server;

pub use app::AppConfig;
pub use catalog::CatalogConfig;
pub use inference::InferenceConfig;
pub use quota::{QuotaConfig, QuotaStoreKind};
pub use server::ServerConfig;
