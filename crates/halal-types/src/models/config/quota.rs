//! Daily quota settings.

use serde::{Deserialize, Serialize};

/// Backing store for per-user quota counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuotaStoreKind {
    /// Process memory; counters are lost on restart
    #[default]
    Memory,
    /// SQLite file at `sqlite_path`
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuotaConfig {
    /// Chargeable calls a non-premium user may make per calendar day (UTC)
    pub daily_limit: u32,
    pub store: QuotaStoreKind,
    pub sqlite_path: Option<String>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self { daily_limit: 3, store: QuotaStoreKind::Memory, sqlite_path: None }
    }
}
