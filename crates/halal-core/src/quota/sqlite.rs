//! SQLite-backed quota store (`user_quota` table).
//!
//! rusqlite is synchronous, so every query runs on the blocking pool.

use async_trait::async_trait;
use chrono::NaiveDate;
use halal_types::UserQuotaState;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use super::QuotaStore;
use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteQuotaStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteQuotaStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> AppResult<Self> {
        let _rows_affected: usize = conn.execute(
            "CREATE TABLE IF NOT EXISTS user_quota (
                user_id TEXT PRIMARY KEY,
                daily_count INTEGER NOT NULL DEFAULT 0,
                last_reset_date TEXT NOT NULL,
                is_premium INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Grant or revoke premium. Creates the user record if needed.
    pub async fn set_premium(
        &self,
        user_id: &str,
        is_premium: bool,
        today: NaiveDate,
    ) -> AppResult<()> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let _rows_affected: usize = conn.execute(
                "INSERT INTO user_quota (user_id, daily_count, last_reset_date, is_premium)
                 VALUES (?1, 0, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET is_premium = excluded.is_premium",
                params![user_id, today.format(DATE_FORMAT).to_string(), is_premium],
            )?;
            Ok(())
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&conn.lock()))
            .await
            .map_err(|e| AppError::Unknown(format!("quota store task failed: {}", e)))?
    }
}

#[async_trait]
impl QuotaStore for SqliteQuotaStore {
    async fn get_quota_state(&self, user_id: &str) -> AppResult<Option<UserQuotaState>> {
        let user_id = user_id.to_string();
        let row: Option<(u32, String, bool)> = self
            .with_conn(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT daily_count, last_reset_date, is_premium
                         FROM user_quota WHERE user_id = ?1",
                        params![user_id],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;

        row.map(|(daily_count, date, is_premium)| {
            let last_reset_date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|e| AppError::Unknown(format!("bad last_reset_date {:?}: {}", date, e)))?;
            Ok(UserQuotaState { daily_count, last_reset_date, is_premium })
        })
        .transpose()
    }

    // Premium is only changed through `set_premium`.
    async fn set_quota_state(&self, user_id: &str, state: UserQuotaState) -> AppResult<()> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let _rows_affected: usize = conn.execute(
                "INSERT INTO user_quota (user_id, daily_count, last_reset_date, is_premium)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                    daily_count = excluded.daily_count,
                    last_reset_date = excluded.last_reset_date",
                params![
                    user_id,
                    state.daily_count,
                    state.last_reset_date.format(DATE_FORMAT).to_string(),
                    state.is_premium
                ],
            )?;
            Ok(())
        })
        .await
    }
}
