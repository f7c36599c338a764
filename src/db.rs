//! Participant store.
//!
//! One `participants` row per raw identifier plus an FTS5 `participant_search`
//! entry keyed by the same identifier (`rowid = user_id`). Anything that
//! touches the name runs both statements inside one transaction.

/// Column list matching [`participants::ParticipantRow`], for tables aliased `p`.
macro_rules! participant_columns {
    () => {
        "p.user_id,p.visible_id,p.name,p.video_handle,p.video_key,p.can_contact,p.is_blocked,p.registered_at"
    };
}

pub(crate) use participant_columns;

pub mod participants;
pub mod search;

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

use crate::Result;

/// Owned handle to the store. Cheap to clone; every component gets its own copy
/// at construction.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Store> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        info!("Opened store at {url}");

        Store::with_pool(pool).await
    }

    /// Private in-memory store. A single connection that never expires, since
    /// every new connection would see an empty database.
    pub async fn in_memory() -> Result<Store> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Store::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Store> {
        let store = Store { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS participants (
                user_id INTEGER PRIMARY KEY,
                visible_id INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                video_handle TEXT,
                video_key TEXT UNIQUE,
                can_contact INTEGER,
                is_blocked INTEGER NOT NULL DEFAULT 0,
                registered_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE VIRTUAL TABLE IF NOT EXISTS participant_search USING fts5(name, tokenize = 'unicode61')",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
