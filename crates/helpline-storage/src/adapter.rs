// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ChatStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use helpline_config::model::StorageConfig;
use helpline_core::{
    AnalyticsSnapshot, ChatMessage, ChatStore, HelplineError, LoggedMessage, MessageOrigin,
    UserRecord, VisitorInfo,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed chat store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteStore::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database, applying PRAGMAs and pending migrations.
    pub async fn initialize(&self) -> Result<(), HelplineError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| HelplineError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Flush pending writes ahead of shutdown.
    pub async fn close(&self) -> Result<(), HelplineError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, HelplineError> {
        self.db.get().ok_or_else(|| HelplineError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn append(
        &self,
        identity: &str,
        body: &str,
        origin: MessageOrigin,
    ) -> Result<ChatMessage, HelplineError> {
        let message = ChatMessage::new(identity, body, origin)?;
        queries::messages::insert_message(self.db()?, &message).await?;
        Ok(message)
    }
}

#[async_trait]
impl ChatStore for SqliteStore {
    async fn append_user(
        &self,
        identity: &str,
        body: &str,
    ) -> Result<ChatMessage, HelplineError> {
        self.append(identity, body, MessageOrigin::User).await
    }

    async fn append_operator(
        &self,
        identity: &str,
        body: &str,
    ) -> Result<ChatMessage, HelplineError> {
        self.append(identity, body, MessageOrigin::Operator).await
    }

    async fn list_all(&self) -> Result<Vec<LoggedMessage>, HelplineError> {
        queries::messages::list_all_logged(self.db()?).await
    }

    async fn clear(&self, identity: &str) -> Result<u64, HelplineError> {
        queries::messages::delete_for_identity(self.db()?, identity).await
    }

    async fn find_user(&self, identity: &str) -> Result<Option<UserRecord>, HelplineError> {
        queries::users::find_user(self.db()?, identity).await
    }

    async fn set_blocked(&self, identity: &str, blocked: bool) -> Result<(), HelplineError> {
        queries::users::set_blocked(self.db()?, identity, blocked).await
    }

    async fn set_resolved(
        &self,
        identity: &str,
        resolved: bool,
    ) -> Result<(), HelplineError> {
        queries::users::set_resolved(self.db()?, identity, resolved).await
    }

    async fn record_visitor_info(
        &self,
        identity: &str,
        info: &VisitorInfo,
    ) -> Result<(), HelplineError> {
        queries::users::upsert_visitor_info(self.db()?, identity, info).await
    }

    async fn analytics(&self) -> Result<AnalyticsSnapshot, HelplineError> {
        let db = self.db()?;
        Ok(AnalyticsSnapshot {
            total_messages: queries::messages::count_messages(db).await?,
            active_users: queries::users::count_active(db).await?,
            resolved_issues: queries::users::count_resolved(db).await?,
        })
    }
}
