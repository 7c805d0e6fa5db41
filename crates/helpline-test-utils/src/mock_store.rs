// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `ChatStore` with injectable failures.
//!
//! Backs the relay and gateway tests: messages land in a `Vec`, user
//! records in a `HashMap`, and the `fail_*` switches let tests observe how
//! callers behave when the store goes away mid-operation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use helpline_core::{
    AnalyticsSnapshot, ChatMessage, ChatStore, HelplineError, LoggedMessage, MessageOrigin,
    UserRecord, VisitorInfo,
};

/// A mock document store for testing.
#[derive(Default)]
pub struct MockChatStore {
    messages: Mutex<Vec<ChatMessage>>,
    users: Mutex<HashMap<String, UserRecord>>,
    fail_appends: AtomicBool,
    fail_user_ops: AtomicBool,
    fail_visitor_writes: AtomicBool,
}

impl MockChatStore {
    /// Create an empty store with all failure switches off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent append fail with a storage error.
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent user-record operation fail with a storage error.
    pub fn fail_user_ops(&self, fail: bool) {
        self.fail_user_ops.store(fail, Ordering::SeqCst);
    }

    /// Make only visitor-info writes fail, leaving other user ops healthy.
    pub fn fail_visitor_writes(&self, fail: bool) {
        self.fail_visitor_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a user record directly.
    pub async fn inject_user(&self, user: UserRecord) {
        self.users.lock().await.insert(user.identity.clone(), user);
    }

    /// Number of persisted messages.
    pub async fn message_count(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Persisted messages for one identity, in insertion order.
    pub async fn messages_for(&self, identity: &str) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .await
            .iter()
            .filter(|m| m.identity == identity)
            .cloned()
            .collect()
    }

    async fn append(
        &self,
        identity: &str,
        body: &str,
        origin: MessageOrigin,
    ) -> Result<ChatMessage, HelplineError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(HelplineError::Storage {
                source: "injected append failure".into(),
            });
        }
        let message = ChatMessage::new(identity, body, origin)?;
        self.messages.lock().await.push(message.clone());
        Ok(message)
    }

    fn check_user_ops(&self) -> Result<(), HelplineError> {
        if self.fail_user_ops.load(Ordering::SeqCst) {
            return Err(HelplineError::Storage {
                source: "injected user-record failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatStore for MockChatStore {
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
        let users = self.users.lock().await;
        let mut messages = self.messages.lock().await.clone();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages
            .into_iter()
            .map(|message| {
                let visitor_info = users
                    .get(&message.identity)
                    .and_then(|u| u.visitor_info.clone());
                LoggedMessage {
                    message,
                    visitor_info,
                }
            })
            .collect())
    }

    async fn clear(&self, identity: &str) -> Result<u64, HelplineError> {
        let mut messages = self.messages.lock().await;
        let before = messages.len();
        messages.retain(|m| m.identity != identity);
        Ok((before - messages.len()) as u64)
    }

    async fn find_user(&self, identity: &str) -> Result<Option<UserRecord>, HelplineError> {
        self.check_user_ops()?;
        Ok(self.users.lock().await.get(identity).cloned())
    }

    async fn set_blocked(&self, identity: &str, blocked: bool) -> Result<(), HelplineError> {
        self.check_user_ops()?;
        let mut users = self.users.lock().await;
        users
            .entry(identity.to_string())
            .or_insert_with(|| UserRecord::new(identity))
            .is_blocked = blocked;
        Ok(())
    }

    async fn set_resolved(
        &self,
        identity: &str,
        resolved: bool,
    ) -> Result<(), HelplineError> {
        self.check_user_ops()?;
        let mut users = self.users.lock().await;
        users
            .entry(identity.to_string())
            .or_insert_with(|| UserRecord::new(identity))
            .is_resolved = resolved;
        Ok(())
    }

    async fn record_visitor_info(
        &self,
        identity: &str,
        info: &VisitorInfo,
    ) -> Result<(), HelplineError> {
        self.check_user_ops()?;
        if self.fail_visitor_writes.load(Ordering::SeqCst) {
            return Err(HelplineError::Storage {
                source: "injected visitor-write failure".into(),
            });
        }
        let mut users = self.users.lock().await;
        users
            .entry(identity.to_string())
            .or_insert_with(|| UserRecord::new(identity))
            .visitor_info = Some(info.clone());
        Ok(())
    }

    async fn analytics(&self) -> Result<AnalyticsSnapshot, HelplineError> {
        let users = self.users.lock().await;
        Ok(AnalyticsSnapshot {
            total_messages: self.messages.lock().await.len() as u64,
            active_users: users.values().filter(|u| !u.is_blocked).count() as u64,
            resolved_issues: users.values().filter(|u| u.is_resolved).count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_clear_round_trip() {
        let store = MockChatStore::new();
        store.append_user("u1", "hello").await.unwrap();
        store.append_operator("u1", "hi").await.unwrap();
        store.append_user("u2", "other").await.unwrap();

        assert_eq!(store.message_count().await, 3);
        assert_eq!(store.clear("u1").await.unwrap(), 2);
        assert_eq!(store.clear("u1").await.unwrap(), 0);
        assert_eq!(store.messages_for("u2").await.len(), 1);
    }

    #[tokio::test]
    async fn injected_append_failure_surfaces() {
        let store = MockChatStore::new();
        store.fail_appends(true);
        let err = store.append_user("u1", "hello").await.unwrap_err();
        assert!(matches!(err, HelplineError::Storage { .. }));
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn upserts_create_records_lazily() {
        let store = MockChatStore::new();
        assert!(store.find_user("u1").await.unwrap().is_none());

        store.set_blocked("u1", true).await.unwrap();
        let user = store.find_user("u1").await.unwrap().unwrap();
        assert!(user.is_blocked);
        assert!(!user.is_resolved);

        store.set_resolved("u1", true).await.unwrap();
        assert!(store.find_user("u1").await.unwrap().unwrap().is_resolved);
    }

    #[tokio::test]
    async fn list_all_joins_visitor_info() {
        let store = MockChatStore::new();
        store.append_user("u1", "hello").await.unwrap();
        store.append_user("u2", "no record").await.unwrap();
        store
            .record_visitor_info("u1", &VisitorInfo::default())
            .await
            .unwrap();

        let log = store.list_all().await.unwrap();
        assert_eq!(log.len(), 2);
        let u1 = log.iter().find(|m| m.message.identity == "u1").unwrap();
        let u2 = log.iter().find(|m| m.message.identity == "u2").unwrap();
        assert!(u1.visitor_info.is_some());
        assert!(u2.visitor_info.is_none());
    }

    #[tokio::test]
    async fn analytics_counts_match_state() {
        let store = MockChatStore::new();
        store.append_user("u1", "hello").await.unwrap();
        store.set_blocked("u1", true).await.unwrap();
        store.set_resolved("u2", true).await.unwrap();

        let snapshot = store.analytics().await.unwrap();
        assert_eq!(snapshot.total_messages, 1);
        assert_eq!(snapshot.active_users, 1);
        assert_eq!(snapshot.resolved_issues, 1);
    }
}
