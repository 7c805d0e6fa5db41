// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access gate rejecting blocked identities.

use helpline_core::{ChatStore, HelplineError};

/// Gate verdict for an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Check whether an identity may submit messages.
///
/// Absence of a user record is never a denial. A failing store lookup is a
/// distinct condition from `Deny` and propagates as a storage error; it must
/// not be treated as an implicit Allow.
pub async fn check(store: &dyn ChatStore, identity: &str) -> Result<Access, HelplineError> {
    match store.find_user(identity).await? {
        Some(user) if user.is_blocked => Ok(Access::Deny),
        _ => Ok(Access::Allow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpline_core::UserRecord;
    use helpline_test_utils::MockChatStore;

    #[tokio::test]
    async fn missing_record_allows() {
        let store = MockChatStore::new();
        assert_eq!(check(&store, "stranger").await.unwrap(), Access::Allow);
    }

    #[tokio::test]
    async fn blocked_record_denies() {
        let store = MockChatStore::new();
        let mut user = UserRecord::new("u2");
        user.is_blocked = true;
        store.inject_user(user).await;

        assert_eq!(check(&store, "u2").await.unwrap(), Access::Deny);
    }

    #[tokio::test]
    async fn unblocked_record_allows() {
        let store = MockChatStore::new();
        store.inject_user(UserRecord::new("u1")).await;
        assert_eq!(check(&store, "u1").await.unwrap(), Access::Allow);
    }

    #[tokio::test]
    async fn store_failure_is_not_an_allow() {
        let store = MockChatStore::new();
        store.fail_user_ops(true);
        let err = check(&store, "u1").await.unwrap_err();
        assert!(matches!(err, HelplineError::Storage { .. }));
    }
}
