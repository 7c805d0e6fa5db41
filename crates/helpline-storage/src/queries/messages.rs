// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message-log query operations.

use std::str::FromStr;

use helpline_core::{ChatMessage, HelplineError, LoggedMessage, MessageOrigin, VisitorInfo};
use rusqlite::params;

use crate::database::Database;

/// Append a message to the durable log.
pub async fn insert_message(db: &Database, msg: &ChatMessage) -> Result<(), HelplineError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, identity, body, origin, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    msg.id,
                    msg.identity,
                    msg.body,
                    msg.origin.to_string(),
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Every message in creation order, left-joined with the author's visitor
/// metadata. A missing user record yields `None` visitor info.
pub async fn list_all_logged(db: &Database) -> Result<Vec<LoggedMessage>, HelplineError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.identity, m.body, m.origin, m.created_at, u.visitor_info
                 FROM messages m
                 LEFT JOIN users u ON u.identity = m.identity
                 ORDER BY m.created_at ASC, m.rowid ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                let origin: String = row.get(3)?;
                let origin = MessageOrigin::from_str(&origin).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                let visitor_json: Option<String> = row.get(5)?;
                let visitor_info = visitor_json
                    .map(|json| serde_json::from_str::<VisitorInfo>(&json))
                    .transpose()
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            5,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(LoggedMessage {
                    message: ChatMessage {
                        id: row.get(0)?,
                        identity: row.get(1)?,
                        body: row.get(2)?,
                        origin,
                        created_at: row.get(4)?,
                    },
                    visitor_info,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every message for the identity, returning the deleted count.
pub async fn delete_for_identity(db: &Database, identity: &str) -> Result<u64, HelplineError> {
    let identity = identity.to_string();
    db.connection()
        .call(move |conn| {
            let deleted =
                conn.execute("DELETE FROM messages WHERE identity = ?1", params![identity])?;
            Ok(deleted as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Total number of persisted messages.
pub async fn count_messages(db: &Database) -> Result<u64, HelplineError> {
    db.connection()
        .call(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::upsert_visitor_info;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("messages.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_msg(identity: &str, body: &str, origin: MessageOrigin) -> ChatMessage {
        ChatMessage::new(identity, body, origin).unwrap()
    }

    #[tokio::test]
    async fn insert_and_list_in_creation_order() {
        let (db, _dir) = setup_db().await;

        let m1 = make_msg("u1", "first", MessageOrigin::User);
        let m2 = make_msg("u1", "second", MessageOrigin::Operator);
        let m3 = make_msg("u2", "third", MessageOrigin::User);
        for m in [&m1, &m2, &m3] {
            insert_message(&db, m).await.unwrap();
        }

        let log = list_all_logged(&db).await.unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].message.body, "first");
        assert_eq!(log[1].message.body, "second");
        assert_eq!(log[1].message.origin, MessageOrigin::Operator);
        assert_eq!(log[2].message.identity, "u2");
    }

    #[tokio::test]
    async fn left_join_yields_none_for_missing_user() {
        let (db, _dir) = setup_db().await;

        insert_message(&db, &make_msg("known", "hi", MessageOrigin::User))
            .await
            .unwrap();
        insert_message(&db, &make_msg("stranger", "yo", MessageOrigin::User))
            .await
            .unwrap();
        upsert_visitor_info(&db, "known", &VisitorInfo::default())
            .await
            .unwrap();

        let log = list_all_logged(&db).await.unwrap();
        let known = log.iter().find(|m| m.message.identity == "known").unwrap();
        let stranger = log.iter().find(|m| m.message.identity == "stranger").unwrap();
        assert!(known.visitor_info.is_some());
        assert!(stranger.visitor_info.is_none());
    }

    #[tokio::test]
    async fn delete_is_scoped_and_idempotent() {
        let (db, _dir) = setup_db().await;

        insert_message(&db, &make_msg("u1", "a", MessageOrigin::User))
            .await
            .unwrap();
        insert_message(&db, &make_msg("u1", "b", MessageOrigin::User))
            .await
            .unwrap();
        insert_message(&db, &make_msg("u2", "keep", MessageOrigin::User))
            .await
            .unwrap();

        assert_eq!(delete_for_identity(&db, "u1").await.unwrap(), 2);
        assert_eq!(delete_for_identity(&db, "u1").await.unwrap(), 0);

        let log = list_all_logged(&db).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].message.identity, "u2");
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let (db, _dir) = setup_db().await;
        assert_eq!(count_messages(&db).await.unwrap(), 0);
        insert_message(&db, &make_msg("u1", "a", MessageOrigin::User))
            .await
            .unwrap();
        assert_eq!(count_messages(&db).await.unwrap(), 1);
    }
}
