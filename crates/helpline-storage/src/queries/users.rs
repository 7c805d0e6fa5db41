// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-record query operations.
//!
//! All writes are upserts: the record is created on first touch, matching
//! the lazy-creation contract (absence of a record means an unblocked,
//! unresolved user).

use helpline_core::{HelplineError, UserRecord, VisitorInfo};
use rusqlite::params;

use crate::database::Database;

/// Look up the user record for an identity.
pub async fn find_user(
    db: &Database,
    identity: &str,
) -> Result<Option<UserRecord>, HelplineError> {
    let identity = identity.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT identity, display_name, is_blocked, is_resolved, visitor_info
                 FROM users WHERE identity = ?1",
            )?;
            let result = stmt.query_row(params![identity], |row| {
                let visitor_json: Option<String> = row.get(4)?;
                let visitor_info = visitor_json
                    .map(|json| serde_json::from_str::<VisitorInfo>(&json))
                    .transpose()
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            4,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(UserRecord {
                    identity: row.get(0)?,
                    display_name: row.get(1)?,
                    is_blocked: row.get(2)?,
                    is_resolved: row.get(3)?,
                    visitor_info,
                })
            });
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert the block flag, creating the record when absent.
pub async fn set_blocked(
    db: &Database,
    identity: &str,
    blocked: bool,
) -> Result<(), HelplineError> {
    let identity = identity.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (identity, is_blocked) VALUES (?1, ?2)
                 ON CONFLICT(identity) DO UPDATE SET is_blocked = excluded.is_blocked",
                params![identity, blocked],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert the resolved flag, creating the record when absent.
pub async fn set_resolved(
    db: &Database,
    identity: &str,
    resolved: bool,
) -> Result<(), HelplineError> {
    let identity = identity.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (identity, is_resolved) VALUES (?1, ?2)
                 ON CONFLICT(identity) DO UPDATE SET is_resolved = excluded.is_resolved",
                params![identity, resolved],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert the visitor metadata, creating the record when absent.
pub async fn upsert_visitor_info(
    db: &Database,
    identity: &str,
    info: &VisitorInfo,
) -> Result<(), HelplineError> {
    let identity = identity.to_string();
    let json = serde_json::to_string(info).map_err(|e| HelplineError::Storage {
        source: Box::new(e),
    })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (identity, visitor_info) VALUES (?1, ?2)
                 ON CONFLICT(identity) DO UPDATE SET visitor_info = excluded.visitor_info",
                params![identity, json],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of user records not currently blocked.
pub async fn count_active(db: &Database) -> Result<u64, HelplineError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE is_blocked = 0",
                [],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of user records flagged resolved.
pub async fn count_resolved(db: &Database) -> Result<u64, HelplineError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE is_resolved = 1",
                [],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
