// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations over the message log and user records.

pub mod messages;
pub mod users;
