// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Helpline relay.
//!
//! Exposes the chat submission and admin endpoints over plain HTTP and the
//! operator channel over WebSocket, wiring both into the session router and
//! the durable message store. Static asset serving and dashboard markup are
//! the hosting process's concern, not this crate's.

pub mod error;
pub mod handlers;
pub mod server;
pub mod ws;

pub use error::ApiError;
pub use server::{router, start_server, GatewayState, ServerConfig};
