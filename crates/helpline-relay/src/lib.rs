// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session routing for the Helpline relay.
//!
//! Maps identities to addressable rooms over a channel collaborator,
//! relays typing indicators and operator messages point-to-point,
//! broadcasts user-originated messages to all operators, and gates inbound
//! submissions on the per-identity block flag.

pub mod events;
pub mod gate;
pub mod rooms;
pub mod router;

pub use events::{ClientEvent, ServerEvent};
pub use gate::{check as gate_check, Access};
pub use rooms::{EventSender, RoomRegistry};
pub use router::SessionRouter;
