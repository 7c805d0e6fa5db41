// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators for deterministic testing.
//!
//! `MockChatStore` implements `ChatStore` over in-memory state with
//! injectable failures; `MockGeoLookup` scripts the geolocation
//! collaborator.

pub mod mock_lookup;
pub mod mock_store;

pub use mock_lookup::MockGeoLookup;
pub use mock_store::MockChatStore;
