// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the relay core.

pub mod lookup;
pub mod store;

pub use lookup::GeoLookup;
pub use store::ChatStore;
