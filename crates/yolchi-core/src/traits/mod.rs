// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the report services and their external stores.
//!
//! Both stores are injected as `Arc<dyn ...>` so tests can substitute fakes.

pub mod document;
pub mod registry;
pub mod state;

pub use document::Document;
pub use registry::DriverRegistry;
pub use state::StateStore;
