// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Yolchi integration tests.
//!
//! Provides a temp-database harness with seeded registry reference data and a
//! fixture builder for registry accounts.
//!
//! # Components
//!
//! - [`TestHarness`] - Campaign services over a temp SQLite database and a pinned clock
//! - [`DriverFixture`] - Registry account row with route, source tag and moderation reasons

pub mod fixtures;
pub mod harness;

pub use fixtures::DriverFixture;
pub use harness::{TestHarness, TestHarnessBuilder};
