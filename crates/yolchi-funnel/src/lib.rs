// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign funnel logic for Yolchi.
//!
//! Pure functions over registry snapshots and uploaded lists: phone
//! normalization, contact import, last-9 matching, channel attribution,
//! funnel aggregation and pacing. Nothing here performs I/O.

pub mod attribution;
pub mod funnel;
pub mod import;
pub mod matcher;
pub mod pacing;
pub mod phone;

pub use attribution::{AttributionTable, Channel};
pub use funnel::{ChannelFunnels, Funnel, FunnelStages, RouteSplit, conversion_rate};
pub use import::{ContactEntry, ImportMode, ImportOutcome, import_contacts};
pub use matcher::{DriverMatch, PhoneKeySet, RegistryIndex, match_drivers, match_unique};
pub use pacing::{Pacing, PacingPlan, local_today};
