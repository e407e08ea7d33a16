// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the driver registry and campaign document tables.

pub mod documents;
pub mod drivers;
pub mod regions;
pub mod stats;
