// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Yolchi.
//!
//! Exposes the campaign reports and document updates as JSON endpoints.
//! Handlers are thin: they decode the request, call one [`Campaign`]
//! operation and map [`YolchiError`] onto a status code.
//!
//! [`Campaign`]: yolchi_campaign::Campaign
//! [`YolchiError`]: yolchi_core::YolchiError

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, router, start_server};
