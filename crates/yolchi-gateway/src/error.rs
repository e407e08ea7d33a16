// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of service errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use yolchi_core::YolchiError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A [`YolchiError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub YolchiError);

impl From<YolchiError> for ApiError {
    fn from(err: YolchiError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            YolchiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            YolchiError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self.0 {
            YolchiError::InvalidInput(message) => message.clone(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(%status, error = %error, "request rejected");
        }
        (status, Json(ErrorResponse { error })).into_response()
    }
}
