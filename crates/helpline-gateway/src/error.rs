// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-response mapping for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use helpline_core::HelplineError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error description.
    pub error: String,
}

/// Wrapper turning a [`HelplineError`] into the HTTP error contract:
/// validation failures are 400s, access denials 403s, everything else a
/// 500 with the detail kept out of the response body.
pub struct ApiError(HelplineError);

impl From<HelplineError> for ApiError {
    fn from(err: HelplineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HelplineError::Validation(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            HelplineError::AccessDenied { .. } => {
                (StatusCode::FORBIDDEN, "User is blocked.".to_string())
            }
            err => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
