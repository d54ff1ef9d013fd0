// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport errors and their mapping to operator-facing messages.

use parkdesk::ServiceError;
use parkdesk_domain::DomainError;
use thiserror::Error;

/// Shown when a request could not reach the service.
pub const NETWORK_ERROR: &str = "Network error. Please check your connection.";
/// Shown when the service failed without explaining why.
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
/// Shown when an image upload failed.
pub const UPLOAD_ERROR: &str = "File upload failed. Please try again.";
/// Shown when an OTP was rejected without a reason.
pub const INVALID_OTP: &str = "Invalid or expired OTP. Please try again.";
/// Shown when a failure carries no message at all.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Errors raised while talking to the parking API or the image store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No base URL was configured.
    #[error("API endpoint not configured.")]
    NotConfigured,

    /// The base URL served a web page instead of the API.
    #[error("API returned HTML instead of JSON. Please check the API base URL.")]
    HtmlResponse,

    /// The body was neither empty nor JSON.
    #[error("Invalid response format")]
    InvalidResponse {
        /// The start of the body, for logs.
        raw: String,
    },

    /// The request timed out.
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// The request never completed.
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),

    /// The API answered with `success: false`.
    #[error("{message}")]
    Api {
        /// The service's explanation.
        message: String,
        /// The service's error code, if any.
        code: Option<String>,
    },

    /// The service failed with a server status and no usable message.
    #[error("Server error. Please try again later.")]
    Status(u16),

    /// A request field could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The upload was refused before any request was made.
    #[error("{0}")]
    Invalid(#[from] DomainError),

    /// The image store rejected an upload.
    #[error("File upload failed. Please try again.")]
    Upload {
        /// HTTP status returned by the store.
        status: u16,
    },
}

impl ClientError {
    /// Returns the machine-readable code reported with this error.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        match self {
            Self::NotConfigured => Some(String::from("API_NOT_CONFIGURED")),
            Self::HtmlResponse => Some(String::from("HTML_RESPONSE")),
            Self::InvalidResponse { .. } => Some(String::from("INVALID_RESPONSE")),
            Self::Timeout => Some(String::from("TIMEOUT")),
            Self::Network(_) => Some(String::from("NETWORK_ERROR")),
            Self::Api { code, .. } => code.clone(),
            Self::Status(status) | Self::Upload { status } => Some(status.to_string()),
            Self::Encode(_) => Some(String::from("ENCODE_ERROR")),
            Self::Invalid(_) => Some(String::from("VALIDATION_ERROR")),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        let code: Option<String> = err.code();
        Self {
            message: err.to_string(),
            code,
        }
    }
}
