// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Response decoding for the parking API.
//!
//! Every action answers with the same envelope:
//!
//! ```text
//! { "success": bool, "data": ..., "error": { "message", "code", "conflicts" } }
//! ```
//!
//! Client errors (4xx) still carry an envelope and are decoded like any other
//! answer. Server errors (5xx) are decoded when possible and otherwise
//! reported by status alone.

use crate::error::{ClientError, GENERIC_ERROR};
use parkdesk::{Conflict, ConflictingVehicle, SubmissionOutcome};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Error code the backend uses for a token number already in use.
pub const DUPLICATE_TOKEN: &str = "DUPLICATE_TOKEN";

/// How much of an unparseable body is kept for logs.
const RAW_EXCERPT_LEN: usize = 200;

/// The `error` member of an envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub conflicts: Vec<ConflictingVehicle>,
}

/// A decoded API answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl Envelope {
    /// Converts an unsuccessful envelope into an error.
    pub fn into_failure(self) -> ClientError {
        let body: ApiErrorBody = self.error.unwrap_or_default();
        ClientError::Api {
            message: body
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ERROR.to_string()),
            code: body.code,
        }
    }

    /// Returns `data` decoded as `T`, or `T::default()` when it is absent or
    /// has another shape.
    ///
    /// # Errors
    ///
    /// Returns the envelope's error if `success` is false.
    pub fn into_data<T: DeserializeOwned + Default>(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(self.into_failure());
        }
        Ok(decode_or_default(self.data))
    }

    /// Interprets the envelope as the answer to a bulk change.
    ///
    /// A rejected change with the duplicate-token code becomes a conflict;
    /// any other rejection is an error.
    ///
    /// # Errors
    ///
    /// Returns the envelope's error if it is neither a success nor a
    /// conflict.
    pub fn into_outcome(
        self,
        count: impl FnOnce(&Value) -> Option<usize>,
        fallback: usize,
    ) -> Result<SubmissionOutcome, ClientError> {
        if self.success {
            let count: usize = count(&self.data).unwrap_or(fallback);
            return Ok(SubmissionOutcome::Applied { count });
        }

        let is_conflict: bool = self
            .error
            .as_ref()
            .is_some_and(|body| body.code.as_deref() == Some(DUPLICATE_TOKEN));
        if !is_conflict {
            return Err(self.into_failure());
        }

        let body: ApiErrorBody = self.error.unwrap_or_default();
        Ok(SubmissionOutcome::Conflict(Conflict {
            code: DUPLICATE_TOKEN.to_string(),
            message: body
                .message
                .unwrap_or_else(|| String::from("Token number is already in use")),
            conflicting: body.conflicts,
        }))
    }
}

/// Data returned by `sendOTP`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpSentData {
    #[serde(default, alias = "otpCode")]
    pub otp_code: Option<String>,
    #[serde(default, alias = "requestId", alias = "request_id")]
    pub reference: Option<String>,
}

/// Data returned by `dischargeVehicle`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DischargedData {
    #[serde(default, alias = "dischargedCount")]
    pub discharged_count: Option<usize>,
}

/// Data returned by `registerVehicle`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisteredData {
    #[serde(default)]
    pub count: Option<usize>,
}

/// Data returned by `generateTokenNumber`, either bare or wrapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenData {
    Bare(String),
    Wrapped {
        #[serde(alias = "tokenNumber")]
        token_number: String,
    },
}

impl TokenData {
    /// Returns the token value.
    pub fn into_value(self) -> String {
        match self {
            Self::Bare(value) | Self::Wrapped { token_number: value } => value,
        }
    }
}

/// Decodes a response body.
///
/// Blank bodies decode as an empty object.
///
/// # Errors
///
/// Returns `ClientError::HtmlResponse` for a web page and
/// `ClientError::InvalidResponse` for anything else that is not JSON.
pub fn parse_body(body: &str) -> Result<Value, ClientError> {
    let trimmed: &str = body.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_str(trimmed).map_err(|_| {
        let lower: String = trimmed.to_ascii_lowercase();
        if lower.contains("<!doctype html") || lower.contains("<html") {
            ClientError::HtmlResponse
        } else {
            ClientError::InvalidResponse {
                raw: trimmed.chars().take(RAW_EXCERPT_LEN).collect(),
            }
        }
    })
}

/// Decodes a response into an envelope according to its status.
///
/// # Errors
///
/// Returns an error if the body cannot be decoded, or if the status is a
/// server error. A server error with an envelope message reports that
/// message.
pub fn decode_envelope(status: u16, body: &str) -> Result<Envelope, ClientError> {
    if status >= 500 {
        let message: Option<ApiErrorBody> = parse_body(body)
            .ok()
            .and_then(|value| serde_json::from_value::<Envelope>(value).ok())
            .and_then(|envelope| envelope.error)
            .filter(|error| error.message.as_deref().is_some_and(|m| !m.trim().is_empty()));
        return Err(match message {
            Some(error) => ClientError::Api {
                message: error.message.unwrap_or_default(),
                code: error.code.or_else(|| Some(status.to_string())),
            },
            None => ClientError::Status(status),
        });
    }

    let value: Value = parse_body(body)?;
    serde_json::from_value(value).map_err(|_| ClientError::InvalidResponse {
        raw: body.trim().chars().take(RAW_EXCERPT_LEN).collect(),
    })
}

/// Decodes `value` as `T`, falling back to the default.
pub fn decode_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_default()
}
