// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::gateway::{Conflict, ServiceError};
use parkdesk_domain::{DomainError, VerificationMethod};

/// Errors raised while driving a camera capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The operator or platform refused camera access.
    PermissionDenied,
    /// No camera device is present.
    NoDevice,
    /// The platform exposes no camera API.
    Unsupported,
    /// The device failed while capturing.
    Capture(String),
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(
                f,
                "Camera permission denied. Please allow camera access in your settings."
            ),
            Self::NoDevice => write!(f, "No camera found on your device"),
            Self::Unsupported => write!(f, "Camera access is not available"),
            Self::Capture(msg) => write!(f, "Failed to access camera: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

/// Errors that can occur while driving a verification workflow.
///
/// Every variant is recoverable: a failed step leaves the selection intact
/// and the operator decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// A client-side precondition failed. No request was sent.
    Validation(DomainError),
    /// The remote service failed or was unreachable.
    Service(ServiceError),
    /// The backend refused the submission because of a business conflict.
    Conflict(Conflict),
    /// The OTP service rejected the entered code.
    InvalidCode {
        /// The message returned by the service.
        message: String,
    },
    /// Submission was attempted before verification completed.
    NotVerified {
        /// The active verification method.
        method: VerificationMethod,
    },
    /// An operation for one verification method was invoked in another.
    WrongMode {
        /// The method the operation belongs to.
        expected: VerificationMethod,
        /// The active method.
        actual: VerificationMethod,
    },
    /// An operation is not valid in the tracker's current phase.
    InvalidTransition {
        /// The attempted operation.
        operation: &'static str,
        /// The phase the tracker was in.
        phase: &'static str,
    },
    /// Image verification was requested but no selected vehicle has an image.
    ImageUnavailable,
    /// A submission is already in flight.
    SubmissionInFlight,
    /// An image capture or upload is already in flight.
    CaptureInFlight,
    /// The camera could not be used.
    Camera(CameraError),
    /// There is no rejected submission waiting for a decision.
    NoPendingConflict,
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Conflict(conflict) => write!(f, "Conflict: {}", conflict.message),
            Self::InvalidCode { message } => write!(f, "Invalid or expired OTP: {message}"),
            Self::NotVerified { method } => match method {
                VerificationMethod::Otp => write!(f, "Please send and verify OTP first"),
                VerificationMethod::Image => {
                    write!(f, "Please verify the vehicle image first")
                }
                VerificationMethod::Manual => write!(f, "Verification is incomplete"),
            },
            Self::WrongMode { expected, actual } => {
                write!(
                    f,
                    "Operation requires {expected} verification but {actual} is active"
                )
            }
            Self::InvalidTransition { operation, phase } => {
                write!(f, "Cannot {operation} while {phase}")
            }
            Self::ImageUnavailable => write!(
                f,
                "Selected vehicles do not have images for verification; use OTP instead"
            ),
            Self::SubmissionInFlight => write!(f, "A submission is already in progress"),
            Self::CaptureInFlight => write!(f, "An image upload is already in progress"),
            Self::Camera(err) => write!(f, "{err}"),
            Self::NoPendingConflict => write!(f, "There is no conflict awaiting a decision"),
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}

impl From<ServiceError> for WorkflowError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<CameraError> for WorkflowError {
    fn from(err: CameraError) -> Self {
        Self::Camera(err)
    }
}
