// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contracts for the remote collaborators the workflows depend on.
//!
//! The parking API and object storage live outside this crate. Workflows
//! talk to them only through these traits so they can be driven by the HTTP
//! client in production and by in-memory fakes in tests.

use parkdesk_domain::{
    DashboardStats, ImageFolder, ImageRef, ImageUpload, ListFilter, MobileNumber, OtpCode,
    OtpPurpose, PlateNumber, TokenNumber, VehicleId, VehicleRecord, VerificationMethod,
};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A failure reported by, or on the way to, a remote service.
///
/// The message is shown to the operator verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// Human-readable description.
    pub message: String,
    /// Machine-readable code, when the service supplied one.
    pub code: Option<String>,
}

impl ServiceError {
    /// Creates a new `ServiceError` without a code.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            code: None,
        }
    }

    /// Creates a new `ServiceError` with a code.
    #[must_use]
    pub fn with_code(message: &str, code: &str) -> Self {
        Self {
            message: message.to_string(),
            code: Some(code.to_string()),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ServiceError {}

/// A record that blocks a submission, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingVehicle {
    /// The existing record's id.
    #[serde(default)]
    pub id: Option<VehicleId>,
    /// The existing record's plate.
    #[serde(default)]
    pub vehicle_number: Option<PlateNumber>,
    /// The existing record's owner number.
    #[serde(default)]
    pub mobile_number: Option<MobileNumber>,
    /// The token number in dispute.
    #[serde(default)]
    pub token_number: Option<TokenNumber>,
}

/// A structured business conflict, such as a token number already in use.
///
/// No change has been applied when a conflict is returned. The operator
/// either resubmits with an explicit override or corrects the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Conflict code, e.g. `DUPLICATE_TOKEN`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// The records that caused the conflict.
    pub conflicting: Vec<ConflictingVehicle>,
}

/// Acknowledgement of a sent OTP.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SendOtpReceipt {
    /// Service-side reference for the OTP, if any.
    pub reference: Option<String>,
    /// The code itself, when a development backend echoes it back.
    pub echoed_code: Option<OtpCode>,
}

/// Result of checking an OTP code with the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpCheck {
    /// The code matched.
    Accepted,
    /// The code was wrong or expired.
    Rejected {
        /// The service's explanation.
        message: String,
    },
}

/// Outcome of a bulk discharge or registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The change was applied to `count` records.
    Applied {
        /// Number of records affected.
        count: usize,
    },
    /// The backend refused the change.
    Conflict(Conflict),
}

/// One bulk discharge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DischargeRequest {
    /// Every vehicle to discharge.
    pub vehicle_ids: Vec<VehicleId>,
    /// How the owner was verified.
    pub method: VerificationMethod,
    /// Photo of the person collecting the vehicles.
    pub discharge_photo: Option<ImageRef>,
}

/// One single or bulk registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Plates to register, at least one.
    pub plates: Vec<PlateNumber>,
    /// Image for each plate, parallel to `plates`.
    pub vehicle_images: Vec<Option<ImageRef>>,
    /// The owner's number.
    pub mobile_number: MobileNumber,
    /// The owner's name.
    pub name: Option<String>,
    /// The owner's address.
    pub address: Option<String>,
    /// Optional token number.
    pub token_number: Option<TokenNumber>,
    /// How the owner was verified.
    pub method: VerificationMethod,
    /// Set on the authoritative resubmission after a conflict.
    pub allow_duplicate: bool,
}

impl RegistrationRequest {
    /// Returns whether more than one vehicle is being registered.
    #[must_use]
    pub const fn is_bulk(&self) -> bool {
        self.plates.len() > 1
    }
}

/// The remote parking API.
pub trait ParkingGateway: Send + Sync {
    /// Lists vehicles matching `filter`.
    fn list_vehicles(
        &self,
        filter: &ListFilter,
    ) -> impl Future<Output = Result<Vec<VehicleRecord>, ServiceError>> + Send;

    /// Asks the service to send an OTP to `mobile`.
    fn send_otp(
        &self,
        mobile: &MobileNumber,
        purpose: OtpPurpose,
    ) -> impl Future<Output = Result<SendOtpReceipt, ServiceError>> + Send;

    /// Checks an OTP code previously sent to `mobile`.
    fn verify_otp(
        &self,
        mobile: &MobileNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> impl Future<Output = Result<OtpCheck, ServiceError>> + Send;

    /// Discharges every vehicle in the request in one call.
    fn discharge_vehicles(
        &self,
        request: &DischargeRequest,
    ) -> impl Future<Output = Result<SubmissionOutcome, ServiceError>> + Send;

    /// Registers every plate in the request in one call.
    fn register_vehicles(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<SubmissionOutcome, ServiceError>> + Send;

    /// Asks the backend for an unused token number.
    fn generate_token_number(
        &self,
    ) -> impl Future<Output = Result<TokenNumber, ServiceError>> + Send;

    /// Fetches dashboard counts.
    fn dashboard_stats(&self) -> impl Future<Output = Result<DashboardStats, ServiceError>> + Send;
}

/// The object storage service holding vehicle and discharge images.
pub trait ObjectStorage: Send + Sync {
    /// Uploads an image into `folder` and returns its public reference.
    fn upload_image(
        &self,
        upload: &ImageUpload,
        folder: ImageFolder,
    ) -> impl Future<Output = Result<ImageRef, ServiceError>> + Send;
}
