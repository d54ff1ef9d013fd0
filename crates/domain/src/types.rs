// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Represents the parking status of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// The vehicle is in the lot.
    #[default]
    Parked,
    /// The vehicle has been released to its owner.
    Discharged,
}

impl FromStr for VehicleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parked" => Ok(Self::Parked),
            "discharged" => Ok(Self::Discharged),
            _ => Err(DomainError::InvalidVehicleStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl VehicleStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Parked => "parked",
            Self::Discharged => "discharged",
        }
    }
}

/// The strategy used to authorize a discharge or registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// A one-time code sent to the owner's phone.
    #[default]
    Otp,
    /// The operator compares the vehicle against its registered image.
    Image,
    /// No proof of identity is collected.
    Manual,
}

impl FromStr for VerificationMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "otp" => Ok(Self::Otp),
            "image" => Ok(Self::Image),
            "manual" | "none" => Ok(Self::Manual),
            _ => Err(DomainError::InvalidVerificationMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl VerificationMethod {
    /// Converts this method to the tag sent with a submission.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Otp => "otp",
            Self::Image => "image",
            Self::Manual => "manual",
        }
    }
}

/// Why an OTP is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpPurpose {
    /// Proving ownership of a number being registered.
    Register,
    /// Proving ownership of vehicles being discharged.
    Discharge,
}

impl OtpPurpose {
    /// Converts this purpose to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Discharge => "discharge",
        }
    }
}

/// Object storage folder an image is uploaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFolder {
    /// Registered vehicle images.
    Vehicles,
    /// Photos of the person collecting a vehicle.
    Discharge,
}

impl ImageFolder {
    /// Returns the folder name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Discharge => "discharge",
        }
    }
}

/// Opaque identifier of a vehicle record, assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId {
    value: String,
}

impl VehicleId {
    /// Creates a new `VehicleId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    /// Returns the id value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A vehicle plate ("vehicle number").
///
/// Plates are normalized to trimmed uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlateNumber {
    value: String,
}

impl PlateNumber {
    /// Creates a new `PlateNumber`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_uppercase(),
        }
    }

    /// Returns the plate value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<String> for PlateNumber {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<PlateNumber> for String {
    fn from(plate: PlateNumber) -> Self {
        plate.value
    }
}

/// An owner's mobile number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MobileNumber {
    value: String,
}

impl MobileNumber {
    /// Creates a new `MobileNumber` without validating it.
    ///
    /// Use [`crate::validate_mobile_number`] before sending an OTP to it.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the number.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<String> for MobileNumber {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<MobileNumber> for String {
    fn from(mobile: MobileNumber) -> Self {
        mobile.value
    }
}

/// A one-time code as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct OtpCode {
    value: String,
}

impl OtpCode {
    /// Creates a new `OtpCode` without validating it.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the code.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns whether nothing has been entered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Secondary label attached to a vehicle, distinct from its plate.
///
/// Uniqueness is decided by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenNumber {
    value: String,
}

impl TokenNumber {
    /// Creates a new `TokenNumber`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the token value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A URL or storage handle pointing at an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef {
    value: String,
}

impl ImageRef {
    /// Creates a new `ImageRef`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the reference.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns whether the reference is blank.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

/// A parked or discharged vehicle as returned by the parking API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Backend-assigned identifier.
    pub id: VehicleId,
    /// The plate number.
    pub vehicle_number: PlateNumber,
    /// The owner's mobile number.
    pub mobile_number: MobileNumber,
    /// The owner's name.
    #[serde(default)]
    pub name: Option<String>,
    /// The owner's address.
    #[serde(default)]
    pub address: Option<String>,
    /// Current status.
    #[serde(default)]
    pub status: VehicleStatus,
    /// When the vehicle was registered.
    #[serde(with = "time::serde::rfc3339", alias = "created_at")]
    pub registered_at: OffsetDateTime,
    /// When the vehicle was discharged, if it has been.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub discharged_at: Option<OffsetDateTime>,
    /// Image captured at registration.
    #[serde(default)]
    pub vehicle_image_url: Option<ImageRef>,
    /// Photo of the person who collected the vehicle.
    #[serde(default)]
    pub discharge_image_url: Option<ImageRef>,
    /// Optional token number.
    #[serde(default)]
    pub token_number: Option<TokenNumber>,
}

impl VehicleRecord {
    /// Returns the registered image when one is present and non-blank.
    #[must_use]
    pub fn registered_image(&self) -> Option<&ImageRef> {
        self.vehicle_image_url
            .as_ref()
            .filter(|image| !image.is_blank())
    }

    /// Returns whether the vehicle is still in the lot.
    #[must_use]
    pub fn is_parked(&self) -> bool {
        self.status == VehicleStatus::Parked
    }
}

/// An image file ready to be uploaded to object storage.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name including extension.
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates a new `ImageUpload`.
    #[must_use]
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_ascii_lowercase(),
            bytes,
        }
    }

    /// Returns the size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the file extension to use for this upload's MIME type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

// Image bytes are omitted from debug output.
impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PeriodStats {
    /// Vehicles registered in the period.
    #[serde(default)]
    pub registered: u64,
    /// Vehicles discharged in the period.
    #[serde(default)]
    pub discharged: u64,
    /// Vehicles still parked, where the backend reports it.
    #[serde(default)]
    pub pending: Option<u64>,
}

/// Dashboard statistics grouped by period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    /// Today.
    #[serde(default)]
    pub today: PeriodStats,
    /// The last seven days.
    #[serde(default)]
    pub week: PeriodStats,
    /// The current month.
    #[serde(default)]
    pub month: PeriodStats,
    /// All time.
    #[serde(default)]
    pub total: PeriodStats,
}
