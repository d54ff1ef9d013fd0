// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod listing;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use listing::{
    ListFilter, VehicleSort, format_in_timezone, parked_duration, parse_filter_date,
    parse_timezone, sort_vehicles,
};
pub use types::{
    DashboardStats, ImageFolder, ImageRef, ImageUpload, MobileNumber, OtpCode, OtpPurpose,
    PeriodStats, PlateNumber, TokenNumber, VehicleId, VehicleRecord, VehicleStatus,
    VerificationMethod,
};
pub use validation::{
    ADDRESS_MAX_LENGTH, ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE, MOBILE_NUMBER_LENGTH,
    NAME_MAX_LENGTH, OTP_LENGTH, PLATE_NUMBER_MAX_LENGTH, validate_address, validate_image_ref,
    validate_image_upload, validate_mobile_number, validate_otp_code, validate_owner_name,
    validate_plate_number, validate_shared_mobile, validate_token_number,
};
