// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{
    ImageRef, ImageUpload, MobileNumber, OtpCode, PlateNumber, TokenNumber, VehicleRecord,
};

/// Required length of a mobile number.
pub const MOBILE_NUMBER_LENGTH: usize = 10;
/// Required length of an OTP code.
pub const OTP_LENGTH: usize = 6;
/// Maximum length of a plate number.
pub const PLATE_NUMBER_MAX_LENGTH: usize = 20;
/// Maximum length of an owner name.
pub const NAME_MAX_LENGTH: usize = 100;
/// Maximum length of an address.
pub const ADDRESS_MAX_LENGTH: usize = 200;
/// Maximum accepted image upload size (5 MiB).
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;
/// MIME types accepted for image uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

fn is_all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

/// Validates that a mobile number is exactly 10 digits.
///
/// # Errors
///
/// Returns `DomainError::InvalidMobileNumber` if the number is empty,
/// has the wrong length, or contains non-digit characters.
pub fn validate_mobile_number(mobile: &MobileNumber) -> Result<(), DomainError> {
    let value: &str = mobile.value();
    if value.is_empty() {
        return Err(DomainError::InvalidMobileNumber(String::from(
            "Mobile number is required",
        )));
    }
    if value.len() != MOBILE_NUMBER_LENGTH || !is_all_digits(value) {
        return Err(DomainError::InvalidMobileNumber(String::from(
            "Mobile number must be 10 digits",
        )));
    }
    Ok(())
}

/// Validates that an OTP code is exactly 6 digits.
///
/// # Errors
///
/// Returns `DomainError::InvalidOtpCode` if the code has the wrong length
/// or contains non-digit characters.
pub fn validate_otp_code(code: &OtpCode) -> Result<(), DomainError> {
    let value: &str = code.value();
    let length: usize = value.chars().count();
    if length != OTP_LENGTH || !is_all_digits(value) {
        return Err(DomainError::InvalidOtpCode { length });
    }
    Ok(())
}

/// Validates a plate number.
///
/// # Errors
///
/// Returns `DomainError::InvalidPlateNumber` if the plate is empty or longer
/// than 20 characters.
pub fn validate_plate_number(plate: &PlateNumber) -> Result<(), DomainError> {
    let length: usize = plate.value().chars().count();
    if length == 0 {
        return Err(DomainError::InvalidPlateNumber(String::from(
            "Vehicle number is required",
        )));
    }
    if length > PLATE_NUMBER_MAX_LENGTH {
        return Err(DomainError::InvalidPlateNumber(format!(
            "Vehicle number must be at most {PLATE_NUMBER_MAX_LENGTH} characters, got {length}"
        )));
    }
    Ok(())
}

/// Validates an optional owner name.
///
/// # Errors
///
/// Returns `DomainError::InvalidOwnerName` if the name exceeds 100 characters.
pub fn validate_owner_name(name: &str) -> Result<(), DomainError> {
    let length: usize = name.chars().count();
    if length > NAME_MAX_LENGTH {
        return Err(DomainError::InvalidOwnerName(format!(
            "Name must be at most {NAME_MAX_LENGTH} characters, got {length}"
        )));
    }
    Ok(())
}

/// Validates an optional address.
///
/// # Errors
///
/// Returns `DomainError::InvalidAddress` if the address exceeds 200 characters.
pub fn validate_address(address: &str) -> Result<(), DomainError> {
    let length: usize = address.chars().count();
    if length > ADDRESS_MAX_LENGTH {
        return Err(DomainError::InvalidAddress(format!(
            "Address must be at most {ADDRESS_MAX_LENGTH} characters, got {length}"
        )));
    }
    Ok(())
}

/// Validates a token number supplied by the operator.
///
/// # Errors
///
/// Returns `DomainError::InvalidTokenNumber` if the token is blank.
pub fn validate_token_number(token: &TokenNumber) -> Result<(), DomainError> {
    if token.value().is_empty() {
        return Err(DomainError::InvalidTokenNumber(String::from(
            "Token number cannot be blank",
        )));
    }
    Ok(())
}

/// Validates an image reference returned by object storage.
///
/// # Errors
///
/// Returns `DomainError::InvalidImageRef` if the reference is blank.
pub const fn validate_image_ref(image: &ImageRef) -> Result<(), DomainError> {
    if image.is_blank() {
        return Err(DomainError::InvalidImageRef);
    }
    Ok(())
}

/// Validates an image before it is uploaded.
///
/// # Errors
///
/// Returns an error if:
/// - The file is empty
/// - The file is larger than 5 MiB
/// - The MIME type is not an allowed image type
pub fn validate_image_upload(upload: &ImageUpload) -> Result<(), DomainError> {
    if upload.bytes.is_empty() {
        return Err(DomainError::EmptyImage);
    }
    if upload.size() > MAX_IMAGE_SIZE {
        return Err(DomainError::ImageTooLarge {
            size: upload.size(),
            max: MAX_IMAGE_SIZE,
        });
    }
    if !ALLOWED_IMAGE_TYPES.contains(&upload.mime_type.as_str()) {
        return Err(DomainError::UnsupportedImageType(upload.mime_type.clone()));
    }
    Ok(())
}

/// Validates that a set of vehicles can share one OTP.
///
/// The backend's bulk discharge call carries no per-vehicle mobile number,
/// so every selected vehicle must belong to the same owner number.
///
/// # Returns
///
/// The shared mobile number.
///
/// # Errors
///
/// Returns an error if:
/// - `records` is empty
/// - The first record has no mobile number
/// - Any record's mobile number differs from the first
pub fn validate_shared_mobile<'a, I>(records: I) -> Result<MobileNumber, DomainError>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let mut iter = records.into_iter();
    let first: &VehicleRecord = iter.next().ok_or(DomainError::EmptySelection)?;
    let expected: &MobileNumber = &first.mobile_number;
    if expected.value().is_empty() {
        return Err(DomainError::InvalidMobileNumber(format!(
            "Selected vehicle {} does not have a mobile number",
            first.id.value()
        )));
    }

    if let Some(other) = iter.find(|record| &record.mobile_number != expected) {
        return Err(DomainError::MobileNumberMismatch {
            expected: expected.clone(),
            vehicle_id: other.id.clone(),
            found: other.mobile_number.clone(),
        });
    }

    Ok(expected.clone())
}
