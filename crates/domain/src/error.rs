// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{MobileNumber, VehicleId};

/// Errors raised by client-side validation.
///
/// These are detected locally and never reach the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A bulk operation was requested with nothing selected.
    EmptySelection,
    /// The selected vehicles do not all belong to one mobile number.
    MobileNumberMismatch {
        /// The mobile number of the first selected vehicle.
        expected: MobileNumber,
        /// The vehicle whose mobile number differs.
        vehicle_id: VehicleId,
        /// The differing mobile number.
        found: MobileNumber,
    },
    /// A mobile number is not exactly 10 digits.
    InvalidMobileNumber(String),
    /// An OTP code is not exactly 6 digits.
    InvalidOtpCode {
        /// The number of characters that were entered.
        length: usize,
    },
    /// A plate number is empty or too long.
    InvalidPlateNumber(String),
    /// An owner name is too long.
    InvalidOwnerName(String),
    /// An address is too long.
    InvalidAddress(String),
    /// A token number is blank.
    InvalidTokenNumber(String),
    /// An image reference is blank.
    InvalidImageRef,
    /// An image exceeds the upload size cap.
    ImageTooLarge {
        /// The size of the rejected image in bytes.
        size: usize,
        /// The maximum accepted size in bytes.
        max: usize,
    },
    /// An image has a MIME type outside the allow-list.
    UnsupportedImageType(String),
    /// An image upload carries no bytes.
    EmptyImage,
    /// A vehicle id does not refer to a loaded record.
    UnknownVehicle(VehicleId),
    /// A vehicle status string is not recognised.
    InvalidVehicleStatus(String),
    /// A verification method string is not recognised.
    InvalidVerificationMethod(String),
    /// A list sort string is not recognised.
    InvalidSort(String),
    /// A date filter is not in `YYYY-MM-DD` form.
    InvalidDate {
        /// The rejected input.
        input: String,
        /// The parser's message.
        error: String,
    },
    /// A date filter range ends before it starts.
    InvalidDateRange {
        /// The start of the range.
        from: time::Date,
        /// The end of the range.
        to: time::Date,
    },
    /// A timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// A timestamp cannot be represented for display.
    TimestampOutOfRange(i64),
    /// A registration has no plate numbers.
    NoPlateNumbers,
    /// A plate row index is out of range.
    PlateRowOutOfRange {
        /// The requested row.
        index: usize,
        /// The number of rows.
        len: usize,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "Please select at least one vehicle"),
            Self::MobileNumberMismatch {
                expected,
                vehicle_id,
                found,
            } => {
                write!(
                    f,
                    "All selected vehicles must share one mobile number: expected {}, vehicle {} has {}",
                    expected.value(),
                    vehicle_id.value(),
                    found.value()
                )
            }
            Self::InvalidMobileNumber(msg) => write!(f, "Invalid mobile number: {msg}"),
            Self::InvalidOtpCode { length } => {
                write!(f, "OTP code must be exactly 6 digits, got {length}")
            }
            Self::InvalidPlateNumber(msg) => write!(f, "Invalid vehicle number: {msg}"),
            Self::InvalidOwnerName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidAddress(msg) => write!(f, "Invalid address: {msg}"),
            Self::InvalidTokenNumber(msg) => write!(f, "Invalid token number: {msg}"),
            Self::InvalidImageRef => write!(f, "Image reference cannot be empty"),
            Self::ImageTooLarge { size, max } => {
                write!(f, "Image size {size} bytes exceeds the {max} byte limit")
            }
            Self::UnsupportedImageType(mime) => {
                write!(f, "Unsupported image type '{mime}'")
            }
            Self::EmptyImage => write!(f, "Image file is empty"),
            Self::UnknownVehicle(id) => {
                write!(f, "Vehicle '{}' is not in the loaded list", id.value())
            }
            Self::InvalidVehicleStatus(s) => write!(f, "Invalid vehicle status: {s}"),
            Self::InvalidVerificationMethod(s) => {
                write!(f, "Invalid verification method: {s}")
            }
            Self::InvalidSort(s) => write!(f, "Invalid sort order: {s}"),
            Self::InvalidDate { input, error } => {
                write!(f, "Failed to parse date '{input}': {error}")
            }
            Self::InvalidDateRange { from, to } => {
                write!(f, "Date range is reversed: {from} is after {to}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::TimestampOutOfRange(ts) => {
                write!(f, "Timestamp {ts} is outside the displayable range")
            }
            Self::NoPlateNumbers => write!(f, "Please enter at least one vehicle number"),
            Self::PlateRowOutOfRange { index, len } => {
                write!(f, "Vehicle row {index} is out of range (0..{len})")
            }
        }
    }
}

impl std::error::Error for DomainError {}
