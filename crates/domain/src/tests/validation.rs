// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, ImageRef, ImageUpload, MAX_IMAGE_SIZE, MobileNumber, OtpCode, PlateNumber,
    TokenNumber, VehicleId, VehicleRecord, VehicleStatus, validate_address, validate_image_ref,
    validate_image_upload, validate_mobile_number, validate_otp_code, validate_owner_name,
    validate_plate_number, validate_shared_mobile, validate_token_number,
};
use time::macros::datetime;

fn create_test_record(id: &str, mobile: &str) -> VehicleRecord {
    VehicleRecord {
        id: VehicleId::new(id),
        vehicle_number: PlateNumber::new(&format!("KA01{id}")),
        mobile_number: MobileNumber::new(mobile),
        name: None,
        address: None,
        status: VehicleStatus::Parked,
        registered_at: datetime!(2026-03-02 08:00 UTC),
        discharged_at: None,
        vehicle_image_url: None,
        discharge_image_url: None,
        token_number: None,
    }
}

#[test]
fn test_validate_mobile_number_accepts_ten_digits() {
    assert!(validate_mobile_number(&MobileNumber::new("9000000001")).is_ok());
}

#[test]
fn test_validate_mobile_number_rejects_empty() {
    let result: Result<(), DomainError> = validate_mobile_number(&MobileNumber::new(""));
    assert!(matches!(result, Err(DomainError::InvalidMobileNumber(_))));
}

#[test]
fn test_validate_mobile_number_rejects_wrong_length() {
    let result: Result<(), DomainError> = validate_mobile_number(&MobileNumber::new("900000001"));
    assert!(matches!(result, Err(DomainError::InvalidMobileNumber(_))));

    let result: Result<(), DomainError> =
        validate_mobile_number(&MobileNumber::new("90000000011"));
    assert!(matches!(result, Err(DomainError::InvalidMobileNumber(_))));
}

#[test]
fn test_validate_mobile_number_rejects_non_digits() {
    let result: Result<(), DomainError> = validate_mobile_number(&MobileNumber::new("90000-0001"));
    assert!(matches!(result, Err(DomainError::InvalidMobileNumber(_))));
}

#[test]
fn test_validate_otp_code_accepts_six_digits() {
    assert!(validate_otp_code(&OtpCode::new("482913")).is_ok());
}

#[test]
fn test_validate_otp_code_reports_entered_length() {
    assert_eq!(
        validate_otp_code(&OtpCode::new("4829")),
        Err(DomainError::InvalidOtpCode { length: 4 })
    );
    assert_eq!(
        validate_otp_code(&OtpCode::new("")),
        Err(DomainError::InvalidOtpCode { length: 0 })
    );
    assert_eq!(
        validate_otp_code(&OtpCode::new("4829131")),
        Err(DomainError::InvalidOtpCode { length: 7 })
    );
}

#[test]
fn test_validate_otp_code_rejects_letters_of_right_length() {
    assert_eq!(
        validate_otp_code(&OtpCode::new("48a913")),
        Err(DomainError::InvalidOtpCode { length: 6 })
    );
}

#[test]
fn test_validate_plate_number_bounds() {
    assert!(validate_plate_number(&PlateNumber::new("A")).is_ok());
    assert!(validate_plate_number(&PlateNumber::new(&"A".repeat(20))).is_ok());
    assert!(matches!(
        validate_plate_number(&PlateNumber::new("   ")),
        Err(DomainError::InvalidPlateNumber(_))
    ));
    assert!(matches!(
        validate_plate_number(&PlateNumber::new(&"A".repeat(21))),
        Err(DomainError::InvalidPlateNumber(_))
    ));
}

#[test]
fn test_validate_owner_name_and_address_lengths() {
    assert!(validate_owner_name("").is_ok());
    assert!(validate_owner_name(&"n".repeat(100)).is_ok());
    assert!(matches!(
        validate_owner_name(&"n".repeat(101)),
        Err(DomainError::InvalidOwnerName(_))
    ));

    assert!(validate_address(&"a".repeat(200)).is_ok());
    assert!(matches!(
        validate_address(&"a".repeat(201)),
        Err(DomainError::InvalidAddress(_))
    ));
}

#[test]
fn test_validate_token_and_image_ref_reject_blank() {
    assert!(validate_token_number(&TokenNumber::new("TK1")).is_ok());
    assert!(matches!(
        validate_token_number(&TokenNumber::new(" ")),
        Err(DomainError::InvalidTokenNumber(_))
    ));
    assert_eq!(
        validate_image_ref(&ImageRef::new("")),
        Err(DomainError::InvalidImageRef)
    );
}

#[test]
fn test_validate_image_upload_accepts_allowed_types() {
    for mime in ["image/jpeg", "image/png", "image/gif", "image/webp"] {
        let upload: ImageUpload = ImageUpload::new("photo", mime, vec![1, 2, 3]);
        assert!(validate_image_upload(&upload).is_ok(), "{mime} rejected");
    }
}

#[test]
fn test_validate_image_upload_rejects_oversized_file() {
    let upload: ImageUpload =
        ImageUpload::new("big.jpg", "image/jpeg", vec![0; MAX_IMAGE_SIZE + 1]);
    assert_eq!(
        validate_image_upload(&upload),
        Err(DomainError::ImageTooLarge {
            size: MAX_IMAGE_SIZE + 1,
            max: MAX_IMAGE_SIZE,
        })
    );
}

#[test]
fn test_validate_image_upload_accepts_exactly_max_size() {
    let upload: ImageUpload = ImageUpload::new("edge.jpg", "image/jpeg", vec![0; MAX_IMAGE_SIZE]);
    assert!(validate_image_upload(&upload).is_ok());
}

#[test]
fn test_validate_image_upload_rejects_other_types_and_empty_files() {
    let upload: ImageUpload = ImageUpload::new("doc.pdf", "application/pdf", vec![1]);
    assert_eq!(
        validate_image_upload(&upload),
        Err(DomainError::UnsupportedImageType(String::from(
            "application/pdf"
        )))
    );

    let upload: ImageUpload = ImageUpload::new("empty.jpg", "image/jpeg", Vec::new());
    assert_eq!(validate_image_upload(&upload), Err(DomainError::EmptyImage));
}

#[test]
fn test_validate_shared_mobile_returns_common_number() {
    let records: Vec<VehicleRecord> = vec![
        create_test_record("1", "9000000001"),
        create_test_record("2", "9000000001"),
        create_test_record("3", "9000000001"),
    ];

    let mobile: MobileNumber = validate_shared_mobile(&records).unwrap();
    assert_eq!(mobile.value(), "9000000001");
}

#[test]
fn test_validate_shared_mobile_rejects_empty_selection() {
    let records: Vec<VehicleRecord> = Vec::new();
    assert_eq!(
        validate_shared_mobile(&records),
        Err(DomainError::EmptySelection)
    );
}

#[test]
fn test_validate_shared_mobile_reports_first_divergent_vehicle() {
    let records: Vec<VehicleRecord> = vec![
        create_test_record("1", "9000000001"),
        create_test_record("2", "9000000002"),
        create_test_record("3", "9000000003"),
    ];

    assert_eq!(
        validate_shared_mobile(&records),
        Err(DomainError::MobileNumberMismatch {
            expected: MobileNumber::new("9000000001"),
            vehicle_id: VehicleId::new("2"),
            found: MobileNumber::new("9000000002"),
        })
    );
}

#[test]
fn test_validate_shared_mobile_rejects_missing_number() {
    let records: Vec<VehicleRecord> = vec![create_test_record("1", "")];
    assert!(matches!(
        validate_shared_mobile(&records),
        Err(DomainError::InvalidMobileNumber(_))
    ));
}
