// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the OTP phase machine, driven without any network.

use crate::{OtpCheck, OtpPhase, OtpTracker, SendOtpReceipt, ServiceError, WorkflowError};
use parkdesk_domain::{DomainError, MobileNumber, OtpCode};

fn mobile() -> MobileNumber {
    MobileNumber::new("9000000001")
}

fn sent_tracker() -> OtpTracker {
    let mut tracker: OtpTracker = OtpTracker::new();
    tracker.begin_send(mobile()).unwrap();
    tracker.complete_send(Ok(SendOtpReceipt::default())).unwrap();
    tracker
}

#[test]
fn test_new_tracker_is_idle() {
    let tracker: OtpTracker = OtpTracker::new();
    assert_eq!(tracker.phase(), OtpPhase::Idle);
    assert!(!tracker.is_verified());
    assert!(tracker.mobile().is_none());
}

#[test]
fn test_send_moves_through_sending_to_sent() {
    let mut tracker: OtpTracker = OtpTracker::new();
    tracker.begin_send(mobile()).unwrap();
    assert_eq!(tracker.phase(), OtpPhase::Sending);

    let receipt: SendOtpReceipt = SendOtpReceipt {
        reference: Some(String::from("ref-7")),
        echoed_code: None,
    };
    tracker.complete_send(Ok(receipt)).unwrap();

    assert_eq!(tracker.phase(), OtpPhase::Sent);
    assert_eq!(tracker.mobile(), Some(&mobile()));
    assert_eq!(tracker.reference(), Some("ref-7"));
}

#[test]
fn test_echoed_code_is_not_entered() {
    let mut tracker: OtpTracker = OtpTracker::new();
    tracker.begin_send(mobile()).unwrap();
    tracker
        .complete_send(Ok(SendOtpReceipt {
            reference: None,
            echoed_code: Some(OtpCode::new("482913")),
        }))
        .unwrap();

    assert!(tracker.code().is_empty());
}

#[test]
fn test_failed_first_send_returns_to_idle() {
    let mut tracker: OtpTracker = OtpTracker::new();
    tracker.begin_send(mobile()).unwrap();

    let result = tracker.complete_send(Err(ServiceError::new("SMS gateway down")));

    assert_eq!(
        result,
        Err(WorkflowError::Service(ServiceError::new("SMS gateway down")))
    );
    assert_eq!(tracker.phase(), OtpPhase::Idle);
    assert!(tracker.mobile().is_none());
}

#[test]
fn test_failed_resend_returns_to_sent() {
    let mut tracker: OtpTracker = sent_tracker();
    tracker.begin_send(mobile()).unwrap();

    let _ = tracker.complete_send(Err(ServiceError::new("timeout")));

    assert_eq!(tracker.phase(), OtpPhase::Sent);
    assert_eq!(tracker.mobile(), Some(&mobile()));
}

#[test]
fn test_send_rejects_malformed_number() {
    let mut tracker: OtpTracker = OtpTracker::new();
    let result = tracker.begin_send(MobileNumber::new("12345"));

    assert!(matches!(
        result,
        Err(WorkflowError::Validation(DomainError::InvalidMobileNumber(_)))
    ));
    assert_eq!(tracker.phase(), OtpPhase::Idle);
}

#[test]
fn test_send_while_sending_is_rejected() {
    let mut tracker: OtpTracker = OtpTracker::new();
    tracker.begin_send(mobile()).unwrap();

    assert!(matches!(
        tracker.begin_send(mobile()),
        Err(WorkflowError::InvalidTransition {
            phase: "sending",
            ..
        })
    ));
}

#[test]
fn test_enter_code_requires_sent() {
    let mut tracker: OtpTracker = OtpTracker::new();
    assert!(matches!(
        tracker.enter_code("482913"),
        Err(WorkflowError::InvalidTransition { phase: "idle", .. })
    ));
}

#[test]
fn test_verify_rejects_short_code_locally() {
    let mut tracker: OtpTracker = sent_tracker();
    tracker.enter_code("48291").unwrap();

    let result = tracker.begin_verify();

    assert_eq!(
        result,
        Err(WorkflowError::Validation(DomainError::InvalidOtpCode {
            length: 5
        }))
    );
    assert_eq!(tracker.phase(), OtpPhase::Sent);
}

#[test]
fn test_verify_rejects_long_code_locally() {
    let mut tracker: OtpTracker = sent_tracker();
    tracker.enter_code("4829130").unwrap();

    assert!(matches!(
        tracker.begin_verify(),
        Err(WorkflowError::Validation(DomainError::InvalidOtpCode {
            length: 7
        }))
    ));
}

#[test]
fn test_verify_before_send_is_rejected() {
    let mut tracker: OtpTracker = OtpTracker::new();
    assert!(matches!(
        tracker.begin_verify(),
        Err(WorkflowError::InvalidTransition { .. })
    ));
}

#[test]
fn test_accepted_code_verifies() {
    let mut tracker: OtpTracker = sent_tracker();
    tracker.enter_code("482913").unwrap();

    let (number, code) = tracker.begin_verify().unwrap();
    assert_eq!(number, mobile());
    assert_eq!(code, OtpCode::new("482913"));
    assert_eq!(tracker.phase(), OtpPhase::Verifying);

    tracker.complete_verify(Ok(OtpCheck::Accepted)).unwrap();
    assert!(tracker.is_verified());
}

#[test]
fn test_rejected_code_returns_to_sent() {
    let mut tracker: OtpTracker = sent_tracker();
    tracker.enter_code("000000").unwrap();
    tracker.begin_verify().unwrap();

    let result = tracker.complete_verify(Ok(OtpCheck::Rejected {
        message: String::from("OTP expired"),
    }));

    assert_eq!(
        result,
        Err(WorkflowError::InvalidCode {
            message: String::from("OTP expired")
        })
    );
    assert_eq!(tracker.phase(), OtpPhase::Sent);
}

#[test]
fn test_verify_service_failure_returns_to_sent() {
    let mut tracker: OtpTracker = sent_tracker();
    tracker.enter_code("482913").unwrap();
    tracker.begin_verify().unwrap();

    let result = tracker.complete_verify(Err(ServiceError::new("Network error")));

    assert!(matches!(result, Err(WorkflowError::Service(_))));
    assert_eq!(tracker.phase(), OtpPhase::Sent);
}

#[test]
fn test_verified_is_terminal() {
    let mut tracker: OtpTracker = sent_tracker();
    tracker.enter_code("482913").unwrap();
    tracker.begin_verify().unwrap();
    tracker.complete_verify(Ok(OtpCheck::Accepted)).unwrap();

    assert!(tracker.begin_send(mobile()).is_err());
    assert!(tracker.enter_code("111111").is_err());
    assert!(tracker.begin_verify().is_err());
    assert!(tracker.is_verified());
}

#[test]
fn test_completion_without_request_is_rejected() {
    let mut tracker: OtpTracker = OtpTracker::new();
    assert!(tracker.complete_send(Ok(SendOtpReceipt::default())).is_err());
    assert!(tracker.complete_verify(Ok(OtpCheck::Accepted)).is_err());
    assert_eq!(tracker.phase(), OtpPhase::Idle);
}
