// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! OTP lifecycle for one phone number.
//!
//! ```text
//! Idle ──begin_send──▶ Sending ──ok──▶ Sent ──begin_verify──▶ Verifying ──ok──▶ Verified
//!   ▲                     │             ▲ │                        │
//!   └──────── err ────────┘             │ └──begin_send (resend)   │
//!                                       └────────── err / rejected ┘
//! ```
//!
//! Network calls happen between a `begin_*` and its `complete_*`; the
//! tracker itself performs no IO. A failed send returns to whichever stable
//! phase it started from.

use crate::error::WorkflowError;
use crate::gateway::{OtpCheck, SendOtpReceipt, ServiceError};
use parkdesk_domain::{MobileNumber, OtpCode, validate_mobile_number, validate_otp_code};
use tracing::debug;

/// Phase of the OTP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpPhase {
    /// No OTP has been sent.
    #[default]
    Idle,
    /// A send request is outstanding.
    Sending,
    /// An OTP was sent and a code can be entered.
    Sent,
    /// A verify request is outstanding.
    Verifying,
    /// The code was accepted.
    Verified,
}

impl OtpPhase {
    /// Returns a short name for messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Verifying => "verifying",
            Self::Verified => "verified",
        }
    }
}

/// Tracks one OTP round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpTracker {
    phase: OtpPhase,
    fallback: OtpPhase,
    mobile: Option<MobileNumber>,
    code: OtpCode,
    reference: Option<String>,
}

impl OtpTracker {
    /// Creates a tracker in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> OtpPhase {
        self.phase
    }

    /// Returns whether a code has been accepted.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.phase == OtpPhase::Verified
    }

    /// Returns whether an OTP has been sent (and possibly verified).
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(
            self.phase,
            OtpPhase::Sent | OtpPhase::Verifying | OtpPhase::Verified
        )
    }

    /// Returns the number the OTP is bound to.
    #[must_use]
    pub const fn mobile(&self) -> Option<&MobileNumber> {
        self.mobile.as_ref()
    }

    /// Returns the code entered so far.
    #[must_use]
    pub const fn code(&self) -> &OtpCode {
        &self.code
    }

    /// Returns the service reference of the last sent OTP.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    const fn invalid(&self, operation: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            operation,
            phase: self.phase.as_str(),
        }
    }

    /// Starts sending an OTP to `mobile`.
    ///
    /// Allowed from `Idle`, or from `Sent` to resend.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is malformed or a request is already
    /// outstanding or the code is already verified.
    pub fn begin_send(&mut self, mobile: MobileNumber) -> Result<(), WorkflowError> {
        if !matches!(self.phase, OtpPhase::Idle | OtpPhase::Sent) {
            return Err(self.invalid("send OTP"));
        }
        validate_mobile_number(&mobile)?;

        self.fallback = self.phase;
        self.phase = OtpPhase::Sending;
        self.mobile = Some(mobile);
        Ok(())
    }

    /// Applies the result of a send request.
    ///
    /// # Errors
    ///
    /// Returns the service error after rolling back to the prior phase, or
    /// `InvalidTransition` if no send was outstanding.
    pub fn complete_send(
        &mut self,
        result: Result<SendOtpReceipt, ServiceError>,
    ) -> Result<(), WorkflowError> {
        if self.phase != OtpPhase::Sending {
            return Err(self.invalid("complete OTP send"));
        }

        match result {
            Ok(receipt) => {
                if receipt.echoed_code.is_some() {
                    debug!("OTP service echoed the code in its response; ignoring it");
                }
                self.phase = OtpPhase::Sent;
                self.reference = receipt.reference;
                self.code = OtpCode::default();
                Ok(())
            }
            Err(err) => {
                self.phase = self.fallback;
                if self.phase == OtpPhase::Idle {
                    self.mobile = None;
                }
                Err(WorkflowError::Service(err))
            }
        }
    }

    /// Records the code typed by the operator.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless an OTP has been sent and is not yet
    /// being verified.
    pub fn enter_code(&mut self, raw: &str) -> Result<(), WorkflowError> {
        if self.phase != OtpPhase::Sent {
            return Err(self.invalid("enter OTP code"));
        }
        self.code = OtpCode::new(raw);
        Ok(())
    }

    /// Starts verifying the entered code.
    ///
    /// # Returns
    ///
    /// The number and code to send to the verification service.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No OTP has been sent, or verification is already in progress
    /// - The entered code is not exactly 6 digits
    pub fn begin_verify(&mut self) -> Result<(MobileNumber, OtpCode), WorkflowError> {
        if self.phase != OtpPhase::Sent {
            return Err(self.invalid("verify OTP"));
        }
        validate_otp_code(&self.code)?;
        let mobile: MobileNumber = self
            .mobile
            .clone()
            .ok_or_else(|| self.invalid("verify OTP"))?;

        self.phase = OtpPhase::Verifying;
        Ok((mobile, self.code.clone()))
    }

    /// Applies the result of a verify request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode` or the service error after returning to `Sent`,
    /// or `InvalidTransition` if no verification was outstanding.
    pub fn complete_verify(
        &mut self,
        result: Result<OtpCheck, ServiceError>,
    ) -> Result<(), WorkflowError> {
        if self.phase != OtpPhase::Verifying {
            return Err(self.invalid("complete OTP verification"));
        }

        match result {
            Ok(OtpCheck::Accepted) => {
                self.phase = OtpPhase::Verified;
                Ok(())
            }
            Ok(OtpCheck::Rejected { message }) => {
                self.phase = OtpPhase::Sent;
                Err(WorkflowError::InvalidCode { message })
            }
            Err(err) => {
                self.phase = OtpPhase::Sent;
                Err(WorkflowError::Service(err))
            }
        }
    }
}
