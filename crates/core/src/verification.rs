// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::WorkflowError;
use crate::image::ImageTracker;
use crate::otp::OtpTracker;
use parkdesk_domain::{ImageRef, VerificationMethod};
use tracing::debug;

/// Proof-of-identity state for the active verification method.
///
/// Each variant carries only the fields its method needs, so switching
/// method always starts from that method's initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    /// One-time password sent to the owner's phone.
    Otp(OtpTracker),
    /// Operator compares the vehicle with its registered image.
    Image(ImageTracker),
    /// Operator override. No proof is collected.
    Manual,
}

impl VerificationState {
    fn fresh(method: VerificationMethod, images: &[ImageRef]) -> Self {
        match method {
            VerificationMethod::Otp => Self::Otp(OtpTracker::new()),
            VerificationMethod::Image => Self::Image(ImageTracker::new(images)),
            VerificationMethod::Manual => Self::Manual,
        }
    }

    /// Returns the method this state belongs to.
    #[must_use]
    pub const fn method(&self) -> VerificationMethod {
        match self {
            Self::Otp(_) => VerificationMethod::Otp,
            Self::Image(_) => VerificationMethod::Image,
            Self::Manual => VerificationMethod::Manual,
        }
    }

    /// Returns whether the state permits submission.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        match self {
            Self::Otp(tracker) => tracker.is_verified(),
            Self::Image(tracker) => tracker.is_verified(),
            Self::Manual => true,
        }
    }
}

impl Default for VerificationState {
    fn default() -> Self {
        Self::Otp(OtpTracker::new())
    }
}

/// Selects the verification method and owns its state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationController {
    state: VerificationState,
}

impl VerificationController {
    /// Creates a controller in OTP mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active method.
    #[must_use]
    pub const fn method(&self) -> VerificationMethod {
        self.state.method()
    }

    /// Returns the active state.
    #[must_use]
    pub const fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Switches to `method`.
    ///
    /// State is rebuilt only when the method differs; selecting the active
    /// method again keeps any progress. Returns whether the state was rebuilt.
    pub fn set_mode(&mut self, method: VerificationMethod, images: &[ImageRef]) -> bool {
        if self.state.method() == method {
            return false;
        }
        debug!(from = %self.state.method(), to = %method, "Switching verification method");
        self.state = VerificationState::fresh(method, images);
        true
    }

    /// Discards progress for the active method.
    pub fn reset(&mut self, images: &[ImageRef]) {
        self.state = VerificationState::fresh(self.state.method(), images);
    }

    /// Rebuilds image verification over a changed image list.
    ///
    /// Has no effect in other modes, so OTP progress survives image edits.
    pub fn refresh_images(&mut self, images: &[ImageRef]) {
        if matches!(self.state, VerificationState::Image(_)) {
            self.state = VerificationState::Image(ImageTracker::new(images));
        }
    }

    /// Returns to OTP mode with fresh state.
    pub fn reset_to_default(&mut self) {
        self.state = VerificationState::default();
    }

    /// Returns whether the bulk action may be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state.is_satisfied()
    }

    /// Returns the OTP tracker.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::WrongMode` if OTP is not the active method.
    pub fn otp_mut(&mut self) -> Result<&mut OtpTracker, WorkflowError> {
        let actual: VerificationMethod = self.state.method();
        match &mut self.state {
            VerificationState::Otp(tracker) => Ok(tracker),
            _ => Err(WorkflowError::WrongMode {
                expected: VerificationMethod::Otp,
                actual,
            }),
        }
    }

    /// Returns the image tracker.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::WrongMode` if image is not the active method.
    pub fn image_mut(&mut self) -> Result<&mut ImageTracker, WorkflowError> {
        let actual: VerificationMethod = self.state.method();
        match &mut self.state {
            VerificationState::Image(tracker) => Ok(tracker),
            _ => Err(WorkflowError::WrongMode {
                expected: VerificationMethod::Image,
                actual,
            }),
        }
    }
}
