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

//! Verification workflows for discharging and registering parked vehicles.
//!
//! The workflows own all operator-facing state: which vehicles are
//! selected, how the owner's identity is being proven, and whether a
//! submission or image upload is already running. Remote services are
//! reached only through [`ParkingGateway`], [`ObjectStorage`] and
//! [`CameraDevice`].

mod camera;
mod discharge;
mod error;
mod gateway;
mod image;
mod in_flight;
mod otp;
mod registration;
mod selection;
mod submit;
mod verification;

#[cfg(test)]
mod tests;

// Re-export public types
pub use camera::{
    CameraDevice, CameraSession, CameraStream, CaptureAction, CaptureOutcome, PhotoCapture,
};
pub use discharge::{DischargeReport, DischargeWorkflow};
pub use error::{CameraError, WorkflowError};
pub use gateway::{
    Conflict, ConflictingVehicle, DischargeRequest, ObjectStorage, OtpCheck, ParkingGateway,
    RegistrationRequest, SendOtpReceipt, ServiceError, SubmissionOutcome,
};
pub use image::{ImagePhase, ImageTracker};
pub use otp::{OtpPhase, OtpTracker};
pub use registration::{
    ImageAssignment, PendingConflict, RegistrationDraft, RegistrationReport, RegistrationWorkflow,
};
pub use selection::Selection;
pub use submit::BulkSubmitter;
pub use verification::{VerificationController, VerificationState};
