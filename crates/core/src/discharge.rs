// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk discharge of parked vehicles.
//!
//! The operator selects vehicles from the parked list, proves the owner's
//! identity with one of the verification methods, optionally attaches a
//! photo of the person collecting the vehicles, and discharges them all in
//! one backend call.

use crate::camera::{CameraDevice, CaptureAction, CaptureOutcome, PhotoCapture};
use crate::error::WorkflowError;
use crate::gateway::{DischargeRequest, ObjectStorage, ParkingGateway, SubmissionOutcome};
use crate::selection::Selection;
use crate::submit::BulkSubmitter;
use crate::verification::VerificationController;
use parkdesk_domain::{
    DomainError, ImageFolder, ImageRef, ImageUpload, ListFilter, MobileNumber, OtpPurpose,
    VehicleId, VehicleRecord, VehicleStatus, VerificationMethod,
};
use std::future::Future;
use tracing::{debug, info, warn};

/// Result of a successful discharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DischargeReport {
    /// Number of vehicles the backend discharged.
    pub discharged: usize,
    /// Whether the parked list was reloaded afterwards.
    pub reloaded: bool,
}

/// Drives the discharge of one or more parked vehicles.
#[derive(Debug)]
pub struct DischargeWorkflow<G, S> {
    gateway: G,
    storage: S,
    filter: ListFilter,
    selection: Selection,
    verification: VerificationController,
    submitter: BulkSubmitter,
    photos: PhotoCapture,
    discharge_photo: Option<ImageRef>,
}

impl<G: ParkingGateway, S: ObjectStorage> DischargeWorkflow<G, S> {
    /// Creates a workflow with an empty list, in OTP mode.
    #[must_use]
    pub fn new(gateway: G, storage: S) -> Self {
        Self {
            gateway,
            storage,
            filter: ListFilter::parked(),
            selection: Selection::new(),
            verification: VerificationController::new(),
            submitter: BulkSubmitter::new(),
            photos: PhotoCapture::new(),
            discharge_photo: None,
        }
    }

    /// Returns the parking gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns the image store.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the filter used by the last reload.
    #[must_use]
    pub const fn filter(&self) -> &ListFilter {
        &self.filter
    }

    /// Returns the loaded vehicles.
    #[must_use]
    pub fn vehicles(&self) -> &[VehicleRecord] {
        self.selection.loaded()
    }

    /// Returns the current selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the verification controller.
    #[must_use]
    pub const fn verification(&self) -> &VerificationController {
        &self.verification
    }

    /// Returns the attached discharge photo.
    #[must_use]
    pub const fn discharge_photo(&self) -> Option<&ImageRef> {
        self.discharge_photo.as_ref()
    }

    /// Loads the parked vehicles matching `filter`.
    ///
    /// Vehicles that disappeared from the list are dropped from the
    /// selection. A filter without a status is narrowed to parked vehicles.
    ///
    /// # Returns
    ///
    /// The number of vehicles loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be fetched. The previous list and
    /// selection are kept.
    pub async fn reload(&mut self, filter: ListFilter) -> Result<usize, WorkflowError> {
        let filter: ListFilter = if filter.status().is_none() {
            filter.with_status(Some(VehicleStatus::Parked))
        } else {
            filter
        };

        let records: Vec<VehicleRecord> = self
            .gateway
            .list_vehicles(&filter)
            .await
            .inspect_err(|err| warn!(error = %err, "Failed to load vehicles"))?;
        let count: usize = records.len();
        debug!(count, "Loaded vehicles");

        self.filter = filter;
        if self.selection.replace_loaded(records) {
            debug!("Selection pruned after reload");
            self.selection_changed();
        }
        Ok(count)
    }

    /// Reloads with the last filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be fetched.
    pub async fn refresh(&mut self) -> Result<usize, WorkflowError> {
        let filter: ListFilter = self.filter.clone();
        self.reload(filter).await
    }

    /// Adds or removes one vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the loaded list.
    pub fn toggle(&mut self, id: &VehicleId) -> Result<(), WorkflowError> {
        self.selection.toggle(id)?;
        self.selection_changed();
        Ok(())
    }

    /// Selects every loaded vehicle.
    pub fn select_all(&mut self) -> bool {
        let changed: bool = self.selection.select_all();
        if changed {
            self.selection_changed();
        }
        changed
    }

    /// Deselects every vehicle.
    pub fn clear_all(&mut self) -> bool {
        let changed: bool = self.selection.clear_all();
        if changed {
            self.selection_changed();
        }
        changed
    }

    /// Selects everything, or clears the selection if everything is selected.
    pub fn toggle_all(&mut self) -> bool {
        let changed: bool = self.selection.toggle_all();
        if changed {
            self.selection_changed();
        }
        changed
    }

    /// Switches the verification method.
    ///
    /// Returns whether verification state was rebuilt.
    pub fn set_mode(&mut self, method: VerificationMethod) -> bool {
        self.verification.set_mode(method, self.selection.images())
    }

    /// Sends an OTP to the number shared by every selected vehicle.
    ///
    /// # Returns
    ///
    /// The number the OTP was sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - OTP is not the active method
    /// - Nothing is selected, or the selected vehicles have different numbers
    /// - The OTP service fails
    ///
    /// No request is made when a precondition fails.
    pub async fn send_otp(&mut self) -> Result<MobileNumber, WorkflowError> {
        let tracker = self.verification.otp_mut()?;
        let mobile: MobileNumber = self.selection.shared_mobile()?;
        tracker.begin_send(mobile.clone())?;

        info!(mobile = %mobile.value(), vehicles = self.selection.len(), "Sending discharge OTP");
        let result = self
            .gateway
            .send_otp(&mobile, OtpPurpose::Discharge)
            .await;
        tracker
            .complete_send(result)
            .inspect_err(|err| warn!(error = %err, "Failed to send OTP"))?;
        Ok(mobile)
    }

    /// Records the code the owner read out.
    ///
    /// # Errors
    ///
    /// Returns an error unless an OTP has been sent in OTP mode.
    pub fn enter_otp_code(&mut self, code: &str) -> Result<(), WorkflowError> {
        self.verification.otp_mut()?.enter_code(code)
    }

    /// Verifies the entered code with the OTP service.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not 6 digits (no request is made),
    /// the service rejects it, or the service fails.
    pub async fn verify_otp(&mut self) -> Result<(), WorkflowError> {
        let tracker = self.verification.otp_mut()?;
        let (mobile, code) = tracker.begin_verify()?;

        let result = self
            .gateway
            .verify_otp(&mobile, &code, OtpPurpose::Discharge)
            .await;
        tracker
            .complete_verify(result)
            .inspect_err(|err| warn!(error = %err, "OTP verification failed"))?;
        info!(mobile = %mobile.value(), "Discharge OTP verified");
        Ok(())
    }

    /// Records that the operator compared the vehicles with their images.
    ///
    /// # Errors
    ///
    /// Returns an error if image mode is not active or no selected vehicle
    /// has a registered image.
    pub fn mark_image_verified(&mut self) -> Result<(), WorkflowError> {
        self.verification.image_mut()?.mark_verified()?;
        info!(vehicles = self.selection.len(), "Vehicle images verified by operator");
        Ok(())
    }

    /// Uploads a photo of the person collecting the vehicles.
    ///
    /// Replaces any photo attached earlier.
    ///
    /// # Errors
    ///
    /// Returns an error if another upload is running, the image is invalid,
    /// or the upload fails. An earlier photo is kept on failure.
    pub async fn attach_discharge_photo(
        &mut self,
        upload: &ImageUpload,
    ) -> Result<ImageRef, WorkflowError> {
        let image: ImageRef = self
            .photos
            .upload_file(&self.storage, upload, ImageFolder::Discharge)
            .await?;
        self.discharge_photo = Some(image.clone());
        Ok(image)
    }

    /// Takes the discharge photo with a camera.
    ///
    /// # Errors
    ///
    /// Returns an error if another capture is running, the camera fails, or
    /// the upload fails.
    pub async fn capture_discharge_photo<D, A>(
        &mut self,
        device: &D,
        decision: A,
    ) -> Result<CaptureOutcome, WorkflowError>
    where
        D: CameraDevice,
        A: Future<Output = CaptureAction>,
    {
        let outcome: CaptureOutcome = self
            .photos
            .capture_from_camera(device, &self.storage, ImageFolder::Discharge, decision)
            .await?;
        if let CaptureOutcome::Uploaded(image) = &outcome {
            self.discharge_photo = Some(image.clone());
        }
        Ok(outcome)
    }

    /// Removes the discharge photo.
    pub const fn clear_discharge_photo(&mut self) -> Option<ImageRef> {
        self.discharge_photo.take()
    }

    /// Returns whether `submit` would be attempted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.selection.is_empty() && self.verification.can_submit()
    }

    /// Discharges every selected vehicle in one request.
    ///
    /// On success the selection, verification, and photo are cleared, the
    /// method returns to OTP, and the list is reloaded. A failed reload does
    /// not undo the discharge; it is reported through
    /// [`DischargeReport::reloaded`].
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected, verification is incomplete,
    /// a submission is already running, the backend reports a conflict, or
    /// the call fails. State is kept on every error so the operator can retry
    /// without verifying again.
    pub async fn submit(&mut self) -> Result<DischargeReport, WorkflowError> {
        if self.selection.is_empty() {
            return Err(DomainError::EmptySelection.into());
        }

        let request: DischargeRequest = DischargeRequest {
            vehicle_ids: self.selection.ids().to_vec(),
            method: self.verification.method(),
            discharge_photo: self.discharge_photo.clone(),
        };
        info!(
            vehicles = request.vehicle_ids.len(),
            method = %request.method,
            with_photo = request.discharge_photo.is_some(),
            "Submitting discharge"
        );

        let outcome: SubmissionOutcome = self
            .submitter
            .submit(&self.verification, || {
                self.gateway.discharge_vehicles(&request)
            })
            .await?;

        let discharged: usize = match outcome {
            SubmissionOutcome::Applied { count } => count,
            SubmissionOutcome::Conflict(conflict) => return Err(WorkflowError::Conflict(conflict)),
        };

        self.selection.clear_all();
        self.verification.reset_to_default();
        self.discharge_photo = None;

        let reloaded: bool = match self.refresh().await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "Discharge applied but the list could not be reloaded");
                false
            }
        };

        Ok(DischargeReport {
            discharged,
            reloaded,
        })
    }

    fn selection_changed(&mut self) {
        self.verification.reset(self.selection.images());
    }
}
