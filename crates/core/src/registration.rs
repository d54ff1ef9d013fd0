// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration of one or more vehicles for a single owner.
//!
//! Unlike discharge, verification binds to a number the operator types in
//! rather than to numbers already on record. Changing that number discards
//! any OTP progress.
//!
//! A token number already held by another parked vehicle is reported by the
//! backend as a conflict. The operator then resubmits the same request with
//! an explicit override, or abandons it and corrects the token.

use crate::camera::{CameraDevice, CaptureAction, CaptureOutcome, PhotoCapture};
use crate::error::WorkflowError;
use crate::gateway::{
    Conflict, ObjectStorage, ParkingGateway, RegistrationRequest, SubmissionOutcome,
};
use crate::submit::BulkSubmitter;
use crate::verification::VerificationController;
use parkdesk_domain::{
    DomainError, ImageFolder, ImageRef, ImageUpload, MobileNumber, OtpPurpose, PlateNumber,
    TokenNumber, VerificationMethod, validate_address, validate_mobile_number,
    validate_owner_name, validate_plate_number, validate_token_number,
};
use std::future::Future;
use tracing::{debug, info, warn};

/// How vehicle images map to plates in a bulk registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageAssignment {
    /// One image applies to every plate.
    #[default]
    Shared,
    /// Each plate row has its own image.
    PerVehicle,
}

/// The operator's in-progress registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    plates: Vec<String>,
    mobile: MobileNumber,
    name: String,
    address: String,
    token: String,
    assignment: ImageAssignment,
    shared_image: Option<ImageRef>,
    vehicle_images: Vec<Option<ImageRef>>,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            plates: vec![String::new()],
            mobile: MobileNumber::new(""),
            name: String::new(),
            address: String::new(),
            token: String::new(),
            assignment: ImageAssignment::Shared,
            shared_image: None,
            vehicle_images: vec![None],
        }
    }
}

impl RegistrationDraft {
    /// Creates an empty draft with one plate row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the plate rows as typed.
    #[must_use]
    pub fn plate_rows(&self) -> &[String] {
        &self.plates
    }

    /// Returns the owner's number as typed.
    #[must_use]
    pub const fn mobile_number(&self) -> &MobileNumber {
        &self.mobile
    }

    /// Returns the owner's name as typed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owner's address as typed.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the token number as typed.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns how images map to plates.
    #[must_use]
    pub const fn image_assignment(&self) -> ImageAssignment {
        self.assignment
    }

    /// Appends an empty plate row.
    pub fn add_plate_row(&mut self) {
        self.plates.push(String::new());
        self.vehicle_images.push(None);
    }

    /// Removes a plate row and its image. The last row is cleared instead.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub(crate) fn remove_plate_row(&mut self, index: usize) -> Result<(), DomainError> {
        self.check_row(index)?;
        if self.plates.len() == 1 {
            self.plates[0].clear();
            self.vehicle_images[0] = None;
        } else {
            self.plates.remove(index);
            self.vehicle_images.remove(index);
        }
        Ok(())
    }

    /// Replaces the text of a plate row.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn set_plate(&mut self, index: usize, value: &str) -> Result<(), DomainError> {
        self.check_row(index)?;
        self.plates[index] = value.to_string();
        Ok(())
    }

    /// Sets the owner's name.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Sets the owner's address.
    pub fn set_address(&mut self, address: &str) {
        self.address = address.to_string();
    }

    /// Sets the token number.
    pub fn set_token(&mut self, token: &str) {
        self.token = token.to_string();
    }

    /// Chooses how images map to plates.
    pub(crate) const fn set_image_assignment(&mut self, assignment: ImageAssignment) {
        self.assignment = assignment;
    }

    /// Returns the images that count towards image verification.
    #[must_use]
    pub fn images(&self) -> Vec<ImageRef> {
        match self.assignment {
            ImageAssignment::Shared => self.shared_image.iter().cloned().collect(),
            ImageAssignment::PerVehicle => self.vehicle_images.iter().flatten().cloned().collect(),
        }
    }

    /// Returns whether at least one plate row is filled in.
    #[must_use]
    pub fn has_plates(&self) -> bool {
        self.plates.iter().any(|plate| !plate.trim().is_empty())
    }

    pub(crate) fn set_mobile(&mut self, mobile: MobileNumber) {
        self.mobile = mobile;
    }

    pub(crate) fn set_image(
        &mut self,
        slot: Option<usize>,
        image: ImageRef,
    ) -> Result<(), DomainError> {
        match slot {
            None => self.shared_image = Some(image),
            Some(index) => {
                self.check_row(index)?;
                self.vehicle_images[index] = Some(image);
            }
        }
        Ok(())
    }

    const fn check_row(&self, index: usize) -> Result<(), DomainError> {
        if index >= self.plates.len() {
            return Err(DomainError::PlateRowOutOfRange {
                index,
                len: self.plates.len(),
            });
        }
        Ok(())
    }

    /// Validates the draft and builds the request for `method`.
    ///
    /// Blank plate rows are skipped. Images follow the plates they belong to.
    ///
    /// # Errors
    ///
    /// Returns an error if no plate is filled in or any field is invalid.
    pub fn to_request(
        &self,
        method: VerificationMethod,
    ) -> Result<RegistrationRequest, DomainError> {
        validate_mobile_number(&self.mobile)?;

        let mut plates: Vec<PlateNumber> = Vec::new();
        let mut vehicle_images: Vec<Option<ImageRef>> = Vec::new();
        for (row, image) in self.plates.iter().zip(&self.vehicle_images) {
            if row.trim().is_empty() {
                continue;
            }
            let plate: PlateNumber = PlateNumber::new(row);
            validate_plate_number(&plate)?;
            plates.push(plate);
            vehicle_images.push(match self.assignment {
                ImageAssignment::Shared => self.shared_image.clone(),
                ImageAssignment::PerVehicle => image.clone(),
            });
        }
        if plates.is_empty() {
            return Err(DomainError::NoPlateNumbers);
        }

        let name: Option<String> = non_blank(&self.name);
        if let Some(name) = &name {
            validate_owner_name(name)?;
        }
        let address: Option<String> = non_blank(&self.address);
        if let Some(address) = &address {
            validate_address(address)?;
        }
        let token_number: Option<TokenNumber> = match non_blank(&self.token) {
            Some(token) => {
                let token: TokenNumber = TokenNumber::new(&token);
                validate_token_number(&token)?;
                Some(token)
            }
            None => None,
        };

        Ok(RegistrationRequest {
            plates,
            vehicle_images,
            mobile_number: self.mobile.clone(),
            name,
            address,
            token_number,
            method,
            allow_duplicate: false,
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed: &str = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A submission the backend refused, awaiting the operator's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConflict {
    /// The refused request.
    pub request: RegistrationRequest,
    /// Why it was refused.
    pub conflict: Conflict,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Number of vehicles the backend registered.
    pub registered: usize,
    /// The plates that were submitted.
    pub plates: Vec<PlateNumber>,
    /// Whether the duplicate override was used.
    pub overridden: bool,
}

/// Drives the registration of vehicles for one owner.
#[derive(Debug)]
pub struct RegistrationWorkflow<G, S> {
    gateway: G,
    storage: S,
    draft: RegistrationDraft,
    verification: VerificationController,
    submitter: BulkSubmitter,
    photos: PhotoCapture,
    pending: Option<PendingConflict>,
}

impl<G: ParkingGateway, S: ObjectStorage> RegistrationWorkflow<G, S> {
    /// Creates a workflow with an empty draft, in OTP mode.
    #[must_use]
    pub fn new(gateway: G, storage: S) -> Self {
        Self {
            gateway,
            storage,
            draft: RegistrationDraft::new(),
            verification: VerificationController::new(),
            submitter: BulkSubmitter::new(),
            photos: PhotoCapture::new(),
            pending: None,
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

    /// Returns the draft.
    #[must_use]
    pub const fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Returns the draft for editing.
    ///
    /// The mobile number, the image assignment and row removal go through
    /// the workflow instead, since they are bound to verification.
    pub const fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    /// Returns the verification controller.
    #[must_use]
    pub const fn verification(&self) -> &VerificationController {
        &self.verification
    }

    /// Returns the refused submission awaiting a decision.
    #[must_use]
    pub const fn pending_conflict(&self) -> Option<&PendingConflict> {
        self.pending.as_ref()
    }

    /// Sets the owner's number. Returns whether it changed.
    ///
    /// A changed number resets verification.
    pub fn set_mobile_number(&mut self, raw: &str) -> bool {
        let mobile: MobileNumber = MobileNumber::new(raw);
        if &mobile == self.draft.mobile_number() {
            return false;
        }
        self.draft.set_mobile(mobile);
        let images: Vec<ImageRef> = self.draft.images();
        self.verification.reset(&images);
        true
    }

    /// Switches the verification method.
    pub fn set_mode(&mut self, method: VerificationMethod) -> bool {
        let images: Vec<ImageRef> = self.draft.images();
        self.verification.set_mode(method, &images)
    }

    /// Sends an OTP to the number in the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if OTP is not the active method, the number is
    /// malformed, or the OTP service fails.
    pub async fn send_otp(&mut self) -> Result<(), WorkflowError> {
        let tracker = self.verification.otp_mut()?;
        let mobile: MobileNumber = self.draft.mobile_number().clone();
        tracker.begin_send(mobile.clone())?;

        info!(mobile = %mobile.value(), "Sending registration OTP");
        let result = self.gateway.send_otp(&mobile, OtpPurpose::Register).await;
        tracker
            .complete_send(result)
            .inspect_err(|err| warn!(error = %err, "Failed to send OTP"))
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
            .verify_otp(&mobile, &code, OtpPurpose::Register)
            .await;
        tracker
            .complete_verify(result)
            .inspect_err(|err| warn!(error = %err, "OTP verification failed"))?;
        info!(mobile = %mobile.value(), "Registration OTP verified");
        Ok(())
    }

    /// Records that the operator checked the uploaded image.
    ///
    /// # Errors
    ///
    /// Returns an error if image mode is not active or no image is uploaded.
    pub fn mark_image_verified(&mut self) -> Result<(), WorkflowError> {
        self.verification.image_mut()?.mark_verified()
    }

    /// Uploads a vehicle image from a file.
    ///
    /// `slot` selects a plate row for per-vehicle images; `None` sets the
    /// shared image.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist, another upload is running,
    /// the image is invalid, or the upload fails.
    pub async fn upload_vehicle_image(
        &mut self,
        slot: Option<usize>,
        upload: &ImageUpload,
    ) -> Result<ImageRef, WorkflowError> {
        if let Some(index) = slot {
            self.draft.check_row(index)?;
        }
        let image: ImageRef = self
            .photos
            .upload_file(&self.storage, upload, ImageFolder::Vehicles)
            .await?;
        self.store_image(slot, image.clone())?;
        Ok(image)
    }

    /// Takes a vehicle image with a camera.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist, another capture is
    /// running, the camera fails, or the upload fails.
    pub async fn capture_vehicle_image<D, A>(
        &mut self,
        slot: Option<usize>,
        device: &D,
        decision: A,
    ) -> Result<CaptureOutcome, WorkflowError>
    where
        D: CameraDevice,
        A: Future<Output = CaptureAction>,
    {
        if let Some(index) = slot {
            self.draft.check_row(index)?;
        }
        let outcome: CaptureOutcome = self
            .photos
            .capture_from_camera(device, &self.storage, ImageFolder::Vehicles, decision)
            .await?;
        if let CaptureOutcome::Uploaded(image) = &outcome {
            self.store_image(slot, image.clone())?;
        }
        Ok(outcome)
    }

    /// Chooses how images map to plates.
    ///
    /// Image verification restarts if the images in use change.
    pub fn set_image_assignment(&mut self, assignment: ImageAssignment) {
        let before: Vec<ImageRef> = self.draft.images();
        self.draft.set_image_assignment(assignment);
        self.sync_images(&before);
    }

    /// Removes a plate row and its image. The last row is cleared instead.
    ///
    /// Image verification restarts if the images in use change.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn remove_plate_row(&mut self, index: usize) -> Result<(), WorkflowError> {
        let before: Vec<ImageRef> = self.draft.images();
        self.draft.remove_plate_row(index)?;
        self.sync_images(&before);
        Ok(())
    }

    fn store_image(&mut self, slot: Option<usize>, image: ImageRef) -> Result<(), WorkflowError> {
        self.draft.set_image(slot, image)?;
        let images: Vec<ImageRef> = self.draft.images();
        self.verification.refresh_images(&images);
        Ok(())
    }

    fn sync_images(&mut self, before: &[ImageRef]) {
        let images: Vec<ImageRef> = self.draft.images();
        if images != before {
            debug!(images = images.len(), "Draft images changed");
            self.verification.refresh_images(&images);
        }
    }

    /// Asks the backend for an unused token number and puts it in the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn suggest_token_number(&mut self) -> Result<TokenNumber, WorkflowError> {
        let token: TokenNumber = self.gateway.generate_token_number().await?;
        debug!(token = %token.value(), "Generated token number");
        self.draft.set_token(token.value());
        Ok(token)
    }

    /// Returns whether `submit` would be attempted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.draft.has_plates() && self.verification.can_submit()
    }

    /// Submits the draft.
    ///
    /// A conflict is kept as the pending conflict and returned as
    /// `WorkflowError::Conflict`. A new submission discards any earlier
    /// pending conflict.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is invalid, verification is incomplete,
    /// a submission is running, the backend reports a conflict, or the call
    /// fails.
    pub async fn submit(&mut self) -> Result<RegistrationReport, WorkflowError> {
        self.pending = None;
        let request: RegistrationRequest = self.draft.to_request(self.verification.method())?;
        info!(
            vehicles = request.plates.len(),
            bulk = request.is_bulk(),
            method = %request.method,
            "Submitting registration"
        );
        self.send(request).await
    }

    /// Resubmits the refused request with the duplicate override set.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingConflict` if nothing was refused. If this attempt
    /// also fails, the conflict stays pending so the operator can retry.
    pub async fn resubmit_with_override(&mut self) -> Result<RegistrationReport, WorkflowError> {
        let Some(pending) = self.pending.take() else {
            return Err(WorkflowError::NoPendingConflict);
        };
        let mut request: RegistrationRequest = pending.request.clone();
        request.allow_duplicate = true;
        info!(code = %pending.conflict.code, "Resubmitting registration with duplicate override");

        let result: Result<RegistrationReport, WorkflowError> = self.send(request).await;
        if let Err(err) = &result
            && !matches!(err, WorkflowError::Conflict(_))
        {
            self.pending = Some(pending);
        }
        result
    }

    /// Drops the refused request so the operator can correct the draft.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingConflict` if nothing was refused.
    pub fn abandon_conflict(&mut self) -> Result<Conflict, WorkflowError> {
        let pending: PendingConflict = self.pending.take().ok_or(WorkflowError::NoPendingConflict)?;
        info!(code = %pending.conflict.code, "Conflict abandoned; draft kept for correction");
        Ok(pending.conflict)
    }

    async fn send(
        &mut self,
        request: RegistrationRequest,
    ) -> Result<RegistrationReport, WorkflowError> {
        let outcome: SubmissionOutcome = self
            .submitter
            .submit(&self.verification, || {
                self.gateway.register_vehicles(&request)
            })
            .await?;

        match outcome {
            SubmissionOutcome::Applied { count } => {
                self.draft = RegistrationDraft::new();
                self.verification.reset_to_default();
                Ok(RegistrationReport {
                    registered: count,
                    overridden: request.allow_duplicate,
                    plates: request.plates,
                })
            }
            SubmissionOutcome::Conflict(conflict) => {
                self.pending = Some(PendingConflict {
                    request,
                    conflict: conflict.clone(),
                });
                Err(WorkflowError::Conflict(conflict))
            }
        }
    }
}
