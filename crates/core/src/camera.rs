// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Camera and file image acquisition.
//!
//! A camera stream is a scoped resource. [`CameraSession`] stops every track
//! when it goes out of scope, whether the operator captured a frame,
//! cancelled, or the capture failed.

use crate::error::{CameraError, WorkflowError};
use crate::gateway::ObjectStorage;
use crate::in_flight::InFlightFlag;
use parkdesk_domain::{ImageFolder, ImageRef, ImageUpload, validate_image_upload};
use std::future::Future;
use tracing::{debug, info, warn};

/// An open video stream.
pub trait CameraStream: Send {
    /// Grabs the current frame as an encoded image.
    fn capture(&mut self) -> impl Future<Output = Result<ImageUpload, CameraError>> + Send;

    /// Stops every track of the stream. Must be idempotent.
    fn stop(&mut self);
}

/// A camera that can be opened for capture.
pub trait CameraDevice: Send + Sync {
    /// The stream type produced by [`CameraDevice::open`].
    type Stream: CameraStream;

    /// Requests access and opens a stream, preferring the rear camera.
    fn open(&self) -> impl Future<Output = Result<Self::Stream, CameraError>> + Send;
}

/// An open camera stream that is released when dropped.
#[derive(Debug)]
pub struct CameraSession<S: CameraStream> {
    stream: Option<S>,
}

impl<S: CameraStream> CameraSession<S> {
    /// Opens `device`.
    ///
    /// # Errors
    ///
    /// Returns the device's error if access is refused or no camera exists.
    pub async fn acquire<D>(device: &D) -> Result<Self, CameraError>
    where
        D: CameraDevice<Stream = S>,
    {
        let stream: S = device.open().await?;
        debug!("Camera stream opened");
        Ok(Self {
            stream: Some(stream),
        })
    }

    /// Grabs one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails or the session was finished.
    pub async fn capture(&mut self) -> Result<ImageUpload, CameraError> {
        match self.stream.as_mut() {
            Some(stream) => stream.capture().await,
            None => Err(CameraError::Capture("camera session already finished".to_string())),
        }
    }

    /// Releases the stream now rather than at end of scope.
    pub fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("Camera stream released");
        }
    }
}

impl<S: CameraStream> Drop for CameraSession<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// What the operator chose while the preview was showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureAction {
    /// Take the photo.
    Capture,
    /// Close the preview without a photo.
    Cancel,
}

/// Result of a camera capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A frame was captured and uploaded.
    Uploaded(ImageRef),
    /// The operator closed the preview.
    Cancelled,
}

/// Uploads photos from files or the camera, one at a time.
#[derive(Debug, Default)]
pub struct PhotoCapture {
    gate: InFlightFlag,
}

impl PhotoCapture {
    /// Creates an idle capture gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a capture or upload is in progress.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gate.is_held()
    }

    /// Validates and uploads an image the operator picked from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if another upload is in progress, the image is
    /// invalid, or the upload fails.
    pub async fn upload_file<S: ObjectStorage>(
        &self,
        storage: &S,
        upload: &ImageUpload,
        folder: ImageFolder,
    ) -> Result<ImageRef, WorkflowError> {
        let Some(_guard) = self.gate.try_acquire() else {
            return Err(WorkflowError::CaptureInFlight);
        };
        store(storage, upload, folder).await
    }

    /// Opens the camera, waits for the operator, and uploads the frame.
    ///
    /// The stream is released before the upload starts and on every early
    /// return.
    ///
    /// # Errors
    ///
    /// Returns an error if another capture is in progress, the camera cannot
    /// be opened or fails, the frame is invalid, or the upload fails.
    pub async fn capture_from_camera<D, S, A>(
        &self,
        device: &D,
        storage: &S,
        folder: ImageFolder,
        decision: A,
    ) -> Result<CaptureOutcome, WorkflowError>
    where
        D: CameraDevice,
        S: ObjectStorage,
        A: Future<Output = CaptureAction>,
    {
        let Some(_guard) = self.gate.try_acquire() else {
            return Err(WorkflowError::CaptureInFlight);
        };

        let mut session: CameraSession<D::Stream> = CameraSession::acquire(device)
            .await
            .inspect_err(|err| warn!(error = %err, "Failed to open camera"))?;

        if decision.await == CaptureAction::Cancel {
            info!("Camera capture cancelled by operator");
            return Ok(CaptureOutcome::Cancelled);
        }

        let frame: ImageUpload = session.capture().await?;
        session.finish();

        let image: ImageRef = store(storage, &frame, folder).await?;
        Ok(CaptureOutcome::Uploaded(image))
    }
}

async fn store<S: ObjectStorage>(
    storage: &S,
    upload: &ImageUpload,
    folder: ImageFolder,
) -> Result<ImageRef, WorkflowError> {
    validate_image_upload(upload)?;
    let image: ImageRef = storage.upload_image(upload, folder).await?;
    info!(folder = folder.as_str(), size = upload.size(), "Image uploaded");
    Ok(image)
}
