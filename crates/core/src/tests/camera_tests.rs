// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests that the camera stream is released on every exit path.

use crate::{
    CameraError, CameraSession, CaptureAction, CaptureOutcome, PhotoCapture, ServiceError,
    WorkflowError,
};
use parkdesk_domain::{DomainError, ImageFolder, ImageRef, ImageUpload};
use std::future::ready;

use super::helpers::{FakeCamera, FakeStorage, create_test_upload};

#[tokio::test]
async fn test_session_released_on_drop() {
    let camera: FakeCamera = FakeCamera::with_frame(create_test_upload());
    {
        let _session = CameraSession::acquire(&camera).await.unwrap();
        assert_eq!(camera.stopped(), 0);
    }
    assert_eq!(camera.opened(), 1);
    assert_eq!(camera.stopped(), 1);
}

#[tokio::test]
async fn test_finish_releases_once() {
    let camera: FakeCamera = FakeCamera::with_frame(create_test_upload());
    let mut session = CameraSession::acquire(&camera).await.unwrap();

    let frame: ImageUpload = session.capture().await.unwrap();
    session.finish();

    assert_eq!(frame.file_name, "plate.jpg");
    assert_eq!(camera.stopped(), 1);
}

#[tokio::test]
async fn test_capture_uploads_and_releases() {
    let camera: FakeCamera = FakeCamera::with_frame(create_test_upload());
    let storage: FakeStorage = FakeStorage::default();
    let capture: PhotoCapture = PhotoCapture::new();

    let outcome = capture
        .capture_from_camera(
            &camera,
            &storage,
            ImageFolder::Vehicles,
            ready(CaptureAction::Capture),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CaptureOutcome::Uploaded(ImageRef::new("https://storage.test/vehicles/1.jpg"))
    );
    assert_eq!(camera.stopped(), 1);
    assert!(!capture.is_busy());
}

#[tokio::test]
async fn test_cancel_releases_without_upload() {
    let camera: FakeCamera = FakeCamera::with_frame(create_test_upload());
    let storage: FakeStorage = FakeStorage::default();
    let capture: PhotoCapture = PhotoCapture::new();

    let outcome = capture
        .capture_from_camera(
            &camera,
            &storage,
            ImageFolder::Discharge,
            ready(CaptureAction::Cancel),
        )
        .await
        .unwrap();

    assert_eq!(outcome, CaptureOutcome::Cancelled);
    assert_eq!(camera.stopped(), 1);
    assert_eq!(storage.upload_count(), 0);
}

#[tokio::test]
async fn test_capture_failure_releases() {
    let camera: FakeCamera = FakeCamera {
        capture_error: Some(CameraError::Capture(String::from("sensor fault"))),
        ..FakeCamera::default()
    };
    let storage: FakeStorage = FakeStorage::default();
    let capture: PhotoCapture = PhotoCapture::new();

    let result = capture
        .capture_from_camera(
            &camera,
            &storage,
            ImageFolder::Vehicles,
            ready(CaptureAction::Capture),
        )
        .await;

    assert_eq!(
        result,
        Err(WorkflowError::Camera(CameraError::Capture(String::from(
            "sensor fault"
        ))))
    );
    assert_eq!(camera.stopped(), 1);
}

#[tokio::test]
async fn test_upload_failure_still_releases() {
    let camera: FakeCamera = FakeCamera::with_frame(create_test_upload());
    let storage: FakeStorage = FakeStorage::default();
    *storage.failure.lock().unwrap() = Some(ServiceError::new("Upload failed"));
    let capture: PhotoCapture = PhotoCapture::new();

    let result = capture
        .capture_from_camera(
            &camera,
            &storage,
            ImageFolder::Vehicles,
            ready(CaptureAction::Capture),
        )
        .await;

    assert!(matches!(result, Err(WorkflowError::Service(_))));
    assert_eq!(camera.stopped(), 1);
    assert!(!capture.is_busy());
}

#[tokio::test]
async fn test_permission_denied_is_reported() {
    let camera: FakeCamera = FakeCamera::failing(CameraError::PermissionDenied);
    let storage: FakeStorage = FakeStorage::default();
    let capture: PhotoCapture = PhotoCapture::new();

    let result = capture
        .capture_from_camera(
            &camera,
            &storage,
            ImageFolder::Vehicles,
            ready(CaptureAction::Capture),
        )
        .await;

    assert_eq!(
        result,
        Err(WorkflowError::Camera(CameraError::PermissionDenied))
    );
    assert_eq!(camera.opened(), 0);
    assert!(!capture.is_busy());
}

#[tokio::test]
async fn test_captured_frame_is_validated_before_upload() {
    let camera: FakeCamera =
        FakeCamera::with_frame(ImageUpload::new("frame.bmp", "image/bmp", vec![1, 2, 3]));
    let storage: FakeStorage = FakeStorage::default();
    let capture: PhotoCapture = PhotoCapture::new();

    let result = capture
        .capture_from_camera(
            &camera,
            &storage,
            ImageFolder::Vehicles,
            ready(CaptureAction::Capture),
        )
        .await;

    assert_eq!(
        result,
        Err(WorkflowError::Validation(DomainError::UnsupportedImageType(
            String::from("image/bmp")
        )))
    );
    assert_eq!(storage.upload_count(), 0);
    assert_eq!(camera.stopped(), 1);
}

#[tokio::test]
async fn test_reentrant_capture_is_blocked_while_preview_open() {
    let camera: FakeCamera = FakeCamera::with_frame(create_test_upload());
    let storage: FakeStorage = FakeStorage::default();
    let capture: PhotoCapture = PhotoCapture::new();
    let upload: ImageUpload = create_test_upload();

    let first = capture.capture_from_camera(&camera, &storage, ImageFolder::Vehicles, async {
        tokio::task::yield_now().await;
        CaptureAction::Capture
    });
    let second = capture.upload_file(&storage, &upload, ImageFolder::Vehicles);

    let (first, second) = futures::join!(first, second);

    assert!(matches!(first, Ok(CaptureOutcome::Uploaded(_))));
    assert_eq!(second, Err(WorkflowError::CaptureInFlight));
    assert_eq!(storage.upload_count(), 1);
    assert_eq!(camera.opened(), 1);
}

#[tokio::test]
async fn test_oversized_file_is_rejected_without_upload() {
    let storage: FakeStorage = FakeStorage::default();
    let capture: PhotoCapture = PhotoCapture::new();
    let upload: ImageUpload =
        ImageUpload::new("big.png", "image/png", vec![0; 5 * 1024 * 1024 + 1]);

    let result = capture
        .upload_file(&storage, &upload, ImageFolder::Discharge)
        .await;

    assert!(matches!(
        result,
        Err(WorkflowError::Validation(DomainError::ImageTooLarge { .. }))
    ));
    assert_eq!(storage.upload_count(), 0);
}
