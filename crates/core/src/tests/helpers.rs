// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CameraDevice, CameraError, CameraStream, Conflict, ConflictingVehicle, DischargeRequest,
    ObjectStorage, OtpCheck, ParkingGateway, RegistrationRequest, SendOtpReceipt, ServiceError,
    SubmissionOutcome,
};
use parkdesk_domain::{
    DashboardStats, ImageFolder, ImageRef, ImageUpload, ListFilter, MobileNumber, OtpCode,
    OtpPurpose, PlateNumber, TokenNumber, VehicleId, VehicleRecord, VehicleStatus,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::macros::datetime;

pub const SHARED_MOBILE: &str = "9000000001";
pub const OTP: &str = "482913";

/// One request observed by [`FakeGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    SendOtp(String, OtpPurpose),
    VerifyOtp(String, String, OtpPurpose),
    Discharge(DischargeRequest),
    Register(RegistrationRequest),
    GenerateToken,
    Stats,
}

/// In-memory parking API.
///
/// Discharging removes vehicles from the list it serves, so reloads see
/// the change. Responses for discharge and registration can be scripted;
/// unscripted calls succeed.
#[derive(Debug, Default)]
pub struct FakeGateway {
    pub vehicles: Mutex<Vec<VehicleRecord>>,
    pub calls: Mutex<Vec<Call>>,
    pub accepted_code: Mutex<Option<String>>,
    pub send_failure: Mutex<Option<ServiceError>>,
    pub list_failure: Mutex<Option<ServiceError>>,
    pub discharge_responses: Mutex<VecDeque<Result<SubmissionOutcome, ServiceError>>>,
    pub register_responses: Mutex<VecDeque<Result<SubmissionOutcome, ServiceError>>>,
}

impl FakeGateway {
    pub fn with_vehicles(vehicles: Vec<VehicleRecord>) -> Self {
        let gateway: Self = Self::default();
        *gateway.vehicles.lock().unwrap() = vehicles;
        *gateway.accepted_code.lock().unwrap() = Some(OTP.to_string());
        gateway
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn otp_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::SendOtp(..) | Call::VerifyOtp(..)))
    }

    pub fn discharge_calls(&self) -> Vec<DischargeRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Discharge(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn register_calls(&self) -> Vec<RegistrationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Register(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn script_discharge(&self, response: Result<SubmissionOutcome, ServiceError>) {
        self.discharge_responses.lock().unwrap().push_back(response);
    }

    pub fn script_register(&self, response: Result<SubmissionOutcome, ServiceError>) {
        self.register_responses.lock().unwrap().push_back(response);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ParkingGateway for FakeGateway {
    async fn list_vehicles(&self, filter: &ListFilter) -> Result<Vec<VehicleRecord>, ServiceError> {
        self.record(Call::List);
        if let Some(err) = self.list_failure.lock().unwrap().clone() {
            return Err(err);
        }
        let status: Option<VehicleStatus> = filter.status();
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .filter(|v| status.is_none_or(|s| v.status == s))
            .cloned()
            .collect())
    }

    async fn send_otp(
        &self,
        mobile: &MobileNumber,
        purpose: OtpPurpose,
    ) -> Result<SendOtpReceipt, ServiceError> {
        self.record(Call::SendOtp(mobile.value().to_string(), purpose));
        if let Some(err) = self.send_failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(SendOtpReceipt {
            reference: Some("otp-ref-1".to_string()),
            echoed_code: Some(OtpCode::new(OTP)),
        })
    }

    async fn verify_otp(
        &self,
        mobile: &MobileNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<OtpCheck, ServiceError> {
        self.record(Call::VerifyOtp(
            mobile.value().to_string(),
            code.value().to_string(),
            purpose,
        ));
        let accepted: Option<String> = self.accepted_code.lock().unwrap().clone();
        if accepted.as_deref() == Some(code.value()) {
            Ok(OtpCheck::Accepted)
        } else {
            Ok(OtpCheck::Rejected {
                message: "Invalid OTP".to_string(),
            })
        }
    }

    async fn discharge_vehicles(
        &self,
        request: &DischargeRequest,
    ) -> Result<SubmissionOutcome, ServiceError> {
        self.record(Call::Discharge(request.clone()));
        if let Some(response) = self.discharge_responses.lock().unwrap().pop_front() {
            return response;
        }
        let mut vehicles = self.vehicles.lock().unwrap();
        for vehicle in vehicles.iter_mut() {
            if request.vehicle_ids.contains(&vehicle.id) {
                vehicle.status = VehicleStatus::Discharged;
            }
        }
        Ok(SubmissionOutcome::Applied {
            count: request.vehicle_ids.len(),
        })
    }

    async fn register_vehicles(
        &self,
        request: &RegistrationRequest,
    ) -> Result<SubmissionOutcome, ServiceError> {
        self.record(Call::Register(request.clone()));
        if let Some(response) = self.register_responses.lock().unwrap().pop_front() {
            return response;
        }
        Ok(SubmissionOutcome::Applied {
            count: request.plates.len(),
        })
    }

    async fn generate_token_number(&self) -> Result<TokenNumber, ServiceError> {
        self.record(Call::GenerateToken);
        Ok(TokenNumber::new("TK42"))
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        self.record(Call::Stats);
        Ok(DashboardStats::default())
    }
}

/// In-memory object storage.
#[derive(Debug, Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<(String, ImageFolder)>>,
    pub failure: Mutex<Option<ServiceError>>,
}

impl FakeStorage {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

impl ObjectStorage for FakeStorage {
    async fn upload_image(
        &self,
        upload: &ImageUpload,
        folder: ImageFolder,
    ) -> Result<ImageRef, ServiceError> {
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((upload.file_name.clone(), folder));
        Ok(ImageRef::new(&format!(
            "https://storage.test/{}/{}.{}",
            folder.as_str(),
            uploads.len(),
            upload.extension()
        )))
    }
}

/// Camera whose streams count how often they are stopped.
#[derive(Debug, Default)]
pub struct FakeCamera {
    pub open_error: Option<CameraError>,
    pub capture_error: Option<CameraError>,
    pub frame: Option<ImageUpload>,
    pub opened: AtomicUsize,
    pub stopped: Arc<AtomicUsize>,
}

impl FakeCamera {
    pub fn with_frame(frame: ImageUpload) -> Self {
        Self {
            frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn failing(err: CameraError) -> Self {
        Self {
            open_error: Some(err),
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct FakeStream {
    frame: Option<ImageUpload>,
    capture_error: Option<CameraError>,
    stopped: Arc<AtomicUsize>,
    live: bool,
}

impl CameraStream for FakeStream {
    async fn capture(&mut self) -> Result<ImageUpload, CameraError> {
        if let Some(err) = self.capture_error.clone() {
            return Err(err);
        }
        self.frame
            .clone()
            .ok_or_else(|| CameraError::Capture("no frame".to_string()))
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl CameraDevice for FakeCamera {
    type Stream = FakeStream;

    async fn open(&self) -> Result<FakeStream, CameraError> {
        if let Some(err) = self.open_error.clone() {
            return Err(err);
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakeStream {
            frame: self.frame.clone(),
            capture_error: self.capture_error.clone(),
            stopped: Arc::clone(&self.stopped),
            live: true,
        })
    }
}

pub fn create_test_record(id: &str, plate: &str, mobile: &str, image: Option<&str>) -> VehicleRecord {
    VehicleRecord {
        id: VehicleId::new(id),
        vehicle_number: PlateNumber::new(plate),
        mobile_number: MobileNumber::new(mobile),
        name: Some(String::from("Asha Rao")),
        address: None,
        status: VehicleStatus::Parked,
        registered_at: datetime!(2026-03-02 08:05 UTC),
        discharged_at: None,
        vehicle_image_url: image.map(ImageRef::new),
        discharge_image_url: None,
        token_number: None,
    }
}

/// Three parked vehicles owned by the same number, two with images.
pub fn create_shared_owner_fleet() -> Vec<VehicleRecord> {
    vec![
        create_test_record("v1", "KA01AB1234", SHARED_MOBILE, Some("https://img.test/v1.jpg")),
        create_test_record("v2", "KA01AB5678", SHARED_MOBILE, None),
        create_test_record("v3", "KA01AB9012", SHARED_MOBILE, Some("https://img.test/v3.jpg")),
    ]
}

pub fn create_test_upload() -> ImageUpload {
    ImageUpload::new("plate.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

pub fn create_test_conflict() -> Conflict {
    Conflict {
        code: String::from("DUPLICATE_TOKEN"),
        message: String::from("Token number TK1 is already in use"),
        conflicting: vec![ConflictingVehicle {
            id: Some(VehicleId::new("v9")),
            vehicle_number: Some(PlateNumber::new("KA05ZZ0001")),
            mobile_number: Some(MobileNumber::new("9000000009")),
            token_number: Some(TokenNumber::new("TK1")),
        }],
    }
}
