// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP client for the parking API.
//!
//! The API is a single endpoint. Changes are `POST`ed as form bodies carrying
//! an `action` field; reads are `GET`s with the action in the query. Array
//! values are sent as JSON strings inside their form field.

use crate::config::ClientConfig;
use crate::error::{ClientError, INVALID_OTP};
use crate::wire::{
    DischargedData, Envelope, OtpSentData, RegisteredData, TokenData, decode_envelope,
    decode_or_default,
};
use parkdesk::{
    DischargeRequest, OtpCheck, ParkingGateway, RegistrationRequest, SendOtpReceipt, ServiceError,
    SubmissionOutcome,
};
use parkdesk_domain::{
    DashboardStats, ImageRef, ListFilter, MobileNumber, OtpCode, OtpPurpose, PlateNumber,
    TokenNumber, VehicleId, VehicleRecord,
};
use reqwest::RequestBuilder;
use tracing::{debug, info, warn};

/// Form and query fields, in the order they are sent.
type Fields = Vec<(&'static str, String)>;

/// Parking API action names.
mod action {
    pub const SEND_OTP: &str = "sendOTP";
    pub const VERIFY_OTP: &str = "verifyOTP";
    pub const DISCHARGE_VEHICLE: &str = "dischargeVehicle";
    pub const REGISTER_VEHICLE: &str = "registerVehicle";
    pub const GENERATE_TOKEN_NUMBER: &str = "generateTokenNumber";
    pub const LIST_VEHICLES: &str = "listVehicles";
    pub const GET_DASHBOARD_STATS: &str = "getDashboardStats";
}

/// Client for the parking API.
#[derive(Debug, Clone)]
pub struct ParkingApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ParkingApiClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns the client's configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Lists vehicles matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API refuses it.
    pub async fn fetch_vehicles(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<VehicleRecord>, ClientError> {
        let vehicles: Vec<VehicleRecord> = self
            .get_query(action::LIST_VEHICLES, filter.to_params())
            .await?
            .into_data()?;
        debug!(count = vehicles.len(), "Fetched vehicles");
        Ok(vehicles)
    }

    /// Asks the API to send an OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API refuses it.
    pub async fn request_otp(
        &self,
        mobile: &MobileNumber,
        purpose: OtpPurpose,
    ) -> Result<SendOtpReceipt, ClientError> {
        let fields: Fields = vec![
            ("mobile_number", mobile.value().to_string()),
            ("purpose", purpose.as_str().to_string()),
        ];
        let data: OtpSentData = self
            .post_form(action::SEND_OTP, fields)
            .await?
            .into_data()?;

        if data.otp_code.is_some() {
            debug!(mobile = %mobile.value(), "OTP service echoed the code");
        }
        Ok(SendOtpReceipt {
            reference: data.reference,
            echoed_code: data.otp_code.as_deref().map(OtpCode::new),
        })
    }

    /// Checks an OTP code.
    ///
    /// A refused check is a rejection, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn check_otp(
        &self,
        mobile: &MobileNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<OtpCheck, ClientError> {
        let fields: Fields = vec![
            ("mobile_number", mobile.value().to_string()),
            ("otp_code", code.value().to_string()),
            ("purpose", purpose.as_str().to_string()),
        ];
        let envelope: Envelope = self.post_form(action::VERIFY_OTP, fields).await?;
        if envelope.success {
            return Ok(OtpCheck::Accepted);
        }

        let message: String = envelope
            .error
            .and_then(|error| error.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| INVALID_OTP.to_string());
        Ok(OtpCheck::Rejected { message })
    }

    /// Discharges every vehicle in `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API refuses it.
    pub async fn discharge(
        &self,
        request: &DischargeRequest,
    ) -> Result<SubmissionOutcome, ClientError> {
        let fields: Fields = discharge_fields(request)?;
        let envelope: Envelope = self.post_form(action::DISCHARGE_VEHICLE, fields).await?;
        envelope.into_outcome(
            |data| decode_or_default::<DischargedData>(data.clone()).discharged_count,
            request.vehicle_ids.len(),
        )
    }

    /// Registers every plate in `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API refuses it.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<SubmissionOutcome, ClientError> {
        let fields: Fields = registration_fields(request)?;
        let envelope: Envelope = self.post_form(action::REGISTER_VEHICLE, fields).await?;
        envelope.into_outcome(
            |data| decode_or_default::<RegisteredData>(data.clone()).count,
            request.plates.len(),
        )
    }

    /// Asks the API for an unused token number.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API refuses it, or no
    /// token comes back.
    pub async fn next_token_number(&self) -> Result<TokenNumber, ClientError> {
        let envelope: Envelope = self
            .post_form(action::GENERATE_TOKEN_NUMBER, Vec::new())
            .await?;
        if !envelope.success {
            return Err(envelope.into_failure());
        }

        let raw: String = envelope.data.to_string();
        let token: String = serde_json::from_value::<TokenData>(envelope.data)
            .map(TokenData::into_value)
            .map_err(|_| ClientError::InvalidResponse { raw: raw.clone() })?;
        if token.trim().is_empty() {
            return Err(ClientError::InvalidResponse { raw });
        }
        Ok(TokenNumber::new(&token))
    }

    /// Fetches dashboard counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API refuses it.
    pub async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.get_query(action::GET_DASHBOARD_STATS, Vec::new())
            .await?
            .into_data()
    }

    async fn post_form(&self, action: &str, fields: Fields) -> Result<Envelope, ClientError> {
        let url: &str = self.base_url()?;
        let form: Fields = self.with_action(action, fields);
        debug!(action, fields = form.len(), "Posting API action");

        let response: reqwest::Response = self
            .authorize(self.http.post(url))
            .form(&form)
            .send()
            .await
            .map_err(ClientError::from)
            .inspect_err(|err| warn!(action, error = %err, "API request failed"))?;
        Self::read(action, response).await
    }

    async fn get_query(&self, action: &str, params: Fields) -> Result<Envelope, ClientError> {
        let url: &str = self.base_url()?;
        let query: Fields = self.with_action(action, params);
        debug!(action, params = query.len(), "Querying API");

        let response: reqwest::Response = self
            .authorize(self.http.get(url))
            .query(&query)
            .send()
            .await
            .map_err(ClientError::from)
            .inspect_err(|err| warn!(action, error = %err, "API request failed"))?;
        Self::read(action, response).await
    }

    async fn read(action: &str, response: reqwest::Response) -> Result<Envelope, ClientError> {
        let status: u16 = response.status().as_u16();
        let body: String = response.text().await?;
        let envelope: Envelope = decode_envelope(status, &body)
            .inspect_err(|err| warn!(action, status, error = %err, "Unusable API response"))?;
        debug!(action, status, success = envelope.success, "API response");
        Ok(envelope)
    }

    fn base_url(&self) -> Result<&str, ClientError> {
        if self.config.is_configured() {
            Ok(&self.config.base_url)
        } else {
            Err(ClientError::NotConfigured)
        }
    }

    // The session token travels in the header and as a `token` field.
    fn with_action(&self, action: &str, fields: Fields) -> Fields {
        let mut all: Fields = vec![("action", action.to_string())];
        if let Some(token) = &self.config.bearer_token {
            all.push(("token", token.clone()));
        }
        all.extend(fields);
        all
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

fn discharge_fields(request: &DischargeRequest) -> Result<Fields, ClientError> {
    let ids: Vec<&str> = request.vehicle_ids.iter().map(VehicleId::value).collect();
    let mut fields: Fields = vec![
        ("id", serde_json::to_string(&ids)?),
        ("verification_method", request.method.as_str().to_string()),
    ];
    if let Some(photo) = &request.discharge_photo {
        fields.push(("discharge_image_url", photo.value().to_string()));
    }
    Ok(fields)
}

fn registration_fields(request: &RegistrationRequest) -> Result<Fields, ClientError> {
    let images: Vec<&str> = request
        .vehicle_images
        .iter()
        .map(|image| image.as_ref().map_or("", ImageRef::value))
        .collect();
    let lead_image: String = images
        .iter()
        .find(|image| !image.is_empty())
        .map_or_else(String::new, ToString::to_string);

    let mut fields: Fields = Vec::new();
    if request.is_bulk() {
        let plates: Vec<&str> = request.plates.iter().map(PlateNumber::value).collect();
        fields.push(("vehicle_numbers", serde_json::to_string(&plates)?));
        fields.push(("vehicle_image_urls", serde_json::to_string(&images)?));
    } else if let Some(plate) = request.plates.first() {
        fields.push(("vehicle_number", plate.value().to_string()));
    }
    fields.push(("vehicle_image_url", lead_image));
    fields.push(("mobile_number", request.mobile_number.value().to_string()));
    fields.push(("name", request.name.clone().unwrap_or_default()));
    fields.push(("address", request.address.clone().unwrap_or_default()));
    fields.push(("status", String::from("parked")));
    fields.push(("verification_method", request.method.as_str().to_string()));
    if let Some(token) = &request.token_number {
        fields.push(("token_number", token.value().to_string()));
    }
    if request.allow_duplicate {
        fields.push(("allow_duplicate", String::from("true")));
    }
    Ok(fields)
}

impl ParkingGateway for ParkingApiClient {
    async fn list_vehicles(&self, filter: &ListFilter) -> Result<Vec<VehicleRecord>, ServiceError> {
        Ok(self.fetch_vehicles(filter).await?)
    }

    async fn send_otp(
        &self,
        mobile: &MobileNumber,
        purpose: OtpPurpose,
    ) -> Result<SendOtpReceipt, ServiceError> {
        let receipt: SendOtpReceipt = self.request_otp(mobile, purpose).await?;
        info!(mobile = %mobile.value(), purpose = purpose.as_str(), "OTP sent");
        Ok(receipt)
    }

    async fn verify_otp(
        &self,
        mobile: &MobileNumber,
        code: &OtpCode,
        purpose: OtpPurpose,
    ) -> Result<OtpCheck, ServiceError> {
        Ok(self.check_otp(mobile, code, purpose).await?)
    }

    async fn discharge_vehicles(
        &self,
        request: &DischargeRequest,
    ) -> Result<SubmissionOutcome, ServiceError> {
        Ok(self.discharge(request).await?)
    }

    async fn register_vehicles(
        &self,
        request: &RegistrationRequest,
    ) -> Result<SubmissionOutcome, ServiceError> {
        Ok(self.register(request).await?)
    }

    async fn generate_token_number(&self) -> Result<TokenNumber, ServiceError> {
        Ok(self.next_token_number().await?)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        Ok(self.fetch_dashboard_stats().await?)
    }
}

