// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subcommand implementations.
//!
//! Each command drives one workflow end to end, asking the operator for
//! whatever the workflow cannot know (OTP codes, image confirmations,
//! conflict decisions).

use chrono_tz::Tz;
use parkdesk::{
    DischargeReport, DischargeWorkflow, ImageAssignment, ObjectStorage, ParkingGateway,
    RegistrationReport, RegistrationWorkflow, WorkflowError,
};
use parkdesk_domain::{
    DashboardStats, ImageRef, ListFilter, PlateNumber, VehicleId, VehicleRecord,
    VerificationMethod, parse_timezone, sort_vehicles,
};
use std::error::Error;
use std::future::Future;
use std::path::PathBuf;
use time::OffsetDateTime;
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

use crate::files::read_image;
use crate::prompt::Prompt;
use crate::render::{conflict_lines, stats_lines, vehicle_line};
use crate::{DischargeArgs, ListArgs, RegisterArgs};

/// Result of running a subcommand.
pub type CommandResult = Result<(), Box<dyn Error>>;

/// How many codes the operator may try per OTP.
pub const MAX_OTP_ATTEMPTS: usize = 3;

/// The OTP steps shared by both workflows.
pub trait OtpSteps {
    fn send_code(&mut self) -> impl Future<Output = Result<(), WorkflowError>>;
    fn enter_code(&mut self, code: &str) -> Result<(), WorkflowError>;
    fn check_code(&mut self) -> impl Future<Output = Result<(), WorkflowError>>;
}

impl<G: ParkingGateway, S: ObjectStorage> OtpSteps for DischargeWorkflow<G, S> {
    async fn send_code(&mut self) -> Result<(), WorkflowError> {
        let mobile = self.send_otp().await?;
        println!("OTP sent to {}", mobile.value());
        Ok(())
    }

    fn enter_code(&mut self, code: &str) -> Result<(), WorkflowError> {
        self.enter_otp_code(code)
    }

    async fn check_code(&mut self) -> Result<(), WorkflowError> {
        self.verify_otp().await
    }
}

impl<G: ParkingGateway, S: ObjectStorage> OtpSteps for RegistrationWorkflow<G, S> {
    async fn send_code(&mut self) -> Result<(), WorkflowError> {
        self.send_otp().await?;
        println!("OTP sent to {}", self.draft().mobile_number().value());
        Ok(())
    }

    fn enter_code(&mut self, code: &str) -> Result<(), WorkflowError> {
        self.enter_otp_code(code)
    }

    async fn check_code(&mut self) -> Result<(), WorkflowError> {
        self.verify_otp().await
    }
}

/// Sends an OTP and reads codes until one is accepted.
///
/// A blank answer resends the OTP.
///
/// # Errors
///
/// Returns an error if the OTP cannot be sent, input runs out, the service
/// fails, or every attempt is rejected.
pub async fn verify_by_otp<W, R>(workflow: &mut W, prompt: &mut Prompt<R>) -> CommandResult
where
    W: OtpSteps,
    R: AsyncBufRead + Unpin,
{
    workflow.send_code().await?;

    let mut attempts: usize = 0;
    while attempts < MAX_OTP_ATTEMPTS {
        let Some(code) = prompt
            .ask("Enter the 6-digit OTP (blank to resend):")
            .await?
        else {
            return Err("no OTP entered".into());
        };
        if code.is_empty() {
            workflow.send_code().await?;
            continue;
        }

        attempts += 1;
        workflow.enter_code(&code)?;
        match workflow.check_code().await {
            Ok(()) => {
                println!("OTP verified");
                return Ok(());
            }
            Err(err @ (WorkflowError::InvalidCode { .. } | WorkflowError::Validation(_))) => {
                println!("{err}");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(format!("OTP not verified after {MAX_OTP_ATTEMPTS} attempts").into())
}

async fn confirm_images<R>(images: &[ImageRef], prompt: &mut Prompt<R>) -> Result<bool, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
{
    for image in images {
        println!("  {}", image.value());
    }
    Ok(prompt
        .confirm("Does the vehicle match the image(s) above?")
        .await?)
}

/// Lists vehicles.
///
/// # Errors
///
/// Returns an error if a filter is invalid or the list cannot be fetched.
pub async fn list<G: ParkingGateway>(gateway: &G, args: &ListArgs) -> CommandResult {
    let tz: Tz = parse_timezone(&args.timezone)?;
    let filter: ListFilter = ListFilter::new()
        .with_status(args.status)
        .with_vehicle_number(args.plate.as_deref().unwrap_or_default())
        .with_mobile_number(args.mobile.as_deref().unwrap_or_default())
        .with_dates(args.from.as_deref(), args.to.as_deref())?
        .with_timezone(&args.timezone)?;

    let mut vehicles: Vec<VehicleRecord> = gateway.list_vehicles(&filter).await?;
    sort_vehicles(&mut vehicles, args.sort);

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    for vehicle in &vehicles {
        println!("{}", vehicle_line(vehicle, tz, now)?);
    }
    println!("{} vehicle(s)", vehicles.len());
    Ok(())
}

/// Prints dashboard counts.
///
/// # Errors
///
/// Returns an error if the counts cannot be fetched.
pub async fn stats<G: ParkingGateway>(gateway: &G) -> CommandResult {
    let stats: DashboardStats = gateway.dashboard_stats().await?;
    for line in stats_lines(&stats) {
        println!("{line}");
    }
    Ok(())
}

/// Discharges parked vehicles.
///
/// # Errors
///
/// Returns an error if a vehicle is not parked, verification fails, the
/// photo cannot be uploaded, or the discharge is refused.
pub async fn discharge<G, S, R>(
    gateway: G,
    storage: S,
    args: &DischargeArgs,
    prompt: &mut Prompt<R>,
) -> CommandResult
where
    G: ParkingGateway,
    S: ObjectStorage,
    R: AsyncBufRead + Unpin,
{
    let mut workflow: DischargeWorkflow<G, S> = DischargeWorkflow::new(gateway, storage);
    let loaded: usize = workflow.reload(ListFilter::parked()).await?;
    info!(loaded, "Loaded parked vehicles");

    for id in &args.ids {
        workflow.toggle(&VehicleId::new(id))?;
    }
    workflow.set_mode(args.method);

    match args.method {
        VerificationMethod::Otp => verify_by_otp(&mut workflow, prompt).await?,
        VerificationMethod::Image => {
            let images: Vec<ImageRef> = workflow.selection().images().to_vec();
            if images.is_empty() {
                return Err(WorkflowError::ImageUnavailable.into());
            }
            if !confirm_images(&images, prompt).await? {
                return Err("image verification declined".into());
            }
            workflow.mark_image_verified()?;
        }
        VerificationMethod::Manual => warn!("Discharging without owner verification"),
    }

    if let Some(path) = &args.photo {
        let upload = read_image(path).await?;
        let photo: ImageRef = workflow.attach_discharge_photo(&upload).await?;
        println!("Discharge photo uploaded: {}", photo.value());
    }

    let report: DischargeReport = workflow.submit().await?;
    println!("{} vehicle(s) discharged", report.discharged);
    if !report.reloaded {
        println!("The parked list could not be refreshed");
    }
    Ok(())
}

async fn upload_images<G, S>(
    workflow: &mut RegistrationWorkflow<G, S>,
    images: &[PathBuf],
    plates: usize,
) -> CommandResult
where
    G: ParkingGateway,
    S: ObjectStorage,
{
    match images {
        [] => {}
        [shared] => {
            let upload = read_image(shared).await?;
            workflow.upload_vehicle_image(None, &upload).await?;
        }
        per_vehicle if per_vehicle.len() == plates => {
            workflow.set_image_assignment(ImageAssignment::PerVehicle);
            for (index, path) in per_vehicle.iter().enumerate() {
                let upload = read_image(path).await?;
                workflow.upload_vehicle_image(Some(index), &upload).await?;
            }
        }
        other => {
            return Err(format!(
                "expected one image or one per vehicle ({plates}), got {}",
                other.len()
            )
            .into());
        }
    }
    Ok(())
}

/// Registers vehicles for one owner.
///
/// A duplicate token is shown to the operator, who may register anyway.
/// `--allow-duplicate` answers that question in advance.
///
/// # Errors
///
/// Returns an error if the details are invalid, verification fails, an
/// image cannot be uploaded, the registration is refused, or the operator
/// abandons a conflict.
pub async fn register<G, S, R>(
    gateway: G,
    storage: S,
    args: &RegisterArgs,
    prompt: &mut Prompt<R>,
) -> CommandResult
where
    G: ParkingGateway,
    S: ObjectStorage,
    R: AsyncBufRead + Unpin,
{
    let mut workflow: RegistrationWorkflow<G, S> = RegistrationWorkflow::new(gateway, storage);

    let draft = workflow.draft_mut();
    for (index, plate) in args.plates.iter().enumerate() {
        if index > 0 {
            draft.add_plate_row();
        }
        draft.set_plate(index, plate)?;
    }
    draft.set_name(args.name.as_deref().unwrap_or_default());
    draft.set_address(args.address.as_deref().unwrap_or_default());
    if let Some(token) = &args.token_number {
        draft.set_token(token);
    }
    workflow.set_mobile_number(&args.mobile);

    if args.suggest_token && args.token_number.is_none() {
        let token = workflow.suggest_token_number().await?;
        println!("Token number {}", token.value());
    }

    workflow.set_mode(args.method);
    upload_images(&mut workflow, &args.images, args.plates.len()).await?;

    match args.method {
        VerificationMethod::Otp => verify_by_otp(&mut workflow, prompt).await?,
        VerificationMethod::Image => {
            let images: Vec<ImageRef> = workflow.draft().images();
            if images.is_empty() {
                return Err(WorkflowError::ImageUnavailable.into());
            }
            if !confirm_images(&images, prompt).await? {
                return Err("image verification declined".into());
            }
            workflow.mark_image_verified()?;
        }
        VerificationMethod::Manual => warn!("Registering without owner verification"),
    }

    let report: RegistrationReport = match workflow.submit().await {
        Ok(report) => report,
        Err(WorkflowError::Conflict(conflict)) => {
            for line in conflict_lines(&conflict) {
                println!("{line}");
            }
            if args.allow_duplicate || prompt.confirm("Register anyway?").await? {
                workflow.resubmit_with_override().await?
            } else {
                workflow.abandon_conflict()?;
                return Err("registration abandoned; choose another token number".into());
            }
        }
        Err(err) => return Err(err.into()),
    };

    let plates: Vec<&str> = report.plates.iter().map(PlateNumber::value).collect();
    println!(
        "{} vehicle(s) registered: {}{}",
        report.registered,
        plates.join(", "),
        if report.overridden {
            " (duplicate token allowed)"
        } else {
            ""
        }
    );
    Ok(())
}
