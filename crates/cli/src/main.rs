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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions, clippy::future_not_send)]

mod commands;
mod files;
mod prompt;
mod render;

use clap::{Parser, Subcommand};
use parkdesk_client::{
    ClientConfig, ClientError, HttpObjectStorage, ParkingApiClient, StorageConfig,
};
use parkdesk_domain::{VehicleSort, VehicleStatus, VerificationMethod};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use crate::prompt::stdin_prompt;

/// Parkdesk - operator console for parking-lot discharge and registration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the parking API
    #[arg(long, env = "PARKDESK_API_URL", default_value = "")]
    api_url: String,

    /// Base URL images are uploaded under
    #[arg(long, env = "PARKDESK_STORAGE_URL", default_value = "")]
    storage_url: String,

    /// URL uploaded images are served from, if it differs from the upload URL
    #[arg(long, env = "PARKDESK_STORAGE_PUBLIC_URL")]
    storage_public_url: Option<String>,

    /// Credential for the image store
    #[arg(long, env = "PARKDESK_STORAGE_TOKEN", hide_env_values = true)]
    storage_token: Option<String>,

    /// Operator session token
    #[arg(long, env = "PARKDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PARKDESK_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List vehicles
    List(ListArgs),
    /// Show dashboard counts
    Stats,
    /// Discharge parked vehicles for one owner
    Discharge(DischargeArgs),
    /// Register one or more vehicles for one owner
    Register(RegisterArgs),
}

/// Filters and presentation for `list`.
#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Only vehicles with this status (parked, discharged)
    #[arg(long)]
    status: Option<VehicleStatus>,

    /// Plate number, or part of one
    #[arg(long)]
    plate: Option<String>,

    /// Owner mobile number
    #[arg(long)]
    mobile: Option<String>,

    /// First registration date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Last registration date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// IANA timezone used for dates and display
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Order: newest, oldest, longest_parked
    #[arg(long, default_value = "newest")]
    sort: VehicleSort,
}

/// Options for `discharge`.
#[derive(clap::Args, Debug)]
struct DischargeArgs {
    /// Ids of the vehicles to discharge
    #[arg(required = true)]
    ids: Vec<String>,

    /// How the owner is verified: otp, image, manual
    #[arg(long, default_value = "otp")]
    method: VerificationMethod,

    /// Photo of the person collecting the vehicles
    #[arg(long)]
    photo: Option<PathBuf>,
}

/// Options for `register`.
#[derive(clap::Args, Debug)]
struct RegisterArgs {
    /// Plate number; repeat for bulk registration
    #[arg(long = "plate", required = true)]
    plates: Vec<String>,

    /// Owner mobile number
    #[arg(long)]
    mobile: String,

    /// Owner name
    #[arg(long)]
    name: Option<String>,

    /// Owner address
    #[arg(long)]
    address: Option<String>,

    /// Token number
    #[arg(long)]
    token_number: Option<String>,

    /// Ask the backend for an unused token number
    #[arg(long, conflicts_with = "token_number")]
    suggest_token: bool,

    /// Vehicle image: one shared by all plates, or one per plate in order
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// How the owner is verified: otp, image, manual
    #[arg(long, default_value = "otp")]
    method: VerificationMethod,

    /// Register even if the token number is already in use
    #[arg(long)]
    allow_duplicate: bool,
}

fn api_client(args: &Args) -> Result<ParkingApiClient, ClientError> {
    let mut config: ClientConfig =
        ClientConfig::new(&args.api_url).with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(token) = &args.token {
        config = config.with_bearer_token(token);
    }
    ParkingApiClient::new(config)
}

fn storage_client(args: &Args) -> Result<HttpObjectStorage, ClientError> {
    let mut config: StorageConfig =
        StorageConfig::new(&args.storage_url).with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(public_url) = &args.storage_public_url {
        config = config.with_public_url(public_url);
    }
    if let Some(token) = &args.storage_token {
        config = config.with_token(token);
    }
    HttpObjectStorage::new(config)
}

const fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List(_) => "list",
        Command::Stats => "stats",
        Command::Discharge(_) => "discharge",
        Command::Register(_) => "register",
    }
}

async fn run(args: Args) -> commands::CommandResult {
    let api: ParkingApiClient = api_client(&args)?;
    match &args.command {
        Command::List(list) => commands::list(&api, list).await,
        Command::Stats => commands::stats(&api).await,
        Command::Discharge(discharge) => {
            let storage: HttpObjectStorage = storage_client(&args)?;
            commands::discharge(api, storage, discharge, &mut stdin_prompt()).await
        }
        Command::Register(register) => {
            let storage: HttpObjectStorage = storage_client(&args)?;
            commands::register(api, storage, register, &mut stdin_prompt()).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command: &str = command_name(&args.command);
    info!(command, api_url = %args.api_url, "Starting parkdesk");

    run(args)
        .await
        .inspect_err(|err| error!(command, error = %err, "Command failed"))
}
