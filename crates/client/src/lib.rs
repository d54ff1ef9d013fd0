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

//! HTTP implementations of the parking workflow collaborators.
//!
//! [`ParkingApiClient`] speaks the parking API's form-encoded protocol and
//! [`HttpObjectStorage`] uploads images to an HTTP object store. Every
//! transport failure is a [`ClientError`], which converts into the
//! operator-facing [`parkdesk::ServiceError`].

mod config;
mod error;
mod parking;
mod storage;
mod wire;

#[cfg(test)]
mod tests;

pub use config::{ClientConfig, DEFAULT_TIMEOUT, StorageConfig};
pub use error::{
    ClientError, GENERIC_ERROR, INVALID_OTP, NETWORK_ERROR, SERVER_ERROR, UPLOAD_ERROR,
};
pub use parking::ParkingApiClient;
pub use storage::{HttpObjectStorage, object_key};
pub use wire::DUPLICATE_TOKEN;
