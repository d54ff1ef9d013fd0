// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filtering, ordering, and display helpers for vehicle lists.
//!
//! ## Invariants
//!
//! - Date filters are calendar dates (`YYYY-MM-DD`) interpreted by the backend
//!   in the declared timezone; the range may be open on either side
//! - A closed range never ends before it starts
//! - Timestamps are displayed as wall-clock times in the declared timezone

use crate::error::DomainError;
use crate::types::{VehicleRecord, VehicleStatus};
use chrono::TimeZone;
use chrono_tz::Tz;
use std::str::FromStr;
use time::OffsetDateTime;
use time::macros::format_description;

/// Order in which a vehicle list is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleSort {
    /// Most recently registered first.
    #[default]
    Newest,
    /// Least recently registered first.
    Oldest,
    /// Parked vehicles only, longest stay first.
    LongestParked,
}

impl FromStr for VehicleSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "longest_parked" => Ok(Self::LongestParked),
            _ => Err(DomainError::InvalidSort(s.to_string())),
        }
    }
}

/// Sorts vehicles in place.
///
/// `LongestParked` also drops every vehicle that is no longer parked.
pub fn sort_vehicles(vehicles: &mut Vec<VehicleRecord>, sort: VehicleSort) {
    match sort {
        VehicleSort::Newest => {
            vehicles.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        }
        VehicleSort::Oldest => {
            vehicles.sort_by(|a, b| a.registered_at.cmp(&b.registered_at));
        }
        VehicleSort::LongestParked => {
            vehicles.retain(VehicleRecord::is_parked);
            vehicles.sort_by(|a, b| a.registered_at.cmp(&b.registered_at));
        }
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Renders how long a vehicle has been parked.
///
/// Produces `"2 days 3 hours"` once at least one full day has passed and
/// `"5 hours"` before that. A registration time in the future counts as zero.
#[must_use]
pub fn parked_duration(registered_at: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed: time::Duration = (now - registered_at).max(time::Duration::ZERO);
    let days: i64 = elapsed.whole_days();
    let hours: i64 = elapsed.whole_hours() % 24;

    if days > 0 {
        format!("{} {}", plural(days, "day"), plural(hours, "hour"))
    } else {
        plural(hours, "hour")
    }
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Parses a `YYYY-MM-DD` date filter.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the input is not a valid date.
pub fn parse_filter_date(input: &str) -> Result<time::Date, DomainError> {
    time::Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::InvalidDate {
            input: input.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats an instant as wall-clock time in the given timezone.
///
/// Output looks like `March 02, 2026, 8:05 AM`.
///
/// # Errors
///
/// Returns `DomainError::TimestampOutOfRange` if the instant cannot be
/// represented.
pub fn format_in_timezone(instant: OffsetDateTime, tz: Tz) -> Result<String, DomainError> {
    let seconds: i64 = instant.unix_timestamp();
    let utc = chrono::Utc
        .timestamp_opt(seconds, instant.nanosecond())
        .single()
        .ok_or(DomainError::TimestampOutOfRange(seconds))?;

    Ok(utc
        .with_timezone(&tz)
        .format("%B %d, %Y, %-I:%M %p")
        .to_string())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Filters applied when listing vehicles.
///
/// Blank text filters are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilter {
    status: Option<VehicleStatus>,
    vehicle_number: Option<String>,
    mobile_number: Option<String>,
    from_date: Option<time::Date>,
    to_date: Option<time::Date>,
    timezone: Option<Tz>,
}

impl ListFilter {
    /// Creates an empty filter matching every vehicle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter matching only parked vehicles.
    ///
    /// This is the filter used when choosing vehicles to discharge.
    #[must_use]
    pub fn parked() -> Self {
        Self::new().with_status(Some(VehicleStatus::Parked))
    }

    /// Restricts the filter to one status.
    #[must_use]
    pub const fn with_status(mut self, status: Option<VehicleStatus>) -> Self {
        self.status = status;
        self
    }

    /// Restricts the filter to plates matching `plate`.
    #[must_use]
    pub fn with_vehicle_number(mut self, plate: &str) -> Self {
        self.vehicle_number = non_blank(plate);
        self
    }

    /// Restricts the filter to one mobile number.
    #[must_use]
    pub fn with_mobile_number(mut self, mobile: &str) -> Self {
        self.mobile_number = non_blank(mobile);
        self
    }

    /// Restricts the filter to a registration date range.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or the range is reversed.
    pub fn with_dates(mut self, from: Option<&str>, to: Option<&str>) -> Result<Self, DomainError> {
        let from_date: Option<time::Date> = from
            .and_then(non_blank)
            .map(|d| parse_filter_date(&d))
            .transpose()?;
        let to_date: Option<time::Date> = to
            .and_then(non_blank)
            .map(|d| parse_filter_date(&d))
            .transpose()?;

        if let (Some(from), Some(to)) = (from_date, to_date)
            && from > to
        {
            return Err(DomainError::InvalidDateRange { from, to });
        }

        self.from_date = from_date;
        self.to_date = to_date;
        Ok(self)
    }

    /// Sets the timezone the date range is interpreted in.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is unknown.
    pub fn with_timezone(mut self, name: &str) -> Result<Self, DomainError> {
        self.timezone = Some(parse_timezone(name)?);
        Ok(self)
    }

    /// Returns the status filter.
    #[must_use]
    pub const fn status(&self) -> Option<VehicleStatus> {
        self.status
    }

    /// Returns the declared timezone.
    #[must_use]
    pub const fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// Converts the filter into query parameters, omitting absent values.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(plate) = &self.vehicle_number {
            params.push(("vehicle_number", plate.clone()));
        }
        if let Some(mobile) = &self.mobile_number {
            params.push(("mobile_number", mobile.clone()));
        }
        if let Some(from) = self.from_date {
            params.push(("from_date", from.to_string()));
        }
        if let Some(to) = self.to_date {
            params.push(("to_date", to.to_string()));
        }
        if let Some(tz) = self.timezone {
            params.push(("timezone", tz.name().to_string()));
        }
        params
    }
}
