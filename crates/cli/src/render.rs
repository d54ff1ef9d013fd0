// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text rendering of vehicles, statistics and conflicts.

use chrono_tz::Tz;
use parkdesk::Conflict;
use parkdesk_domain::{
    DashboardStats, DomainError, MobileNumber, PeriodStats, PlateNumber, TokenNumber,
    VehicleRecord, format_in_timezone, parked_duration,
};
use time::OffsetDateTime;

/// Renders one vehicle as a single line.
///
/// # Errors
///
/// Returns an error if a timestamp cannot be shown in `tz`.
pub fn vehicle_line(
    record: &VehicleRecord,
    tz: Tz,
    now: OffsetDateTime,
) -> Result<String, DomainError> {
    let registered: String = format_in_timezone(record.registered_at, tz)?;
    let stay: String = match record.discharged_at {
        Some(discharged_at) => format!("discharged {}", format_in_timezone(discharged_at, tz)?),
        None => format!("parked {}", parked_duration(record.registered_at, now)),
    };
    let token: &str = record.token_number.as_ref().map_or("-", TokenNumber::value);
    let image: &str = if record.registered_image().is_some() {
        "image"
    } else {
        "no image"
    };

    Ok(format!(
        "{:<12} {:<12} {:<11} {:<8} {:<9} {} | {} | {}",
        record.id.value(),
        record.vehicle_number.value(),
        record.mobile_number.value(),
        token,
        record.status.as_str(),
        registered,
        stay,
        image
    ))
}

fn period_line(label: &str, period: &PeriodStats) -> String {
    let pending: String = period
        .pending
        .map_or_else(|| String::from("-"), |pending| pending.to_string());
    format!(
        "{label:<6} registered {:>5}  discharged {:>5}  pending {:>5}",
        period.registered, period.discharged, pending
    )
}

/// Renders dashboard counts, one period per line.
#[must_use]
pub fn stats_lines(stats: &DashboardStats) -> Vec<String> {
    vec![
        period_line("today", &stats.today),
        period_line("week", &stats.week),
        period_line("month", &stats.month),
        period_line("total", &stats.total),
    ]
}

/// Renders a conflict and the records behind it.
#[must_use]
pub fn conflict_lines(conflict: &Conflict) -> Vec<String> {
    let mut lines: Vec<String> = vec![format!("{} ({})", conflict.message, conflict.code)];
    for vehicle in &conflict.conflicting {
        lines.push(format!(
            "  in use by {} / {} (token {})",
            vehicle.vehicle_number.as_ref().map_or("?", PlateNumber::value),
            vehicle.mobile_number.as_ref().map_or("?", MobileNumber::value),
            vehicle.token_number.as_ref().map_or("?", TokenNumber::value),
        ));
    }
    lines
}
