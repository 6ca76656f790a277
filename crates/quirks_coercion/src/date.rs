//! Time values and their text forms.
//!
//! A time value is milliseconds since the Unix epoch as an `f64`, NaN for an
//! invalid date. Local-time fields and formatting go through `chrono`'s
//! `Local` zone, so results depend on the host's time zone.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};

use quirks_foundation::{Error, Result};

/// Largest absolute time value a date can hold.
pub const MAX_TIME: f64 = 8.64e15;

/// `TimeClip`: NaN outside the representable range, truncated otherwise.
#[must_use]
pub fn time_clip(time: f64) -> f64 {
    if !time.is_finite() || time.abs() > MAX_TIME {
        return f64::NAN;
    }
    time.trunc() + 0.0
}

/// Current time value.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn now() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// Builds a time value from local calendar fields.
///
/// Fields are `[year, month, day, hours, minutes, seconds, ms]`, month
/// zero-based; missing trailing fields default to `1` for the day and `0`
/// otherwise. Out-of-range fields carry into the next unit, and two-digit
/// years map to 1900-1999.
#[must_use]
pub fn local_time_value(fields: &[f64]) -> f64 {
    if fields.iter().any(|f| !f.is_finite()) {
        return f64::NAN;
    }
    let field = |i: usize, default: f64| fields.get(i).map_or(default, |f| f.trunc());

    let mut year = field(0, f64::NAN);
    if (0.0..=99.0).contains(&year) {
        year += 1900.0;
    }
    let month = field(1, 0.0);
    let year = year + (month / 12.0).floor();
    let month = month.rem_euclid(12.0);

    let millis = (field(2, 1.0) - 1.0) * 86_400_000.0
        + field(3, 0.0) * 3_600_000.0
        + field(4, 0.0) * 60_000.0
        + field(5, 0.0) * 1000.0
        + field(6, 0.0);

    local_from_parts(year, month, millis).map_or(f64::NAN, time_clip)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn local_from_parts(year: f64, month: f64, millis: f64) -> Option<f64> {
    if year.abs() > 400_000.0 || millis.abs() > 2.0 * MAX_TIME {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year as i32, month as u32 + 1, 1)?;
    let naive = first
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)?;
    let local = naive.and_local_timezone(Local).earliest()?;
    Some(local.timestamp_millis() as f64)
}

#[allow(clippy::cast_possible_truncation)]
fn local_datetime(time: f64) -> Option<DateTime<Local>> {
    if time.is_nan() {
        return None;
    }
    Local.timestamp_millis_opt(time as i64).single()
}

/// `Date.prototype.toString`: `Www Mmm DD YYYY HH:MM:SS GMT+HHMM` in local
/// time, or `Invalid Date`.
///
/// The trailing ` (Zone Name)` that engines append is left out on purpose:
/// `chrono` has no portable zone names, so the string ends at the offset.
#[must_use]
pub fn to_date_string(time: f64) -> String {
    local_datetime(time).map_or_else(
        || "Invalid Date".to_string(),
        |dt| dt.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
    )
}

/// `Date.prototype.toISOString`: UTC with millisecond precision.
#[allow(clippy::cast_possible_truncation)]
pub fn to_iso_string(time: f64) -> Result<String> {
    let invalid = || Error::range_error("Invalid time value");
    if time.is_nan() {
        return Err(invalid());
    }
    let dt = Utc
        .timestamp_millis_opt(time as i64)
        .single()
        .ok_or_else(invalid)?;
    Ok(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}
