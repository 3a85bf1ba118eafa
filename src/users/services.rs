use chrono::{DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use time::{OffsetDateTime, UtcOffset};

use crate::{error::AppError, users::dto::CreateUserRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration input after validation. `email` is trimmed and lower-cased.
#[derive(Debug, Clone)]
pub struct ValidatedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    let value = value.ok_or_else(|| AppError::Validation(format!("\"{field}\" is required")))?;
    if value.is_empty() {
        return Err(AppError::Validation(format!(
            "\"{field}\" is not allowed to be empty"
        )));
    }
    Ok(value)
}

fn required_number(
    field: &str,
    value: Option<crate::users::dto::Coordinate>,
) -> Result<f64, AppError> {
    value
        .ok_or_else(|| AppError::Validation(format!("\"{field}\" is required")))?
        .as_f64()
        .ok_or_else(|| AppError::Validation(format!("\"{field}\" must be a number")))
}

/// Checks fields in declaration order and reports the first violation.
pub fn validate_new_user(req: CreateUserRequest) -> Result<ValidatedUser, AppError> {
    let name = required_text("name", req.name)?;

    let email = required_text("email", req.email)?.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation("\"email\" must be a valid email".into()));
    }

    let password = required_text("password", req.password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "\"password\" length must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    let address = required_text("address", req.address)?;
    let latitude = required_number("latitude", req.latitude)?;
    let longitude = required_number("longitude", req.longitude)?;

    Ok(ValidatedUser {
        name,
        email,
        password,
        address,
        latitude,
        longitude,
    })
}

/// Parses a `destination_*` query value; absent, non-numeric and non-finite
/// values are all rejected.
pub fn parse_destination(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses `week_numbers` (e.g. `"0,1,5"`) into day offsets from Sunday.
/// Offsets outside 0..=6 are kept.
pub fn parse_week_numbers(raw: Option<&str>) -> Result<Vec<i64>, AppError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::MissingParameter(
            "week numbers query parameter is required.".into(),
        ));
    }
    raw.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<i64>().map_err(|_| {
                AppError::InvalidParameters(format!("invalid week number {part:?}"))
            })
        })
        .collect()
}

/// One calendar day `[start, end)` between local midnights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub weekday: String,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

/// Windows for the week containing the current instant. With `fixed` set the
/// calendar uses that offset; otherwise the host time zone is consulted on
/// every call so daylight-saving changes are picked up.
pub fn current_week_windows(
    fixed: Option<UtcOffset>,
    offsets: &[i64],
) -> Result<Vec<DayWindow>, AppError> {
    match fixed {
        Some(offset) => {
            let tz = FixedOffset::east_opt(offset.whole_seconds())
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unusable offset {offset}")))?;
            day_windows(&Utc::now().with_timezone(&tz), offsets)
        }
        None => day_windows(&Local::now(), offsets),
    }
}

/// Maps each offset to the day `offset` days after the Sunday that starts the
/// week containing `now`, with midnights resolved in `now`'s time zone.
pub fn day_windows<Tz: TimeZone>(
    now: &DateTime<Tz>,
    offsets: &[i64],
) -> Result<Vec<DayWindow>, AppError> {
    let tz = now.timezone();
    let today = now.date_naive();
    let since_sunday = u64::from(today.weekday().num_days_from_sunday());
    let out_of_range = || AppError::InvalidParameters("week number out of range".into());
    let week_start = today
        .checked_sub_days(Days::new(since_sunday))
        .ok_or_else(out_of_range)?;

    offsets
        .iter()
        .map(|&day| {
            let date = if day >= 0 {
                week_start.checked_add_days(Days::new(day.unsigned_abs()))
            } else {
                week_start.checked_sub_days(Days::new(day.unsigned_abs()))
            }
            .ok_or_else(out_of_range)?;
            let next = date.succ_opt().ok_or_else(out_of_range)?;
            Ok(DayWindow {
                weekday: date.format("%A").to_string().to_lowercase(),
                start: local_midnight(&tz, date).ok_or_else(out_of_range)?,
                end: local_midnight(&tz, next).ok_or_else(out_of_range)?,
            })
        })
        .collect()
}

/// First instant of `date` in `tz`. When midnight falls in a DST gap the day
/// starts at the first existing hour.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<OffsetDateTime> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let instant = tz
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + chrono::Duration::hours(1)))
                .earliest()
        })?;
    OffsetDateTime::from_unix_timestamp(instant.timestamp()).ok()
}
