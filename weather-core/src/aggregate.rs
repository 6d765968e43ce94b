//! Per-day period summaries derived from the hourly temperature series.
//!
//! Each day is split into fixed local-hour windows; a window's value is the
//! highest temperature sampled inside it, or `0.0` when nothing was sampled.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{ForecastDay, HourlySeries};

pub const MORNING_HOURS: RangeInclusive<u32> = 6..=9;
pub const DAY_HOURS: RangeInclusive<u32> = 12..=15;
pub const EVENING_HOURS: RangeInclusive<u32> = 18..=21;

/// Value used for a period with no samples. Indistinguishable from a real 0°C.
pub const MISSING_PERIOD_TEMP: f64 = 0.0;

const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Error)]
enum PeriodError {
    #[error("invalid date '{0}'")]
    Date(String),
    #[error("invalid timestamp '{0}'")]
    Timestamp(String),
    #[error("no temperature for '{0}'")]
    MissingTemperature(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PeriodTemps {
    morning: f64,
    day: f64,
    evening: f64,
}

impl PeriodTemps {
    const MISSING: Self = Self {
        morning: MISSING_PERIOD_TEMP,
        day: MISSING_PERIOD_TEMP,
        evening: MISSING_PERIOD_TEMP,
    };
}

/// Build one `ForecastDay` from a daily entry and the (optional) hourly series.
///
/// Never fails: a malformed date or timestamp, or a sample of this day with no
/// temperature, makes this day's period fields
/// fall back to `0.0`, while `temp_min`/`temp_max` are always copied through.
pub fn aggregate(
    date: &str,
    temp_min: f64,
    temp_max: f64,
    hourly: Option<&HourlySeries>,
) -> ForecastDay {
    let periods = match hourly {
        None => PeriodTemps::MISSING,
        Some(hourly) => period_temps(date, hourly).unwrap_or_else(|err| {
            tracing::debug!(date, error = %err, "period aggregation fell back to defaults");
            PeriodTemps::MISSING
        }),
    };

    ForecastDay {
        display_date: format_date(date),
        morning_temp: periods.morning,
        day_temp: periods.day,
        evening_temp: periods.evening,
        temp_min,
        temp_max,
    }
}

fn period_temps(date: &str, hourly: &HourlySeries) -> Result<PeriodTemps, PeriodError> {
    let target = parse_date(date).ok_or_else(|| PeriodError::Date(date.to_string()))?;

    let mut morning: Option<f64> = None;
    let mut day: Option<f64> = None;
    let mut evening: Option<f64> = None;

    for (timestamp, temp) in hourly.samples() {
        let sample_date = timestamp
            .get(..10)
            .and_then(parse_date)
            .ok_or_else(|| PeriodError::Timestamp(timestamp.to_string()))?;
        if sample_date != target {
            continue;
        }

        let temp = temp.ok_or_else(|| PeriodError::MissingTemperature(timestamp.to_string()))?;

        let hour = parse_hour(timestamp)
            .ok_or_else(|| PeriodError::Timestamp(timestamp.to_string()))?;

        let slot = if MORNING_HOURS.contains(&hour) {
            &mut morning
        } else if DAY_HOURS.contains(&hour) {
            &mut day
        } else if EVENING_HOURS.contains(&hour) {
            &mut evening
        } else {
            continue;
        };

        *slot = Some(slot.map_or(temp, |current| current.max(temp)));
    }

    Ok(PeriodTemps {
        morning: morning.unwrap_or(MISSING_PERIOD_TEMP),
        day: day.unwrap_or(MISSING_PERIOD_TEMP),
        evening: evening.unwrap_or(MISSING_PERIOD_TEMP),
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, INPUT_DATE_FORMAT).ok()
}

/// Hour component of `YYYY-MM-DDTHH:MM`.
fn parse_hour(timestamp: &str) -> Option<u32> {
    let hour: u32 = timestamp.get(11..13)?.parse().ok()?;
    (hour < 24).then_some(hour)
}

/// Reformat `YYYY-MM-DD` as e.g. "Monday, January 1, 2024".
/// Unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
