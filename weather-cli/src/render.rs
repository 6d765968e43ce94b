//! Human-friendly rendering of forecast results.

use std::io::{self, Write};

use weather_core::ForecastDay;

const EMPTY_FORECAST: &str = "Enter a city to see the forecast";

/// Whole degrees, halves rounded up (-2.5 becomes -2).
fn degrees(temp: f64) -> String {
    format!("{}°C", (temp + 0.5).floor() as i64)
}

fn period_row(out: &mut impl Write, label: &str, temp: f64, daily_max: f64) -> io::Result<()> {
    // Marks the period that reached the daily maximum.
    let marker = if temp == daily_max { " ↑" } else { "" };
    writeln!(out, "  {label:<8} {:>6}{marker}", degrees(temp))
}

pub fn render_day(out: &mut impl Write, day: &ForecastDay) -> io::Result<()> {
    writeln!(out, "{}", day.display_date)?;
    period_row(out, "Morning", day.morning_temp, day.temp_max)?;
    period_row(out, "Day", day.day_temp, day.temp_max)?;
    period_row(out, "Evening", day.evening_temp, day.temp_max)?;
    writeln!(
        out,
        "  Daily min: {}   Daily max: {}",
        degrees(day.temp_min),
        degrees(day.temp_max)
    )
}

pub fn render_forecast(out: &mut impl Write, days: &[ForecastDay]) -> io::Result<()> {
    if days.is_empty() {
        return writeln!(out, "{EMPTY_FORECAST}");
    }

    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        render_day(out, day)?;
    }

    Ok(())
}
