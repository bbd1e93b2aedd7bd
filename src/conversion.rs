//! Sexagesimal text for angles: `"HH:MM:SS.ss"` hours, `"±DD:MM:SS.s"` degrees.
//!
//! Fields may be separated by colons or whitespace, and trailing fields may be omitted
//! (`"12 30"` is 12h30m). Parsed angles are returned in radians.

use crate::constants::{Degree, Radian, DPI, RADEG, RADH};
use crate::skytime_errors::SkytimeError;

/// Parse `[±]A[:B[:C]]` into `±(A + B/60 + C/3600)`.
///
/// Arguments
/// ---------
/// * `text`: the sexagesimal string.
///
/// Returns
/// -------
/// * `Option<f64>`: the value in the unit of the first field, `None` if the input is malformed
///   or a minute/second field is not in `[0, 60)`.
fn parse_sexagesimal(text: &str) -> Option<f64> {
    let text = text.trim();
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };

    let parts: Vec<&str> = body
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut value = 0.0;
    let mut scale = 1.0;
    for (i, part) in parts.iter().enumerate() {
        // a sign is only allowed in front of the whole value
        if part.starts_with(['-', '+']) {
            return None;
        }
        let field: f64 = part.parse().ok()?;
        if !field.is_finite() || (i > 0 && !(0.0..60.0).contains(&field)) {
            return None;
        }
        value += field / scale;
        scale *= 60.0;
    }
    Some(sign * value)
}

fn invalid(kind: &str, text: &str) -> SkytimeError {
    SkytimeError::InvalidArgument(format!("cannot parse \"{text}\" as {kind}"))
}

/// Parse hours of right ascension, `HH:MM:SS.ss`, into radians in `[0, 2π)`.
pub fn parse_hours(text: &str) -> Result<Radian, SkytimeError> {
    let hours = parse_sexagesimal(text).ok_or_else(|| invalid("hours", text))?;
    if !(0.0..24.0).contains(&hours) {
        return Err(invalid("hours", text));
    }
    Ok(hours * RADH)
}

/// Parse a latitude or declination, `±DD:MM:SS.s`, into radians in `[-π/2, π/2]`.
pub fn parse_deg_lat(text: &str) -> Result<Radian, SkytimeError> {
    let degrees = parse_sexagesimal(text).ok_or_else(|| invalid("a latitude", text))?;
    if degrees.abs() > 90.0 {
        return Err(invalid("a latitude", text));
    }
    Ok(degrees * RADEG)
}

/// Parse a longitude, `±DDD:MM:SS.s`, into radians in `(-π, π]`.
pub fn parse_deg_lon(text: &str) -> Result<Radian, SkytimeError> {
    let degrees = parse_sexagesimal(text).ok_or_else(|| invalid("a longitude", text))?;
    if degrees.abs() > 360.0 {
        return Err(invalid("a longitude", text));
    }
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    let wrapped = if wrapped == -180.0 { 180.0 } else { wrapped };
    Ok(wrapped * RADEG)
}

/// Format a non-negative value as `AA:BB:CC.c…` with `precision` decimals on the last
/// field, carrying the rounding up through the fields.
fn format_sexagesimal(value: f64, width: usize, precision: usize) -> String {
    let scale = 10f64.powi(precision as i32);
    let ticks = (value * 3600.0 * scale).round() as u64;
    let per_minute = 60 * scale as u64;
    let per_unit = 60 * per_minute;

    let units = ticks / per_unit;
    let minutes = (ticks % per_unit) / per_minute;
    let seconds = (ticks % per_minute) as f64 / scale;

    let seconds_width = if precision > 0 { precision + 3 } else { 2 };
    format!("{units:0width$}:{minutes:02}:{seconds:0seconds_width$.precision$}")
}

/// Right ascension in radians as `HH:MM:SS.sss` (three decimals).
pub fn format_hours(angle: Radian) -> String {
    let hours = angle.rem_euclid(DPI) / RADH;
    let text = format_sexagesimal(hours, 2, 3);
    // 23:59:59.9996 rounds up to a full day
    if text.starts_with("24") {
        format_sexagesimal(0.0, 2, 3)
    } else {
        text
    }
}

fn format_signed_degrees(degrees: Degree, width: usize, precision: usize) -> String {
    let sign = if degrees < 0.0 { '-' } else { '+' };
    format!("{sign}{}", format_sexagesimal(degrees.abs(), width, precision))
}

/// Latitude or declination in radians as `±DD:MM:SS.ss` (two decimals).
pub fn format_deg_lat(angle: Radian) -> String {
    format_signed_degrees(angle / RADEG, 2, 2)
}

/// Longitude in radians as `±DDD:MM:SS.ss`, wrapped into `(-180°, 180°]`.
pub fn format_deg_lon(angle: Radian) -> String {
    let degrees = (angle / RADEG + 180.0).rem_euclid(360.0) - 180.0;
    let degrees = if degrees == -180.0 { 180.0 } else { degrees };
    format_signed_degrees(degrees, 3, 2)
}
