// src/task/duration.rs

//! Elapsed-time expressions such as `"2h30m"`, `"45m"` or `"1.5h"`.
//!
//! The accepted grammar is one or more `<number><unit>` groups where the
//! number may carry a decimal fraction and the unit is one of `ns`, `us`
//! (`µs`), `ms`, `s`, `m`, `h`. The bare literal `"0"` is also accepted.

use std::time::Duration;

use crate::errors::{Result, TonightError};

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * 60;

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(SECONDS_PER_MINUTE * NANOS_PER_SECOND),
        "h" => Some(SECONDS_PER_HOUR * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Parse an elapsed-time expression.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    if s.is_empty() {
        return Err(TonightError::InvalidDuration(
            "empty duration string".to_string(),
        ));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let invalid = || TonightError::InvalidDuration(format!("'{input}' is not a valid duration"));

    let mut total: u64 = 0;
    let mut rest = s;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| {
                TonightError::InvalidDuration(format!("'{input}' is missing a unit suffix"))
            })?;
        let (number, tail) = rest.split_at(number_len);

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let scale = unit_nanos(unit).ok_or_else(|| {
            TonightError::InvalidDuration(format!(
                "unknown unit '{unit}' in '{input}'; expected ns, us, ms, s, m or h"
            ))
        })?;

        let (whole, fraction) = match number.split_once('.') {
            Some((w, f)) => (w, f),
            None => (number, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.contains('.') {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(invalid)?;

        if !fraction.is_empty() {
            let fraction: f64 = format!("0.{fraction}").parse().map_err(|_| invalid())?;
            nanos = nanos
                .checked_add((fraction * scale as f64).round() as u64)
                .ok_or_else(invalid)?;
        }

        total = total.checked_add(nanos).ok_or_else(invalid)?;
        rest = tail;
    }

    Ok(Duration::from_nanos(total))
}

/// Canonical textual form: whole hours, minutes and seconds, e.g. `"2h30m"`.
///
/// Sub-second remainders are dropped; a zero duration formats as `""`.
pub fn format_duration(d: Duration) -> String {
    let mut secs = d.as_secs();
    let mut out = String::new();

    let hours = secs / SECONDS_PER_HOUR;
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    secs -= hours * SECONDS_PER_HOUR;

    let minutes = secs / SECONDS_PER_MINUTE;
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    secs -= minutes * SECONDS_PER_MINUTE;

    if secs > 0 {
        out.push_str(&format!("{secs}s"));
    }

    out
}
