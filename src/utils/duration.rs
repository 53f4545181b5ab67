//! Go-style duration strings (`90s`, `5m`, `1h30m`).
//!
//! pipectl takes `--timeout` as a Go `time.Duration`, and action inputs are
//! written the same way, so both directions live here.

use anyhow::{bail, Context, Result};
use std::time::Duration;

/// Parse a duration such as `5m`, `1h30m`, `1.5s` or `250ms`.
///
/// A bare integer is taken as seconds.
pub fn parse_go_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    if s.is_empty() {
        bail!("empty duration");
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total_nanos = 0_u64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
        if num_len == 0 {
            bail!("invalid duration {input:?}: expected a number at {rest:?}");
        }
        let value: f64 = rest[..num_len]
            .parse()
            .with_context(|| format!("invalid duration {input:?}"))?;
        rest = &rest[num_len..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "h" => 3_600_000_000_000_u64,
            "m" => 60_000_000_000,
            "s" => 1_000_000_000,
            "ms" => 1_000_000,
            "us" | "µs" => 1_000,
            "ns" => 1,
            "" => bail!("invalid duration {input:?}: missing unit"),
            unit => bail!("invalid duration {input:?}: unknown unit {unit:?}"),
        };
        let part = (value * scale as f64).round();
        if part >= u64::MAX as f64 {
            bail!("invalid duration {input:?}: out of range");
        }
        total_nanos = total_nanos
            .checked_add(part as u64)
            .with_context(|| format!("invalid duration {input:?}: out of range"))?;
        rest = &rest[unit_len..];
    }

    Ok(Duration::from_nanos(total_nanos))
}

/// Format like Go's `Duration.String()`: `5m0s`, `1h0m0s`, `1.5s`, `250ms`.
pub fn format_go_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let nanos = d.subsec_nanos();

    if secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            n if n % 1_000_000 == 0 => format!("{}ms", n / 1_000_000),
            n if n % 1_000 == 0 => format!("{}µs", n / 1_000),
            n => format!("{n}ns"),
        };
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    let fraction = if nanos == 0 {
        String::new()
    } else {
        format!(".{:09}", nanos).trim_end_matches('0').to_string()
    };

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}{fraction}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}{fraction}s")
    } else {
        format!("{seconds}{fraction}s")
    }
}
