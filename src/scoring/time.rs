use anyhow::{bail, Context, Result};

/// Parse a clock string ("m:ss") into seconds.
///
/// Lenient: anything that is not exactly two colon-separated non-negative
/// integers yields 0. Seconds are not bounds-checked, so "1:90" is 150.
pub fn time_string_to_seconds(text: &str) -> u32 {
    parse_clock(text).unwrap_or(0)
}

/// Format seconds as a zero-padded "mm:ss" clock string.
pub fn seconds_to_time_string(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Strict counterpart of [`time_string_to_seconds`], used where a malformed
/// clock string must be reported rather than read as zero.
pub fn parse_clock(text: &str) -> Result<u32> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 2 {
        bail!("Invalid time '{}': expected minutes:seconds", text);
    }

    let minutes: u32 = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Invalid minutes in time '{}'", text))?;
    let seconds: u32 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Invalid seconds in time '{}'", text))?;

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .with_context(|| format!("Time '{}' is too large", text))
}
