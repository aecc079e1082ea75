//! Parsing of human readable durations such as `24h` or `7d`

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("duration is empty")]
    Empty,

    #[error("invalid duration amount in '{0}'")]
    InvalidAmount(String),

    #[error("unknown duration unit '{unit}' in '{input}'")]
    UnknownUnit { input: String, unit: String },
}

/// Parse a duration written as a number with an optional unit suffix.
///
/// Supported units are `ms`, `s`, `m`, `h`, `d` and `w`. A bare number is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (amount, unit) = trimmed.split_at(split);

    let amount: u64 = amount
        .parse()
        .map_err(|_| DurationParseError::InvalidAmount(trimmed.to_string()))?;

    let seconds_per_unit = match unit.trim() {
        "ms" => return Ok(Duration::from_millis(amount)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86_400,
        "w" => 604_800,
        other => {
            return Err(DurationParseError::UnknownUnit {
                input: trimmed.to_string(),
                unit: other.to_string(),
            })
        }
    };

    amount
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| DurationParseError::InvalidAmount(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_duration("24h"), Ok(Duration::from_secs(86_400)));
        assert_eq!(parse_duration("7d"), Ok(Duration::from_secs(604_800)));
        assert_eq!(parse_duration("15m"), Ok(Duration::from_secs(900)));
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("1500ms"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration(" 3600 "), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(parse_duration(""), Err(DurationParseError::Empty));
        assert!(matches!(parse_duration("h"), Err(DurationParseError::InvalidAmount(_))));
        assert!(matches!(
            parse_duration("5y"),
            Err(DurationParseError::UnknownUnit { ref unit, .. }) if unit == "y"
        ));
    }
}
