use crate::error::{ProcessingError, Result};

/// Convert `DD:MM:SS` to decimal degrees. A leading minus makes the whole
/// value negative.
///
/// # Examples
/// ```
/// use hspf_met::utils::dms_to_decimal;
///
/// let decimal = dms_to_decimal("19:44:00").unwrap();
/// assert!((decimal - 19.733333).abs() < 0.000001);
/// ```
pub fn dms_to_decimal(dms: &str) -> Result<f64> {
    let parts: Vec<&str> = dms.split(':').map(str::trim).collect();

    if parts.len() != 3 {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Invalid DMS format: '{}'. Expected format: 'DD:MM:SS'",
            dms
        )));
    }

    let is_negative = dms.trim_start().starts_with('-');
    let field = |value: &str, what: &str| {
        value.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid {} value: '{}'", what, value))
        })
    };

    let degrees = field(parts[0], "degrees")?;
    let minutes = field(parts[1], "minutes")?;
    let seconds = field(parts[2], "seconds")?;

    for (value, what) in [(minutes, "Minutes"), (seconds, "Seconds")] {
        if !(0.0..60.0).contains(&value) {
            return Err(ProcessingError::InvalidCoordinate(format!(
                "{} must be between 0 and 60, got: {}",
                what, value
            )));
        }
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    Ok(if is_negative {
        -decimal_value
    } else {
        decimal_value
    })
}

/// Parse a latitude written as decimal degrees or `DD:MM:SS`, optionally
/// followed by a hemisphere letter (`N` or `S`).
pub fn parse_latitude(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();
    let (body, south) = match trimmed.chars().last() {
        Some('N') | Some('n') => (&trimmed[..trimmed.len() - 1], false),
        Some('S') | Some('s') => (&trimmed[..trimmed.len() - 1], true),
        _ => (trimmed, false),
    };
    let body = body.trim();

    let value = if body.contains(':') {
        dms_to_decimal(body)?
    } else {
        body.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
        })?
    };

    if !(-90.0..=90.0).contains(&value) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            value
        )));
    }

    Ok(if south { -value.abs() } else { value })
}
