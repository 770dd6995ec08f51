use crate::error::Result;
use crate::models::{ColumnRef, DailyVariable, Frame, TimeSeries};
use crate::processors::validator;

/// Cloud cover in tenths from daily sunshine hours.
pub fn cloud_fraction(sunshine_hours: f64) -> f64 {
    10.0 * (1.0 - sunshine_hours / 24.0).powf(0.6)
}

/// Daily cloud cover series (DCLO) from a sunshine-duration column.
pub fn cloud_from_sunshine(frame: &Frame, column: &ColumnRef) -> Result<TimeSeries> {
    let sunshine = validator::extract(frame, column)?;
    Ok(sunshine.map(DailyVariable::Dclo.code(), cloud_fraction))
}
