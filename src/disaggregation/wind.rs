use crate::error::{ProcessingError, Result};
use crate::models::series::hour_of;
use crate::models::{HourlyVariable, TimeSeries};
use crate::utils::constants::HOURS_PER_DAY;
use crate::utils::tables::WIND_CURVE;

use super::expand_hourly;

/// Hourly wind (WIND) as the daily value times a 24-point diurnal curve.
pub fn disaggregate_wind(daily: &TimeSeries, curve: Option<&[f64]>) -> Result<TimeSeries> {
    let curve = curve.unwrap_or(&WIND_CURVE[..]);
    if curve.len() != HOURS_PER_DAY {
        return Err(ProcessingError::Config(format!(
            "wind diurnal curve needs {} values, got {}",
            HOURS_PER_DAY,
            curve.len()
        )));
    }

    expand_hourly(daily, HourlyVariable::Wind.code(), |t, value| {
        value * curve[hour_of(&t)]
    })
}
