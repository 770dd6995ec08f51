use crate::error::Result;
use crate::models::series::ensure_aligned;
use crate::models::{ColumnRef, DailyVariable, Frame, TimeSeries};
use crate::processors::validator;
use crate::utils::constants::{
    MAX_RELATIVE_HUMIDITY, MIN_RELATIVE_HUMIDITY, MISSING_RELATIVE_HUMIDITY,
};

const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Magnus-Tetens dewpoint (°C) from air temperature (°C) and relative
/// humidity (%).
pub fn magnus_tetens(temperature: f64, relative_humidity: f64) -> f64 {
    let rh = if relative_humidity.is_nan() {
        MISSING_RELATIVE_HUMIDITY
    } else {
        relative_humidity.clamp(MIN_RELATIVE_HUMIDITY, MAX_RELATIVE_HUMIDITY)
    };
    let gamma = (rh / 100.0).ln() + MAGNUS_A * temperature / (MAGNUS_B + temperature);
    MAGNUS_B * gamma / (MAGNUS_A - gamma)
}

/// Daily dewpoint series (DPTP) from a temperature column and a humidity
/// column. Both tables must share one time index.
pub fn dewpoint_temperature(
    temperature: &Frame,
    temperature_column: &ColumnRef,
    humidity: &Frame,
    humidity_column: &ColumnRef,
) -> Result<TimeSeries> {
    let temp = validator::extract(temperature, temperature_column)?;
    let rh = validator::extract(humidity, humidity_column)?;
    ensure_aligned(&temp, &rh)?;
    temp.zip_with(&rh, DailyVariable::Dptp.code(), magnus_tetens)
}
