use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ColumnRef, Frame, TimeSeries};
use crate::processors::validator;
use crate::utils::constants::{
    HOURS_PER_DAY, METRES_PER_SECOND_TO_MPH, MILLIMETRES_TO_INCHES, MJ_PER_M2_TO_LANGLEY,
};

/// Element-wise unit conversions. `NaN` stays `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitConversion {
    CelsiusToFahrenheit,
    MjPerM2ToLangley,
    MetresPerSecondToMph,
    /// Daily travel (miles/day) from a mean speed (mph), negatives clipped.
    WindTravel,
    MillimetresToInches,
    Scale(f64),
}

impl UnitConversion {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            UnitConversion::CelsiusToFahrenheit => x * 9.0 / 5.0 + 32.0,
            UnitConversion::MjPerM2ToLangley => x * MJ_PER_M2_TO_LANGLEY,
            UnitConversion::MetresPerSecondToMph => x * METRES_PER_SECOND_TO_MPH,
            UnitConversion::WindTravel => {
                let speed = if x < 0.0 { 0.0 } else { x };
                speed * HOURS_PER_DAY as f64
            }
            UnitConversion::MillimetresToInches => x * MILLIMETRES_TO_INCHES,
            UnitConversion::Scale(factor) => x * factor,
        }
    }

    pub fn convert(&self, series: &TimeSeries) -> TimeSeries {
        series.map(series.name(), |x| self.apply(x))
    }
}

/// Validate and convert one frame column. The output keeps the column name.
pub fn convert_column(frame: &Frame, column: &ColumnRef, conversion: UnitConversion) -> Result<TimeSeries> {
    let series = validator::extract(frame, column)?;
    Ok(conversion.convert(&series))
}

/// Apply a chain of conversions in order, e.g. a raw-unit scale then a
/// physical conversion.
pub fn convert_chain(
    frame: &Frame,
    column: &ColumnRef,
    conversions: &[UnitConversion],
) -> Result<TimeSeries> {
    let series = validator::extract(frame, column)?;
    Ok(conversions
        .iter()
        .fold(series, |acc, conversion| conversion.convert(&acc)))
}

pub fn celsius_to_fahrenheit(frame: &Frame, column: &ColumnRef) -> Result<TimeSeries> {
    convert_column(frame, column, UnitConversion::CelsiusToFahrenheit)
}

pub fn mj_to_langley(frame: &Frame, column: &ColumnRef) -> Result<TimeSeries> {
    convert_column(frame, column, UnitConversion::MjPerM2ToLangley)
}

pub fn mps_to_mph(frame: &Frame, column: &ColumnRef) -> Result<TimeSeries> {
    convert_column(frame, column, UnitConversion::MetresPerSecondToMph)
}

pub fn wind_travel(frame: &Frame, column: &ColumnRef) -> Result<TimeSeries> {
    convert_column(frame, column, UnitConversion::WindTravel)
}
