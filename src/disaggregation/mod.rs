//! Daily to hourly disaggregation models. Every model validates its daily
//! input and returns an hourly series covering `[first day, last day + 1)`.

pub mod constant;
pub mod precipitation;
pub mod solar;
pub mod temperature;
pub mod wind;

pub use constant::{carry_forward, disaggregate_cloud_cover, disaggregate_dewpoint};
pub use precipitation::{
    bucket_index, cascade_day, disaggregate_precipitation, distribute_equal,
    distribute_triangular, reconcile, CascadeOutcome, DayCascade, PrecipitationMethod,
};
pub use solar::{disaggregate_pet, disaggregate_solar};
pub use temperature::disaggregate_temperature;
pub use wind::disaggregate_wind;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::models::TimeSeries;
use crate::processors::validator::require_daily;

/// Expand a validated daily series to hours, computing each hour from its
/// timestamp and the value of its day.
pub(crate) fn expand_hourly(
    daily: &TimeSeries,
    name: &str,
    f: impl Fn(NaiveDateTime, f64) -> f64,
) -> Result<TimeSeries> {
    require_daily(daily)?;
    let hourly = daily.resample_hourly_ffill();
    let values = hourly.iter().map(|(t, v)| f(t, v)).collect();
    hourly.with_values(name, values)
}
