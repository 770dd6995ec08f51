use crate::error::Result;
use crate::models::series::{clip_lower, ensure_aligned};
use crate::models::{DailyVariable, TimeSeries};
use crate::processors::validator::require_daily;
use crate::utils::constants::RADIATION_EPSILON;

/// Daily pan evaporation (inches) after Penman (1948) as arranged by
/// Kohler, Nordenson and Fox (1955).
///
/// Temperatures are °F, wind is miles/day and radiation Ly/day.
pub fn pan_evaporation(tmin: f64, tmax: f64, dewpoint: f64, wind: f64, radiation: f64) -> f64 {
    let air = (tmin + tmax) / 2.0;

    let radiation = if radiation.is_nan() {
        RADIATION_EPSILON
    } else {
        radiation.max(RADIATION_EPSILON)
    };
    let qn_delta = ((air - 212.0) * (0.1024 - 0.01066 * radiation.ln())).exp() - 0.0001;

    let es_minus_ea = 6413252.0 * (-7482.6 / (air + 398.36)).exp()
        - 6413252.0 * (-7482.6 / (dewpoint + 398.36)).exp();
    let es_minus_ea = clip_lower(es_minus_ea, 0.0);

    let ea_gamma = 0.0105 * es_minus_ea.powf(0.88) * (0.37 + 0.0041 * wind);
    let delta = 47987800000.0 * (-7482.6 / (air + 398.36)).exp() / (air + 398.36).powi(2);

    clip_lower((qn_delta + ea_gamma) / (delta + 0.0105), 0.0)
}

/// Daily pan evaporation series (DEVP). All inputs must share one index.
pub fn penman_pan_evaporation(
    tmin: &TimeSeries,
    tmax: &TimeSeries,
    dewpoint: &TimeSeries,
    wind: &TimeSeries,
    solar: &TimeSeries,
) -> Result<TimeSeries> {
    for series in [tmin, tmax, dewpoint, wind, solar] {
        require_daily(series)?;
        ensure_aligned(tmin, series)?;
    }

    let values = (0..tmin.len())
        .map(|i| {
            pan_evaporation(
                tmin.values()[i],
                tmax.values()[i],
                dewpoint.values()[i],
                wind.values()[i],
                solar.values()[i],
            )
        })
        .collect();

    tmin.with_values(DailyVariable::Devp.code(), values)
}
