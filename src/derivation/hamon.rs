use chrono::Datelike;

use crate::error::Result;
use crate::models::series::{clip_lower, ensure_aligned};
use crate::models::station::check_latitude;
use crate::models::{DailyVariable, TimeSeries};
use crate::processors::validator::require_daily;
use crate::utils::solar_geometry::{approximate_julian_day, SolarDay};
use crate::utils::tables::HAMON_COEFFICIENTS;

/// Hamon potential evapotranspiration from daily temperature extremes.
#[derive(Debug, Clone, PartialEq)]
pub struct HamonModel {
    coefficients: [f64; 12],
    fahrenheit: bool,
}

impl Default for HamonModel {
    fn default() -> Self {
        Self {
            coefficients: HAMON_COEFFICIENTS,
            fahrenheit: true,
        }
    }
}

impl HamonModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monthly coefficients, January first.
    pub fn with_coefficients(mut self, coefficients: [f64; 12]) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Whether the temperature inputs are in °F (default) or °C.
    pub fn with_fahrenheit(mut self, fahrenheit: bool) -> Self {
        self.fahrenheit = fahrenheit;
        self
    }

    /// Daily PET (DEVT) in inches.
    pub fn compute(&self, tmin: &TimeSeries, tmax: &TimeSeries, latitude: f64) -> Result<TimeSeries> {
        check_latitude(latitude)?;
        require_daily(tmin)?;
        require_daily(tmax)?;
        ensure_aligned(tmin, tmax)?;

        let values = tmin
            .iter()
            .zip(tmax.values())
            .map(|((t, lo), &hi)| {
                let date = t.date();
                let solar = SolarDay::new(latitude, approximate_julian_day(date));
                let dyl = (solar.sunset() - solar.sunrise) / 12.0;

                let mut mean = (lo + hi) / 2.0;
                if self.fahrenheit {
                    mean = (mean - 32.0) * (5.0 / 9.0);
                }
                let vpsat = 6.108 * (17.26939 * mean / (mean + 237.3)).exp();
                let vdsat = 216.7 * vpsat / (mean + 273.3);

                let coefficient = self.coefficients[date.month0() as usize];
                clip_lower(coefficient * dyl * dyl * vdsat, 0.0)
            })
            .collect();

        tmin.with_values(DailyVariable::Devt.code(), values)
    }
}

/// Hamon PET with optional monthly coefficients.
pub fn hamon_pet(
    tmin: &TimeSeries,
    tmax: &TimeSeries,
    fahrenheit: bool,
    latitude: f64,
    coefficients: Option<[f64; 12]>,
) -> Result<TimeSeries> {
    let mut model = HamonModel::new().with_fahrenheit(fahrenheit);
    if let Some(coefficients) = coefficients {
        model = model.with_coefficients(coefficients);
    }
    model.compute(tmin, tmax, latitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn series(name: &str, month: u32, values: Vec<f64>) -> TimeSeries {
        TimeSeries::daily(name, NaiveDate::from_ymd_opt(2023, month, 1).unwrap(), values)
    }

    #[test]
    fn test_summer_pet_is_plausible() {
        let tmin = series("TMIN", 7, vec![68.0, 70.0]);
        let tmax = series("TMAX", 7, vec![90.0, 92.0]);

        let devt = hamon_pet(&tmin, &tmax, true, 40.0, None).unwrap();

        assert_eq!(devt.name(), "DEVT");
        assert_eq!(devt.len(), 2);
        // Roughly 0.2 in/day for a hot mid-latitude July day
        assert!(devt.values().iter().all(|&v| v > 0.15 && v < 0.35));
    }

    #[test]
    fn test_celsius_matches_fahrenheit() {
        let f = hamon_pet(
            &series("TMIN", 5, vec![50.0]),
            &series("TMAX", 5, vec![77.0]),
            true,
            35.0,
            None,
        )
        .unwrap();
        let c = hamon_pet(
            &series("TMIN", 5, vec![10.0]),
            &series("TMAX", 5, vec![25.0]),
            false,
            35.0,
            None,
        )
        .unwrap();
        assert_abs_diff_eq!(f.values()[0], c.values()[0], epsilon = 1e-12);
    }

    #[test]
    fn test_coefficients_scale_output() {
        let tmin = series("TMIN", 3, vec![40.0]);
        let tmax = series("TMAX", 3, vec![60.0]);
        let base = hamon_pet(&tmin, &tmax, true, 30.0, None).unwrap();
        let doubled = hamon_pet(&tmin, &tmax, true, 30.0, Some([0.011; 12])).unwrap();
        assert_abs_diff_eq!(doubled.values()[0], 2.0 * base.values()[0], epsilon = 1e-12);
    }

    #[test]
    fn test_latitude_bounds() {
        let tmin = series("TMIN", 1, vec![20.0]);
        let tmax = series("TMAX", 1, vec![40.0]);
        assert!(hamon_pet(&tmin, &tmax, true, 66.5, None).is_ok());
        assert!(matches!(
            hamon_pet(&tmin, &tmax, true, 66.6, None),
            Err(ProcessingError::LatitudeOutOfRange { .. })
        ));
        assert!(hamon_pet(&tmin, &tmax, true, -66.6, None).is_err());
    }
}
