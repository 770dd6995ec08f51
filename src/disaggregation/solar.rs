use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{ProcessingError, Result};
use crate::models::series::hour_of;
use crate::models::station::check_latitude;
use crate::models::{DailyVariable, HourlyVariable, TimeSeries};
use crate::utils::constants::MAX_PLAUSIBLE_HOURLY_PET;
use crate::utils::solar_geometry::{approximate_julian_day, ordinal_julian_day, SolarDay};

use super::expand_hourly;

/// Hourly solar radiation (SOLR) from daily totals.
///
/// Uses the 30.5-day Julian approximation and the clock hour, then moves
/// every value one step earlier within its day-of-month group, with the
/// last member of each group set to 0.
// NOTE: disaggregate_pet uses hour + 1 and no shift. Both conventions are
// kept as found pending review by a hydrologist.
pub fn disaggregate_solar(daily: &TimeSeries, latitude: f64) -> Result<TimeSeries> {
    check_latitude(latitude)?;

    let hourly = expand_hourly(daily, HourlyVariable::Solr.code(), |t, value| {
        let solar = SolarDay::new(latitude, approximate_julian_day(t.date()));
        solar.trapezoid_fraction(hour_of(&t) as f64) * value
    })?;

    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (pos, t) in hourly.index().iter().enumerate() {
        groups.entry(t.day()).or_default().push(pos);
    }

    let source = hourly.values();
    let mut shifted = vec![0.0; source.len()];
    for positions in groups.values() {
        for pair in positions.windows(2) {
            shifted[pair[0]] = source[pair[1]];
        }
    }

    hourly.with_values(HourlyVariable::Solr.code(), shifted)
}

/// Hourly PET from daily DEVT (to PEVT) or DEVP (to EVAP).
///
/// Uses the true day of year and hour + 1, with no shift. Values above 40
/// are logged as implausible and kept.
pub fn disaggregate_pet(daily: &TimeSeries, latitude: f64) -> Result<TimeSeries> {
    check_latitude(latitude)?;

    let output = match daily.name().parse::<DailyVariable>() {
        Ok(DailyVariable::Devt) => HourlyVariable::Pevt,
        Ok(DailyVariable::Devp) => HourlyVariable::Evap,
        _ => {
            return Err(ProcessingError::UnsupportedVariable {
                found: daily.name().to_string(),
                expected: "DEVT or DEVP".to_string(),
            })
        }
    };

    expand_hourly(daily, output.code(), |t, value| {
        let solar = SolarDay::new(latitude, ordinal_julian_day(t.date()));
        let hourly = solar.trapezoid_fraction(hour_of(&t) as f64 + 1.0) * value;
        if hourly > MAX_PLAUSIBLE_HOURLY_PET {
            warn!("Bad hourly {} value {:.3} at {}", output, hourly, t);
        }
        hourly
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn daily(name: &str, month: u32, day: u32, values: Vec<f64>) -> TimeSeries {
        TimeSeries::daily(name, NaiveDate::from_ymd_opt(2023, month, day).unwrap(), values)
    }

    #[test]
    fn test_solar_shape() {
        let dsol = daily("DSOL", 6, 10, vec![500.0, 400.0]);
        let solr = disaggregate_solar(&dsol, 30.0).unwrap();
        let v = solr.values();

        assert_eq!(solr.name(), "SOLR");
        assert_eq!(solr.len(), 48);
        assert!(v.iter().all(|x| *x >= 0.0));
        assert_eq!(v[2], 0.0);
        assert!(v[12] > v[5] && v[5] > 0.0);
        // Each day-of-month group holds one day here, so its last hour is 0.
        assert_eq!(v[23], 0.0);
        assert_eq!(v[47], 0.0);

        let day_total: f64 = v[..24].iter().sum();
        assert!(day_total > 0.9 * 500.0 && day_total < 1.05 * 500.0, "{}", day_total);
    }

    #[test]
    fn test_solar_shift_matches_next_hour() {
        let dsol = daily("DSOL", 3, 5, vec![300.0]);
        let solr = disaggregate_solar(&dsol, 20.0).unwrap();
        let day = SolarDay::new(20.0, approximate_julian_day(NaiveDate::from_ymd_opt(2023, 3, 5).unwrap()));
        for h in 0..23 {
            assert_abs_diff_eq!(
                solr.values()[h],
                day.trapezoid_fraction((h + 1) as f64) * 300.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_pet_names_and_rejection() {
        let devt = daily("DEVT", 7, 1, vec![0.2]);
        assert_eq!(disaggregate_pet(&devt, 19.7).unwrap().name(), "PEVT");

        let devp = daily("DEVP", 7, 1, vec![0.3]);
        let evap = disaggregate_pet(&devp, 19.7).unwrap();
        assert_eq!(evap.name(), "EVAP");
        assert_abs_diff_eq!(evap.values().iter().sum::<f64>(), 0.3, epsilon = 0.03);

        let dsol = daily("DSOL", 7, 1, vec![0.3]);
        assert!(matches!(
            disaggregate_pet(&dsol, 19.7),
            Err(ProcessingError::UnsupportedVariable { .. })
        ));
    }

    #[test]
    fn test_latitude_bounds() {
        let devt = daily("DEVT", 1, 1, vec![0.1]);
        assert!(disaggregate_pet(&devt, 66.5).is_ok());
        assert!(disaggregate_pet(&devt, 66.6).is_err());
        assert!(disaggregate_pet(&devt, -66.6).is_err());

        let dsol = daily("DSOL", 1, 1, vec![100.0]);
        assert!(disaggregate_solar(&dsol, 66.5).is_ok());
        assert!(disaggregate_solar(&dsol, 66.6).is_err());
        assert!(disaggregate_solar(&dsol, -66.6).is_err());
    }
}
