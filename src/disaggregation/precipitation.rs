use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{ProcessingError, Result};
use crate::models::series::hour_of;
use crate::models::{HourlyVariable, TimeSeries};
use crate::processors::validator::require_daily;
use crate::utils::constants::{
    CASCADE_CARRY_HOUR, CASCADE_EPSILON, CASCADE_FALLBACK_HOUR, CASCADE_RESIDUAL_LIMIT,
    CASCADE_ROUNDING, HOURS_PER_DAY,
};
use crate::utils::tables::{SUMS, TRIANG};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationMethod {
    #[default]
    Equal,
    Triangular,
}

impl FromStr for PrecipitationMethod {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(PrecipitationMethod::Equal),
            "triangular" | "triang" => Ok(PrecipitationMethod::Triangular),
            other => Err(ProcessingError::Config(format!(
                "unknown precipitation method '{}', expected 'equal' or 'triangular'",
                other
            ))),
        }
    }
}

impl fmt::Display for PrecipitationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecipitationMethod::Equal => write!(f, "equal"),
            PrecipitationMethod::Triangular => write!(f, "triangular"),
        }
    }
}

/// How a day left the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeOutcome {
    Accepted,
    /// Total above the largest bucket; placed in the last hour.
    TooLarge,
    /// Residual could not be reconciled; placed in the last hour.
    Degenerate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCascade {
    pub hours: [f64; HOURS_PER_DAY],
    pub outcome: CascadeOutcome,
}

impl DayCascade {
    fn zeros() -> Self {
        Self {
            hours: [0.0; HOURS_PER_DAY],
            outcome: CascadeOutcome::Accepted,
        }
    }

    fn last_hour(total: f64, outcome: CascadeOutcome) -> Self {
        let mut hours = [0.0; HOURS_PER_DAY];
        hours[CASCADE_FALLBACK_HOUR] = total;
        Self { hours, outcome }
    }

    pub fn total(&self) -> f64 {
        self.hours.iter().sum()
    }
}

/// Smallest bucket whose upper bound holds `total`.
pub fn bucket_index(total: f64) -> Option<usize> {
    SUMS.iter().position(|&bound| total <= bound)
}

/// Spread one daily total over 24 hours with the triangular shapes.
///
/// Each hour is rounded to 0.001 and the remainder carried to the next
/// hour. A leftover carry goes to hour 11. If the hours then miss the total
/// by more than 0.001 the residual is added to the largest hour.
pub fn cascade_day(total: f64) -> DayCascade {
    if total.is_nan() || total < 0.0 {
        return DayCascade::zeros();
    }

    let Some(bucket) = bucket_index(total) else {
        warn!(
            "Daily total {} exceeds the largest cascade bucket {}; placing it in hour {}",
            total,
            SUMS[SUMS.len() - 1],
            CASCADE_FALLBACK_HOUR
        );
        return DayCascade::last_hour(total, CascadeOutcome::TooLarge);
    };

    let ratio = total / SUMS[bucket];
    let mut hours = [0.0; HOURS_PER_DAY];
    let mut carry = 0.0;
    for (hour, shape) in hours.iter_mut().zip(TRIANG.iter()) {
        let value = ratio * shape[bucket] + carry;
        if value > CASCADE_EPSILON {
            carry = value - (value / CASCADE_ROUNDING).round_ties_even() * CASCADE_ROUNDING;
            *hour = value - carry;
        } else {
            *hour = 0.0;
        }
    }
    if carry > CASCADE_EPSILON {
        hours[CASCADE_CARRY_HOUR] += carry;
    }

    reconcile(hours, total)
}

/// Settle a day's hours against its total.
///
/// A residual above 0.001 goes to the first largest hour. When the hours
/// still miss the total by more than 0.01 the whole total is placed in the
/// last hour instead.
pub fn reconcile(hours: [f64; HOURS_PER_DAY], total: f64) -> DayCascade {
    let mut day = DayCascade {
        hours,
        outcome: CascadeOutcome::Accepted,
    };

    let residual = total - day.total();
    if residual.abs() > CASCADE_ROUNDING {
        let peak = day
            .hours
            .iter()
            .enumerate()
            .fold(0, |best, (i, &v)| if v > day.hours[best] { i } else { best });
        day.hours[peak] += residual;

        let remaining = total - day.total();
        if remaining.is_nan() || remaining.abs() > CASCADE_RESIDUAL_LIMIT {
            warn!(
                "Daily total {} not distributed properly (residual {}); placing it in hour {}",
                total, remaining, CASCADE_FALLBACK_HOUR
            );
            return DayCascade::last_hour(total, CascadeOutcome::Degenerate);
        }
    }

    day
}

/// Hourly precipitation (PREC) as one 24th of the daily total per hour.
/// Negative or missing totals give zeros.
pub fn distribute_equal(daily: &TimeSeries) -> Result<TimeSeries> {
    super::expand_hourly(daily, HourlyVariable::Prec.code(), |_, total| {
        if total.is_nan() || total < 0.0 {
            0.0
        } else {
            total / HOURS_PER_DAY as f64
        }
    })
}

/// Hourly precipitation (PREC) through the triangular cascade.
pub fn distribute_triangular(daily: &TimeSeries) -> Result<TimeSeries> {
    require_daily(daily)?;
    let days: Vec<DayCascade> = daily.values().iter().map(|&total| cascade_day(total)).collect();

    let hourly = daily.resample_hourly_ffill();
    let values = hourly
        .index()
        .iter()
        .enumerate()
        .map(|(i, t)| days[i / HOURS_PER_DAY].hours[hour_of(t)])
        .collect();
    hourly.with_values(HourlyVariable::Prec.code(), values)
}

pub fn disaggregate_precipitation(daily: &TimeSeries, method: PrecipitationMethod) -> Result<TimeSeries> {
    match method {
        PrecipitationMethod::Equal => distribute_equal(daily),
        PrecipitationMethod::Triangular => distribute_triangular(daily),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn prec(values: Vec<f64>) -> TimeSeries {
        TimeSeries::daily("PREC", NaiveDate::from_ymd_opt(2023, 8, 1).unwrap(), values)
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket_index(0.0), Some(0));
        assert_eq!(bucket_index(0.01), Some(0));
        assert_eq!(bucket_index(0.011), Some(1));
        assert_eq!(bucket_index(1.28), Some(7));
        assert_eq!(bucket_index(20.48), Some(11));
        assert_eq!(bucket_index(20.5), None);
    }

    #[test]
    fn test_bucket_is_monotone() {
        let mut last = 0;
        for i in 0..=2048 {
            let bucket = bucket_index(i as f64 * 0.01).unwrap();
            assert!(bucket >= last);
            last = bucket;
        }
    }

    #[test]
    fn test_cascade_conserves_mass() {
        for i in 0..=4096 {
            let total = i as f64 * 0.005;
            let day = cascade_day(total);
            assert_eq!(day.outcome, CascadeOutcome::Accepted);
            assert!(
                (day.total() - total).abs() <= 0.001 + 1e-9,
                "total {} distributed as {}",
                total,
                day.total()
            );
            assert!(day.hours.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_cascade_shape_is_centred() {
        let day = cascade_day(1.0);
        let peak = day
            .hours
            .iter()
            .enumerate()
            .fold(0, |best, (i, &v)| if v > day.hours[best] { i } else { best });
        assert!((10..=12).contains(&peak));
        assert_eq!(day.hours[0], 0.0);
        assert_eq!(day.hours[23], 0.0);
    }

    #[test]
    fn test_cascade_degenerate_inputs() {
        assert_eq!(cascade_day(-1.0).hours, [0.0; 24]);
        assert_eq!(cascade_day(f64::NAN).hours, [0.0; 24]);

        let huge = cascade_day(25.0);
        assert_eq!(huge.outcome, CascadeOutcome::TooLarge);
        assert_eq!(huge.hours[23], 25.0);
        assert_eq!(huge.hours[..23].iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_residual_goes_to_first_peak() {
        let mut hours = [0.0; 24];
        hours[9] = 0.1;
        hours[12] = 0.4;
        hours[15] = 0.4;
        let day = reconcile(hours, 0.905);

        assert_eq!(day.outcome, CascadeOutcome::Accepted);
        assert_abs_diff_eq!(day.hours[12], 0.405, epsilon = 1e-12);
        assert_eq!(day.hours[15], 0.4);
        assert_eq!(day.hours[9], 0.1);
        assert_abs_diff_eq!(day.total(), 0.905, epsilon = 1e-12);
    }

    #[test]
    fn test_small_residual_is_left_alone() {
        let mut hours = [0.0; 24];
        hours[11] = 0.5;
        let day = reconcile(hours, 0.5005);
        assert_eq!(day.outcome, CascadeOutcome::Accepted);
        assert_eq!(day.hours, hours);
    }

    #[test]
    fn test_unreconcilable_day_falls_back_to_last_hour() {
        // 1.0 vanishes when added to 1e20, so the peak cannot absorb it
        let mut hours = [0.0; 24];
        hours[3] = 1e20;
        hours[8] = -1e20;
        let day = reconcile(hours, 1.0);
        assert_eq!(day.outcome, CascadeOutcome::Degenerate);
        assert_eq!(day.hours[23], 1.0);
        assert!(day.hours[..23].iter().all(|&v| v == 0.0));

        let mut hours = [0.0; 24];
        hours[5] = f64::INFINITY;
        let day = reconcile(hours, 2.0);
        assert_eq!(day.outcome, CascadeOutcome::Degenerate);
        assert_eq!(day.hours[23], 2.0);
    }

    #[test]
    fn test_equal_distribution() {
        let hourly = distribute_equal(&prec(vec![2.4, -1.0, f64::NAN])).unwrap();
        assert_eq!(hourly.name(), "PREC");
        assert_eq!(hourly.len(), 72);
        assert_abs_diff_eq!(hourly.values()[..24].iter().sum::<f64>(), 2.4, epsilon = 1e-12);
        assert!(hourly.values()[24..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_triangular_series() {
        let daily = prec(vec![0.5, 0.0, 3.7]);
        let hourly = disaggregate_precipitation(&daily, PrecipitationMethod::Triangular).unwrap();
        assert_eq!(hourly.len(), 72);
        for (day, &total) in daily.values().iter().enumerate() {
            let sum: f64 = hourly.values()[day * 24..(day + 1) * 24].iter().sum();
            assert_abs_diff_eq!(sum, total, epsilon = 0.001 + 1e-9);
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("Equal".parse::<PrecipitationMethod>().unwrap(), PrecipitationMethod::Equal);
        assert_eq!(
            "triangular".parse::<PrecipitationMethod>().unwrap(),
            PrecipitationMethod::Triangular
        );
        assert!("gamma".parse::<PrecipitationMethod>().is_err());
    }
}
