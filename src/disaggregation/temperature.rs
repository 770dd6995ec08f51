use crate::error::Result;
use crate::models::series::{backward_fill, ensure_aligned, forward_fill, shift};
use crate::models::{HourlyVariable, TimeSeries};
use crate::processors::validator::require_daily;
use crate::utils::constants::HOURS_PER_DAY;

/// Fractions of `prevMax - curMin` added to the minimum for hours 1-5.
const NIGHT: [f64; 5] = [0.15, 0.10, 0.06, 0.03, 0.01];
/// Fractions of `curMin - curMax` subtracted from the minimum for hours 7-15.
const WARMING: [f64; 9] = [0.16, 0.31, 0.45, 0.59, 0.71, 0.81, 0.89, 0.95, 0.99];
/// Fractions of `curMax - nextMin` added to the next minimum for hours 17-23.
const COOLING: [f64; 7] = [0.89, 0.78, 0.67, 0.57, 0.47, 0.38, 0.29];
/// Fraction used for hour 0.
const MIDNIGHT: f64 = 0.22;

/// The four daily views the hourly curve interpolates between.
struct DailyViews {
    cur_min: Vec<f64>,
    next_min: Vec<f64>,
    prev_max: Vec<f64>,
    cur_max: Vec<f64>,
}

fn ahead(values: &[f64], periods: isize) -> Vec<f64> {
    let mut shifted = shift(values, -periods);
    forward_fill(&mut shifted);
    shifted
}

impl DailyViews {
    /// Pick the controlling extremes for each day from the hour at which
    /// the thermometers are read.
    fn new(tmin: &[f64], tmax: &[f64], observation_hour: u32) -> Self {
        let mut tmin = tmin.to_vec();
        let mut tmax = tmax.to_vec();
        forward_fill(&mut tmin);
        forward_fill(&mut tmax);

        let (cur_min, next_min) = if observation_hour < 6 {
            (ahead(&tmin, 1), ahead(&tmin, 2))
        } else {
            (tmin.clone(), ahead(&tmin, 1))
        };

        let (prev_max, cur_max) = if observation_hour > 16 {
            let mut prev = shift(&tmax, 1);
            backward_fill(&mut prev);
            (prev, tmax)
        } else {
            let cur = ahead(&tmax, 1);
            (tmax, cur)
        };

        Self {
            cur_min,
            next_min,
            prev_max,
            cur_max,
        }
    }

    fn hour(&self, day: usize, hour: usize) -> f64 {
        let cur_min = self.cur_min[day];
        let next_min = self.next_min[day];
        let cur_max = self.cur_max[day];
        let dif1 = self.prev_max[day] - cur_min;
        let dif2 = cur_min - cur_max;
        let dif3 = cur_max - next_min;

        match hour {
            0 => next_min + dif3 * MIDNIGHT,
            1..=5 => cur_min + dif1 * NIGHT[hour - 1],
            6 => cur_min,
            7..=15 => cur_min - dif2 * WARMING[hour - 7],
            16 => cur_max,
            _ => next_min + dif3 * COOLING[hour - 17],
        }
    }
}

/// Hourly air temperature (ATEM) from daily minimum and maximum.
///
/// `observation_hour` is the hour the max/min thermometers are read: before
/// 6 the minimum belongs to the following day, after 16 the maximum belongs
/// to the current day.
pub fn disaggregate_temperature(
    tmin: &TimeSeries,
    tmax: &TimeSeries,
    observation_hour: u32,
) -> Result<TimeSeries> {
    require_daily(tmin)?;
    require_daily(tmax)?;
    ensure_aligned(tmin, tmax)?;

    let views = DailyViews::new(tmin.values(), tmax.values(), observation_hour);
    let hours = tmin.hourly_span();
    let values = (0..hours.len())
        .map(|i| views.hour(i / HOURS_PER_DAY, i % HOURS_PER_DAY))
        .collect();

    TimeSeries::new(HourlyVariable::Atem.code(), hours, values)
}
