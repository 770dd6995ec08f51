use chrono::{Datelike, NaiveDate};

use crate::utils::constants::DEGREES_TO_RADIANS;

/// Day length and sunrise for one latitude and Julian day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarDay {
    /// Hours of daylight.
    pub day_length: f64,
    /// Local solar hour of sunrise.
    pub sunrise: f64,
}

/// Julian day as `30.5 * (month - 1) + day`.
pub fn approximate_julian_day(date: NaiveDate) -> f64 {
    30.5 * (date.month() as f64 - 1.0) + date.day() as f64
}

pub fn ordinal_julian_day(date: NaiveDate) -> f64 {
    date.ordinal() as f64
}

/// Solar declination in radians.
pub fn declination(julian_day: f64) -> f64 {
    0.40928 * (0.0172141 * (172.0 - julian_day)).cos()
}

impl SolarDay {
    pub fn new(latitude_deg: f64, julian_day: f64) -> Self {
        let phi = latitude_deg * DEGREES_TO_RADIANS;
        let ad = declination(julian_day);
        let ss = phi.sin() * ad.sin();
        let cs = phi.cos() * ad.cos();
        let x2 = -ss / cs;
        let day_length = 7.6394 * (1.5708 - (x2 / (1.0 - x2 * x2).sqrt()).atan());
        Self {
            day_length,
            sunrise: 12.0 - day_length / 2.0,
        }
    }

    pub fn sunset(&self) -> f64 {
        12.0 + self.day_length / 2.0
    }

    /// Fraction of the daily total falling at hour `rk` of a trapezoidal
    /// curve: rising for a quarter of the day length, flat for half, falling
    /// for the last quarter.
    pub fn trapezoid_fraction(&self, rk: f64) -> f64 {
        let dtr2 = self.day_length / 2.0;
        let dtr4 = self.day_length / 4.0;
        let crad = 0.66666667 / dtr2;
        let slope = crad / dtr4;
        let tr2 = self.sunrise + dtr4;
        let tr3 = tr2 + dtr2;
        let tr4 = tr3 + dtr4;

        if rk <= self.sunrise {
            0.0
        } else if rk <= tr2 {
            (rk - self.sunrise) * slope
        } else if rk <= tr3 {
            crad
        } else if rk <= tr4 {
            crad - (rk - tr3) * slope
        } else {
            0.0
        }
    }
}
