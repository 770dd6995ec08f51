use chrono::Datelike;

use crate::error::{ProcessingError, Result};
use crate::models::series::clip_lower;
use crate::models::{DailyVariable, TimeSeries};
use crate::processors::validator::require_daily;
use crate::utils::constants::{DEGREES_TO_RADIANS, MAX_CLOUD_LATITUDE, MIN_CLOUD_LATITUDE};
use crate::utils::tables::{SUNSHINE_CORRECTION, X1, XLAX, XLAX_FIRST_LATITUDE};

/// Harmonic clear-sky coefficients interpolated to one latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Harmonics {
    a0: f64,
    a1: f64,
    a2: f64,
    a3: f64,
    b1: f64,
    b2: f64,
}

impl Harmonics {
    fn at_latitude(latitude: f64) -> Self {
        let whole = latitude.floor();
        let mut fraction = latitude - whole;
        if fraction <= 0.0001 {
            fraction = 0.0;
        }
        let row = whole as usize - XLAX_FIRST_LATITUDE;
        let lo = XLAX[row];
        let hi = XLAX[row + 1];
        let lerp = |k: usize| lo[k] + fraction * (hi[k] - lo[k]);

        Self {
            a0: lerp(0),
            a1: lerp(1),
            a2: lerp(2),
            a3: lerp(3),
            b1: lerp(4),
            b2: lerp(5),
        }
    }

    /// Clear-sky radiation (Ly/day) at day angle `x` (radians).
    fn clear_sky(&self, x: f64) -> f64 {
        self.a0
            + self.a1 * x.cos()
            + self.a2 * (2.0 * x).cos()
            + self.a3 * (3.0 * x).cos()
            + self.b1 * x.sin()
            + self.b2 * (2.0 * x).sin()
    }
}

/// Latitude-band power fit relating percent sunshine to percent of
/// clear-sky radiation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SunshineFit {
    latitude: f64,
    exp1: f64,
    exp2: f64,
    lat1: f64,
    lat2: f64,
    lat3: f64,
    lat4: f64,
}

impl SunshineFit {
    fn new(latitude: f64) -> Self {
        let a = latitude - 25.0;
        let b = latitude - 44.0;
        Self {
            latitude,
            exp1: 0.7575 - 0.0018 * a,
            exp2: 0.725 + 0.00288 * b,
            lat1: 2.139 + 0.0423 * a,
            lat2: 30.0 - 0.667 * a,
            lat3: 2.9 - 0.0629 * b,
            lat4: 18.0 + 0.833 * b,
        }
    }

    fn percent_of_clear_sky(&self, percent_sunshine: f64, month0: usize) -> f64 {
        let mut yrd = if self.latitude > 43.0 {
            self.lat3 * percent_sunshine.powf(self.exp2) + self.lat4
        } else {
            self.lat1 * percent_sunshine.powf(self.exp1) + self.lat2
        };

        let bucket = ((percent_sunshine + 10.0) / 10.0).ceil();
        if bucket < 11.0 {
            yrd += SUNSHINE_CORRECTION[bucket as usize][month0];
        }
        // NaN passes through; f64::min would turn it into the cap
        if yrd > 100.0 {
            100.0
        } else {
            yrd
        }
    }
}

/// Daily solar radiation (Ly/day) implied by daily cloud cover (tenths)
/// through the percent-sunshine model.
///
/// Cloud cover maps to percent sunshine `100 * (1 - c/10)^(5/3)`, which a
/// latitude-band fit turns into a percentage of the harmonic clear-sky
/// curve. Valid for latitudes in `[27, 53)`.
pub fn cloud_cover_from_solar(cloud_cover: &TimeSeries, latitude: f64) -> Result<TimeSeries> {
    if !(MIN_CLOUD_LATITUDE..MAX_CLOUD_LATITUDE).contains(&latitude) {
        return Err(ProcessingError::LatitudeOutOfRange {
            latitude,
            min: MIN_CLOUD_LATITUDE,
            max: MAX_CLOUD_LATITUDE,
        });
    }
    require_daily(cloud_cover)?;

    let harmonics = Harmonics::at_latitude(latitude);
    let fit = SunshineFit::new(latitude);

    let values = cloud_cover
        .iter()
        .map(|(t, tenths)| {
            if tenths.is_nan() {
                return f64::NAN;
            }
            let month0 = t.month0() as usize;
            let percent_sunshine = clip_lower(100.0 * (1.0 - tenths / 10.0).powf(5.0 / 3.0), 0.0);
            let x = (X1[month0] + t.day() as f64) * DEGREES_TO_RADIANS;
            let y100 = harmonics.clear_sky(x);
            y100 * fit.percent_of_clear_sky(percent_sunshine, month0) / 100.0
        })
        .collect();

    cloud_cover.with_values(DailyVariable::Dsol.code(), values)
}
