use crate::error::Result;
use crate::models::{HourlyVariable, TimeSeries};

use super::expand_hourly;

/// Hold each daily value constant across its 24 hours.
pub fn carry_forward(daily: &TimeSeries, output: HourlyVariable) -> Result<TimeSeries> {
    expand_hourly(daily, output.code(), |_, value| value)
}

/// Hourly dewpoint (DEWP) from daily DPTP.
pub fn disaggregate_dewpoint(daily: &TimeSeries) -> Result<TimeSeries> {
    carry_forward(daily, HourlyVariable::Dewp)
}

/// Hourly cloud cover (CLOU) from daily DCLO.
pub fn disaggregate_cloud_cover(daily: &TimeSeries) -> Result<TimeSeries> {
    carry_forward(daily, HourlyVariable::Clou)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_every_hour_equals_its_day() {
        let daily = TimeSeries::daily(
            "DPTP",
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            vec![50.5, 48.25, f64::NAN],
        );

        let hourly = disaggregate_dewpoint(&daily).unwrap();

        assert_eq!(hourly.name(), "DEWP");
        assert_eq!(hourly.len(), 72);
        for (t, v) in hourly.iter() {
            let day = (t.date() - daily.index()[0].date()).num_days() as usize;
            let expected = daily.values()[day];
            assert!(v == expected || (v.is_nan() && expected.is_nan()));
        }
        assert_eq!(disaggregate_cloud_cover(&daily).unwrap().name(), "CLOU");
    }
}
