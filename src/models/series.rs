use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Hourly,
    Daily,
}

impl Frequency {
    pub fn step(&self) -> Duration {
        match self {
            Frequency::Hourly => Duration::hours(1),
            Frequency::Daily => Duration::days(1),
        }
    }

    /// Time code used by the series store (3 = hourly, 4 = daily).
    pub fn time_code(&self) -> u8 {
        match self {
            Frequency::Hourly => 3,
            Frequency::Daily => 4,
        }
    }

    pub fn from_time_code(code: u8) -> Option<Self> {
        match code {
            3 => Some(Frequency::Hourly),
            4 => Some(Frequency::Daily),
            _ => None,
        }
    }
}

/// A single named variable indexed by strictly increasing timestamps.
/// Missing values are stored as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    name: String,
    index: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, index: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if index.len() != values.len() {
            return Err(ProcessingError::InvalidTable(format!(
                "series '{}' has {} timestamps but {} values",
                name,
                index.len(),
                values.len()
            )));
        }
        if let Some(pos) = index.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ProcessingError::InvalidIndex(format!(
                "series '{}' is not strictly increasing at {}",
                name,
                index[pos + 1]
            )));
        }
        Ok(Self {
            name,
            index,
            values,
        })
    }

    /// Build a daily series starting at midnight of `start`.
    pub fn daily(name: impl Into<String>, start: NaiveDate, values: Vec<f64>) -> Self {
        let start = start.and_hms_opt(0, 0, 0).unwrap_or_default();
        let index = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Self {
            name: name.into(),
            index,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_time(&self) -> Option<NaiveDateTime> {
        self.index.first().copied()
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.index.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Apply `f` to every value, keeping the index.
    pub fn map(&self, name: impl Into<String>, f: impl Fn(f64) -> f64) -> Self {
        Self {
            name: name.into(),
            index: self.index.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Same index with replacement values.
    pub fn with_values(&self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        Self::new(name, self.index.clone(), values)
    }

    /// Combine two series sharing an index value by value.
    pub fn zip_with(
        &self,
        other: &TimeSeries,
        name: impl Into<String>,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Self> {
        ensure_aligned(self, other)?;
        Ok(Self {
            name: name.into(),
            index: self.index.clone(),
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Keep only finite values.
    pub fn drop_non_finite(&self) -> Self {
        let (index, values): (Vec<NaiveDateTime>, Vec<f64>) = self
            .iter()
            .filter(|(_, v)| v.is_finite())
            .unzip();
        Self {
            name: self.name.clone(),
            index,
            values,
        }
    }

    /// Hourly timestamps covering `[first day, last day + 1 day)`.
    pub fn hourly_span(&self) -> Vec<NaiveDateTime> {
        let (Some(first), Some(last)) = (self.first_time(), self.last_time()) else {
            return Vec::new();
        };
        let start = first.date().and_hms_opt(0, 0, 0).unwrap_or(first);
        let end = last.date().and_hms_opt(0, 0, 0).unwrap_or(last) + Duration::days(1);
        let hours = (end - start).num_hours().max(0) as usize;
        (0..hours).map(|h| start + Duration::hours(h as i64)).collect()
    }

    /// Expand daily values to hours, each hour taking the value of its day
    /// (the last daily value at or before it).
    pub fn resample_hourly_ffill(&self) -> Self {
        let hours = self.hourly_span();
        let mut values = Vec::with_capacity(hours.len());
        let mut cursor = 0usize;
        for t in &hours {
            while cursor + 1 < self.index.len() && self.index[cursor + 1] <= *t {
                cursor += 1;
            }
            let v = if self.index.get(cursor).is_some_and(|d| d <= t) {
                self.values[cursor]
            } else {
                f64::NAN
            };
            values.push(v);
        }
        Self {
            name: self.name.clone(),
            index: hours,
            values,
        }
    }
}

/// Error unless both series share the same timestamps.
pub fn ensure_aligned(left: &TimeSeries, right: &TimeSeries) -> Result<()> {
    if left.index != right.index {
        return Err(ProcessingError::MisalignedSeries {
            left: left.name.clone(),
            right: right.name.clone(),
        });
    }
    Ok(())
}

/// Restrict every series to the span all of them cover, so series that
/// were trimmed differently line up again.
pub fn trim_to_overlap(series: &[TimeSeries]) -> Result<Vec<TimeSeries>> {
    let start = series.iter().map(|s| s.first_time()).max().flatten();
    let end = series.iter().map(|s| s.last_time()).min().flatten();
    let (Some(start), Some(end)) = (start, end) else {
        return Err(ProcessingError::MissingData("empty input series".to_string()));
    };
    if start > end {
        return Err(ProcessingError::MissingData(format!(
            "series {} do not overlap",
            series.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
        )));
    }

    Ok(series
        .iter()
        .map(|s| {
            let (index, values): (Vec<NaiveDateTime>, Vec<f64>) =
                s.iter().filter(|(t, _)| *t >= start && *t <= end).unzip();
            TimeSeries {
                name: s.name.clone(),
                index,
                values,
            }
        })
        .collect())
}

/// Positional shift. Positive periods move values later, negative earlier;
/// vacated slots become `NaN`.
pub fn shift(values: &[f64], periods: isize) -> Vec<f64> {
    let n = values.len() as isize;
    (0..n)
        .map(|i| {
            let src = i - periods;
            if (0..n).contains(&src) {
                values[src as usize]
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Replace each `NaN` with the last preceding non-`NaN` value.
pub fn forward_fill(values: &mut [f64]) {
    let mut last = f64::NAN;
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = last;
        } else {
            last = *v;
        }
    }
}

/// Replace each `NaN` with the next following non-`NaN` value.
pub fn backward_fill(values: &mut [f64]) {
    let mut next = f64::NAN;
    for v in values.iter_mut().rev() {
        if v.is_nan() {
            *v = next;
        } else {
            next = *v;
        }
    }
}

/// Lower clip that leaves `NaN` untouched.
pub fn clip_lower(value: f64, lower: f64) -> f64 {
    if value < lower {
        lower
    } else {
        value
    }
}

pub fn hour_of(t: &NaiveDateTime) -> usize {
    t.hour() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn test_rejects_unordered_index() {
        let t1 = day(2).and_hms_opt(0, 0, 0).unwrap();
        let t0 = day(1).and_hms_opt(0, 0, 0).unwrap();
        assert!(TimeSeries::new("X", vec![t1, t0], vec![1.0, 2.0]).is_err());
        assert!(TimeSeries::new("X", vec![t0, t0], vec![1.0, 2.0]).is_err());
        assert!(TimeSeries::new("X", vec![t0], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_shift_and_fill() {
        let values = [1.0, 2.0, 3.0];
        let mut ahead = shift(&values, -1);
        forward_fill(&mut ahead);
        assert_eq!(ahead, vec![2.0, 3.0, 3.0]);

        let mut behind = shift(&values, 1);
        backward_fill(&mut behind);
        assert_eq!(behind, vec![1.0, 1.0, 2.0]);

        let mut two_ahead = shift(&values, -2);
        forward_fill(&mut two_ahead);
        assert_eq!(two_ahead, vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_hourly_span_and_resample() {
        let series = TimeSeries::daily("DPTP", day(1), vec![50.0, 52.0]);
        let hourly = series.resample_hourly_ffill();

        assert_eq!(hourly.len(), 48);
        assert_eq!(hourly.first_time(), day(1).and_hms_opt(0, 0, 0));
        assert_eq!(hourly.last_time(), day(2).and_hms_opt(23, 0, 0));
        assert!(hourly.values()[..24].iter().all(|&v| v == 50.0));
        assert!(hourly.values()[24..].iter().all(|&v| v == 52.0));
    }

    #[test]
    fn test_clip_lower_keeps_nan() {
        assert_eq!(clip_lower(-1.0, 0.0), 0.0);
        assert_eq!(clip_lower(2.0, 0.0), 2.0);
        assert!(clip_lower(f64::NAN, 0.0).is_nan());
    }

    #[test]
    fn test_trim_to_overlap() {
        let a = TimeSeries::daily("A", day(1), vec![1.0, 2.0, 3.0, 4.0]);
        let b = TimeSeries::daily("B", day(2), vec![5.0, 6.0, 7.0, 8.0]);

        let trimmed = trim_to_overlap(&[a.clone(), b]).unwrap();
        assert_eq!(trimmed[0].values(), &[2.0, 3.0, 4.0]);
        assert_eq!(trimmed[1].values(), &[5.0, 6.0, 7.0]);
        assert!(ensure_aligned(&trimmed[0], &trimmed[1]).is_ok());

        let c = TimeSeries::daily("C", day(20), vec![1.0]);
        assert!(trim_to_overlap(&[a, c]).is_err());
    }

    #[test]
    fn test_drop_non_finite() {
        let series = TimeSeries::daily("X", day(1), vec![1.0, f64::NAN, f64::INFINITY, 4.0]);
        let cleaned = series.drop_non_finite();
        assert_eq!(cleaned.values(), &[1.0, 4.0]);
        assert_eq!(cleaned.index()[1], day(4).and_hms_opt(0, 0, 0).unwrap());
    }
}
