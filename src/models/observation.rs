use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::series::TimeSeries;

/// One raw daily reading for a station. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub station: u32,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl ObservationRecord {
    pub fn new(station: u32, date: NaiveDate, value: Option<f64>) -> Self {
        Self {
            station,
            date,
            value,
        }
    }

    /// Build a record from separate calendar fields.
    pub fn from_ymd(station: u32, year: i32, month: u32, day: u32, value: Option<f64>) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Invalid date {}-{:02}-{:02} for station {}",
                year, month, day, station
            ))
        })?;
        Ok(Self::new(station, date, value))
    }

    pub fn is_missing(&self) -> bool {
        self.value.map_or(true, |v| !v.is_finite())
    }
}

/// Turn the records of one station into a daily series. Records must be
/// sorted by date without duplicates.
pub fn records_to_series(name: &str, records: &[ObservationRecord]) -> Result<TimeSeries> {
    let index: Vec<NaiveDateTime> = records
        .iter()
        .map(|r| r.date.and_hms_opt(0, 0, 0).unwrap_or_default())
        .collect();
    let values = records
        .iter()
        .map(|r| r.value.unwrap_or(f64::NAN))
        .collect();
    TimeSeries::new(name, index, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ymd_rejects_impossible_dates() {
        assert!(ObservationRecord::from_ymd(59843, 2023, 2, 30, Some(1.0)).is_err());
        let record = ObservationRecord::from_ymd(59843, 2024, 2, 29, None).unwrap();
        assert!(record.is_missing());
    }

    #[test]
    fn test_records_to_series() {
        let records = vec![
            ObservationRecord::from_ymd(1, 2023, 1, 1, Some(10.0)).unwrap(),
            ObservationRecord::from_ymd(1, 2023, 1, 2, None).unwrap(),
        ];
        let series = records_to_series("TMAX", &records).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values()[0], 10.0);
        assert!(series.values()[1].is_nan());
    }
}
