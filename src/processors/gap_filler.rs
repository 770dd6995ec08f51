use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::error::Result;
use crate::models::{ObservationRecord, TimeSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gap {
    Valid,
    Isolated,
    Run,
}

/// Fills missing daily values station by station.
///
/// A single missing day takes the mean of its neighbours (or the one
/// neighbour at a boundary). A run of two or more missing days takes the
/// next valid value; a trailing run has none and stays missing.
#[derive(Debug, Clone, Default)]
pub struct GapFiller {
    stations: Option<HashSet<u32>>,
}

impl GapFiller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict filling to these stations; other stations pass through.
    pub fn with_stations(mut self, stations: impl IntoIterator<Item = u32>) -> Self {
        self.stations = Some(stations.into_iter().collect());
        self
    }

    fn selected(&self, station: u32) -> bool {
        self.stations
            .as_ref()
            .map_or(true, |set| set.contains(&station))
    }

    /// Fill gaps in `records`. Output is ordered by station then date.
    pub fn fill(&self, records: Vec<ObservationRecord>) -> Vec<ObservationRecord> {
        let mut by_station: BTreeMap<u32, Vec<ObservationRecord>> = BTreeMap::new();
        for record in records {
            by_station.entry(record.station).or_default().push(record);
        }

        let groups: Vec<(u32, Vec<ObservationRecord>)> = by_station.into_iter().collect();
        let filled: Vec<Vec<ObservationRecord>> = groups
            .into_par_iter()
            .map(|(station, mut rows)| {
                rows.sort_by_key(|r| r.date);
                if self.selected(station) {
                    fill_station(station, &mut rows);
                }
                rows
            })
            .collect();

        filled.into_iter().flatten().collect()
    }
}

fn fill_station(station: u32, rows: &mut [ObservationRecord]) {
    let mut values: Vec<f64> = rows
        .iter()
        .map(|r| r.value.filter(|v| v.is_finite()).unwrap_or(f64::NAN))
        .collect();

    let missing = values.iter().filter(|v| v.is_nan()).count();
    if missing == 0 {
        debug!("Station {}: no missing values", station);
        return;
    }

    fill_gaps(&mut values);
    let remaining = values.iter().filter(|v| v.is_nan()).count();
    debug!(
        "Station {}: filled {} of {} missing values",
        station,
        missing - remaining,
        missing
    );

    for (row, value) in rows.iter_mut().zip(values) {
        row.value = if value.is_nan() { None } else { Some(value) };
    }
}

fn close_run(kinds: &mut Vec<Gap>, run: usize) {
    match run {
        0 => {}
        1 => kinds.push(Gap::Isolated),
        n => kinds.extend(std::iter::repeat(Gap::Run).take(n)),
    }
}

fn classify(values: &[f64]) -> Vec<Gap> {
    let mut kinds = Vec::with_capacity(values.len());
    let mut run = 0usize;

    for v in values {
        if v.is_nan() {
            run += 1;
        } else {
            close_run(&mut kinds, run);
            kinds.push(Gap::Valid);
            run = 0;
        }
    }
    close_run(&mut kinds, run);
    kinds
}

/// Fill `NaN` gaps in place using the run-length policy.
pub fn fill_gaps(values: &mut [f64]) {
    let kinds = classify(values);

    let mut next_valid = f64::NAN;
    for i in (0..values.len()).rev() {
        if kinds[i] == Gap::Valid {
            next_valid = values[i];
        } else if kinds[i] == Gap::Run {
            values[i] = next_valid;
        }
    }

    for i in 0..values.len() {
        if kinds[i] != Gap::Isolated {
            continue;
        }
        let prev = if i > 0 { values[i - 1] } else { f64::NAN };
        let next = values.get(i + 1).copied().unwrap_or(f64::NAN);
        values[i] = match (prev.is_nan(), next.is_nan()) {
            (false, false) => (prev + next) / 2.0,
            (false, true) => prev,
            (true, false) => next,
            (true, true) => f64::NAN,
        };
    }
}

/// Gap-filled copy of a series.
pub fn fill_series(series: &TimeSeries) -> Result<TimeSeries> {
    let mut values = series.values().to_vec();
    fill_gaps(&mut values);
    series.with_values(series.name(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn filled(values: &[f64]) -> Vec<f64> {
        let mut values = values.to_vec();
        fill_gaps(&mut values);
        values
    }

    #[test]
    fn test_isolated_gap_takes_mean() {
        assert_eq!(filled(&[10.0, f64::NAN, 20.0]), vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_run_takes_next_value() {
        assert_eq!(
            filled(&[10.0, f64::NAN, f64::NAN, 40.0]),
            vec![10.0, 40.0, 40.0, 40.0]
        );
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(filled(&[f64::NAN, 5.0, 6.0]), vec![5.0, 5.0, 6.0]);
        assert_eq!(filled(&[5.0, 6.0, f64::NAN]), vec![5.0, 6.0, 6.0]);

        let trailing = filled(&[5.0, f64::NAN, f64::NAN]);
        assert_eq!(trailing[0], 5.0);
        assert!(trailing[1].is_nan() && trailing[2].is_nan());
    }

    #[test]
    fn test_station_subset_passes_others_through() {
        let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
        let records = vec![
            ObservationRecord::new(2, day(2), None),
            ObservationRecord::new(1, day(3), Some(20.0)),
            ObservationRecord::new(1, day(1), Some(10.0)),
            ObservationRecord::new(1, day(2), None),
            ObservationRecord::new(2, day(1), Some(1.0)),
            ObservationRecord::new(2, day(3), Some(3.0)),
        ];

        let out = GapFiller::new().with_stations([1]).fill(records);

        let stations: Vec<u32> = out.iter().map(|r| r.station).collect();
        assert_eq!(stations, vec![1, 1, 1, 2, 2, 2]);
        assert_eq!(out[1].value, Some(15.0));
        assert_eq!(out[4].value, None);
    }
}
