use chrono::Timelike;

use crate::error::{ProcessingError, Result};
use crate::models::{ColumnRef, Frame, Frequency, TableIndex, TimeSeries};

/// Resolve a column reference against a frame, returning the column name.
///
/// Fails when the frame is not a well-formed time-indexed table or when the
/// reference points outside it.
pub fn resolve_column(frame: &Frame, column: &ColumnRef) -> Result<String> {
    let rows = frame.num_rows();
    if let Some(bad) = frame.columns.iter().find(|c| c.values.len() != rows) {
        return Err(ProcessingError::InvalidTable(format!(
            "column '{}' has {} values for {} rows",
            bad.name,
            bad.values.len(),
            rows
        )));
    }

    let times = match &frame.index {
        TableIndex::Time(times) => times,
        TableIndex::Positional(_) => {
            return Err(ProcessingError::InvalidIndex(
                "table is indexed by row number, expected timestamps".to_string(),
            ))
        }
    };
    if let Some(pos) = times.windows(2).position(|w| w[0] >= w[1]) {
        return Err(ProcessingError::InvalidIndex(format!(
            "timestamps are not strictly increasing at {}",
            times[pos + 1]
        )));
    }

    match column {
        ColumnRef::ByIndex(index) => frame
            .columns
            .get(*index)
            .map(|c| c.name.clone())
            .ok_or(ProcessingError::ColumnOutOfBounds {
                index: *index,
                columns: frame.columns.len(),
            }),
        ColumnRef::ByName(name) => frame
            .column(name)
            .map(|c| c.name.clone())
            .ok_or_else(|| ProcessingError::ColumnNotFound(name.clone())),
    }
}

/// Resolve a column and copy it out as a series.
pub fn extract(frame: &Frame, column: &ColumnRef) -> Result<TimeSeries> {
    let name = resolve_column(frame, column)?;
    let values = frame
        .column(&name)
        .map(|c| c.values.clone())
        .ok_or_else(|| ProcessingError::ColumnNotFound(name.clone()))?;
    let index = match &frame.index {
        TableIndex::Time(times) => times.clone(),
        TableIndex::Positional(_) => {
            return Err(ProcessingError::InvalidIndex(
                "table is indexed by row number, expected timestamps".to_string(),
            ))
        }
    };
    TimeSeries::new(name, index, values)
}

/// Require a non-empty series stepping exactly at `frequency`.
pub fn require_frequency(series: &TimeSeries, frequency: Frequency) -> Result<()> {
    if series.is_empty() {
        return Err(ProcessingError::MissingData(format!(
            "series '{}' has no values",
            series.name()
        )));
    }

    let step = frequency.step();
    if let Some(pos) = series.index().windows(2).position(|w| w[1] - w[0] != step) {
        return Err(ProcessingError::InvalidIndex(format!(
            "series '{}' is not {:?} at {}",
            series.name(),
            frequency,
            series.index()[pos + 1]
        )));
    }

    if frequency == Frequency::Daily {
        if let Some(t) = series.index().iter().find(|t| t.num_seconds_from_midnight() != 0) {
            return Err(ProcessingError::InvalidIndex(format!(
                "daily series '{}' has a timestamp off midnight: {}",
                series.name(),
                t
            )));
        }
    }
    Ok(())
}

/// Daily check run at the entry of every derivation and disaggregation model.
pub fn require_daily(series: &TimeSeries) -> Result<()> {
    require_frequency(series, Frequency::Daily)
}
