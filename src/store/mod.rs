//! Persistence for daily and hourly series keyed by DSN (data-set number).

pub mod memory;
pub mod parquet_store;

pub use memory::MemoryStore;
pub use parquet_store::ParquetStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::models::{Frequency, TimeSeries, Variable};

/// Catalogue entry describing one DSN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsnAttributes {
    pub dsn: u32,
    pub location: String,
    pub scenario: String,
    pub tstype: String,
    pub time_code: u8,
    pub description: String,
}

impl DsnAttributes {
    pub fn new(dsn: u32, location: impl Into<String>, variable: Variable) -> Self {
        Self {
            dsn,
            location: location.into(),
            scenario: variable.scenario().to_string(),
            tstype: variable.code().to_string(),
            time_code: variable.frequency().time_code(),
            description: variable.description().to_string(),
        }
    }

    pub fn frequency(&self) -> Option<Frequency> {
        Frequency::from_time_code(self.time_code)
    }
}

pub trait SeriesStore {
    /// All DSNs in ascending order.
    fn list(&self) -> Result<Vec<u32>>;

    fn describe(&self, dsn: u32) -> Result<DsnAttributes>;

    /// Register a new, empty DSN. Fails with `DsnInUse` if it exists.
    fn create(&mut self, attributes: DsnAttributes) -> Result<()>;

    /// Replace the data of an existing DSN. Fails with `DsnNotFound`.
    fn write(&mut self, dsn: u32, series: &TimeSeries) -> Result<()>;

    /// Data of a DSN, named after its type. A DSN never written reads as
    /// an empty series.
    fn read(&self, dsn: u32) -> Result<TimeSeries>;

    fn delete(&mut self, dsn: u32) -> Result<()>;

    fn contains(&self, dsn: u32) -> Result<bool> {
        Ok(self.list()?.contains(&dsn))
    }

    /// DSN holding `tstype` for `location`, lowest first if several do.
    fn find(&self, location: &str, tstype: &str) -> Result<Option<u32>> {
        for dsn in self.list()? {
            let attributes = self.describe(dsn)?;
            if attributes.location == location && attributes.tstype == tstype {
                return Ok(Some(dsn));
            }
        }
        Ok(None)
    }
}

/// Store a series under `variable` for `location`.
///
/// Non-finite rows are dropped first and an empty result is refused. With
/// no DSN given the lowest free slot of the variable's range is used; an
/// explicit DSN must lie in that range and replaces any existing data set.
pub fn save_series<S: SeriesStore + ?Sized>(
    store: &mut S,
    series: &TimeSeries,
    variable: Variable,
    location: &str,
    dsn: Option<u32>,
) -> Result<u32> {
    let cleaned = series.drop_non_finite().renamed(variable.code());
    if cleaned.is_empty() {
        return Err(ProcessingError::EmptySeries(series.name().to_string()));
    }

    let dsn = match dsn {
        Some(dsn) => {
            if !variable.owns_dsn(dsn) {
                return Err(ProcessingError::DsnOutOfRange {
                    dsn,
                    variable: variable.code().to_string(),
                    range: format_range(variable),
                });
            }
            dsn
        }
        None => {
            let used = store.list()?;
            variable
                .dsn_range()
                .find(|candidate| !used.contains(candidate))
                .ok_or_else(|| ProcessingError::NoFreeDsn(variable.code().to_string()))?
        }
    };

    if store.contains(dsn)? {
        debug!("Replacing existing DSN {}", dsn);
        store.delete(dsn)?;
    }

    store.create(DsnAttributes::new(dsn, location, variable))?;
    store.write(dsn, &cleaned)?;

    info!(
        "Saved {} for station {} to DSN {} ({} values)",
        variable,
        location,
        dsn,
        cleaned.len()
    );
    Ok(dsn)
}

/// DSN of `tstype` for each station, failing with `MissingData` when any
/// station has none.
pub fn locate_stations<S: SeriesStore + ?Sized>(
    store: &S,
    stations: &[String],
    tstype: &str,
) -> Result<BTreeMap<String, u32>> {
    let mut located = BTreeMap::new();
    let mut missing = Vec::new();
    for station in stations {
        match store.find(station, tstype)? {
            Some(dsn) => {
                located.insert(station.clone(), dsn);
            }
            None => missing.push(station.as_str()),
        }
    }

    if !missing.is_empty() {
        return Err(ProcessingError::MissingData(format!(
            "no {} data set for station(s) {}",
            tstype,
            missing.join(", ")
        )));
    }
    Ok(located)
}

fn format_range(variable: Variable) -> String {
    let dsns: Vec<String> = variable.dsn_range().map(|d| d.to_string()).collect();
    dsns.join(", ")
}
