use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::TimeSeries;

use super::{DsnAttributes, SeriesStore};

#[derive(Debug, Clone)]
struct Entry {
    attributes: DsnAttributes,
    series: Option<TimeSeries>,
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<u32, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, dsn: u32) -> Result<&Entry> {
        self.entries.get(&dsn).ok_or(ProcessingError::DsnNotFound(dsn))
    }
}

impl SeriesStore for MemoryStore {
    fn list(&self) -> Result<Vec<u32>> {
        Ok(self.entries.keys().copied().collect())
    }

    fn describe(&self, dsn: u32) -> Result<DsnAttributes> {
        Ok(self.entry(dsn)?.attributes.clone())
    }

    fn create(&mut self, attributes: DsnAttributes) -> Result<()> {
        if self.entries.contains_key(&attributes.dsn) {
            return Err(ProcessingError::DsnInUse(attributes.dsn));
        }
        self.entries.insert(
            attributes.dsn,
            Entry {
                attributes,
                series: None,
            },
        );
        Ok(())
    }

    fn write(&mut self, dsn: u32, series: &TimeSeries) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&dsn)
            .ok_or(ProcessingError::DsnNotFound(dsn))?;
        entry.series = Some(series.clone().renamed(entry.attributes.tstype.clone()));
        Ok(())
    }

    fn read(&self, dsn: u32) -> Result<TimeSeries> {
        let entry = self.entry(dsn)?;
        match &entry.series {
            Some(series) => Ok(series.clone()),
            None => TimeSeries::new(entry.attributes.tstype.clone(), Vec::new(), Vec::new()),
        }
    }

    fn delete(&mut self, dsn: u32) -> Result<()> {
        self.entries
            .remove(&dsn)
            .map(|_| ())
            .ok_or(ProcessingError::DsnNotFound(dsn))
    }

    fn contains(&self, dsn: u32) -> Result<bool> {
        Ok(self.entries.contains_key(&dsn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyVariable, Variable};
    use chrono::NaiveDate;

    #[test]
    fn test_create_write_read_delete() -> Result<()> {
        let mut store = MemoryStore::new();
        let attributes = DsnAttributes::new(21, "59843", Variable::from(DailyVariable::Dwnd));
        store.create(attributes.clone())?;

        assert!(store.read(21)?.is_empty());
        assert!(matches!(
            store.create(attributes),
            Err(ProcessingError::DsnInUse(21))
        ));

        let series = TimeSeries::daily("x", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), vec![88.0]);
        store.write(21, &series)?;
        assert_eq!(store.read(21)?.name(), "DWND");
        assert_eq!(store.find("59843", "DWND")?, Some(21));
        assert_eq!(store.find("59843", "TMAX")?, None);

        assert!(matches!(
            store.write(22, &series),
            Err(ProcessingError::DsnNotFound(22))
        ));

        store.delete(21)?;
        assert!(store.is_empty());
        assert!(store.delete(21).is_err());
        Ok(())
    }
}
