use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::TimeSeries;
use crate::utils::constants::CATALOG_FILE;
use crate::writers::ParquetWriter;

use super::{DsnAttributes, SeriesStore};

/// A directory holding `catalog.json` and one `dsn_{n}.parquet` per
/// written data set. The catalogue is rewritten atomically on every change.
pub struct ParquetStore {
    root: PathBuf,
    catalog: BTreeMap<u32, DsnAttributes>,
    writer: ParquetWriter,
}

impl ParquetStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;

        let catalog_path = root.join(CATALOG_FILE);
        let catalog = if catalog_path.exists() {
            let reader = BufReader::new(File::open(&catalog_path)?);
            let entries: Vec<DsnAttributes> = serde_json::from_reader(reader)?;
            entries.into_iter().map(|a| (a.dsn, a)).collect()
        } else {
            BTreeMap::new()
        };

        debug!("Opened store {} with {} data sets", root.display(), catalog.len());
        Ok(Self {
            root,
            catalog,
            writer: ParquetWriter::new(),
        })
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.writer = self.writer.with_compression(compression)?;
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn series_path(&self, dsn: u32) -> PathBuf {
        self.root.join(format!("dsn_{}.parquet", dsn))
    }

    fn attributes(&self, dsn: u32) -> Result<&DsnAttributes> {
        self.catalog.get(&dsn).ok_or(ProcessingError::DsnNotFound(dsn))
    }

    fn save_catalog(&self) -> Result<()> {
        let entries: Vec<&DsnAttributes> = self.catalog.values().collect();
        let temp = NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, &entries)?;
            writer.flush()?;
        }
        temp.persist(self.root.join(CATALOG_FILE))
            .map_err(|e| ProcessingError::Io(e.error))?;
        Ok(())
    }
}

impl SeriesStore for ParquetStore {
    fn list(&self) -> Result<Vec<u32>> {
        Ok(self.catalog.keys().copied().collect())
    }

    fn describe(&self, dsn: u32) -> Result<DsnAttributes> {
        self.attributes(dsn).cloned()
    }

    fn create(&mut self, attributes: DsnAttributes) -> Result<()> {
        if self.catalog.contains_key(&attributes.dsn) {
            return Err(ProcessingError::DsnInUse(attributes.dsn));
        }
        self.catalog.insert(attributes.dsn, attributes);
        self.save_catalog()
    }

    fn write(&mut self, dsn: u32, series: &TimeSeries) -> Result<()> {
        self.attributes(dsn)?;
        self.writer.write_series(series, &self.series_path(dsn))
    }

    fn read(&self, dsn: u32) -> Result<TimeSeries> {
        let tstype = &self.attributes(dsn)?.tstype;
        let path = self.series_path(dsn);
        if !path.exists() {
            return TimeSeries::new(tstype.clone(), Vec::new(), Vec::new());
        }
        self.writer.read_series(&path, tstype)
    }

    fn delete(&mut self, dsn: u32) -> Result<()> {
        self.attributes(dsn)?;
        let path = self.series_path(dsn);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        self.catalog.remove(&dsn);
        self.save_catalog()
    }

    fn contains(&self, dsn: u32) -> Result<bool> {
        Ok(self.catalog.contains_key(&dsn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyVariable, HourlyVariable, Variable};
    use crate::store::save_series;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_and_reopen() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let series = TimeSeries::daily(
            "DSOL",
            NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
            vec![512.4, 498.0, 530.25],
        );

        {
            let mut store = ParquetStore::open(temp_dir.path())?.with_compression("zstd")?;
            let dsn = save_series(&mut store, &series, Variable::from(DailyVariable::Dsol), "59843", None)?;
            assert_eq!(dsn, 24);
            assert!(store.series_path(24).exists());
        }

        let store = ParquetStore::open(temp_dir.path())?;
        assert_eq!(store.list()?, vec![24]);
        assert_eq!(store.read(24)?, series);

        let attributes = store.describe(24)?;
        assert_eq!(attributes.location, "59843");
        assert_eq!(attributes.time_code, 4);
        Ok(())
    }

    #[test]
    fn test_delete_removes_file_and_entry() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut store = ParquetStore::open(temp_dir.path())?;
        store.create(DsnAttributes::new(13, "59848", Variable::from(HourlyVariable::Atem)))?;
        assert!(store.read(13)?.is_empty());

        let series = TimeSeries::daily("ATEM", NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(), vec![1.0]);
        store.write(13, &series)?;
        store.delete(13)?;

        assert!(!store.series_path(13).exists());
        assert!(matches!(store.read(13), Err(ProcessingError::DsnNotFound(13))));
        assert!(ParquetStore::open(temp_dir.path())?.list()?.is_empty());
        Ok(())
    }
}
