use crate::error::Result;
use crate::models::TimeSeries;
use std::io::Write;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Export a series as a two-column CSV (`datetime`, series name).
/// Missing values are written as empty fields.
pub struct CsvWriter {
    precision: usize,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { precision: 6 }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn write_series(&self, series: &TimeSeries, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        self.write_to(series, file)
    }

    pub fn write_to<W: Write>(&self, series: &TimeSeries, sink: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(["datetime", series.name()])?;

        for (t, v) in series.iter() {
            let value = if v.is_finite() {
                format!("{:.*}", self.precision, v)
            } else {
                String::new()
            };
            writer.write_record([t.format(TIMESTAMP_FORMAT).to_string(), value])?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
