use crate::error::{ProcessingError, Result};
use crate::models::TimeSeries;
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::{Array, Float64Array, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const TIMESTAMP_COLUMN: &str = "timestamp";
const VALUE_COLUMN: &str = "value";

/// Writes one time series per file as a `(timestamp, value)` table.
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = parse_compression(compression)?;
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new(
                TIMESTAMP_COLUMN,
                DataType::Timestamp(TimeUnit::Second, None),
                false,
            ),
            Field::new(VALUE_COLUMN, DataType::Float64, false),
        ]))
    }

    /// Write a series, replacing any existing file at `path`.
    pub fn write_series(&self, series: &TimeSeries, path: &Path) -> Result<()> {
        let schema = Self::schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        // Write in row-group sized chunks
        let chunk = self.row_group_size.max(1);
        for start in (0..series.len()).step_by(chunk) {
            let end = (start + chunk).min(series.len());
            let batch = Self::to_batch(series, start, end, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        Ok(())
    }

    fn to_batch(series: &TimeSeries, start: usize, end: usize, schema: Arc<Schema>) -> Result<RecordBatch> {
        let seconds: Vec<i64> = series.index()[start..end]
            .iter()
            .map(|t| t.and_utc().timestamp())
            .collect();
        let values = series.values()[start..end].to_vec();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampSecondArray::from(seconds)),
                Arc::new(Float64Array::from(values)),
            ],
        )?;
        Ok(batch)
    }

    /// Read a series written by [`ParquetWriter::write_series`].
    pub fn read_series(&self, path: &Path, name: &str) -> Result<TimeSeries> {
        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(self.row_group_size.max(1))
            .build()?;

        let mut index = Vec::new();
        let mut values = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let timestamps = batch
                .column(0)
                .as_any()
                .downcast_ref::<TimestampSecondArray>()
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat("Invalid timestamp column type".to_string())
                })?;
            let data = batch
                .column(1)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat("Invalid value column type".to_string())
                })?;

            for i in 0..batch.num_rows() {
                if timestamps.is_null(i) || data.is_null(i) {
                    continue;
                }
                index.push(from_seconds(timestamps.value(i))?);
                values.push(data.value(i));
            }
        }

        TimeSeries::new(name, index, values)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let total_rows = metadata.file_metadata().num_rows();
        let row_groups = metadata.num_row_groups();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_compression(compression: &str) -> Result<Compression> {
    match compression.to_lowercase().as_str() {
        "snappy" => Ok(Compression::SNAPPY),
        "gzip" => Ok(Compression::GZIP(GzipLevel::default())),
        "lz4" => Ok(Compression::LZ4),
        "zstd" => Ok(Compression::ZSTD(ZstdLevel::default())),
        "none" => Ok(Compression::UNCOMPRESSED),
        _ => Err(ProcessingError::Config(format!(
            "Unsupported compression: {}",
            compression
        ))),
    }
}

fn from_seconds(seconds: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0)
        .map(|t| t.naive_utc())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid timestamp: {}", seconds)))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Rows: {}, Row groups: {}, Size: {:.1} KB, Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_series() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("dsn_19.parquet");
        let series = TimeSeries::daily(
            "TMAX",
            NaiveDate::from_ymd_opt(2022, 12, 30).unwrap(),
            vec![51.2, 53.6, 49.1],
        );

        let writer = ParquetWriter::new().with_row_group_size(2);
        writer.write_series(&series, &path)?;
        let back = writer.read_series(&path, "TMAX")?;

        assert_eq!(back, series);

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 3);
        assert_eq!(info.row_groups, 2);
        Ok(())
    }

    #[test]
    fn test_compression_parsing() {
        assert!(ParquetWriter::new().with_compression("ZSTD").is_ok());
        assert!(ParquetWriter::new().with_compression("brotli-9").is_err());
    }
}
