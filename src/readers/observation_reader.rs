use crate::error::{ProcessingError, Result};
use crate::models::{ColumnRef, ObservationRecord};
use crate::utils::constants::DEFAULT_INVALID_VALUE;
use encoding_rs::Encoding;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Map the flagged precipitation codes of station records to plain values.
///
/// 32766 and 32744 are missing, 32700 is a trace (0). Otherwise a leading
/// 32xxx, 31xxx or 30xxx flag is stripped.
pub fn decode_precipitation_code(raw: f64) -> Option<f64> {
    if raw == 32766.0 || raw == 32744.0 {
        None
    } else if raw == 32700.0 {
        Some(0.0)
    } else if raw >= 32000.0 {
        Some(raw - 32000.0)
    } else if raw >= 31000.0 {
        Some(raw - 31000.0)
    } else if raw >= 30000.0 {
        Some(raw - 30000.0)
    } else {
        Some(raw)
    }
}

/// Reads CMA-style station CSV files into observation rows.
#[derive(Debug, Clone)]
pub struct ObservationReader {
    station_column: ColumnRef,
    year_column: ColumnRef,
    month_column: ColumnRef,
    day_column: ColumnRef,
    invalid_values: Vec<f64>,
    encoding: &'static Encoding,
    use_mmap: bool,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            station_column: ColumnRef::name("f1"),
            year_column: ColumnRef::name("f5"),
            month_column: ColumnRef::name("f6"),
            day_column: ColumnRef::name("f7"),
            invalid_values: vec![DEFAULT_INVALID_VALUE],
            encoding: encoding_rs::UTF_8,
            use_mmap: false,
        }
    }

    pub fn with_station_column(mut self, column: ColumnRef) -> Self {
        self.station_column = column;
        self
    }

    pub fn with_date_columns(mut self, year: ColumnRef, month: ColumnRef, day: ColumnRef) -> Self {
        self.year_column = year;
        self.month_column = month;
        self.day_column = day;
        self
    }

    pub fn with_invalid_values(mut self, invalid_values: Vec<f64>) -> Self {
        self.invalid_values = invalid_values;
        self
    }

    /// Source text encoding by WHATWG label, e.g. `gbk`.
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ProcessingError::Config(format!("Unknown encoding: {}", label)))?;
        Ok(self)
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read `value_column` with the invalid sentinels mapped to missing.
    pub fn read_records(&self, path: &Path, value_column: &ColumnRef) -> Result<Vec<ObservationRecord>> {
        self.read_with(path, value_column, |raw| {
            if self.invalid_values.contains(&raw) {
                None
            } else {
                Some(raw)
            }
        })
    }

    /// Read a precipitation column, decoding its flag codes.
    pub fn read_precipitation(&self, path: &Path, value_column: &ColumnRef) -> Result<Vec<ObservationRecord>> {
        self.read_with(path, value_column, decode_precipitation_code)
    }

    fn read_with(
        &self,
        path: &Path,
        value_column: &ColumnRef,
        decode: impl Fn(f64) -> Option<f64>,
    ) -> Result<Vec<ObservationRecord>> {
        let records = if self.use_mmap {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            self.decode_and_parse(path, &mmap, value_column, decode)?
        } else {
            let bytes = std::fs::read(path)?;
            self.decode_and_parse(path, &bytes, value_column, decode)?
        };
        debug!("Read {} rows from {}", records.len(), path.display());
        Ok(records)
    }

    fn decode_and_parse(
        &self,
        path: &Path,
        bytes: &[u8],
        value_column: &ColumnRef,
        decode: impl Fn(f64) -> Option<f64>,
    ) -> Result<Vec<ObservationRecord>> {
        let (text, _, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            return Err(ProcessingError::InvalidFormat(format!(
                "{} is not valid {}",
                path.display(),
                self.encoding.name()
            )));
        }
        self.parse(&text, value_column, decode)
    }

    fn parse(
        &self,
        text: &str,
        value_column: &ColumnRef,
        decode: impl Fn(f64) -> Option<f64>,
    ) -> Result<Vec<ObservationRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = reader.headers()?.clone();

        let station = resolve(&headers, &self.station_column)?;
        let year = resolve(&headers, &self.year_column)?;
        let month = resolve(&headers, &self.month_column)?;
        let day = resolve(&headers, &self.day_column)?;
        let value = resolve(&headers, value_column)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(|field| field.is_empty()) {
                continue;
            }

            let station_id = parse_field::<f64>(&row, station)? as u32;
            let year = parse_field::<i32>(&row, year)?;
            let month = parse_field::<u32>(&row, month)?;
            let day = parse_field::<u32>(&row, day)?;
            let raw = row.get(value).unwrap_or("");
            let reading = if raw.is_empty() {
                None
            } else {
                raw.parse::<f64>()
                    .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid value: '{}'", raw)))
                    .map(&decode)?
            };

            records.push(ObservationRecord::from_ymd(station_id, year, month, day, reading)?);
        }

        Ok(records)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(headers: &csv::StringRecord, column: &ColumnRef) -> Result<usize> {
    match column {
        ColumnRef::ByIndex(index) => {
            if *index < headers.len() {
                Ok(*index)
            } else {
                Err(ProcessingError::ColumnOutOfBounds {
                    index: *index,
                    columns: headers.len(),
                })
            }
        }
        ColumnRef::ByName(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ProcessingError::ColumnNotFound(name.clone())),
    }
}

fn parse_field<T: std::str::FromStr>(row: &csv::StringRecord, index: usize) -> Result<T> {
    let field = row.get(index).unwrap_or("");
    field
        .parse::<T>()
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid field {}: '{}'", index, field)))
}
