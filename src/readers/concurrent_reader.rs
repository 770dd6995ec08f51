use crate::error::Result;
use crate::models::{ColumnRef, ObservationRecord};
use crate::readers::ObservationReader;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::debug;

/// One input column to read.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub path: PathBuf,
    pub column: ColumnRef,
    pub precipitation: bool,
    /// Replaces the reader's invalid-value sentinels for this file.
    pub invalid_value: Option<f64>,
}

impl ReadRequest {
    pub fn new(path: impl Into<PathBuf>, column: ColumnRef) -> Self {
        Self {
            path: path.into(),
            column,
            precipitation: false,
            invalid_value: None,
        }
    }

    pub fn precipitation(path: impl Into<PathBuf>, column: ColumnRef) -> Self {
        Self {
            precipitation: true,
            ..Self::new(path, column)
        }
    }

    pub fn with_invalid_value(mut self, invalid_value: f64) -> Self {
        self.invalid_value = Some(invalid_value);
        self
    }
}

/// Reads several input files at once on blocking tasks.
pub struct ConcurrentReader {
    reader: ObservationReader,
}

impl ConcurrentReader {
    pub fn new(reader: ObservationReader) -> Self {
        Self { reader }
    }

    /// Results come back in request order.
    pub async fn read_all(&self, requests: Vec<ReadRequest>) -> Result<Vec<Vec<ObservationRecord>>> {
        let handles: Vec<JoinHandle<Result<Vec<ObservationRecord>>>> = requests
            .into_iter()
            .map(|request| {
                let mut reader = self.reader.clone();
                if let Some(invalid_value) = request.invalid_value {
                    reader = reader.with_invalid_values(vec![invalid_value]);
                }
                tokio::task::spawn_blocking(move || {
                    debug!("Reading {} column {}", request.path.display(), request.column);
                    if request.precipitation {
                        reader.read_precipitation(&request.path, &request.column)
                    } else {
                        reader.read_records(&request.path, &request.column)
                    }
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await??);
        }
        Ok(results)
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new(ObservationReader::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_in_request_order() -> Result<()> {
        let mut temperature = NamedTempFile::new()?;
        write!(temperature, "f1,f5,f6,f7,f8\n59843,2023,3,1,201\n")?;
        let mut humidity = NamedTempFile::new()?;
        write!(humidity, "f1,f5,f6,f7,f8\n59843,2023,3,1,78\n59843,2023,3,2,-1\n")?;

        let reader = ConcurrentReader::default();
        let results = reader
            .read_all(vec![
                ReadRequest::new(humidity.path(), ColumnRef::name("f8")).with_invalid_value(-1.0),
                ReadRequest::new(temperature.path(), ColumnRef::name("f8")),
            ])
            .await?;

        assert_eq!(results[0].len(), 2);
        assert!(results[0][1].is_missing());
        assert_eq!(results[1][0].value, Some(201.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_propagates_read_errors() {
        let reader = ConcurrentReader::default();
        let result = reader
            .read_all(vec![ReadRequest::new("/nonexistent/input.csv", ColumnRef::name("f8"))])
            .await;
        assert!(result.is_err());
    }
}
