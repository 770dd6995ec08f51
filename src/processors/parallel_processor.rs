use crate::error::{ProcessingError, Result};
use crate::models::Station;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Runs per-station work on a bounded rayon pool.
pub struct ParallelProcessor {
    max_workers: usize,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Apply `work` to every station in parallel.
    ///
    /// `work` receives the station's position in the configured list. Results
    /// come back in that order; the first error aborts the batch.
    pub fn process_stations<T, F>(
        &self,
        stations: &[Station],
        progress: Option<&ProgressReporter>,
        work: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize, &Station) -> Result<T> + Sync + Send,
    {
        let processed_count = Arc::new(AtomicUsize::new(0));

        if let Some(p) = progress {
            p.set_message(&format!("Processing {} stations...", stations.len()));
        }

        // Configure Rayon thread pool
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let results: Result<Vec<T>> = pool.install(|| {
            stations
                .par_iter()
                .enumerate()
                .map(|(index, station)| {
                    let result = work(index, station);

                    processed_count.fetch_add(1, Ordering::Relaxed);
                    if let Some(p) = progress {
                        p.increment(1);
                    }

                    result
                })
                .collect()
        });

        let results = results?;
        tracing::debug!(
            "Processed {} stations on {} workers",
            processed_count.load(Ordering::Relaxed),
            self.max_workers
        );
        Ok(results)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stations() -> Vec<Station> {
        (0..6)
            .map(|i| Station::new(format!("5984{}", i), 19.0 + i as f64 * 0.1))
            .collect()
    }

    #[test]
    fn test_results_keep_station_order() -> Result<()> {
        let processor = ParallelProcessor::new(3);
        let progress = ProgressReporter::silent();
        let ids = processor.process_stations(&stations(), Some(&progress), |i, station| {
            Ok(format!("{}:{}", i, station.id))
        })?;

        assert_eq!(ids.len(), 6);
        assert_eq!(ids[0], "0:59840");
        assert_eq!(ids[5], "5:59845");
        Ok(())
    }

    #[test]
    fn test_first_error_is_returned() {
        let processor = ParallelProcessor::default();
        let result: Result<Vec<()>> = processor.process_stations(&stations(), None, |i, _| {
            if i == 4 {
                Err(ProcessingError::MissingData("station 4".to_string()))
            } else {
                Ok(())
            }
        });
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }
}
