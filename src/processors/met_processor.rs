use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use crate::config::{InputColumn, MetConfig};
use crate::converters::{
    cloud_from_sunshine, convert_chain, convert_column, dewpoint_temperature, UnitConversion,
};
use crate::derivation::{cloud_cover_from_solar, penman_pan_evaporation, HamonModel};
use crate::disaggregation::{
    disaggregate_cloud_cover, disaggregate_dewpoint, disaggregate_pet,
    disaggregate_precipitation, disaggregate_solar, disaggregate_temperature, disaggregate_wind,
};
use crate::error::{ProcessingError, Result};
use crate::models::series::trim_to_overlap;
use crate::models::{
    records_to_series, ColumnRef, DailyVariable, Frame, HourlyVariable, ObservationRecord,
    Station, TimeSeries, Variable,
};
use crate::processors::{GapFiller, ParallelProcessor};
use crate::readers::{ConcurrentReader, ObservationReader, ReadRequest};
use crate::store::{locate_stations, save_series, SeriesStore};
use crate::utils::progress::ProgressReporter;

/// Daily steps, in the order a full run applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DailyStep {
    Tmax,
    Tmin,
    Wind,
    Cloud,
    Dewpoint,
    Solar,
    /// Solar radiation estimated from stored cloud cover; not part of a
    /// full run.
    SolarFromCloud,
    Hamon,
    Penman,
}

impl DailyStep {
    pub const PIPELINE: [DailyStep; 8] = [
        DailyStep::Tmax,
        DailyStep::Tmin,
        DailyStep::Wind,
        DailyStep::Cloud,
        DailyStep::Dewpoint,
        DailyStep::Solar,
        DailyStep::Hamon,
        DailyStep::Penman,
    ];

    pub fn output(&self) -> DailyVariable {
        match self {
            DailyStep::Tmax => DailyVariable::Tmax,
            DailyStep::Tmin => DailyVariable::Tmin,
            DailyStep::Wind => DailyVariable::Dwnd,
            DailyStep::Cloud => DailyVariable::Dclo,
            DailyStep::Dewpoint => DailyVariable::Dptp,
            DailyStep::Solar | DailyStep::SolarFromCloud => DailyVariable::Dsol,
            DailyStep::Hamon => DailyVariable::Devt,
            DailyStep::Penman => DailyVariable::Devp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HourlyStep {
    Temperature,
    Wind,
    Solar,
    Pet,
    Evaporation,
    Dewpoint,
    Cloud,
    Precipitation,
}

impl HourlyStep {
    pub const PIPELINE: [HourlyStep; 8] = [
        HourlyStep::Temperature,
        HourlyStep::Wind,
        HourlyStep::Solar,
        HourlyStep::Pet,
        HourlyStep::Evaporation,
        HourlyStep::Dewpoint,
        HourlyStep::Cloud,
        HourlyStep::Precipitation,
    ];

    pub fn output(&self) -> HourlyVariable {
        match self {
            HourlyStep::Temperature => HourlyVariable::Atem,
            HourlyStep::Wind => HourlyVariable::Wind,
            HourlyStep::Solar => HourlyVariable::Solr,
            HourlyStep::Pet => HourlyVariable::Pevt,
            HourlyStep::Evaporation => HourlyVariable::Evap,
            HourlyStep::Dewpoint => HourlyVariable::Dewp,
            HourlyStep::Cloud => HourlyVariable::Clou,
            HourlyStep::Precipitation => HourlyVariable::Prec,
        }
    }
}

/// One data set written by a step.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSeries {
    pub station: String,
    pub variable: Variable,
    pub dsn: u32,
    pub values: usize,
}

impl fmt::Display for SavedSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} station {} -> DSN {} ({} values)",
            self.variable, self.station, self.dsn, self.values
        )
    }
}

/// Drives the daily and hourly steps for the configured stations.
///
/// Inputs are read concurrently, stations are computed in parallel and the
/// results are written to the store one by one. Station `i` of the list
/// writes variable `v` to DSN `v.base + 20 * i`.
pub struct MetProcessor {
    config: MetConfig,
    parallel: ParallelProcessor,
    silent: bool,
}

impl MetProcessor {
    pub fn new(config: MetConfig) -> Self {
        let parallel = ParallelProcessor::new(config.max_workers);
        Self {
            config,
            parallel,
            silent: false,
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn config(&self) -> &MetConfig {
        &self.config
    }

    /// Every daily step, then every hourly step.
    pub async fn run<S>(&self, store: &mut S) -> Result<Vec<SavedSeries>>
    where
        S: SeriesStore + Sync + ?Sized,
    {
        let mut saved = Vec::new();
        for step in DailyStep::PIPELINE {
            saved.extend(self.run_daily(store, step).await?);
        }
        for step in HourlyStep::PIPELINE {
            saved.extend(self.run_hourly(store, step).await?);
        }
        info!("Run complete: {} data sets written", saved.len());
        Ok(saved)
    }

    pub async fn run_daily<S>(&self, store: &mut S, step: DailyStep) -> Result<Vec<SavedSeries>>
    where
        S: SeriesStore + Sync + ?Sized,
    {
        let output = Variable::from(step.output());
        let inputs = &self.config.inputs;
        info!("Daily step {:?} -> {}", step, output);

        match step {
            DailyStep::Tmax | DailyStep::Tmin => {
                let input = if step == DailyStep::Tmax {
                    &inputs.tmax
                } else {
                    &inputs.tmin
                };
                let Some(input) = input else {
                    return Ok(self.skip(step));
                };
                self.derive_from_files(store, &[input], false, output, |_, raw| {
                    convert_column(&frame_of(&raw[0]), &column_of(&raw[0]), UnitConversion::CelsiusToFahrenheit)
                })
                .await
            }
            DailyStep::Wind => {
                let Some(input) = &inputs.wind else {
                    return Ok(self.skip(step));
                };
                self.derive_from_files(store, &[input], false, output, |_, raw| {
                    convert_chain(
                        &frame_of(&raw[0]),
                        &column_of(&raw[0]),
                        &[UnitConversion::MetresPerSecondToMph, UnitConversion::WindTravel],
                    )
                })
                .await
            }
            DailyStep::Cloud => {
                let Some(input) = &inputs.sunshine else {
                    return Ok(self.skip(step));
                };
                self.derive_from_files(store, &[input], false, output, |_, raw| {
                    cloud_from_sunshine(&frame_of(&raw[0]), &column_of(&raw[0]))
                })
                .await
            }
            DailyStep::Dewpoint => {
                let (Some(temperature), Some(humidity)) = (&inputs.temperature, &inputs.humidity) else {
                    return Ok(self.skip(step));
                };
                self.derive_from_files(store, &[temperature, humidity], false, output, |_, raw| {
                    let aligned = trim_to_overlap(raw)?;
                    let celsius = dewpoint_temperature(
                        &frame_of(&aligned[0]),
                        &column_of(&aligned[0]),
                        &frame_of(&aligned[1]),
                        &column_of(&aligned[1]),
                    )?;
                    Ok(UnitConversion::CelsiusToFahrenheit.convert(&celsius))
                })
                .await
            }
            DailyStep::Solar => {
                let Some(input) = &inputs.solar else {
                    return Ok(self.skip(step));
                };
                self.derive_from_files(store, &[input], false, output, |_, raw| {
                    convert_column(&frame_of(&raw[0]), &column_of(&raw[0]), UnitConversion::MjPerM2ToLangley)
                })
                .await
            }
            DailyStep::SolarFromCloud => {
                self.derive_from_store(store, &[DailyVariable::Dclo], output, |station, daily| {
                    cloud_cover_from_solar(&daily[0], station.latitude)
                })
            }
            DailyStep::Hamon => {
                let mut model = HamonModel::new().with_fahrenheit(true);
                if let Some(coefficients) = self.config.hamon_coefficients {
                    model = model.with_coefficients(coefficients);
                }
                self.derive_from_store(
                    store,
                    &[DailyVariable::Tmin, DailyVariable::Tmax],
                    output,
                    |station, daily| {
                        let daily = trim_to_overlap(daily)?;
                        model.compute(&daily[0], &daily[1], station.latitude)
                    },
                )
            }
            DailyStep::Penman => self.derive_from_store(
                store,
                &[
                    DailyVariable::Tmin,
                    DailyVariable::Tmax,
                    DailyVariable::Dptp,
                    DailyVariable::Dwnd,
                    DailyVariable::Dsol,
                ],
                output,
                |_, daily| {
                    let daily = trim_to_overlap(daily)?;
                    penman_pan_evaporation(&daily[0], &daily[1], &daily[2], &daily[3], &daily[4])
                },
            ),
        }
    }

    pub async fn run_hourly<S>(&self, store: &mut S, step: HourlyStep) -> Result<Vec<SavedSeries>>
    where
        S: SeriesStore + Sync + ?Sized,
    {
        let output = Variable::from(step.output());
        info!("Hourly step {:?} -> {}", step, output);

        match step {
            HourlyStep::Temperature => {
                let observation_hour = self.config.observation_hour;
                self.derive_from_store(
                    store,
                    &[DailyVariable::Tmin, DailyVariable::Tmax],
                    output,
                    |_, daily| {
                        let daily = trim_to_overlap(daily)?;
                        disaggregate_temperature(&daily[0], &daily[1], observation_hour)
                    },
                )
            }
            HourlyStep::Wind => {
                let curve = self.config.wind_curve.as_deref();
                self.derive_from_store(store, &[DailyVariable::Dwnd], output, |_, daily| {
                    disaggregate_wind(&daily[0], curve)
                })
            }
            HourlyStep::Solar => {
                self.derive_from_store(store, &[DailyVariable::Dsol], output, |station, daily| {
                    disaggregate_solar(&daily[0], station.latitude)
                })
            }
            HourlyStep::Pet => {
                self.derive_from_store(store, &[DailyVariable::Devt], output, |station, daily| {
                    disaggregate_pet(&daily[0], station.latitude)
                })
            }
            HourlyStep::Evaporation => {
                self.derive_from_store(store, &[DailyVariable::Devp], output, |station, daily| {
                    disaggregate_pet(&daily[0], station.latitude)
                })
            }
            HourlyStep::Dewpoint => {
                self.derive_from_store(store, &[DailyVariable::Dptp], output, |_, daily| {
                    disaggregate_dewpoint(&daily[0])
                })
            }
            HourlyStep::Cloud => {
                self.derive_from_store(store, &[DailyVariable::Dclo], output, |_, daily| {
                    disaggregate_cloud_cover(&daily[0])
                })
            }
            HourlyStep::Precipitation => {
                let Some(input) = &self.config.inputs.precipitation else {
                    warn!("Hourly step {:?} skipped: no precipitation input configured", step);
                    return Ok(Vec::new());
                };
                let method = self.config.precipitation_method;
                self.derive_from_files(store, &[input], true, output, |_, raw| {
                    let inches = convert_column(
                        &frame_of(&raw[0]),
                        &column_of(&raw[0]),
                        UnitConversion::MillimetresToInches,
                    )?;
                    disaggregate_precipitation(&inches, method)
                })
                .await
            }
        }
    }

    fn skip(&self, step: DailyStep) -> Vec<SavedSeries> {
        warn!("Daily step {:?} skipped: input not configured", step);
        Vec::new()
    }

    fn progress(&self, label: &str) -> ProgressReporter {
        ProgressReporter::new(
            self.config.stations.len() as u64,
            &format!("Computing {}", label),
            self.silent,
        )
    }

    fn reader(&self) -> Result<ObservationReader> {
        let mut reader = ObservationReader::new().with_mmap(self.config.use_mmap);
        if let Some(label) = &self.config.encoding {
            reader = reader.with_encoding(label)?;
        }
        Ok(reader)
    }

    /// Read, gap-fill and scale raw input columns, giving for each input the
    /// series of every configured station (`None` when it has no rows).
    async fn load_inputs(
        &self,
        inputs: &[&InputColumn],
        precipitation: bool,
    ) -> Result<Vec<Vec<Option<TimeSeries>>>> {
        let requests = inputs
            .iter()
            .map(|input| {
                let request = if precipitation {
                    ReadRequest::precipitation(&input.file, input.column.clone())
                } else {
                    ReadRequest::new(&input.file, input.column.clone())
                };
                request.with_invalid_value(input.invalid_value)
            })
            .collect();
        let tables = ConcurrentReader::new(self.reader()?).read_all(requests).await?;

        let ids = self
            .config
            .stations
            .iter()
            .map(|s| s.numeric_id())
            .collect::<Result<Vec<u32>>>()?;
        let filler = GapFiller::new().with_stations(ids.iter().copied());

        tables
            .into_iter()
            .zip(inputs)
            .map(|(records, input)| {
                let filled = filler.fill(records);
                let mut by_station: BTreeMap<u32, Vec<ObservationRecord>> = BTreeMap::new();
                for record in filled {
                    by_station.entry(record.station).or_default().push(record);
                }

                let name = input.column.to_string();
                ids.iter()
                    .map(|id| -> Result<Option<TimeSeries>> {
                        match by_station.get(id) {
                            Some(rows) => {
                                let raw = records_to_series(&name, rows)?;
                                Ok(Some(UnitConversion::Scale(input.scale).convert(&raw)))
                            }
                            None => Ok(None),
                        }
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    async fn derive_from_files<S, F>(
        &self,
        store: &mut S,
        inputs: &[&InputColumn],
        precipitation: bool,
        output: Variable,
        compute: F,
    ) -> Result<Vec<SavedSeries>>
    where
        S: SeriesStore + Sync + ?Sized,
        F: Fn(&Station, &[TimeSeries]) -> Result<TimeSeries> + Sync + Send,
    {
        let loaded = self.load_inputs(inputs, precipitation).await?;

        let progress = self.progress(output.code());
        let results = self
            .parallel
            .process_stations(&self.config.stations, Some(&progress), |i, station| {
                let raw: Option<Vec<TimeSeries>> = loaded
                    .iter()
                    .map(|per_station| per_station.get(i).cloned().flatten())
                    .collect();
                match raw {
                    Some(raw) => compute(station, &raw).map(Some),
                    None => {
                        warn!("No {} input rows for station {}", output, station.id);
                        Ok(None)
                    }
                }
            })?;
        progress.finish_with_message(&format!("{} computed", output));

        self.save_all(store, output, results)
    }

    fn derive_from_store<S, F>(
        &self,
        store: &mut S,
        inputs: &[DailyVariable],
        output: Variable,
        compute: F,
    ) -> Result<Vec<SavedSeries>>
    where
        S: SeriesStore + Sync + ?Sized,
        F: Fn(&Station, &[TimeSeries]) -> Result<TimeSeries> + Sync + Send,
    {
        let ids = self.config.station_ids();
        let located = inputs
            .iter()
            .map(|input| locate_stations(&*store, &ids, input.code()))
            .collect::<Result<Vec<_>>>()?;

        let shared: &S = &*store;
        let progress = self.progress(output.code());
        let results = self
            .parallel
            .process_stations(&self.config.stations, Some(&progress), |_, station| {
                let daily = located
                    .iter()
                    .map(|dsns| {
                        let dsn = dsns.get(&station.id).copied().ok_or_else(|| {
                            ProcessingError::MissingData(format!("no data set for station {}", station.id))
                        })?;
                        shared.read(dsn)
                    })
                    .collect::<Result<Vec<TimeSeries>>>()?;
                compute(station, &daily).map(Some)
            })?;
        progress.finish_with_message(&format!("{} computed", output));

        self.save_all(store, output, results)
    }

    fn save_all<S>(
        &self,
        store: &mut S,
        output: Variable,
        results: Vec<Option<TimeSeries>>,
    ) -> Result<Vec<SavedSeries>>
    where
        S: SeriesStore + ?Sized,
    {
        let mut saved = Vec::new();
        for (i, (station, series)) in self.config.stations.iter().zip(results).enumerate() {
            let Some(series) = series else {
                continue;
            };
            let values = series.values().iter().filter(|v| v.is_finite()).count();
            let dsn = save_series(store, &series, output, &station.id, Some(output.dsn_for_station(i)))?;
            saved.push(SavedSeries {
                station: station.id.clone(),
                variable: output,
                dsn,
                values,
            });
        }
        Ok(saved)
    }
}

fn frame_of(series: &TimeSeries) -> Frame {
    Frame::from_series(series)
}

fn column_of(series: &TimeSeries) -> ColumnRef {
    ColumnRef::name(series.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use approx::assert_abs_diff_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn config(stations: Vec<Station>) -> MetConfig {
        let mut config = MetConfig::new(stations);
        config.max_workers = 2;
        config
    }

    #[tokio::test]
    async fn test_daily_temperature_fills_and_converts() -> Result<()> {
        let file = csv(
            "f1,f5,f6,f7,f8,f9\n\
             59843,2023,7,1,0,300\n\
             59843,2023,7,2,0,32766\n\
             59843,2023,7,3,0,320\n\
             59848,2023,7,1,0,250\n",
        );
        let mut config = config(vec![Station::new("59843", 19.73), Station::new("59848", 19.23)]);
        config.inputs.tmax = Some(InputColumn::new(file.path(), "f9"));

        let processor = MetProcessor::new(config).with_silent(true);
        let mut store = MemoryStore::new();
        let saved = processor.run_daily(&mut store, DailyStep::Tmax).await?;

        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].dsn, 19);
        assert_eq!(saved[1].dsn, 39);

        let tmax = store.read(19)?;
        assert_eq!(tmax.name(), "TMAX");
        assert_abs_diff_eq!(tmax.values()[0], 86.0, epsilon = 1e-9);
        // Isolated gap takes the neighbour mean, 31 °C.
        assert_abs_diff_eq!(tmax.values()[1], 87.8, epsilon = 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_inputs_skip_and_missing_store_data_fails() {
        let processor = MetProcessor::new(config(vec![Station::new("59843", 19.73)])).with_silent(true);
        let mut store = MemoryStore::new();

        let saved = processor.run_daily(&mut store, DailyStep::Wind).await.unwrap();
        assert!(saved.is_empty());

        let result = processor.run_hourly(&mut store, HourlyStep::Temperature).await;
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }

    #[tokio::test]
    async fn test_hourly_precipitation_from_file() -> Result<()> {
        let file = csv(
            "f1,f5,f6,f7,f10\n\
             59843,2023,8,1,254\n\
             59843,2023,8,2,32700\n",
        );
        let mut config = config(vec![Station::new("59843", 19.73)]);
        config.inputs.precipitation = Some(InputColumn::new(file.path(), "f10"));

        let processor = MetProcessor::new(config).with_silent(true);
        let mut store = MemoryStore::new();
        let saved = processor.run_hourly(&mut store, HourlyStep::Precipitation).await?;

        assert_eq!(saved[0].dsn, 11);
        let prec = store.read(11)?;
        assert_eq!(prec.len(), 48);
        let first_day: f64 = prec.values()[..24].iter().sum();
        assert_abs_diff_eq!(first_day, 25.4 * 0.0393701, epsilon = 1e-9);
        assert!(prec.values()[24..].iter().all(|&v| v == 0.0));
        Ok(())
    }
}
