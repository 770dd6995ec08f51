//! Run configuration: a TOML file overlaid with `HSPF_MET_*` environment
//! variables (nested keys separated by `__`, e.g. `HSPF_MET_STORE__PATH`).

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::disaggregation::PrecipitationMethod;
use crate::error::{ProcessingError, Result};
use crate::models::{ColumnRef, Station};
use crate::readers::StationReader;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_INVALID_VALUE, DEFAULT_OBSERVATION_HOUR, HOURS_PER_DAY,
};

const ENV_PREFIX: &str = "HSPF_MET";

/// One value column of one input file, with the raw-unit handling it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputColumn {
    pub file: PathBuf,
    pub column: ColumnRef,
    #[serde(default = "default_invalid_value")]
    pub invalid_value: f64,
    /// Factor taking raw integers to physical units (0.1 for tenths).
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl InputColumn {
    pub fn new(file: impl Into<PathBuf>, column: impl Into<ColumnRef>) -> Self {
        Self {
            file: file.into(),
            column: column.into(),
            invalid_value: default_invalid_value(),
            scale: default_scale(),
        }
    }

    pub fn with_invalid_value(mut self, invalid_value: f64) -> Self {
        self.invalid_value = invalid_value;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Raw daily inputs. Each is optional; steps without input are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFiles {
    pub tmax: Option<InputColumn>,
    pub tmin: Option<InputColumn>,
    pub wind: Option<InputColumn>,
    pub sunshine: Option<InputColumn>,
    /// Mean temperature (°C) for the dewpoint calculation.
    pub temperature: Option<InputColumn>,
    /// Relative humidity (%) for the dewpoint calculation.
    pub humidity: Option<InputColumn>,
    pub solar: Option<InputColumn>,
    pub precipitation: Option<InputColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
    #[serde(default = "default_compression")]
    pub compression: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("met-store"),
            compression: default_compression(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MetConfig {
    #[serde(default)]
    #[validate(length(min = 1, max = 10), nested)]
    pub stations: Vec<Station>,

    /// Station CSV (`id,name,latitude`); replaces `stations` when set.
    #[serde(default)]
    pub stations_file: Option<PathBuf>,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub inputs: InputFiles,

    /// Hour the max/min thermometers are read.
    #[serde(default = "default_observation_hour")]
    #[validate(range(max = 24))]
    pub observation_hour: u32,

    #[serde(default)]
    pub precipitation_method: PrecipitationMethod,

    #[serde(default)]
    pub wind_curve: Option<Vec<f64>>,

    #[serde(default)]
    pub hamon_coefficients: Option<[f64; 12]>,

    /// Encoding label of the input CSV files; UTF-8 when unset.
    #[serde(default)]
    pub encoding: Option<String>,

    #[serde(default)]
    pub use_mmap: bool,

    #[serde(default = "default_max_workers")]
    #[validate(range(min = 1))]
    pub max_workers: usize,
}

impl MetConfig {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            stations_file: None,
            store: StoreConfig::default(),
            inputs: InputFiles::default(),
            observation_hour: default_observation_hour(),
            precipitation_method: PrecipitationMethod::default(),
            wind_curve: None,
            hamon_coefficients: None,
            encoding: None,
            use_mmap: false,
            max_workers: default_max_workers(),
        }
    }

    /// Load from an optional TOML file plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        Self::finish(builder.add_source(Self::environment()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::finish(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let mut config: MetConfig = builder.build()?.try_deserialize()?;
        if let Some(path) = config.stations_file.clone() {
            config.stations = StationReader::new().read_stations(&path)?;
        }
        config.check()?;
        Ok(config)
    }

    /// Field validation plus the cross-field rules derive cannot express.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if let Some(curve) = &self.wind_curve {
            if curve.len() != HOURS_PER_DAY {
                return Err(ProcessingError::Config(format!(
                    "wind_curve needs {} values, got {}",
                    HOURS_PER_DAY,
                    curve.len()
                )));
            }
        }

        let mut ids: Vec<&str> = self.stations.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ProcessingError::Config(format!(
                "station {} is listed twice",
                pair[0]
            )));
        }

        Ok(())
    }

    pub fn station_ids(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.id.clone()).collect()
    }
}

fn default_invalid_value() -> f64 {
    DEFAULT_INVALID_VALUE
}

fn default_scale() -> f64 {
    0.1
}

fn default_compression() -> String {
    COMPRESSION_SNAPPY.to_string()
}

fn default_observation_hour() -> u32 {
    DEFAULT_OBSERVATION_HOUR
}

fn default_max_workers() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"
observation_hour = 7
precipitation_method = "triangular"

[[stations]]
id = "59843"
name = "Haikou"
latitude = 19.7333

[[stations]]
id = "59848"
latitude = 19.2333

[store]
path = "out/store"

[inputs.tmax]
file = "data/tem.csv"
column = "f9"

[inputs.solar]
file = "data/rad.csv"
column = 7
invalid_value = 999998
scale = 0.01
"#;

    #[test]
    fn test_from_toml() -> Result<()> {
        let config = MetConfig::from_toml_str(SAMPLE)?;

        assert_eq!(config.stations.len(), 2);
        assert_eq!(config.stations[1].name, None);
        assert_eq!(config.observation_hour, 7);
        assert_eq!(config.precipitation_method, PrecipitationMethod::Triangular);
        assert_eq!(config.store.compression, "snappy");

        let tmax = config.inputs.tmax.unwrap();
        assert_eq!(tmax.column, ColumnRef::name("f9"));
        assert_eq!(tmax.invalid_value, 32766.0);
        assert_eq!(tmax.scale, 0.1);

        let solar = config.inputs.solar.unwrap();
        assert_eq!(solar.column, ColumnRef::ByIndex(7));
        assert_eq!(solar.scale, 0.01);
        assert!(config.inputs.precipitation.is_none());
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        file.write_all(SAMPLE.as_bytes())?;

        let config = MetConfig::load(Some(file.path()))?;
        assert_eq!(config.store.path, PathBuf::from("out/store"));
        Ok(())
    }

    #[test]
    fn test_stations_from_csv() -> Result<()> {
        let mut stations = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(stations, "id,name,latitude")?;
        writeln!(stations, "59851,Qionghai,19:42:00")?;
        writeln!(stations, "59854,,19.3666")?;
        stations.flush()?;

        let text = format!("stations_file = {:?}\n", stations.path().display().to_string());
        let config = MetConfig::from_toml_str(&text)?;
        assert_eq!(config.station_ids(), vec!["59851", "59854"]);
        assert!((config.stations[0].latitude - 19.7).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let polar = r#"
[[stations]]
id = "1"
latitude = 70.0
"#;
        assert!(matches!(
            MetConfig::from_toml_str(polar),
            Err(ProcessingError::Validation(_))
        ));

        let late = r#"
observation_hour = 25
[[stations]]
id = "1"
latitude = 20.0
"#;
        assert!(MetConfig::from_toml_str(late).is_err());

        let mut config = MetConfig::new(vec![Station::new("1", 20.0), Station::new("1", 21.0)]);
        assert!(matches!(config.check(), Err(ProcessingError::Config(_))));

        config.stations.pop();
        config.wind_curve = Some(vec![0.5; 2]);
        assert!(config.check().is_err());
    }
}
