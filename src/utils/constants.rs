/// Degrees to radians, as used by the solar-geometry formulas
pub const DEGREES_TO_RADIANS: f64 = 0.01745329252;

/// Latitude range accepted by the solar geometry (polar circles excluded)
pub const MIN_SOLAR_LATITUDE: f64 = -66.5;
pub const MAX_SOLAR_LATITUDE: f64 = 66.5;

/// Latitude band covered by the percent-sunshine coefficient table
pub const MIN_CLOUD_LATITUDE: f64 = 27.0;
pub const MAX_CLOUD_LATITUDE: f64 = 53.0;

/// Precipitation cascade tolerances
pub const CASCADE_ROUNDING: f64 = 0.001;
pub const CASCADE_EPSILON: f64 = 0.00001;
pub const CASCADE_RESIDUAL_LIMIT: f64 = 0.01;
pub const CASCADE_CARRY_HOUR: usize = 11;
pub const CASCADE_FALLBACK_HOUR: usize = 23;

/// Radiation floor applied before taking its logarithm
pub const RADIATION_EPSILON: f64 = 0.00001;

/// Relative humidity clamp (percent) and the value used when RH is missing
pub const MIN_RELATIVE_HUMIDITY: f64 = 0.1;
pub const MAX_RELATIVE_HUMIDITY: f64 = 100.0;
pub const MISSING_RELATIVE_HUMIDITY: f64 = 1.0;

/// Hourly PET above this is logged as suspect
pub const MAX_PLAUSIBLE_HOURLY_PET: f64 = 40.0;

pub const HOURS_PER_DAY: usize = 24;

/// Default Hamon coefficient for every month
pub const DEFAULT_HAMON_COEFFICIENT: f64 = 0.0055;

/// DSN layout: station `i` uses `base + DSN_STATION_STRIDE * i`
pub const DSN_STATION_STRIDE: u32 = 20;
pub const MAX_STATIONS_PER_STORE: u32 = 10;

/// Raw observation sentinels
pub const DEFAULT_INVALID_VALUE: f64 = 32766.0;
pub const DEFAULT_INVALID_RADIATION: f64 = 999998.0;

/// Unit conversion factors
pub const MJ_PER_M2_TO_LANGLEY: f64 = 23.9;
pub const METRES_PER_SECOND_TO_MPH: f64 = 2.23694;
pub const MILLIMETRES_TO_INCHES: f64 = 0.0393701;

/// Store file names
pub const CATALOG_FILE: &str = "catalog.json";
pub const DEFAULT_SCENARIO: &str = "OBSERVED";

/// Processing defaults
pub const DEFAULT_OBSERVATION_HOUR: u32 = 24;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
