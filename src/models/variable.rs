use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;
use crate::models::series::Frequency;
use crate::utils::constants::{DSN_STATION_STRIDE, MAX_STATIONS_PER_STORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DailyVariable {
    Tmax,
    Tmin,
    Dwnd,
    Dclo,
    Dptp,
    Dsol,
    Devt,
    Devp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HourlyVariable {
    Prec,
    Evap,
    Atem,
    Wind,
    Solr,
    Pevt,
    Dewp,
    Clou,
}

/// Any variable the store knows how to label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variable {
    Daily(DailyVariable),
    Hourly(HourlyVariable),
}

impl DailyVariable {
    pub const ALL: [DailyVariable; 8] = [
        DailyVariable::Tmax,
        DailyVariable::Tmin,
        DailyVariable::Dwnd,
        DailyVariable::Dclo,
        DailyVariable::Dptp,
        DailyVariable::Dsol,
        DailyVariable::Devt,
        DailyVariable::Devp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DailyVariable::Tmax => "TMAX",
            DailyVariable::Tmin => "TMIN",
            DailyVariable::Dwnd => "DWND",
            DailyVariable::Dclo => "DCLO",
            DailyVariable::Dptp => "DPTP",
            DailyVariable::Dsol => "DSOL",
            DailyVariable::Devt => "DEVT",
            DailyVariable::Devp => "DEVP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DailyVariable::Tmax => "daily maximum temperature",
            DailyVariable::Tmin => "daily minimum temperature",
            DailyVariable::Dwnd => "daily windspeed",
            DailyVariable::Dclo => "daily cloud cover",
            DailyVariable::Dptp => "daily dewpoint temperature",
            DailyVariable::Dsol => "daily solar radiation",
            DailyVariable::Devt => "daily evapotranspiration",
            DailyVariable::Devp => "daily evaporation",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            DailyVariable::Tmax | DailyVariable::Tmin | DailyVariable::Dptp => "°F",
            DailyVariable::Dwnd => "miles/day",
            DailyVariable::Dclo => "tenths",
            DailyVariable::Dsol => "Ly/day",
            DailyVariable::Devt | DailyVariable::Devp => "in/day",
        }
    }

    /// DSN of the first station; station `i` uses `base + 20 * i`.
    pub fn dsn_base(&self) -> u32 {
        match self {
            DailyVariable::Tmax => 19,
            DailyVariable::Tmin => 20,
            DailyVariable::Dwnd => 21,
            DailyVariable::Dclo => 22,
            DailyVariable::Dptp => 23,
            DailyVariable::Dsol => 24,
            DailyVariable::Devt => 25,
            DailyVariable::Devp => 26,
        }
    }

    /// Hourly variable this daily series is disaggregated into.
    pub fn hourly_target(&self) -> Option<HourlyVariable> {
        match self {
            DailyVariable::Tmax | DailyVariable::Tmin => Some(HourlyVariable::Atem),
            DailyVariable::Dwnd => Some(HourlyVariable::Wind),
            DailyVariable::Dclo => Some(HourlyVariable::Clou),
            DailyVariable::Dptp => Some(HourlyVariable::Dewp),
            DailyVariable::Dsol => Some(HourlyVariable::Solr),
            DailyVariable::Devt => Some(HourlyVariable::Pevt),
            DailyVariable::Devp => Some(HourlyVariable::Evap),
        }
    }
}

impl HourlyVariable {
    pub const ALL: [HourlyVariable; 8] = [
        HourlyVariable::Prec,
        HourlyVariable::Evap,
        HourlyVariable::Atem,
        HourlyVariable::Wind,
        HourlyVariable::Solr,
        HourlyVariable::Pevt,
        HourlyVariable::Dewp,
        HourlyVariable::Clou,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            HourlyVariable::Prec => "PREC",
            HourlyVariable::Evap => "EVAP",
            HourlyVariable::Atem => "ATEM",
            HourlyVariable::Wind => "WIND",
            HourlyVariable::Solr => "SOLR",
            HourlyVariable::Pevt => "PEVT",
            HourlyVariable::Dewp => "DEWP",
            HourlyVariable::Clou => "CLOU",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HourlyVariable::Prec => "Hourly Precipitation disaggregated from Daily",
            HourlyVariable::Evap => "hourly evaporation",
            HourlyVariable::Atem => "hourly temperature",
            HourlyVariable::Wind => "hourly windspeed",
            HourlyVariable::Solr => "hourly solar radiation",
            HourlyVariable::Pevt => "hourly potential evapotranspiration",
            HourlyVariable::Dewp => "hourly dewpoint temperature",
            HourlyVariable::Clou => "hourly cloud cover",
        }
    }

    pub fn dsn_base(&self) -> u32 {
        match self {
            HourlyVariable::Prec => 11,
            HourlyVariable::Evap => 12,
            HourlyVariable::Atem => 13,
            HourlyVariable::Wind => 14,
            HourlyVariable::Solr => 15,
            HourlyVariable::Pevt => 16,
            HourlyVariable::Dewp => 17,
            HourlyVariable::Clou => 18,
        }
    }
}

impl Variable {
    pub fn code(&self) -> &'static str {
        match self {
            Variable::Daily(v) => v.code(),
            Variable::Hourly(v) => v.code(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Variable::Daily(v) => v.description(),
            Variable::Hourly(v) => v.description(),
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            Variable::Daily(_) => Frequency::Daily,
            Variable::Hourly(_) => Frequency::Hourly,
        }
    }

    /// Scenario label the store files this variable under.
    pub fn scenario(&self) -> &'static str {
        match self {
            Variable::Daily(_) => "OBSERVED",
            Variable::Hourly(_) => "COMPUTED",
        }
    }

    pub fn dsn_base(&self) -> u32 {
        match self {
            Variable::Daily(v) => v.dsn_base(),
            Variable::Hourly(v) => v.dsn_base(),
        }
    }

    /// Default DSN for the station at `station_index` in the configured list.
    pub fn dsn_for_station(&self, station_index: usize) -> u32 {
        self.dsn_base() + DSN_STATION_STRIDE * station_index as u32
    }

    /// Every DSN this variable may occupy.
    pub fn dsn_range(&self) -> impl Iterator<Item = u32> {
        let base = self.dsn_base();
        (0..MAX_STATIONS_PER_STORE).map(move |i| base + DSN_STATION_STRIDE * i)
    }

    pub fn owns_dsn(&self, dsn: u32) -> bool {
        let base = self.dsn_base();
        dsn >= base
            && (dsn - base) % DSN_STATION_STRIDE == 0
            && (dsn - base) / DSN_STATION_STRIDE < MAX_STATIONS_PER_STORE
    }
}

impl From<DailyVariable> for Variable {
    fn from(v: DailyVariable) -> Self {
        Variable::Daily(v)
    }
}

impl From<HourlyVariable> for Variable {
    fn from(v: HourlyVariable) -> Self {
        Variable::Hourly(v)
    }
}

impl FromStr for Variable {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        DailyVariable::ALL
            .iter()
            .find(|v| v.code() == code)
            .map(|v| Variable::Daily(*v))
            .or_else(|| {
                HourlyVariable::ALL
                    .iter()
                    .find(|v| v.code() == code)
                    .map(|v| Variable::Hourly(*v))
            })
            .ok_or_else(|| ProcessingError::UnsupportedVariable {
                found: s.to_string(),
                expected: "a daily (TMAX..DEVP) or hourly (PREC..CLOU) type".to_string(),
            })
    }
}

impl FromStr for DailyVariable {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Variable>()? {
            Variable::Daily(v) => Ok(v),
            Variable::Hourly(v) => Err(ProcessingError::UnsupportedVariable {
                found: v.code().to_string(),
                expected: "a daily variable".to_string(),
            }),
        }
    }
}

impl FromStr for HourlyVariable {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Variable>()? {
            Variable::Hourly(v) => Ok(v),
            Variable::Daily(v) => Err(ProcessingError::UnsupportedVariable {
                found: v.code().to_string(),
                expected: "an hourly variable".to_string(),
            }),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl fmt::Display for DailyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl fmt::Display for HourlyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
