use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MAX_SOLAR_LATITUDE, MIN_SOLAR_LATITUDE};

/// Station reference data. Latitude is restricted to the range covered by
/// the solar-geometry formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Station {
    #[validate(length(min = 1))]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[validate(range(min = -66.5, max = 66.5))]
    pub latitude: f64,
}

impl Station {
    pub fn new(id: impl Into<String>, latitude: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            latitude,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Numeric form of the identifier, as used in raw observation files.
    pub fn numeric_id(&self) -> Result<u32> {
        self.id.trim().parse::<u32>().map_err(|_| {
            ProcessingError::InvalidFormat(format!("Station id '{}' is not numeric", self.id))
        })
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Reject latitudes outside the solar-geometry range.
pub fn check_latitude(latitude: f64) -> Result<()> {
    if !(MIN_SOLAR_LATITUDE..=MAX_SOLAR_LATITUDE).contains(&latitude) {
        return Err(ProcessingError::LatitudeOutOfRange {
            latitude,
            min: MIN_SOLAR_LATITUDE,
            max: MAX_SOLAR_LATITUDE,
        });
    }
    Ok(())
}
