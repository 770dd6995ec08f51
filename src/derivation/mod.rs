//! Daily derived quantities: potential evapotranspiration, pan evaporation
//! and the percent-sunshine radiation model.

pub mod cloud_cover;
pub mod hamon;
pub mod penman;

pub use cloud_cover::cloud_cover_from_solar;
pub use hamon::{hamon_pet, HamonModel};
pub use penman::{pan_evaporation, penman_pan_evaporation};
