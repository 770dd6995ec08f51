pub mod constants;
pub mod coordinates;
pub mod progress;
pub mod solar_geometry;
pub mod tables;

pub use constants::*;
pub use coordinates::{dms_to_decimal, parse_latitude};
pub use progress::ProgressReporter;
pub use solar_geometry::SolarDay;
