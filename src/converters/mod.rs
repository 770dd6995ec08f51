pub mod dewpoint;
pub mod sunshine;
pub mod units;

pub use dewpoint::{dewpoint_temperature, magnus_tetens};
pub use sunshine::{cloud_fraction, cloud_from_sunshine};
pub use units::{convert_chain, convert_column, UnitConversion};
