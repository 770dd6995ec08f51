pub mod cli;
pub mod config;
pub mod converters;
pub mod derivation;
pub mod disaggregation;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod store;
pub mod utils;
pub mod writers;

pub use crate::config::MetConfig;
pub use error::{ProcessingError, Result};
