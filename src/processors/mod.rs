pub mod gap_filler;
pub mod met_processor;
pub mod parallel_processor;
pub mod validator;

pub use gap_filler::{fill_gaps, fill_series, GapFiller};
pub use met_processor::{DailyStep, HourlyStep, MetProcessor, SavedSeries};
pub use parallel_processor::ParallelProcessor;
