pub mod frame;
pub mod observation;
pub mod series;
pub mod station;
pub mod variable;

pub use frame::{Column, ColumnRef, Frame, TableIndex};
pub use observation::{records_to_series, ObservationRecord};
pub use series::{Frequency, TimeSeries};
pub use station::Station;
pub use variable::{DailyVariable, HourlyVariable, Variable};
