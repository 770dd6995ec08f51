pub mod concurrent_reader;
pub mod observation_reader;
pub mod station_reader;

pub use concurrent_reader::{ConcurrentReader, ReadRequest};
pub use observation_reader::{decode_precipitation_code, ObservationReader};
pub use station_reader::StationReader;
