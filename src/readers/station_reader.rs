use crate::error::{ProcessingError, Result};
use crate::models::Station;
use crate::utils::coordinates::parse_latitude;
use std::collections::HashMap;
use std::path::Path;
use validator::Validate;

/// Reads the station list: CSV rows of `id, name, latitude`. The name may
/// be empty and the latitude is decimal or `DD:MM:SS`.
pub struct StationReader {
    has_headers: bool,
}

impl StationReader {
    pub fn new() -> Self {
        Self { has_headers: true }
    }

    pub fn with_headers(has_headers: bool) -> Self {
        Self { has_headers }
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_path(path)?;

        let mut stations = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(|field| field.is_empty()) {
                continue;
            }
            stations.push(self.parse_station(&row)?);
        }

        Ok(stations)
    }

    fn parse_station(&self, row: &csv::StringRecord) -> Result<Station> {
        if row.len() < 3 {
            return Err(ProcessingError::InvalidFormat(format!(
                "Station row needs id, name and latitude: {:?}",
                row
            )));
        }

        let latitude = parse_latitude(&row[2])?;
        let mut station = Station::new(&row[0], latitude);
        if !row[1].is_empty() {
            station = station.with_name(&row[1]);
        }
        station.validate()?;
        Ok(station)
    }

    pub fn read_stations_map(&self, path: &Path) -> Result<HashMap<String, Station>> {
        let stations = self.read_stations(path)?;
        let mut map = HashMap::with_capacity(stations.len());

        for station in stations {
            map.insert(station.id.clone(), station);
        }

        Ok(map)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "id,name,latitude")?;
        writeln!(temp_file, "59843, Haikou , 19.7333")?;
        writeln!(temp_file, "# decommissioned")?;
        writeln!(temp_file, "59848,,19:14:00N")?;
        temp_file.flush()?;

        let reader = StationReader::new();
        let stations = reader.read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].display_name(), "Haikou");
        assert_eq!(stations[1].display_name(), "59848");
        assert!((stations[1].latitude - 19.233333).abs() < 1e-5);

        let map = reader.read_stations_map(temp_file.path())?;
        assert!(map.contains_key("59843"));
        Ok(())
    }

    #[test]
    fn test_polar_station_rejected() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "id,name,latitude")?;
        writeln!(temp_file, "1,Alert,82.5")?;
        temp_file.flush()?;

        let result = StationReader::new().read_stations(temp_file.path());
        assert!(matches!(result, Err(ProcessingError::Validation(_))));
        Ok(())
    }
}
