//! Loading a city's trips from its CSV source.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::dataset::{RawTrip, Schema, TripDataset, normalize};
use crate::error::Result;
use crate::filter::City;

/// Provides the full, normalized dataset of a city.
pub trait TripSource {
    fn load(&self, city: City) -> Result<TripDataset>;
}

/// Reads `<data_dir>/<city file>` for each city, e.g. `data/chicago.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    data_dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl TripSource for CsvDirectorySource {
    #[tracing::instrument(skip_all, fields(city = %city))]
    fn load(&self, city: City) -> Result<TripDataset> {
        let path = self.path_for(city);
        debug!(path = %path.display(), "Reading city data");
        let file = std::fs::File::open(&path)?;
        let dataset = read_trips(city, file)?;
        info!(rows = dataset.len(), "City data loaded");
        Ok(dataset)
    }
}

/// Parses CSV trip data from any reader and normalizes it.
///
/// Optional columns are resolved from the header row; columns the pipeline
/// does not know about are ignored.
///
/// # Errors
///
/// Fails on malformed CSV or on any unparsable timestamp.
pub fn read_trips<R: Read>(city: City, reader: R) -> Result<TripDataset> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let schema = Schema::from_headers(rdr.headers()?.iter());
    debug!(?schema, "Resolved optional columns");

    let raw = rdr
        .deserialize::<RawTrip>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    normalize(city, schema, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Capability;
    use crate::error::BikeshareError;
    use std::env;
    use std::fs;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_read_full_schema() {
        let ds = read_trips(City::Chicago, CHICAGO.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.has(Capability::Gender));
        assert!(ds.has(Capability::BirthYear));

        let last = &ds.records()[2];
        assert_eq!(last.gender, None);
        assert_eq!(last.birth_year, None);
        assert_eq!(last.user_type.as_deref(), Some("Customer"));
        assert_eq!(last.trip_duration, Some(416.0));
        assert_eq!(last.month_name(), "January");
    }

    #[test]
    fn test_read_without_demographics() {
        let ds = read_trips(City::Washington, WASHINGTON.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert!(!ds.has(Capability::Gender));
        assert!(!ds.has(Capability::BirthYear));
        assert_eq!(ds.records()[0].trip_duration, Some(489.066));
    }

    #[test]
    fn test_bad_timestamp_fails_whole_load() {
        let data = "\
Start Time,End Time,Start Station,End Station
2017-06-23 15:09:32,2017-06-23 15:14:53,A,B
2017-06-23 25:09:32,2017-06-23 15:14:53,A,B
";
        let err = read_trips(City::Chicago, data.as_bytes()).unwrap_err();
        assert!(matches!(err, BikeshareError::Parse { row: 2, .. }));
    }

    #[test]
    fn test_missing_timestamp_column_fails() {
        let data = "Start Time,Start Station,End Station\n2017-06-23 15:09:32,A,B\n";
        let err = read_trips(City::Chicago, data.as_bytes()).unwrap_err();
        assert!(matches!(err, BikeshareError::Parse { field: "End Time", .. }));
    }

    #[test]
    fn test_directory_source_reads_city_file() {
        let dir = env::temp_dir().join("bikeshare_explorer_source_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("washington.csv"), WASHINGTON).unwrap();

        let source = CsvDirectorySource::new(&dir);
        let ds = source.load(City::Washington).unwrap();
        assert_eq!(ds.city(), City::Washington);
        assert_eq!(ds.len(), 1);

        assert!(matches!(
            source.load(City::NewYorkCity),
            Err(BikeshareError::Io(_))
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
