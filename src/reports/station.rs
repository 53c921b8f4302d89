use crate::dataset::{Column, TripDataset};
use crate::error::{BikeshareError, Result};
use crate::frequency::most_frequent;
use crate::reports::types::{PopularRoute, StationStats};

/// Most used start station, end station, and start/end combination.
#[tracing::instrument(skip_all, fields(rows = dataset.len()))]
pub fn station_stats(dataset: &TripDataset) -> Result<StationStats> {
    let start_station = most_frequent(dataset, Column::StartStation)?;
    let end_station = most_frequent(dataset, Column::EndStation)?;
    let route = most_frequent(dataset, Column::Route)?;

    let (from, to) = route
        .value
        .as_pair()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .ok_or_else(|| BikeshareError::UnexpectedValue {
            column: Column::Route,
            value: route.value.to_string(),
        })?;

    Ok(StationStats {
        start_station,
        end_station,
        route: PopularRoute {
            from,
            to,
            count: route.count,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Schema, Value};
    use crate::dataset::tests::{dataset, raw_trip};

    fn trip(from: &str, to: &str) -> crate::dataset::RawTrip {
        raw_trip("2017-05-01 10:00:00", "2017-05-01 10:20:00", from, to)
    }

    #[test]
    fn test_station_stats() {
        let ds = dataset(
            Schema::default(),
            vec![
                trip("Canal St", "Clark St"),
                trip("Lake Shore Dr", "Canal St"),
                trip("Lake Shore Dr", "Clark St"),
                trip("Canal St", "Clark St"),
                trip("Lake Shore Dr", "Millennium Park"),
            ],
        );
        let stats = station_stats(&ds).unwrap();
        assert_eq!(stats.start_station.value, Value::Text("Lake Shore Dr".to_string()));
        assert_eq!(stats.start_station.count, 3);
        assert_eq!(stats.end_station.value, Value::Text("Clark St".to_string()));
        assert_eq!(stats.end_station.count, 3);
        assert_eq!(
            stats.route,
            PopularRoute {
                from: "Canal St".to_string(),
                to: "Clark St".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn test_route_with_separator_like_names() {
        let ds = dataset(
            Schema::default(),
            vec![trip("Dock > 1", "Dock > 2"), trip("Dock > 1", "Dock > 2")],
        );
        let stats = station_stats(&ds).unwrap();
        assert_eq!(stats.route.from, "Dock > 1");
        assert_eq!(stats.route.to, "Dock > 2");
    }
}
