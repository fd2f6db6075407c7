//! Nearby-station search.

use std::cmp::Ordering;

use crate::geo::{self, GeoPoint};
use crate::station::Station;

/// Returns all stations within `radius_miles` of `point`, cheapest first.
///
/// The sort is stable, so stations with equal prices keep their table order.
/// An empty result is not an error; the planner decides what a dry trigger
/// point means.
pub fn find_nearby(point: GeoPoint, stations: &[Station], radius_miles: f64) -> Vec<Station> {
    let mut nearby: Vec<Station> = stations
        .iter()
        .filter(|station| geo::distance_miles(point, station.location) <= radius_miles)
        .cloned()
        .collect();

    nearby.sort_by(|a, b| {
        a.price_per_gallon
            .partial_cmp(&b.price_per_gallon)
            .unwrap_or(Ordering::Equal)
    });

    nearby
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(lat: f64, lon: f64, price: f64, name: &str) -> Station {
        Station {
            location: GeoPoint::new(lat, lon),
            price_per_gallon: price,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_filters_by_radius_and_sorts_by_price() {
        let point = GeoPoint::new(40.0, -99.0);
        let stations = vec![
            station(40.01, -99.0, 3.50, "near-expensive"),
            station(40.02, -99.0, 3.10, "near-cheap"),
            station(42.0, -99.0, 2.50, "far-cheapest"),
        ];

        let nearby = find_nearby(point, &stations, 10.0);
        let names: Vec<&str> = nearby.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["near-cheap", "near-expensive"]);
    }

    #[test]
    fn test_equal_prices_keep_input_order() {
        let point = GeoPoint::new(40.0, -99.0);
        let stations = vec![
            station(40.01, -99.0, 3.00, "first"),
            station(40.02, -99.0, 3.00, "second"),
            station(40.03, -99.0, 3.00, "third"),
        ];

        let nearby = find_nearby(point, &stations, 10.0);
        let names: Vec<&str> = nearby.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_zero_radius_off_point_is_empty() {
        let point = GeoPoint::new(40.0, -99.0);
        let stations = vec![station(40.01, -99.0, 3.00, "nearby")];

        assert!(find_nearby(point, &stations, 0.0).is_empty());
    }

    #[test]
    fn test_zero_radius_exact_point_matches() {
        let point = GeoPoint::new(40.0, -99.0);
        let stations = vec![station(40.0, -99.0, 3.00, "colocated")];

        assert_eq!(find_nearby(point, &stations, 0.0).len(), 1);
    }

    #[test]
    fn test_no_stations_is_empty() {
        assert!(find_nearby(GeoPoint::new(0.0, 0.0), &[], 100.0).is_empty());
    }
}
