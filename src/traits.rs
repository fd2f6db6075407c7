//! Core seams for the fuel-route planner.
//!
//! These are intentionally minimal. Concrete HTTP adapters live in
//! [`crate::route`] and [`crate::geocode`]; tests supply in-memory
//! implementations.

use crate::error::Result;
use crate::geo::GeoPoint;
use crate::route::Route;

/// Supplies a driving route between two points.
pub trait RouteProvider {
    fn route_between(&self, start: GeoPoint, end: GeoPoint) -> Result<Route>;
}

/// Resolves a free-text place query to coordinates.
///
/// `Ok(None)` means the provider answered but found nothing; `Err` means the
/// provider itself failed. Fallback chains treat both as "try the next one".
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<Option<GeoPoint>>;
}
