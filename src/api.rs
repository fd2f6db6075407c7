//! Request boundary for trip planning.
//!
//! [`PlanRequest`] matches the JSON body the public endpoint accepts:
//! required start/end coordinates plus optional vehicle parameters.
//! [`FuelRouteService`] wires a route provider and a loaded station table
//! into a single call; the HTTP framework around it stays out of this crate.

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::geo::GeoPoint;
use crate::planner::{self, FuelPlan, PlanOptions};
use crate::station::Station;
use crate::traits::RouteProvider;

/// One trip-planning request. Omitted vehicle parameters fall back to the
/// [`PlanOptions`] defaults (10 mpg, 500 mi range, 10 mi radius).
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub mpg: Option<f64>,
    #[serde(rename = "range")]
    pub range_miles: Option<f64>,
    #[serde(rename = "radius")]
    pub radius_miles: Option<f64>,
}

impl PlanRequest {
    /// Checks both endpoints against geographic bounds.
    pub fn validate(&self) -> Result<()> {
        self.start.validate()?;
        self.end.validate()?;
        Ok(())
    }

    /// Resolves the request into planner options, applying defaults.
    pub fn options(&self) -> PlanOptions {
        let defaults = PlanOptions::default();
        PlanOptions {
            mpg: self.mpg.unwrap_or(defaults.mpg),
            range_miles: self.range_miles.unwrap_or(defaults.range_miles),
            radius_miles: self.radius_miles.unwrap_or(defaults.radius_miles),
        }
    }
}

/// Trip-planning service: a route provider plus a loaded station table.
///
/// The station table is loaded once at construction and shared read-only
/// across requests; each call fetches its own route snapshot, so concurrent
/// invocations need no coordination.
pub struct FuelRouteService<P> {
    route_provider: P,
    stations: Vec<Station>,
}

impl<P: RouteProvider> FuelRouteService<P> {
    pub fn new(route_provider: P, stations: Vec<Station>) -> Self {
        Self {
            route_provider,
            stations,
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Validates the request, fetches the route, and plans fuel stops.
    pub fn plan_trip(&self, request: &PlanRequest) -> Result<FuelPlan> {
        request.validate()?;
        let options = request.options();

        let route = self.route_provider.route_between(request.start, request.end)?;
        info!(
            points = route.polyline.len(),
            total_miles = route.total_distance_miles,
            "planning fuel stops"
        );

        planner::plan(&route, &self.stations, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: PlanRequest = serde_json::from_value(serde_json::json!({
            "start": { "lat": 36.17, "lon": -115.14 },
            "end": { "lat": 34.05, "lon": -118.24 }
        }))
        .unwrap();

        let options = request.options();
        assert_eq!(options.mpg, 10.0);
        assert_eq!(options.range_miles, 500.0);
        assert_eq!(options.radius_miles, 10.0);
    }

    #[test]
    fn test_request_overrides() {
        let request: PlanRequest = serde_json::from_value(serde_json::json!({
            "start": { "lat": 36.17, "lon": -115.14 },
            "end": { "lat": 34.05, "lon": -118.24 },
            "mpg": 8.5,
            "range": 400.0,
            "radius": 15.0
        }))
        .unwrap();

        let options = request.options();
        assert_eq!(options.mpg, 8.5);
        assert_eq!(options.range_miles, 400.0);
        assert_eq!(options.radius_miles, 15.0);
    }

    #[test]
    fn test_request_validation_rejects_out_of_bounds() {
        let request: PlanRequest = serde_json::from_value(serde_json::json!({
            "start": { "lat": 91.0, "lon": 0.0 },
            "end": { "lat": 0.0, "lon": 0.0 }
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }
}
