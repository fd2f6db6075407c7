//! Route polylines and the OpenRouteService directions adapter.
//!
//! The polyline stores decoded latitude/longitude points directly for
//! internal processing. Provider-specific concerns ([lon,lat] coordinate
//! order, meter distances) are converted at this boundary, so the planner
//! only ever sees [`GeoPoint`]s and miles.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::traits::RouteProvider;

/// Conversion factor from meters to miles.
const METERS_TO_MILES: f64 = 0.000621371;

/// A route geometry as an ordered sequence of decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePolyline {
    points: Vec<GeoPoint>,
}

impl RoutePolyline {
    /// Creates a new polyline from decoded coordinate points.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A driving route: the polyline plus the provider-reported total distance.
///
/// The total distance comes from the directions API, not from re-summing the
/// polyline, so the two figures can differ slightly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub polyline: RoutePolyline,
    pub total_distance_miles: f64,
}

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl OrsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }
}

/// OpenRouteService directions client.
#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey {
                provider: "OpenRouteService",
            });
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for OrsClient {
    fn route_between(&self, start: GeoPoint, end: GeoPoint) -> Result<Route> {
        let url = format!("{}/v2/directions/driving-car", self.config.base_url);

        let response = self
            .client
            .get(url)
            .header("Authorization", &self.config.api_key)
            .query(&[
                ("start", format!("{},{}", start.lon, start.lat)),
                ("end", format!("{},{}", end.lon, end.lat)),
            ])
            .send()?
            .error_for_status()?
            .json::<DirectionsResponse>()?;

        let route = route_from_response(response)?;
        debug!(
            points = route.polyline.len(),
            total_miles = route.total_distance_miles,
            "fetched driving route"
        );
        Ok(route)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// Coordinates arrive as [lon, lat] pairs (GeoJSON order).
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    /// Distance in meters.
    distance: f64,
}

fn route_from_response(response: DirectionsResponse) -> Result<Route> {
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| Error::RouteApi {
            message: "no route features in response".to_string(),
        })?;

    let segment = feature
        .properties
        .segments
        .first()
        .ok_or_else(|| Error::RouteApi {
            message: "no segments in route properties".to_string(),
        })?;

    let points = feature
        .geometry
        .coordinates
        .iter()
        .map(|&[lon, lat]| GeoPoint::new(lat, lon))
        .collect::<Vec<_>>();

    Ok(Route {
        polyline: RoutePolyline::new(points),
        total_distance_miles: segment.distance * METERS_TO_MILES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_new_and_points() {
        let points = vec![
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ];
        let polyline = RoutePolyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
        assert_eq!(polyline.len(), 3);
    }

    #[test]
    fn test_polyline_into_points() {
        let points = vec![GeoPoint::new(38.5, -120.2), GeoPoint::new(40.7, -120.95)];
        let polyline = RoutePolyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_polyline_serializes_as_bare_list_of_pairs() {
        let polyline = RoutePolyline::new(vec![GeoPoint::new(1.5, 2.5)]);
        let json = serde_json::to_value(&polyline).unwrap();
        assert_eq!(json, serde_json::json!([[1.5, 2.5]]));
    }

    #[test]
    fn test_route_from_response_converts_order_and_units() {
        let body = serde_json::json!({
            "features": [{
                "geometry": {
                    "coordinates": [[-115.14, 36.17], [-118.24, 34.05]]
                },
                "properties": {
                    "segments": [{ "distance": 1609.34 }]
                }
            }]
        });
        let response: DirectionsResponse = serde_json::from_value(body).unwrap();
        let route = route_from_response(response).unwrap();

        // [lon, lat] input becomes lat/lon points.
        assert_eq!(route.polyline.points()[0], GeoPoint::new(36.17, -115.14));
        assert_eq!(route.polyline.points()[1], GeoPoint::new(34.05, -118.24));
        // 1609.34 meters is one mile.
        assert!((route.total_distance_miles - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_route_from_response_rejects_empty_features() {
        let response: DirectionsResponse =
            serde_json::from_value(serde_json::json!({ "features": [] })).unwrap();
        assert!(matches!(
            route_from_response(response),
            Err(Error::RouteApi { .. })
        ));
    }

    #[test]
    fn test_route_from_response_rejects_missing_segments() {
        let body = serde_json::json!({
            "features": [{
                "geometry": { "coordinates": [[0.0, 0.0]] },
                "properties": { "segments": [] }
            }]
        });
        let response: DirectionsResponse = serde_json::from_value(body).unwrap();
        assert!(matches!(
            route_from_response(response),
            Err(Error::RouteApi { .. })
        ));
    }
}
