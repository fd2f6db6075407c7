//! Fuel-stop planner.
//!
//! A single forward pass over the route polyline. Segment distances are
//! accumulated until they reach the vehicle's range (or the route ends),
//! which triggers a stop decision: search for stations near the current
//! vertex and buy fuel at the cheapest one. The planner commits to the first
//! adequate station at each trigger point; it is a local heuristic, not a
//! global cost optimizer.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::{self, GeoPoint};
use crate::route::{Route, RoutePolyline};
use crate::search;
use crate::station::Station;

/// Vehicle and search parameters for one planning run.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Fuel efficiency in miles per gallon.
    pub mpg: f64,
    /// Maximum distance on a full tank, in miles.
    pub range_miles: f64,
    /// Station search radius around a trigger point, in miles.
    pub radius_miles: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            mpg: 10.0,
            range_miles: 500.0,
            radius_miles: 10.0,
        }
    }
}

/// One purchased fill-up along the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    pub location: GeoPoint,
    pub station_name: String,
    pub price_per_gallon: f64,
    pub gallons: f64,
    pub cost: f64,
}

/// A condition the plan could not account for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// A trigger point had no station within the search radius. No stop was
    /// recorded there, so the plan under-provisions fuel for that stretch.
    NoStationInRange {
        location: GeoPoint,
        accumulated_miles: f64,
    },
}

/// The single output artifact of one planning invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelPlan {
    pub total_distance_miles: f64,
    pub fuel_needed_gallons: f64,
    pub estimated_cost: f64,
    pub fuel_stops: Vec<FuelStop>,
    pub route_coords: RoutePolyline,
    pub warnings: Vec<PlanWarning>,
}

/// Plans fuel stops along `route` using the given station table.
///
/// `fuel_needed_gallons` is derived from the route's total distance,
/// independently of the per-stop gallons; the two can diverge when trigger
/// points go unserved, and both are reported.
pub fn plan(route: &Route, stations: &[Station], options: &PlanOptions) -> Result<FuelPlan> {
    let points = route.polyline.points();
    if points.len() < 2 {
        return Err(Error::EmptyRoute);
    }
    for (name, value) in [
        ("mpg", options.mpg),
        ("range_miles", options.range_miles),
        ("radius_miles", options.radius_miles),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::NonPositiveParameter { name, value });
        }
    }

    let last = points.len() - 1;
    let mut stops = Vec::new();
    let mut warnings = Vec::new();
    let mut accumulated = 0.0;

    for i in 1..points.len() {
        let segment = geo::distance_miles(points[i - 1], points[i]);
        accumulated += segment;

        let is_last = i == last;
        if accumulated >= options.range_miles || is_last {
            let nearby = search::find_nearby(points[i], stations, options.radius_miles);
            if let Some(best) = nearby.first() {
                // The final leg may be shorter than a full range interval;
                // buy only what it needs. Every other trigger buys a full
                // range's worth.
                let gallons = if is_last {
                    segment / options.mpg
                } else {
                    options.range_miles / options.mpg
                };
                let cost = gallons * best.price_per_gallon;

                debug!(
                    index = i,
                    station = %best.name,
                    price = best.price_per_gallon,
                    gallons,
                    "recording fuel stop"
                );
                stops.push(FuelStop {
                    location: points[i],
                    station_name: best.name.clone(),
                    price_per_gallon: best.price_per_gallon,
                    gallons: round2(gallons),
                    cost: round2(cost),
                });
            } else {
                warn!(
                    index = i,
                    lat = points[i].lat,
                    lon = points[i].lon,
                    radius_miles = options.radius_miles,
                    "no station within radius of trigger point"
                );
                warnings.push(PlanWarning::NoStationInRange {
                    location: points[i],
                    accumulated_miles: round2(accumulated),
                });
            }
            // Accumulation restarts after every trigger, even an unserved
            // one. Flagged for product review; see DESIGN.md.
            accumulated = 0.0;
        }
    }

    let estimated_cost = round2(stops.iter().map(|stop| stop.cost).sum());

    Ok(FuelPlan {
        total_distance_miles: round2(route.total_distance_miles),
        fuel_needed_gallons: round2(route.total_distance_miles / options.mpg),
        estimated_cost,
        fuel_stops: stops,
        route_coords: route.polyline.clone(),
        warnings,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
