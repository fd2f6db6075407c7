//! fuel-route-planner core
//!
//! Plans fuel stops along a driving route by combining a route polyline, a
//! table of fuel-station prices, and a straight-line nearby-station search.

pub mod api;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod planner;
pub mod route;
pub mod search;
pub mod station;
pub mod traits;

pub use error::{Error, Result};
