//! Error types for the fuel-route planner.

use thiserror::Error;

/// Convenient result alias for the fuel-route planner.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A latitude/longitude pair is outside geographic bounds.
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A route polyline too short to plan over reached the planner.
    #[error("route polyline must contain at least two points")]
    EmptyRoute,

    /// A planner parameter (mpg, range, radius) failed its precondition.
    #[error("{name} must be a finite positive number, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    /// The station table is missing a column the loader requires.
    #[error("station table is missing required column '{name}'")]
    MissingColumn { name: String },

    /// An HTTP adapter was constructed without its API key.
    #[error("no API key configured for {provider}")]
    MissingApiKey { provider: &'static str },

    /// The directions API answered with a payload we cannot use.
    #[error("directions response malformed: {message}")]
    RouteApi { message: String },

    /// A geocoding provider answered with a payload we cannot use.
    #[error("geocoding response malformed: {message}")]
    GeocodeApi { message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
