//! Geographic points and great-circle distance.
//!
//! Distances are straight-line over the Earth's surface, in miles. Station
//! search radii and route segments run tens to hundreds of miles, where a
//! flat-plane approximation would be materially wrong.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// A (latitude, longitude) pair in degrees.
///
/// Serializes as a bare `[lat, lon]` pair, the shape route payloads use on
/// the wire. Deserializes from that pair or from a `{"lat": .., "lon": ..}`
/// object, which is how request bodies spell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.lat, self.lon).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Pair(f64, f64),
            Named { lat: f64, lon: f64 },
        }

        let (lat, lon) = match Repr::deserialize(deserializer)? {
            Repr::Pair(lat, lon) => (lat, lon),
            Repr::Named { lat, lon } => (lat, lon),
        };
        Ok(GeoPoint { lat, lon })
    }
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Checks that both coordinates are finite and within geographic bounds.
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lon_ok = self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

/// Great-circle (haversine) distance between two points, in miles.
///
/// Pure and total over valid points; out-of-range coordinates must be
/// rejected upstream via [`GeoPoint::validate`].
pub fn distance_miles(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can nudge `a` past 1 near antipodal points; asin would go NaN.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}
