//! Geocoding adapters: Nominatim, LocationIQ, and an ordered fallback chain.
//!
//! Both providers speak nearly the same wire format (a JSON array of hits
//! with string-typed `lat`/`lon`), so the parsing is shared. Retry handling
//! lives in the Nominatim client; provider-to-provider fallback is an
//! ordered list behind [`Geocoder`], not a class hierarchy.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::traits::Geocoder;

/// Normalizes a free-text address before sending it to a geocoder.
///
/// Mirrors the substitutions the station table needs most: `&` confuses
/// query parsers, and all-caps `EXIT` hurts match quality.
pub fn normalize_query(addr: &str) -> String {
    addr.replace('&', "and").replace("EXIT", "Exit").trim().to_string()
}

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub country_codes: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "fuel-route-planner/1.0".to_string(),
            country_codes: "us".to_string(),
            timeout_secs: 10,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Nominatim (OpenStreetMap) geocoding client with bounded retries.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn attempt(&self, query: &str) -> Result<Option<GeoPoint>> {
        let hits = self
            .client
            .get(self.config.base_url.as_str())
            .header("User-Agent", &self.config.user_agent)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.config.country_codes.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json::<Vec<GeocodeHit>>()?;

        point_from_hits(&hits)
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        let mut attempt = 1;
        loop {
            match self.attempt(query) {
                Ok(result) => return Ok(result),
                Err(err) if attempt < self.config.max_retries => {
                    warn!(query, attempt, %err, "Nominatim attempt failed, retrying");
                    std::thread::sleep(self.config.retry_delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationIqConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl LocationIqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://us1.locationiq.com/v1/search.php".to_string(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }
}

/// LocationIQ geocoding client.
#[derive(Debug, Clone)]
pub struct LocationIqClient {
    config: LocationIqConfig,
    client: reqwest::blocking::Client,
}

impl LocationIqClient {
    pub fn new(config: LocationIqConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey {
                provider: "LocationIQ",
            });
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for LocationIqClient {
    fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        let hits = self
            .client
            .get(self.config.base_url.as_str())
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()?
            .error_for_status()?
            .json::<Vec<GeocodeHit>>()?;

        point_from_hits(&hits)
    }
}

/// Ordered list of geocoding providers tried front to back.
///
/// The first provider that returns a hit wins. A provider that errors or
/// finds nothing falls through to the next; exhausting the list is `None`,
/// not an error, so callers can decide how to treat unresolvable rows.
pub struct FallbackGeocoder {
    providers: Vec<Box<dyn Geocoder>>,
}

impl FallbackGeocoder {
    pub fn new(providers: Vec<Box<dyn Geocoder>>) -> Self {
        Self { providers }
    }
}

impl Geocoder for FallbackGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        for (index, provider) in self.providers.iter().enumerate() {
            match provider.geocode(query) {
                Ok(Some(point)) => return Ok(Some(point)),
                Ok(None) => {
                    debug!(query, provider = index, "geocoder found nothing, falling through");
                }
                Err(err) => {
                    warn!(query, provider = index, %err, "geocoder failed, falling through");
                }
            }
        }
        Ok(None)
    }
}

/// One hit from a Nominatim-style search endpoint. Coordinates arrive as
/// JSON strings.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

fn point_from_hits(hits: &[GeocodeHit]) -> Result<Option<GeoPoint>> {
    let Some(hit) = hits.first() else {
        return Ok(None);
    };

    let parse = |value: &str, field: &str| {
        value.parse::<f64>().map_err(|_| Error::GeocodeApi {
            message: format!("non-numeric {field}: '{value}'"),
        })
    };

    let lat = parse(&hit.lat, "lat")?;
    let lon = parse(&hit.lon, "lon")?;
    Ok(Some(GeoPoint::new(lat, lon)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<GeoPoint>);

    impl Geocoder for Fixed {
        fn geocode(&self, _query: &str) -> Result<Option<GeoPoint>> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl Geocoder for Failing {
        fn geocode(&self, _query: &str) -> Result<Option<GeoPoint>> {
            Err(Error::GeocodeApi {
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(
            normalize_query("  I-80 & EXIT 231, Elm Creek  "),
            "I-80 and Exit 231, Elm Creek"
        );
        assert_eq!(normalize_query(""), "");
    }

    #[test]
    fn test_point_from_hits_parses_strings() {
        let hits = vec![GeocodeHit {
            lat: "40.81".to_string(),
            lon: "-99.64".to_string(),
        }];
        let point = point_from_hits(&hits).unwrap().unwrap();
        assert_eq!(point, GeoPoint::new(40.81, -99.64));
    }

    #[test]
    fn test_point_from_hits_empty_is_none() {
        assert!(point_from_hits(&[]).unwrap().is_none());
    }

    #[test]
    fn test_point_from_hits_rejects_garbage() {
        let hits = vec![GeocodeHit {
            lat: "forty".to_string(),
            lon: "-99.64".to_string(),
        }];
        assert!(matches!(
            point_from_hits(&hits),
            Err(Error::GeocodeApi { .. })
        ));
    }

    #[test]
    fn test_fallback_takes_first_hit() {
        let chain = FallbackGeocoder::new(vec![
            Box::new(Fixed(Some(GeoPoint::new(1.0, 2.0)))),
            Box::new(Fixed(Some(GeoPoint::new(9.0, 9.0)))),
        ]);
        assert_eq!(
            chain.geocode("anything").unwrap(),
            Some(GeoPoint::new(1.0, 2.0))
        );
    }

    #[test]
    fn test_fallback_skips_failures_and_misses() {
        let chain = FallbackGeocoder::new(vec![
            Box::new(Failing),
            Box::new(Fixed(None)),
            Box::new(Fixed(Some(GeoPoint::new(3.0, 4.0)))),
        ]);
        assert_eq!(
            chain.geocode("anything").unwrap(),
            Some(GeoPoint::new(3.0, 4.0))
        );
    }

    #[test]
    fn test_fallback_exhausted_is_none() {
        let chain = FallbackGeocoder::new(vec![Box::new(Failing), Box::new(Fixed(None))]);
        assert_eq!(chain.geocode("anything").unwrap(), None);
    }
}
