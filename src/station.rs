//! Fuel stations and the delimited price-table loader.
//!
//! Real-world price tables are messy: header casing and spacing vary, the
//! price column is sometimes called `Retail Price`, and coordinate columns
//! may be absent entirely. The loader normalizes headers, drops rows missing
//! essentials, and can fill missing coordinates through a [`Geocoder`].

use std::path::Path;
use std::time::Duration;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::geocode::normalize_query;
use crate::traits::Geocoder;

/// Station name used when the table has no usable name column.
const UNKNOWN_NAME: &str = "Unknown";

/// A fuel station with its posted price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub location: GeoPoint,
    pub price_per_gallon: f64,
    pub name: String,
}

/// Loads a station table whose coordinate columns are already populated.
pub fn load_stations(path: impl AsRef<Path>) -> Result<Vec<Station>> {
    load(path.as_ref(), None)
}

/// Loads a station table, geocoding rows whose coordinates are missing.
///
/// Queries are built from the city/state columns; `delay` is slept after
/// each geocoding call to respect provider rate limits. Rows that still
/// cannot be resolved are dropped with a warning.
pub fn load_stations_geocoded(
    path: impl AsRef<Path>,
    geocoder: &dyn Geocoder,
    delay: Duration,
) -> Result<Vec<Station>> {
    load(path.as_ref(), Some((geocoder, delay)))
}

fn load(path: &Path, geocoder: Option<(&dyn Geocoder, Duration)>) -> Result<Vec<Station>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let columns = Columns::resolve(reader.headers()?)?;

    if geocoder.is_none() {
        for (column, name) in [(columns.latitude, "latitude"), (columns.longitude, "longitude")] {
            if column.is_none() {
                return Err(Error::MissingColumn {
                    name: name.to_string(),
                });
            }
        }
    }

    let mut stations = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let Some(price) = parse_field(&record, Some(columns.price)) else {
            warn!(row, "skipping station row without a usable price");
            continue;
        };
        if !price.is_finite() || price <= 0.0 {
            warn!(row, price, "skipping station row without a positive finite price");
            continue;
        }

        let location = coordinates_from_columns(&record, &columns).or_else(|| {
            geocoder.and_then(|(geocoder, delay)| {
                geocode_row(&record, &columns, geocoder, delay, row)
            })
        });
        let Some(location) = location else {
            warn!(row, "skipping station row without coordinates");
            continue;
        };
        if location.validate().is_err() {
            warn!(row, lat = location.lat, lon = location.lon, "skipping station row with out-of-range coordinates");
            continue;
        }

        let name = columns
            .name
            .and_then(|i| record.get(i))
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_NAME)
            .to_string();

        stations.push(Station {
            location,
            price_per_gallon: price,
            name,
        });
    }

    info!(count = stations.len(), path = %path.display(), "loaded station table");
    Ok(stations)
}

/// Column layout resolved from normalized headers.
#[derive(Debug)]
struct Columns {
    price: usize,
    name: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    city: Option<usize>,
    state: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let mut price = None;
        let mut name = None;
        let mut latitude = None;
        let mut longitude = None;
        let mut city = None;
        let mut state = None;

        for (index, raw) in headers.iter().enumerate() {
            match normalize_header(raw).as_str() {
                "price" | "retail_price" => price = price.or(Some(index)),
                "truckstop_name" | "name" => name = name.or(Some(index)),
                "latitude" => latitude = Some(index),
                "longitude" => longitude = Some(index),
                "city" => city = Some(index),
                "state" => state = Some(index),
                _ => {}
            }
        }

        let price = price.ok_or_else(|| Error::MissingColumn {
            name: "price".to_string(),
        })?;

        Ok(Self {
            price,
            name,
            latitude,
            longitude,
            city,
            state,
        })
    }
}

/// Lowercase, trimmed, spaces replaced with underscores.
fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

fn parse_field(record: &StringRecord, index: Option<usize>) -> Option<f64> {
    index
        .and_then(|i| record.get(i))
        .and_then(|value| value.parse::<f64>().ok())
}

fn coordinates_from_columns(record: &StringRecord, columns: &Columns) -> Option<GeoPoint> {
    let lat = parse_field(record, columns.latitude)?;
    let lon = parse_field(record, columns.longitude)?;
    Some(GeoPoint::new(lat, lon))
}

fn geocode_row(
    record: &StringRecord,
    columns: &Columns,
    geocoder: &dyn Geocoder,
    delay: Duration,
    row: usize,
) -> Option<GeoPoint> {
    let field = |index: Option<usize>| {
        index
            .and_then(|i| record.get(i))
            .filter(|value| !value.is_empty())
    };
    let (Some(city), Some(state)) = (field(columns.city), field(columns.state)) else {
        warn!(row, "row has no coordinates and no city/state to geocode");
        return None;
    };

    let query = normalize_query(&format!("{city}, {state}"));
    let result = match geocoder.geocode(&query) {
        Ok(Some(point)) => Some(point),
        Ok(None) => {
            warn!(row, query, "geocoding found no match for station row");
            None
        }
        Err(err) => {
            warn!(row, query, %err, "geocoding failed for station row");
            None
        }
    };
    std::thread::sleep(delay);
    result
}
