//! Hotel-to-attraction distance computation
//!
//! Unions the hotel datasets into one standardized point set, projects the
//! attraction dataset the same way, forms the full cross product, and keeps
//! pairs within [`NEARBY_RADIUS_KM`]. There is no spatial index; the cross
//! product is the dominant cost of the pipeline at scale but acceptable at
//! the data volumes involved.
//!
//! Records without both coordinates are excluded before the join. The
//! formula itself still tolerates nulls and yields no distance rather than
//! panicking.

use crate::types::{ColumnKind, ColumnSpec, Dataset, Row};
use serde_json::Value;
use tracing::{info, warn};


/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Maximum hotel-to-attraction distance retained in the output
pub const NEARBY_RADIUS_KM: f64 = 10.0;

/// Great-circle distance between two coordinate pairs, in kilometers
///
/// Haversine formula. Any missing input yields `None`.
pub fn haversine_km(
    lat1: Option<f64>,
    lon1: Option<f64>,
    lat2: Option<f64>,
    lon2: Option<f64>,
) -> Option<f64> {
    let (lat1, lon1, lat2, lon2) = (lat1?, lon1?, lat2?, lon2?);

    let (rlat1, rlon1) = (lat1.to_radians(), lon1.to_radians());
    let (rlat2, rlon2) = (lat2.to_radians(), lon2.to_radians());

    let dlat = rlat2 - rlat1;
    let dlon = rlon2 - rlon1;
    let a = (dlat / 2.0).sin().powi(2) + rlat1.cos() * rlat2.cos() * (dlon / 2.0).sin().powi(2);

    Some(2.0 * EARTH_RADIUS_KM * a.sqrt().asin())
}

/// A hotel standardized for the join
#[derive(Debug, Clone)]
struct HotelPoint {
    name: Value,
    latitude: f64,
    longitude: f64,
    platform: Value,
}

/// An attraction standardized for the join
#[derive(Debug, Clone)]
struct AttractionPoint {
    name: Value,
    latitude: f64,
    longitude: f64,
    category: Value,
}

fn coord(row: &Row, column: &str) -> Option<f64> {
    row.get(column).and_then(Value::as_f64)
}

fn text(row: &Row, column: &str) -> Value {
    row.get(column).cloned().unwrap_or(Value::Null)
}

/// Extract hotels with non-null coordinates from the hotel datasets
fn collect_hotels(hotel_datasets: &[&Dataset]) -> Vec<HotelPoint> {
    let mut hotels = Vec::new();
    for dataset in hotel_datasets {
        for row in &dataset.rows {
            let (Some(latitude), Some(longitude)) = (coord(row, "latitude"), coord(row, "longitude"))
            else {
                continue;
            };
            hotels.push(HotelPoint {
                name: text(row, "hotel_name"),
                latitude,
                longitude,
                platform: text(row, "platform"),
            });
        }
    }
    hotels
}

/// Extract attractions with non-null coordinates
fn collect_attractions(attractions: &Dataset) -> Vec<AttractionPoint> {
    attractions
        .rows
        .iter()
        .filter_map(|row| {
            let latitude = coord(row, "latitude")?;
            let longitude = coord(row, "longitude")?;
            Some(AttractionPoint {
                name: text(row, "attraction_name"),
                latitude,
                longitude,
                category: text(row, "category_name"),
            })
        })
        .collect()
}

/// Output schema of the distance dataset
pub fn distance_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("hotel_name", ColumnKind::Text),
        ColumnSpec::new("latitude", ColumnKind::Double),
        ColumnSpec::new("longitude", ColumnKind::Double),
        ColumnSpec::new("platform", ColumnKind::Text),
        ColumnSpec::new("attraction_name", ColumnKind::Text),
        ColumnSpec::new("attr_latitude", ColumnKind::Double),
        ColumnSpec::new("attr_longitude", ColumnKind::Double),
        ColumnSpec::new("category_name", ColumnKind::Text),
        ColumnSpec::new("distance_km", ColumnKind::Double),
    ]
}

/// Compute the hotel-attraction pairs within [`NEARBY_RADIUS_KM`]
///
/// Returns `None` when either side is empty after the coordinate filter;
/// missing data is not an error.
pub fn nearby_pairs(hotel_datasets: &[&Dataset], attractions: &Dataset) -> Option<Dataset> {
    let hotels = collect_hotels(hotel_datasets);
    if hotels.is_empty() {
        warn!("No valid hotel location data found");
        return None;
    }

    let attraction_points = collect_attractions(attractions);
    if attraction_points.is_empty() {
        warn!("No valid attraction location data found");
        return None;
    }

    let mut dataset = Dataset::empty("hotel_attraction_distances", distance_columns());

    for hotel in &hotels {
        for attraction in &attraction_points {
            let Some(distance) = haversine_km(
                Some(hotel.latitude),
                Some(hotel.longitude),
                Some(attraction.latitude),
                Some(attraction.longitude),
            ) else {
                continue;
            };
            if distance > NEARBY_RADIUS_KM {
                continue;
            }

            let mut row = Row::new();
            row.insert("hotel_name".to_string(), hotel.name.clone());
            row.insert("latitude".to_string(), double(hotel.latitude));
            row.insert("longitude".to_string(), double(hotel.longitude));
            row.insert("platform".to_string(), hotel.platform.clone());
            row.insert("attraction_name".to_string(), attraction.name.clone());
            row.insert("attr_latitude".to_string(), double(attraction.latitude));
            row.insert("attr_longitude".to_string(), double(attraction.longitude));
            row.insert("category_name".to_string(), attraction.category.clone());
            row.insert("distance_km".to_string(), double(distance));
            dataset.rows.push(row);
        }
    }

    info!(
        "Calculated {} hotel-attraction distance pairs",
        dataset.len()
    );
    Some(dataset)
}

fn double(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}
