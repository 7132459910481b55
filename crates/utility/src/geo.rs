use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

static BOUNDING_BOX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d+\.?\d*,-?\d+\.?\d*,-?\d+\.?\d*,-?\d+\.?\d*$")
        .expect("valid bounding box regex")
});

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// An axis-aligned rectangle in latitude/longitude space.
///
/// Bounds are taken as given: min/max pairs are not swapped when supplied
/// out of order, and boxes crossing the ±180° meridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Inclusive on all four edges.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.min_lat <= lat
            && lat <= self.max_lat
            && self.min_lng <= lng
            && lng <= self.max_lng
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBoxFormatError;

impl std::fmt::Display for BoundingBoxFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "expected four comma-separated decimal numbers without spaces"
        )
    }
}

impl std::error::Error for BoundingBoxFormatError {}

impl FromStr for BoundingBox {
    type Err = BoundingBoxFormatError;

    /// Parses the positional form `minLat,minLng,maxLat,maxLng`, e.g.
    /// `55.9,37.5,56.0,37.6`. Signed decimals only, no embedded whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !BOUNDING_BOX_RE.is_match(s) {
            return Err(BoundingBoxFormatError);
        }
        // the regex guarantees exactly four parseable parts
        let mut bounds = [0.0; 4];
        for (bound, part) in bounds.iter_mut().zip(s.split(',')) {
            *bound = part.parse().map_err(|_| BoundingBoxFormatError)?;
        }
        Ok(BoundingBox {
            min_lat: bounds[0],
            min_lng: bounds[1],
            max_lat: bounds[2],
            max_lng: bounds[3],
        })
    }
}

/// Rectangular pre-filter window for a radius search, using the
/// equirectangular approximation. Near the poles the cosine scaling blows
/// the longitude range up towards infinity, which effectively disables the
/// longitude bounds rather than producing wrong ones.
pub fn search_window(lat: f64, lng: f64, radius_km: f64) -> BoundingBox {
    let lat_range = radius_km / KM_PER_DEGREE;
    let lng_range = radius_km / (KM_PER_DEGREE * to_radians(lat).cos());

    BoundingBox {
        min_lat: lat - lat_range,
        min_lng: lng - lng_range,
        max_lat: lat + lat_range,
        max_lng: lng + lng_range,
    }
}

/// Great-circle distance in kilometers, spherical law of cosines form.
pub fn great_circle_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);
    let dlon_rad = to_radians(longitude_2) - to_radians(longitude_1);

    // floating point drift can push the cosine sum just past 1.0 for
    // near-identical points, which would make acos return NaN
    let central = (lat1_rad.cos() * lat2_rad.cos() * dlon_rad.cos()
        + lat1_rad.sin() * lat2_rad.sin())
    .clamp(-1.0, 1.0);

    EARTH_RADIUS_KM * central.acos()
}
