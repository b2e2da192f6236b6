//! Planar coordinates, extents and the prediction lattice
//!
//! Coordinates are treated as planar degree-units: `lng` on the x-axis,
//! `lat` on the y-axis. No geodesic correction is applied anywhere.

use serde::{Deserialize, Serialize};

pub const MAX_LAT: f64 = 90.0;
pub const MAX_LNG: f64 = 180.0;

/// A planar (lat, lng) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Squared Euclidean distance in degree-units
    #[inline]
    pub fn dist_sq(&self, other: &LatLng) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        dlat * dlat + dlng * dlng
    }

    /// Euclidean distance in degree-units
    #[inline]
    pub fn dist(&self, other: &LatLng) -> f64 {
        self.dist_sq(other).sqrt()
    }

    /// Finite, with `|lat| <= 90` and `|lng| <= 180`
    pub fn in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= MAX_LAT
            && self.lng.abs() <= MAX_LNG
    }
}

/// Axis-aligned extent in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self { south, west, north, east }
    }

    /// Smallest extent containing every location, `None` when empty
    pub fn of(locations: &[LatLng]) -> Option<Self> {
        let first = locations.first()?;
        let init = Bounds::new(first.lat, first.lng, first.lat, first.lng);
        Some(locations.iter().fold(init, |b, p| Bounds {
            south: b.south.min(p.lat),
            west: b.west.min(p.lng),
            north: b.north.max(p.lat),
            east: b.east.max(p.lng),
        }))
    }

    pub fn lat_range(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_range(&self) -> f64 {
        self.east - self.west
    }

    /// Grow every side by `amount` degrees
    pub fn expand(&self, amount: f64) -> Self {
        Bounds {
            south: self.south - amount,
            west: self.west - amount,
            north: self.north + amount,
            east: self.east + amount,
        }
    }

    /// Grow each axis by `ratio` of its own range on both sides
    pub fn pad(&self, ratio: f64) -> Self {
        let dlat = self.lat_range().abs() * ratio;
        let dlng = self.lng_range().abs() * ratio;
        Bounds {
            south: self.south - dlat,
            west: self.west - dlng,
            north: self.north + dlat,
            east: self.east + dlng,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: &LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    /// Both corners are valid coordinates
    pub fn in_range(&self) -> bool {
        LatLng::new(self.south, self.west).in_range() && LatLng::new(self.north, self.east).in_range()
    }

    /// Whether `other` lies entirely inside this extent
    pub fn covers(&self, other: &Bounds) -> bool {
        self.south <= other.south
            && self.west <= other.west
            && self.north >= other.north
            && self.east >= other.east
    }
}

/// The lattice of prediction locations over an extent.
///
/// Nodes are stored row-major from south-west to north-east.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub bounds: Bounds,
    /// Step between nodes in degrees, identical on both axes
    pub cell_size: f64,
    pub rows: usize,
    pub cols: usize,
    pub nodes: Vec<LatLng>,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[LatLng] {
        &self.nodes
    }
}

/// One evaluated grid location and the layers computed for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// observed - predicted at the nearest sample; opposite in sign to
    /// `Metrics::bias`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliable: Option<bool>,
}

impl GridCell {
    pub fn new(lat: f64, lng: f64, value: f64) -> Self {
        Self {
            lat,
            lng,
            value,
            class: None,
            accuracy: None,
            residual: None,
            uncertainty: None,
            reliable: None,
        }
    }

    pub fn location(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}
