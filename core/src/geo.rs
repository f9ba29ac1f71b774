use serde::{Deserialize, Serialize};

use crate::*;

/// Mean Earth radius in meters, matching the one used by web map libraries.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// A `(latitude, longitude)` pair in degrees, serialized as `[lat, lng]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GameError::InvalidCoordinate)
        }
    }

    /// Straight (componentwise) interpolation, `k` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Coordinate, k: f64) -> Coordinate {
        let k = clamp(k, 0.0, 1.0);
        Coordinate {
            lat: self.lat + k * (to.lat - self.lat),
            lng: self.lng + k * (to.lng - self.lng),
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coords: Coordinate) -> Self {
        [coords.lat, coords.lng]
    }
}

impl core::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Distance provider between two coordinates, in meters.
pub trait Geodesy {
    fn distance(&self, a: Coordinate, b: Coordinate) -> f64;
}

impl<G: Geodesy + ?Sized> Geodesy for &G {
    fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        (**self).distance(a, b)
    }
}

/// Great-circle distance on a spherical Earth.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Haversine;

impl Geodesy for Haversine {
    fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        let phi_1 = a.lat.to_radians();
        let phi_2 = b.lat.to_radians();
        let delta_phi = (b.lat - a.lat).to_radians();
        let delta_lambda = (b.lng - a.lng).to_radians();
        let h = (delta_phi / 2.0).sin().powi(2)
            + phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS * c
    }
}

/// Axis-aligned box, serialized as `[[south, west], [north, east]]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Coordinate; 2]", into = "[Coordinate; 2]")]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn from_coords(coords: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut coords = coords.into_iter();
        let first = coords.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for coord in coords {
            bounds.extend(coord);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, coord: Coordinate) {
        self.south_west.lat = self.south_west.lat.min(coord.lat);
        self.south_west.lng = self.south_west.lng.min(coord.lng);
        self.north_east.lat = self.north_east.lat.max(coord.lat);
        self.north_east.lng = self.north_east.lng.max(coord.lng);
    }
}

impl From<[Coordinate; 2]> for Bounds {
    fn from([a, b]: [Coordinate; 2]) -> Self {
        let mut bounds = Self {
            south_west: a,
            north_east: a,
        };
        bounds.extend(b);
        bounds
    }
}

impl From<Bounds> for [Coordinate; 2] {
    fn from(bounds: Bounds) -> Self {
        [bounds.south_west, bounds.north_east]
    }
}
