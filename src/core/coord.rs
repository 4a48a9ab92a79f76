// GeoEval - core/coord.rs
//
// Latitude/longitude value type and the factory seam the extractor uses to
// build coordinates from parsed degree values.

use crate::util::constants;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe, stored as latitude/longitude in degrees.
///
/// Equality is by value. No range validation is performed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn from_degrees(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat_radians(&self) -> f64 {
        self.lat.to_radians()
    }

    pub fn lng_radians(&self) -> f64 {
        self.lng.to_radians()
    }

    /// Great-circle angular distance to `other`, in radians.
    ///
    /// Spherical law of cosines. The cosine term is clamped to [-1, 1] so
    /// rounding on near-identical points cannot produce NaN.
    pub fn distance(&self, other: &Coordinate) -> f64 {
        if self == other {
            return 0.0;
        }
        let (lat1, lat2) = (self.lat_radians(), other.lat_radians());
        let dlng = other.lng_radians() - self.lng_radians();
        let cos = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlng.cos();
        cos.clamp(-1.0, 1.0).acos()
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        constants::EARTH_RADIUS_KM * self.distance(other)
    }

    pub fn distance_mi(&self, other: &Coordinate) -> f64 {
        constants::MILES_PER_KM * self.distance_km(other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2},{:.2}", self.lat, self.lng)
    }
}

/// Builds a [`Coordinate`] from a latitude/longitude pair in degrees.
///
/// The extractor never validates ranges; a factory that wants to reject or
/// normalise values does so here.
pub trait CoordinateFactory {
    fn from_degrees(&self, lat: f64, lng: f64) -> Coordinate;
}

/// Pass-through factory: stores degrees as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreesFactory;

impl CoordinateFactory for DegreesFactory {
    fn from_degrees(&self, lat: f64, lng: f64) -> Coordinate {
        Coordinate::from_degrees(lat, lng)
    }
}

impl<F> CoordinateFactory for F
where
    F: Fn(f64, f64) -> Coordinate,
{
    fn from_degrees(&self, lat: f64, lng: f64) -> Coordinate {
        self(lat, lng)
    }
}
