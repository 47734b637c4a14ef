//! Spherical geometry helpers shared by the network builder, the
//! instruction synthesizer and the navigation tracker.
//!
//! Everything inside the crate works latitude-first. Input GeoJSON is
//! longitude-first; the conversions below are the only place that order is
//! handled.

use std::fmt;

use geo::{Bearing, Coord, Distance, Haversine, InterpolatePoint, Point};
use serde::{Deserialize, Serialize};

use crate::Meters;

/// A WGS84 position in degrees, latitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Position on the unit sphere. Chord length between two of these is
    /// monotonic in great-circle distance.
    pub(crate) fn to_unit_vector(self) -> [f64; 3] {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Coord {
            x: coordinate.lon,
            y: coordinate.lat,
        }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_point()
    }
}

/// Great-circle distance in meters
pub fn haversine(a: Coordinate, b: Coordinate) -> Meters {
    Haversine.distance(a.to_point(), b.to_point())
}

/// Initial compass bearing from `from` to `to`, degrees in `[0, 360)`
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    Haversine
        .bearing(from.to_point(), to.to_point())
        .rem_euclid(360.0)
}

/// Signed smallest difference from bearing `from` to bearing `to`,
/// in `(-180, 180]`. Positive means clockwise (rightwards).
pub fn delta_angle(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Point at `ratio` of the way from `a` to `b` along the great circle
pub fn interpolate(a: Coordinate, b: Coordinate, ratio: f64) -> Coordinate {
    Haversine
        .point_at_ratio_between(a.to_point(), b.to_point(), ratio)
        .into()
}

/// Sum of consecutive great-circle distances
pub fn path_length(coordinates: &[Coordinate]) -> Meters {
    coordinates
        .windows(2)
        .map(|pair| haversine(pair[0], pair[1]))
        .sum()
}

/// Human readable distance: whole meters below a kilometer,
/// otherwise kilometers with one decimal
pub fn format_distance(meters: Meters) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round())
    }
}

/// Eight-way compass octant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassDirection {
    const OCTANTS: [CompassDirection; 8] = [
        CompassDirection::N,
        CompassDirection::NE,
        CompassDirection::E,
        CompassDirection::SE,
        CompassDirection::S,
        CompassDirection::SW,
        CompassDirection::W,
        CompassDirection::NW,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NE => "NE",
            CompassDirection::E => "E",
            CompassDirection::SE => "SE",
            CompassDirection::S => "S",
            CompassDirection::SW => "SW",
            CompassDirection::W => "W",
            CompassDirection::NW => "NW",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Octant closest to `bearing` (degrees, any range)
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compass_direction(bearing: f64) -> CompassDirection {
    let octant = (bearing.rem_euclid(360.0) / 45.0).round() as usize % 8;
    CompassDirection::OCTANTS[octant]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_angle_wraps_around_north() {
        assert!((delta_angle(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((delta_angle(10.0, 350.0) + 20.0).abs() < 1e-9);
        assert!((delta_angle(0.0, 180.0) - 180.0).abs() < 1e-9);
        assert!((delta_angle(180.0, 0.0) - 180.0).abs() < 1e-9);
        assert!(delta_angle(90.0, 90.0).abs() < 1e-9);
    }

    #[test]
    fn compass_octants() {
        assert_eq!(compass_direction(0.0), CompassDirection::N);
        assert_eq!(compass_direction(359.0), CompassDirection::N);
        assert_eq!(compass_direction(44.0), CompassDirection::NE);
        assert_eq!(compass_direction(91.0), CompassDirection::E);
        assert_eq!(compass_direction(180.0), CompassDirection::S);
        assert_eq!(compass_direction(270.0), CompassDirection::W);
        assert_eq!(compass_direction(-45.0), CompassDirection::NW);
    }

    #[test]
    fn bearings_point_the_right_way() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!(bearing(origin, Coordinate::new(0.01, 0.0)).abs() < 1e-6);
        assert!((bearing(origin, Coordinate::new(0.0, 0.01)) - 90.0).abs() < 1e-6);
        assert!((bearing(origin, Coordinate::new(-0.01, 0.0)) - 180.0).abs() < 1e-6);
        assert!((bearing(origin, Coordinate::new(0.0, -0.01)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn haversine_of_a_hundredth_degree_of_latitude() {
        let d = haversine(Coordinate::new(0.0, 0.0), Coordinate::new(0.01, 0.0));
        assert!((d - 1111.95).abs() < 1.0, "got {d}");
    }

    #[test]
    fn interpolation_splits_distance() {
        let a = Coordinate::new(28.694, -81.564);
        let b = Coordinate::new(28.695, -81.563);
        let mid = interpolate(a, b, 0.5);
        let total = haversine(a, b);
        assert!((haversine(a, mid) - total / 2.0).abs() < 1e-6);
        assert!((haversine(mid, b) - total / 2.0).abs() < 1e-6);
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(12.4), "12 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(2345.0), "2.3 km");
    }
}
