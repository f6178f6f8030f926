//! Oval track geometry.
//!
//! The track is a closed path of four segments traversed counter-clockwise
//! when seen from above, starting at the south end of the west straight:
//!
//! | Segment       | Lap distance  | Heading |
//! |---------------|---------------|---------|
//! | West straight | [0, 100)      | north   |
//! | North curve   | [100, 200)    | east    |
//! | East straight | [200, 300)    | south   |
//! | South curve   | [300, 400]    | west    |
//!
//! Meters are converted to degrees with a flat-earth approximation around
//! the track center, which is accurate enough for a ~100 m track and keeps
//! output reproducible.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::LAP_DISTANCE_M;

/// Meters per degree of latitude.
pub const METERS_PER_DEGREE: f64 = 111_111.0;

/// Tolerance used when comparing distances in meters.
pub const DISTANCE_EPSILON_M: f64 = 1e-6;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Conversion from local meters to degrees around a reference latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeScale {
    lat_deg_per_m: f64,
    lon_deg_per_m: f64,
}

impl DegreeScale {
    /// Builds the scale for a reference latitude in degrees.
    pub fn at_latitude(lat_deg: f64) -> Self {
        Self {
            lat_deg_per_m: 1.0 / METERS_PER_DEGREE,
            lon_deg_per_m: 1.0 / (METERS_PER_DEGREE * lat_deg.to_radians().cos()),
        }
    }

    /// Northward offset in degrees for a distance in meters.
    pub fn lat_degrees(&self, meters: f64) -> f64 {
        meters * self.lat_deg_per_m
    }

    /// Eastward offset in degrees for a distance in meters.
    pub fn lon_degrees(&self, meters: f64) -> f64 {
        meters * self.lon_deg_per_m
    }
}

/// The four pieces of the oval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSegment {
    WestStraight,
    NorthCurve,
    EastStraight,
    SouthCurve,
}

/// Fixed oval path around a center coordinate.
#[derive(Debug, Clone)]
pub struct OvalTrack {
    straight_length_m: f64,
    curve_length_m: f64,
    radius_m: f64,
    center: GeoPoint,
    scale: DegreeScale,
    north_curve_lat: f64,
    south_curve_lat: f64,
}

impl OvalTrack {
    /// Straight length in meters.
    pub const STRAIGHT_LENGTH_M: f64 = 100.0;
    /// Semicircle arc length in meters.
    pub const CURVE_LENGTH_M: f64 = 100.0;

    /// Creates the standard 400 m oval centered on `center`.
    pub fn new(center: GeoPoint) -> Self {
        let straight_length_m = Self::STRAIGHT_LENGTH_M;
        let curve_length_m = Self::CURVE_LENGTH_M;
        let scale = DegreeScale::at_latitude(center.lat);
        let half_straight_deg = scale.lat_degrees(straight_length_m / 2.0);

        Self {
            straight_length_m,
            curve_length_m,
            radius_m: curve_length_m / PI,
            center,
            scale,
            north_curve_lat: center.lat + half_straight_deg,
            south_curve_lat: center.lat - half_straight_deg,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn lap_distance_m(&self) -> f64 {
        2.0 * self.straight_length_m + 2.0 * self.curve_length_m
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Where every lap starts and ends: the south end of the west straight.
    pub fn start(&self) -> GeoPoint {
        GeoPoint::new(
            self.south_curve_lat,
            self.center.lon - self.scale.lon_degrees(self.radius_m),
        )
    }

    /// Reduces a cumulative activity distance to the distance within the
    /// current lap.
    ///
    /// A nonzero multiple of the lap distance maps to the full lap distance
    /// rather than 0, so the last point of each lap lands on the start
    /// coordinate through the closing branch.
    pub fn distance_in_lap(&self, total_m: f64) -> f64 {
        let lap = self.lap_distance_m();
        if total_m.abs() <= DISTANCE_EPSILON_M {
            return 0.0;
        }

        let within = total_m.rem_euclid(lap);
        if within <= DISTANCE_EPSILON_M || lap - within <= DISTANCE_EPSILON_M {
            lap
        } else {
            within
        }
    }

    /// Which segment a distance within the lap falls on.
    pub fn segment_at(&self, lap_m: f64) -> TrackSegment {
        let s = self.straight_length_m;
        let c = self.curve_length_m;

        if lap_m < s {
            TrackSegment::WestStraight
        } else if lap_m < s + c {
            TrackSegment::NorthCurve
        } else if lap_m < 2.0 * s + c {
            TrackSegment::EastStraight
        } else {
            TrackSegment::SouthCurve
        }
    }

    /// Maps a distance within the lap (meters) to a position.
    ///
    /// Distances outside `[0, lap]` are clamped.
    pub fn position_at(&self, lap_m: f64) -> GeoPoint {
        let lap = self.lap_distance_m();
        let d = lap_m.clamp(0.0, lap);
        let s = self.straight_length_m;
        let c = self.curve_length_m;
        let lane_span_deg = self.north_curve_lat - self.south_curve_lat;
        let radius_lon_deg = self.scale.lon_degrees(self.radius_m);

        match self.segment_at(d) {
            TrackSegment::WestStraight => {
                let progress = d / s;
                GeoPoint::new(
                    self.south_curve_lat + progress * lane_span_deg,
                    self.center.lon - radius_lon_deg,
                )
            }
            TrackSegment::NorthCurve => {
                let angle = PI - (d - s) / c * PI;
                self.on_curve(self.north_curve_lat, angle)
            }
            TrackSegment::EastStraight => {
                let progress = (d - s - c) / s;
                GeoPoint::new(
                    self.north_curve_lat - progress * lane_span_deg,
                    self.center.lon + radius_lon_deg,
                )
            }
            TrackSegment::SouthCurve => {
                if lap - d <= DISTANCE_EPSILON_M {
                    return self.start();
                }
                let on_curve = (d - 2.0 * s - c).clamp(0.0, c);
                let angle = 2.0 * PI - on_curve / c * PI;
                self.on_curve(self.south_curve_lat, angle)
            }
        }
    }

    /// Point on a semicircle centered at (`curve_lat`, center longitude).
    fn on_curve(&self, curve_lat: f64, angle_rad: f64) -> GeoPoint {
        GeoPoint::new(
            curve_lat + self.scale.lat_degrees(self.radius_m) * angle_rad.sin(),
            self.center.lon + self.scale.lon_degrees(self.radius_m) * angle_rad.cos(),
        )
    }
}

impl Default for OvalTrack {
    fn default() -> Self {
        Self::new(crate::Venue::CAMPUS_OVAL)
    }
}

const _: () = assert!(
    2.0 * OvalTrack::STRAIGHT_LENGTH_M + 2.0 * OvalTrack::CURVE_LENGTH_M == LAP_DISTANCE_M
);

/// Haversine distance between two points in meters.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}
