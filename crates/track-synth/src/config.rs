//! Configuration types for activity generation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::GeoPoint;
use crate::heart_rate::HeartRatePolicy;
use crate::plan::{LapCount, LapPace};

/// Pre-defined track locations.
#[derive(Debug, Clone, Copy)]
pub struct Venue;

impl Venue {
    /// Campus athletics oval the activities are laid out on.
    pub const CAMPUS_OVAL: GeoPoint = GeoPoint::new(34.197550, 117.173188);
}

/// How timestamps are written into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampStyle {
    /// `2024-06-01T08:00:00`, no zone designator.
    #[default]
    Naive,
    /// `2024-06-01T08:00:00Z`.
    Utc,
}

impl TimestampStyle {
    /// Suffix appended after the seconds field.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Naive => "",
            Self::Utc => "Z",
        }
    }
}

/// Error for option values given as strings (CLI flags, environment).
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for TimestampStyle {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" | "local" | "none" => Ok(Self::Naive),
            "utc" | "z" => Ok(Self::Utc),
            _ => Err(ParseOptionError {
                kind: "timestamp style",
                value: s.to_string(),
                expected: "naive, utc",
            }),
        }
    }
}

impl fmt::Display for TimestampStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive => f.write_str("naive"),
            Self::Utc => f.write_str("utc"),
        }
    }
}

impl FromStr for HeartRatePolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" | "cosine-ramp" => Ok(Self::cosine()),
            "linear" | "linear-ramp" => Ok(Self::linear()),
            _ => Err(ParseOptionError {
                kind: "heart rate policy",
                value: s.to_string(),
                expected: "cosine, linear",
            }),
        }
    }
}

/// Configuration for a [`TrajectoryGenerator`](crate::TrajectoryGenerator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// How many laps an activity covers.
    pub laps: LapCount,

    /// Seconds spent on each lap.
    pub pace: LapPace,

    /// Sample points emitted per lap.
    pub points_per_lap: u32,

    /// Heart rate curve applied across the activity.
    pub heart_rate: HeartRatePolicy,

    /// Zone designator convention for timestamps.
    pub timestamps: TimestampStyle,

    /// Center of the oval.
    pub center: GeoPoint,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            laps: LapCount::default(),
            pace: LapPace::default(),
            points_per_lap: 100,
            heart_rate: HeartRatePolicy::default(),
            timestamps: TimestampStyle::Naive,
            center: Venue::CAMPUS_OVAL,
        }
    }
}

impl GeneratorConfig {
    /// Five fixed laps at 200 s each, a linear heart rate ramp and UTC
    /// timestamps.
    pub fn standalone() -> Self {
        Self {
            laps: LapCount::Fixed(5.0),
            pace: LapPace::fixed(200),
            heart_rate: HeartRatePolicy::linear(),
            timestamps: TimestampStyle::Utc,
            ..Default::default()
        }
    }
}
