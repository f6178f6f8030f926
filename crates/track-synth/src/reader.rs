//! TCX document parsing.
//!
//! Reads back the subset of Training Center XML this crate writes: one
//! activity, its laps, and trackpoints with position, cumulative distance and
//! heart rate.

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use time::macros::format_description;

use crate::config::TimestampStyle;
use crate::geometry::{GeoPoint, haversine_distance};
use crate::tcx::format_timestamp;

/// Error type for parsing failures
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("TCX document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Failed to parse TCX document: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("Invalid timestamp '{0}'")]
    Timestamp(String),
    #[error("TCX document contains no activity")]
    NoActivity,
}

/// A trackpoint read from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTrackpoint {
    pub time: Option<PrimitiveDateTime>,
    pub position: Option<GeoPoint>,
    pub distance_m: Option<f64>,
    pub heart_rate_bpm: Option<u16>,
}

/// Result of parsing a TCX document.
#[derive(Debug, Clone)]
pub struct ParsedActivity {
    pub sport: String,
    pub started_at: Option<PrimitiveDateTime>,
    /// Sum over laps.
    pub total_time_seconds: f64,
    /// Sum over laps.
    pub distance_m: f64,
    pub points: Vec<ParsedTrackpoint>,
}

/// Headline figures of a parsed activity.
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub sport: String,
    pub point_count: usize,
    pub first_time: Option<String>,
    pub last_time: Option<String>,
    pub total_time_seconds: f64,
    pub distance_m: f64,
    pub final_distance_m: Option<f64>,
    /// Haversine length of the positions in order.
    pub path_length_m: f64,
    pub min_heart_rate_bpm: Option<u16>,
    pub max_heart_rate_bpm: Option<u16>,
    pub timestamps_increasing: bool,
    pub distances_non_decreasing: bool,
}

impl ParsedActivity {
    pub fn summary(&self) -> ActivitySummary {
        let times: Vec<PrimitiveDateTime> = self.points.iter().filter_map(|p| p.time).collect();
        let distances: Vec<f64> = self.points.iter().filter_map(|p| p.distance_m).collect();
        let positions: Vec<GeoPoint> = self.points.iter().filter_map(|p| p.position).collect();
        let heart_rates = self.points.iter().filter_map(|p| p.heart_rate_bpm);

        let path_length_m = positions
            .windows(2)
            .map(|w| haversine_distance(w[0], w[1]))
            .sum();

        ActivitySummary {
            sport: self.sport.clone(),
            point_count: self.points.len(),
            first_time: times.first().map(|t| format_timestamp(*t, TimestampStyle::Naive)),
            last_time: times.last().map(|t| format_timestamp(*t, TimestampStyle::Naive)),
            total_time_seconds: self.total_time_seconds,
            distance_m: self.distance_m,
            final_distance_m: distances.last().copied(),
            path_length_m,
            min_heart_rate_bpm: heart_rates.clone().min(),
            max_heart_rate_bpm: heart_rates.max(),
            timestamps_increasing: times.windows(2).all(|w| w[0] < w[1]),
            distances_non_decreasing: distances.windows(2).all(|w| w[0] <= w[1]),
        }
    }
}

/// Parse a TCX document, returning its first activity.
pub fn parse_tcx(bytes: &[u8]) -> Result<ParsedActivity, ReadError> {
    let content = std::str::from_utf8(bytes)?;
    let tcx: TrainingCenterDatabase = quick_xml::de::from_str(content)?;

    let activity = tcx
        .activities
        .and_then(|a| a.activity.into_iter().next())
        .ok_or(ReadError::NoActivity)?;

    let started_at = activity
        .lap
        .first()
        .and_then(|lap| lap.start_time.as_deref())
        .map(parse_timestamp)
        .transpose()?;

    let mut total_time_seconds = 0.0;
    let mut distance_m = 0.0;
    let mut points = Vec::new();

    for lap in activity.lap {
        total_time_seconds += lap.total_time_seconds.unwrap_or(0.0);
        distance_m += lap.distance_meters.unwrap_or(0.0);

        for track in lap.track {
            for trackpoint in track.trackpoint {
                points.push(ParsedTrackpoint {
                    time: trackpoint.time.as_deref().map(parse_timestamp).transpose()?,
                    position: trackpoint
                        .position
                        .map(|p| GeoPoint::new(p.latitude_degrees, p.longitude_degrees)),
                    distance_m: trackpoint.distance_meters,
                    heart_rate_bpm: trackpoint.heart_rate_bpm.map(|hr| hr.value),
                });
            }
        }
    }

    Ok(ParsedActivity {
        sport: activity.sport,
        started_at,
        total_time_seconds,
        distance_m,
        points,
    })
}

/// Parses `YYYY-MM-DDTHH:MM:SS[.fraction][Z]`.
pub fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime, ReadError> {
    let invalid = || ReadError::Timestamp(raw.to_string());
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let (base, fraction) = match trimmed.split_once('.') {
        Some((base, fraction)) => (base, Some(fraction)),
        None => (trimmed, None),
    };

    let parsed = PrimitiveDateTime::parse(
        base,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .map_err(|_| invalid())?;

    let Some(fraction) = fraction else {
        return Ok(parsed);
    };
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    // Keep microsecond precision
    let digits: String = fraction.chars().chain("000000".chars()).take(6).collect();
    let micros: u32 = digits.parse().map_err(|_| invalid())?;
    parsed.replace_microsecond(micros).map_err(|_| invalid())
}

// TCX XML structures

#[derive(Debug, Deserialize)]
#[serde(rename = "TrainingCenterDatabase")]
struct TrainingCenterDatabase {
    #[serde(rename = "Activities")]
    activities: Option<Activities>,
}

#[derive(Debug, Deserialize)]
struct Activities {
    #[serde(rename = "Activity", default)]
    activity: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
struct Activity {
    #[serde(rename = "@Sport")]
    sport: String,
    #[serde(rename = "Lap", default)]
    lap: Vec<Lap>,
}

#[derive(Debug, Deserialize)]
struct Lap {
    #[serde(rename = "@StartTime")]
    start_time: Option<String>,
    #[serde(rename = "TotalTimeSeconds")]
    total_time_seconds: Option<f64>,
    #[serde(rename = "DistanceMeters")]
    distance_meters: Option<f64>,
    #[serde(rename = "Track", default)]
    track: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(rename = "Trackpoint", default)]
    trackpoint: Vec<Trackpoint>,
}

#[derive(Debug, Deserialize)]
struct Trackpoint {
    #[serde(rename = "Time")]
    time: Option<String>,
    #[serde(rename = "Position")]
    position: Option<Position>,
    #[serde(rename = "DistanceMeters")]
    distance_meters: Option<f64>,
    #[serde(rename = "HeartRateBpm")]
    heart_rate_bpm: Option<HeartRateBpm>,
}

#[derive(Debug, Deserialize)]
struct Position {
    #[serde(rename = "LatitudeDegrees")]
    latitude_degrees: f64,
    #[serde(rename = "LongitudeDegrees")]
    longitude_degrees: f64,
}

#[derive(Debug, Deserialize)]
struct HeartRateBpm {
    #[serde(rename = "Value")]
    value: u16,
}
