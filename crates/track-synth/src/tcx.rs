//! TCX document generation.
//!
//! Writes Garmin Training Center XML v2 with a single running activity and a
//! single lap spanning the whole activity.

use time::PrimitiveDateTime;
use time::macros::format_description;

use crate::config::TimestampStyle;
use crate::trajectory::GeneratedActivity;

pub const TCX_NAMESPACE: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd";

/// Generates a TCX XML document for an activity.
///
/// The document includes:
/// - XML declaration with UTF-8 encoding
/// - One `Running` activity whose lap carries the totals
/// - One trackpoint per sample with position (8 decimals), cumulative
///   distance (2 decimals) and heart rate
pub fn write_tcx(activity: &GeneratedActivity, style: TimestampStyle) -> Vec<u8> {
    let plan = &activity.plan;
    let start = format_timestamp(plan.start, style);
    let mut tcx = String::with_capacity(256 + activity.points.len() * 320);

    tcx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    tcx.push('\n');
    tcx.push_str(&format!(
        r#"<TrainingCenterDatabase xmlns="{TCX_NAMESPACE}" xmlns:xsi="{XSI_NAMESPACE}" xsi:schemaLocation="{SCHEMA_LOCATION}">"#
    ));
    tcx.push('\n');
    tcx.push_str("  <Activities>\n");
    tcx.push_str("    <Activity Sport=\"Running\">\n");
    tcx.push_str(&format!("      <Id>{start}</Id>\n"));

    // One lap spanning the whole activity
    tcx.push_str(&format!("      <Lap StartTime=\"{start}\">\n"));
    tcx.push_str(&format!(
        "        <TotalTimeSeconds>{}</TotalTimeSeconds>\n",
        format_decimal(plan.total_seconds)
    ));
    tcx.push_str(&format!(
        "        <DistanceMeters>{}</DistanceMeters>\n",
        format_decimal(plan.total_distance_m)
    ));
    tcx.push_str("        <Intensity>Active</Intensity>\n");
    tcx.push_str("        <TriggerMethod>Manual</TriggerMethod>\n");
    tcx.push_str("        <Track>\n");

    for point in &activity.points {
        tcx.push_str("          <Trackpoint>\n");
        tcx.push_str(&format!(
            "            <Time>{}</Time>\n",
            format_timestamp(point.time, style)
        ));
        tcx.push_str("            <Position>\n");
        tcx.push_str(&format!(
            "              <LatitudeDegrees>{:.8}</LatitudeDegrees>\n",
            point.position.lat
        ));
        tcx.push_str(&format!(
            "              <LongitudeDegrees>{:.8}</LongitudeDegrees>\n",
            point.position.lon
        ));
        tcx.push_str("            </Position>\n");
        tcx.push_str(&format!(
            "            <DistanceMeters>{:.2}</DistanceMeters>\n",
            point.distance_m
        ));
        tcx.push_str(&format!(
            "            <HeartRateBpm>\n              <Value>{}</Value>\n            </HeartRateBpm>\n",
            point.heart_rate_bpm
        ));
        tcx.push_str("          </Trackpoint>\n");
    }

    tcx.push_str("        </Track>\n");
    tcx.push_str("      </Lap>\n");
    tcx.push_str("    </Activity>\n");
    tcx.push_str("  </Activities>\n");
    tcx.push_str("</TrainingCenterDatabase>\n");

    tcx.into_bytes()
}

/// Download name for an activity starting at `start`: `run_YYYYMMDD_HHMMSS.tcx`.
pub fn file_name_for(start: PrimitiveDateTime) -> String {
    let stamp = start
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_default();
    format!("run_{stamp}.tcx")
}

/// ISO 8601 without offset; microseconds only when nonzero.
pub fn format_timestamp(at: PrimitiveDateTime, style: TimestampStyle) -> String {
    let mut formatted = at
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]"
        ))
        .unwrap_or_default();

    let micros = at.microsecond();
    if micros != 0 {
        formatted.push_str(&format!(".{micros:06}"));
    }
    formatted.push_str(style.suffix());
    formatted
}

/// Shortest decimal that round-trips, always with a fractional part.
fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
