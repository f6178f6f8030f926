//! Synthetic running activities on an oval track.
//!
//! This crate builds plausible GPS running activities for a runner looping a
//! 400 m oval: timestamps, positions, cumulative distances and heart rate,
//! serialized as a TCX document.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use track_synth::prelude::*;
//!
//! let generator = TrajectoryGenerator::new(GeneratorConfig::default())
//!     .with_laps(LapCount::Fixed(5.0))
//!     .with_heart_rate(HeartRatePolicy::linear());
//!
//! let mut rng = rand::thread_rng();
//! let activity = generator.generate(start, &mut rng)?;
//! let document = write_tcx(&activity, TimestampStyle::Utc);
//! ```

pub mod config;
pub mod geometry;
pub mod heart_rate;
pub mod plan;
pub mod reader;
pub mod tcx;
pub mod trajectory;

pub use config::{GeneratorConfig, TimestampStyle, Venue};
pub use geometry::{DegreeScale, GeoPoint, OvalTrack, TrackSegment};
pub use heart_rate::HeartRatePolicy;
pub use plan::{ActivityPlan, GenerateError, LapCount, LapPace};
pub use trajectory::{GeneratedActivity, SamplePoint, TrajectoryGenerator};

/// Distance of one lap of the oval in meters.
pub const LAP_DISTANCE_M: f64 = 400.0;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{GeneratorConfig, TimestampStyle, Venue};
    pub use crate::geometry::{GeoPoint, OvalTrack, TrackSegment};
    pub use crate::heart_rate::HeartRatePolicy;
    pub use crate::plan::{ActivityPlan, GenerateError, LapCount, LapPace};
    pub use crate::reader::{ActivitySummary, ParsedActivity, parse_tcx};
    pub use crate::tcx::{file_name_for, write_tcx};
    pub use crate::trajectory::{GeneratedActivity, SamplePoint, TrajectoryGenerator};
}
