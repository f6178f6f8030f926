//! Sample points laid out around the oval.

use rand::Rng;
use time::{Duration, PrimitiveDateTime};

use crate::config::{GeneratorConfig, TimestampStyle};
use crate::geometry::{GeoPoint, OvalTrack};
use crate::heart_rate::HeartRatePolicy;
use crate::plan::{ActivityPlan, GenerateError, LapCount, LapPace};

/// One instant of the activity.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoint {
    pub time: PrimitiveDateTime,
    pub position: GeoPoint,
    /// Cumulative distance from the activity start in meters.
    pub distance_m: f64,
    pub heart_rate_bpm: u16,
}

/// A planned activity with its sample points, ready for serialization.
#[derive(Debug, Clone)]
pub struct GeneratedActivity {
    pub plan: ActivityPlan,
    pub points: Vec<SamplePoint>,
}

impl GeneratedActivity {
    /// Number of intervals between points.
    pub fn intervals(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn end_time(&self) -> Option<PrimitiveDateTime> {
        self.points.last().map(|p| p.time)
    }
}

/// Generates activities on an oval track.
pub struct TrajectoryGenerator {
    config: GeneratorConfig,
    track: OvalTrack,
}

impl TrajectoryGenerator {
    /// Creates a generator from a configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        let track = OvalTrack::new(config.center);
        Self { config, track }
    }

    /// Sets the lap count.
    pub fn with_laps(mut self, laps: LapCount) -> Self {
        self.config.laps = laps;
        self
    }

    /// Sets the per-lap pace.
    pub fn with_pace(mut self, pace: LapPace) -> Self {
        self.config.pace = pace;
        self
    }

    /// Sets the heart rate policy.
    pub fn with_heart_rate(mut self, policy: HeartRatePolicy) -> Self {
        self.config.heart_rate = policy;
        self
    }

    /// Sets the timestamp convention.
    pub fn with_timestamps(mut self, style: TimestampStyle) -> Self {
        self.config.timestamps = style;
        self
    }

    /// Sets point density.
    pub fn with_points_per_lap(mut self, points: u32) -> Self {
        self.config.points_per_lap = points;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn track(&self) -> &OvalTrack {
        &self.track
    }

    /// Plans and lays out one activity starting at `start`.
    pub fn generate(
        &self,
        start: PrimitiveDateTime,
        rng: &mut impl Rng,
    ) -> Result<GeneratedActivity, GenerateError> {
        if self.config.points_per_lap == 0 {
            return Err(GenerateError::InvalidPointDensity);
        }

        let plan = ActivityPlan::draw(start, self.config.laps, self.config.pace, rng)?;
        let intervals = ((f64::from(self.config.points_per_lap) * plan.laps).round() as usize).max(1);
        let heart_rates = self.config.heart_rate.series(intervals, rng);
        let points = self.layout(&plan, intervals, &heart_rates);

        tracing::debug!(
            start = %plan.start,
            laps = plan.laps,
            distance_m = plan.total_distance_m,
            seconds = plan.total_seconds,
            points = points.len(),
            "Generated activity"
        );

        Ok(GeneratedActivity { plan, points })
    }

    /// Places `intervals + 1` points evenly in time and distance.
    fn layout(
        &self,
        plan: &ActivityPlan,
        intervals: usize,
        heart_rates: &[u16],
    ) -> Vec<SamplePoint> {
        let step_seconds = plan.total_seconds / intervals as f64;

        (0..=intervals)
            .map(|i| {
                let distance_m = if i == intervals {
                    plan.total_distance_m
                } else {
                    plan.total_distance_m * i as f64 / intervals as f64
                };
                let lap_m = self.track.distance_in_lap(distance_m);

                SamplePoint {
                    time: plan.start + offset(step_seconds * i as f64),
                    position: self.track.position_at(lap_m),
                    distance_m,
                    heart_rate_bpm: heart_rates[i],
                }
            })
            .collect()
    }
}

impl Default for TrajectoryGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

/// Fractional seconds as a duration rounded to whole microseconds.
fn offset(seconds: f64) -> Duration {
    Duration::microseconds((seconds * 1_000_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::datetime;

    fn fixed_generator(laps: f64, seconds: u32) -> TrajectoryGenerator {
        TrajectoryGenerator::default()
            .with_laps(LapCount::Fixed(laps))
            .with_pace(LapPace::fixed(seconds))
    }

    #[test]
    fn test_point_count_is_intervals_plus_one() {
        let mut rng = StdRng::seed_from_u64(11);

        for laps in [5.0, 5.37, 2.5, 0.004] {
            let activity = fixed_generator(laps, 150)
                .generate(datetime!(2024-06-01 08:00:00), &mut rng)
                .unwrap();
            let expected = ((100.0 * laps).round() as usize).max(1);
            assert_eq!(activity.points.len(), expected + 1, "laps = {laps}");
            assert_eq!(activity.intervals(), expected);
        }
    }

    #[test]
    fn test_distance_monotonic_and_exact_at_finish() {
        let generator = TrajectoryGenerator::default();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let activity = generator
                .generate(datetime!(2024-06-01 08:00:00), &mut rng)
                .unwrap();

            assert!(
                activity
                    .points
                    .windows(2)
                    .all(|w| w[0].distance_m <= w[1].distance_m)
            );
            assert_eq!(
                activity.points.last().unwrap().distance_m,
                activity.plan.total_distance_m
            );
            assert_eq!(activity.points[0].distance_m, 0.0);
        }
    }

    #[test]
    fn test_lap_boundaries_close_on_start() {
        let generator = fixed_generator(5.0, 200);
        let mut rng = StdRng::seed_from_u64(0);
        let activity = generator
            .generate(datetime!(2023-03-08 12:15:04), &mut rng)
            .unwrap();
        let start = generator.track().start();

        for k in 0..=5 {
            let point = &activity.points[k * 100];
            assert_eq!(point.distance_m, 400.0 * k as f64);
            assert_eq!(point.position, start, "lap boundary {k}");
        }
    }

    #[test]
    fn test_timestamps_evenly_spaced() {
        let generator = fixed_generator(5.0, 200);
        let mut rng = StdRng::seed_from_u64(0);
        let start = datetime!(2023-03-08 12:15:04);
        let activity = generator.generate(start, &mut rng).unwrap();

        // 1000 s over 500 intervals
        assert_eq!(activity.points[0].time, start);
        assert_eq!(activity.points[1].time, start + Duration::seconds(2));
        assert_eq!(activity.end_time(), Some(start + Duration::seconds(1000)));
        assert!(activity.points.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_fractional_step_rounds_to_microseconds() {
        assert_eq!(offset(1.5), Duration::milliseconds(1500));
        assert_eq!(offset(0.0000004), Duration::ZERO);
        assert_eq!(offset(2.0000006), Duration::microseconds(2_000_001));
    }

    #[test]
    fn test_heart_rate_attached_per_point() {
        let generator = fixed_generator(1.0, 120).with_heart_rate(HeartRatePolicy::linear());
        let mut rng = StdRng::seed_from_u64(0);
        let activity = generator
            .generate(datetime!(2024-01-01 06:00:00), &mut rng)
            .unwrap();

        assert_eq!(activity.points.first().unwrap().heart_rate_bpm, 110);
        assert_eq!(activity.points.last().unwrap().heart_rate_bpm, 150);
    }

    #[test]
    fn test_zero_point_density_rejected() {
        let generator = TrajectoryGenerator::default().with_points_per_lap(0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generator
                .generate(datetime!(2024-01-01 06:00:00), &mut rng)
                .unwrap_err(),
            GenerateError::InvalidPointDensity
        );
    }

    #[test]
    fn test_same_seed_same_activity() {
        let generator = TrajectoryGenerator::default();
        let start = datetime!(2024-06-01 08:00:00);

        let a = generator
            .generate(start, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = generator
            .generate(start, &mut StdRng::seed_from_u64(99))
            .unwrap();

        assert_eq!(a.plan, b.plan);
        assert_eq!(a.points, b.points);
    }
}
