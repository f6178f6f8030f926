//! Lap count, distance and duration of an activity.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::LAP_DISTANCE_M;

/// Errors raised while planning or generating an activity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("lap count must be a positive finite number, got {0}")]
    InvalidLapCount(f64),

    #[error("lap pace range {min_seconds}..={max_seconds} s is empty or zero")]
    InvalidPace { min_seconds: u32, max_seconds: u32 },

    #[error("points per lap must be at least 1")]
    InvalidPointDensity,
}

/// How many laps an activity covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapCount {
    /// Uniform in `[min, max]`, rounded to two decimals.
    Random { min: f64, max: f64 },
    /// Used exactly as given.
    Fixed(f64),
}

impl Default for LapCount {
    fn default() -> Self {
        Self::Random { min: 5.0, max: 6.0 }
    }
}

/// Inclusive range of whole seconds spent on each lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapPace {
    pub min_seconds: u32,
    pub max_seconds: u32,
}

impl Default for LapPace {
    fn default() -> Self {
        Self {
            min_seconds: 120,
            max_seconds: 200,
        }
    }
}

impl LapPace {
    /// Every lap takes exactly `seconds`.
    pub fn fixed(seconds: u32) -> Self {
        Self {
            min_seconds: seconds,
            max_seconds: seconds,
        }
    }

    fn validate(&self) -> Result<(), GenerateError> {
        if self.min_seconds == 0 || self.min_seconds > self.max_seconds {
            return Err(GenerateError::InvalidPace {
                min_seconds: self.min_seconds,
                max_seconds: self.max_seconds,
            });
        }
        Ok(())
    }
}

/// The scalar shape of one activity before any points are laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityPlan {
    pub start: PrimitiveDateTime,
    /// Laps covered; not necessarily whole.
    pub laps: f64,
    pub lap_distance_m: f64,
    /// `laps * lap_distance_m`.
    pub total_distance_m: f64,
    pub seconds_per_lap: u32,
    /// `seconds_per_lap * laps`, kept fractional.
    pub total_seconds: f64,
}

impl ActivityPlan {
    /// Draws lap count and pace for an activity starting at `start`.
    pub fn draw(
        start: PrimitiveDateTime,
        laps: LapCount,
        pace: LapPace,
        rng: &mut impl Rng,
    ) -> Result<Self, GenerateError> {
        pace.validate()?;

        let (laps, total_distance_m) = match laps {
            LapCount::Random { min, max } => {
                if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
                    return Err(GenerateError::InvalidLapCount(min));
                }
                let laps = round2(rng.gen_range(min..=max));
                (laps, round2(laps * LAP_DISTANCE_M))
            }
            LapCount::Fixed(laps) => {
                if !(laps.is_finite() && laps > 0.0) {
                    return Err(GenerateError::InvalidLapCount(laps));
                }
                (laps, laps * LAP_DISTANCE_M)
            }
        };

        let seconds_per_lap = rng.gen_range(pace.min_seconds..=pace.max_seconds);

        Ok(Self {
            start,
            laps,
            lap_distance_m: LAP_DISTANCE_M,
            total_distance_m,
            seconds_per_lap,
            total_seconds: f64::from(seconds_per_lap) * laps,
        })
    }

    /// Average pace in seconds per kilometer.
    pub fn pace_seconds_per_km(&self) -> f64 {
        f64::from(self.seconds_per_lap) * 1000.0 / self.lap_distance_m
    }
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::datetime;

    #[test]
    fn test_random_laps_in_range() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let plan = ActivityPlan::draw(
                datetime!(2024-06-01 08:00:00),
                LapCount::default(),
                LapPace::default(),
                &mut rng,
            )
            .unwrap();

            assert!((5.0..=6.0).contains(&plan.laps));
            assert_eq!(plan.laps, round2(plan.laps));
            assert_eq!(plan.total_distance_m, round2(plan.laps * 400.0));
            assert!((120..=200).contains(&plan.seconds_per_lap));
            assert_eq!(
                plan.total_seconds,
                f64::from(plan.seconds_per_lap) * plan.laps
            );
        }
    }

    #[test]
    fn test_fixed_laps_are_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = ActivityPlan::draw(
            datetime!(2023-03-08 12:15:04),
            LapCount::Fixed(5.0),
            LapPace::fixed(200),
            &mut rng,
        )
        .unwrap();

        assert_eq!(plan.laps, 5.0);
        assert_eq!(plan.total_distance_m, 2000.0);
        assert_eq!(plan.seconds_per_lap, 200);
        assert_eq!(plan.total_seconds, 1000.0);
        assert_eq!(plan.pace_seconds_per_km(), 500.0);
    }

    #[test]
    fn test_fractional_fixed_laps_keep_fractional_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = ActivityPlan::draw(
            datetime!(2023-03-08 12:15:04),
            LapCount::Fixed(2.5),
            LapPace::fixed(150),
            &mut rng,
        )
        .unwrap();

        assert_eq!(plan.total_distance_m, 1000.0);
        assert_eq!(plan.total_seconds, 375.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = datetime!(2024-01-01 00:00:00);

        assert_eq!(
            ActivityPlan::draw(start, LapCount::Fixed(0.0), LapPace::default(), &mut rng),
            Err(GenerateError::InvalidLapCount(0.0))
        );
        assert!(
            ActivityPlan::draw(start, LapCount::Fixed(f64::NAN), LapPace::default(), &mut rng)
                .is_err()
        );
        assert_eq!(
            ActivityPlan::draw(
                start,
                LapCount::Fixed(3.0),
                LapPace {
                    min_seconds: 200,
                    max_seconds: 100
                },
                &mut rng
            ),
            Err(GenerateError::InvalidPace {
                min_seconds: 200,
                max_seconds: 100
            })
        );
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(5.376), 5.38);
        assert_eq!(round2(2148.0), 2148.0);
    }
}
