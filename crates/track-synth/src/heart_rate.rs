//! Heart rate series across an activity.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape of the heart rate curve from the first to the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeartRatePolicy {
    /// Half-cosine rise from resting that plateaus at `max_bpm`, with uniform
    /// integer jitter of up to `jitter_bpm` either way.
    CosineRamp {
        resting_bpm: u16,
        amplitude_bpm: u16,
        jitter_bpm: u16,
        max_bpm: u16,
    },
    /// Straight line from `start_bpm` to `end_bpm`, no randomness.
    LinearRamp { start_bpm: u16, end_bpm: u16 },
}

impl Default for HeartRatePolicy {
    fn default() -> Self {
        Self::cosine()
    }
}

impl HeartRatePolicy {
    /// 75 bpm resting, +45 amplitude, ±5 jitter, capped at 120.
    pub fn cosine() -> Self {
        Self::CosineRamp {
            resting_bpm: 75,
            amplitude_bpm: 45,
            jitter_bpm: 5,
            max_bpm: 120,
        }
    }

    /// 110 bpm rising to 150 bpm.
    pub fn linear() -> Self {
        Self::LinearRamp {
            start_bpm: 110,
            end_bpm: 150,
        }
    }

    /// Inclusive range every value of the series falls in.
    pub fn bounds(&self) -> (u16, u16) {
        match *self {
            Self::CosineRamp {
                resting_bpm,
                max_bpm,
                ..
            } => (resting_bpm, max_bpm.max(resting_bpm)),
            Self::LinearRamp { start_bpm, end_bpm } => {
                (start_bpm.min(end_bpm), start_bpm.max(end_bpm))
            }
        }
    }

    /// Builds `intervals + 1` values, one per sample index.
    pub fn series(&self, intervals: usize, rng: &mut impl Rng) -> Vec<u16> {
        let intervals = intervals.max(1);
        (0..=intervals)
            .map(|i| self.value_at(i as f64 / intervals as f64, rng))
            .collect()
    }

    /// Heart rate at `fraction` (0.0 - 1.0) of the activity.
    fn value_at(&self, fraction: f64, rng: &mut impl Rng) -> u16 {
        let (low, high) = self.bounds();
        match *self {
            Self::CosineRamp {
                resting_bpm,
                amplitude_bpm,
                jitter_bpm,
                ..
            } => {
                let rise = (f64::from(amplitude_bpm) * (1.0 - (fraction * PI).cos())).round();
                let jitter = i32::from(jitter_bpm);
                let noise = if jitter > 0 {
                    rng.gen_range(-jitter..=jitter)
                } else {
                    0
                };
                let bpm = i32::from(resting_bpm) + rise as i32 + noise;
                bpm.clamp(i32::from(low), i32::from(high)) as u16
            }
            Self::LinearRamp { start_bpm, end_bpm } => {
                let span = f64::from(end_bpm) - f64::from(start_bpm);
                let bpm = f64::from(start_bpm) + (span * fraction).trunc();
                (bpm as i32).clamp(i32::from(low), i32::from(high)) as u16
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_cosine_ramp_stays_in_bounds() {
        let policy = HeartRatePolicy::cosine();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let series = policy.series(537, &mut rng);

            assert_eq!(series.len(), 538);
            assert!(series.iter().all(|bpm| (75..=120).contains(bpm)));
        }
    }

    #[test]
    fn test_cosine_ramp_rises_then_plateaus() {
        let policy = HeartRatePolicy::cosine();
        let mut rng = StdRng::seed_from_u64(3);
        let series = policy.series(500, &mut rng);

        // Start sits near resting, second half is pinned near the cap
        assert!(series[0] <= 80);
        let late = &series[300..];
        assert!(late.iter().all(|bpm| *bpm >= 115));
    }

    #[test]
    fn test_cosine_without_jitter_is_deterministic() {
        let policy = HeartRatePolicy::CosineRamp {
            resting_bpm: 75,
            amplitude_bpm: 45,
            jitter_bpm: 0,
            max_bpm: 120,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let series = policy.series(4, &mut rng);

        // 45 * (1 - cos(pi * i / 4)) rounded: 0, 13, 45, 77, 90
        assert_eq!(series, vec![75, 88, 120, 120, 120]);
    }

    #[test]
    fn test_linear_ramp() {
        let policy = HeartRatePolicy::linear();
        let mut rng = StdRng::seed_from_u64(0);
        let series = policy.series(500, &mut rng);

        assert_eq!(series.first(), Some(&110));
        assert_eq!(series.last(), Some(&150));
        assert_eq!(series[250], 130);
        assert!(series.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(HeartRatePolicy::cosine().bounds(), (75, 120));
        assert_eq!(HeartRatePolicy::linear().bounds(), (110, 150));
    }
}
