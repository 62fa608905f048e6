//! Aggregation of ray batches into acoustic estimates.

use crate::math::{Vec3, clamp_ratio};
use crate::scene::RayHit;

/// How rays that hit nothing contribute to the average distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissPolicy {
    /// A miss counts as a hit at max distance, biasing the average toward
    /// "open" in unobstructed directions.
    #[default]
    MaxDistance,
    /// Misses are left out of the average; a batch without hits averages to
    /// max distance.
    Exclude,
}

/// One ray of a batch and what it hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastRay {
    pub direction: Vec3,
    pub hit: Option<RayHit>,
}

/// Directions and outcomes of one batch of rays cast from a common origin.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    pub origin: Vec3,
    pub max_distance: f32,
    pub rays: Vec<CastRay>,
}

impl SampleBatch {
    pub fn new(origin: Vec3, max_distance: f32) -> Self {
        Self {
            origin,
            max_distance,
            rays: Vec::new(),
        }
    }

    pub fn push(&mut self, direction: Vec3, hit: Option<RayHit>) {
        self.rays.push(CastRay { direction, hit });
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    pub fn hit_count(&self) -> usize {
        self.rays.iter().filter(|r| r.hit.is_some()).count()
    }

    /// Aggregates the batch under `policy`.
    pub fn estimate(&self, policy: MissPolicy) -> AcousticEstimate {
        AcousticEstimate::from_distances(
            self.rays.iter().map(|r| r.hit.map(|h| h.distance)),
            self.max_distance,
            policy,
        )
    }
}

/// Summary statistics of one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticEstimate {
    pub ray_count: usize,
    pub hit_count: usize,
    /// Mean recorded distance, in [0, max_distance]
    pub average_distance: f32,
    /// Fraction of rays that hit geometry
    pub occlusion_ratio: f32,
    /// `1 - occlusion_ratio`
    pub openness_ratio: f32,
    pub max_distance: f32,
}

impl AcousticEstimate {
    /// Estimate of a batch that produced nothing usable: average pinned at max
    /// range, nothing occluded.
    pub fn open(max_distance: f32) -> Self {
        Self {
            ray_count: 0,
            hit_count: 0,
            average_distance: sanitize_distance(max_distance),
            occlusion_ratio: 0.0,
            openness_ratio: 1.0,
            max_distance,
        }
    }

    /// Aggregates hit distances (`None` for a miss).
    ///
    /// Hit distances are clamped to `[0, max_distance]`. With zero rays or a
    /// non-positive `max_distance` the result is [`AcousticEstimate::open`].
    pub fn from_distances<I>(outcomes: I, max_distance: f32, policy: MissPolicy) -> Self
    where
        I: IntoIterator<Item = Option<f32>>,
    {
        let range = sanitize_distance(max_distance);
        if range <= 0.0 {
            return Self::open(max_distance);
        }

        let mut ray_count = 0usize;
        let mut hit_count = 0usize;
        let mut hit_total = 0.0f32;

        for outcome in outcomes {
            ray_count += 1;
            if let Some(distance) = outcome {
                hit_count += 1;
                hit_total += if distance.is_nan() {
                    range
                } else {
                    distance.clamp(0.0, range)
                };
            }
        }

        if ray_count == 0 {
            return Self::open(max_distance);
        }

        let miss_count = ray_count - hit_count;
        let average_distance = match policy {
            MissPolicy::MaxDistance => {
                (hit_total + miss_count as f32 * range) / ray_count as f32
            }
            MissPolicy::Exclude if hit_count > 0 => hit_total / hit_count as f32,
            MissPolicy::Exclude => range,
        };

        let occlusion_ratio = clamp_ratio(hit_count as f32 / ray_count as f32);

        Self {
            ray_count,
            hit_count,
            average_distance: average_distance.clamp(0.0, range),
            occlusion_ratio,
            openness_ratio: 1.0 - occlusion_ratio,
            max_distance,
        }
    }
}

fn sanitize_distance(distance: f32) -> f32 {
    if distance.is_nan() {
        0.0
    } else {
        distance.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_miss_batch_is_open() {
        for n in [1, 7, 64] {
            let estimate =
                AcousticEstimate::from_distances(vec![None; n], 20.0, MissPolicy::MaxDistance);
            assert_eq!(estimate.ray_count, n);
            assert_eq!(estimate.average_distance, 20.0);
            assert_eq!(estimate.occlusion_ratio, 0.0);
            assert_eq!(estimate.openness_ratio, 1.0);
        }
    }

    #[test]
    fn test_all_hit_batch_is_occluded() {
        for n in [1, 5, 32] {
            let outcomes = vec![Some(3.5); n];
            let estimate =
                AcousticEstimate::from_distances(outcomes, 20.0, MissPolicy::MaxDistance);
            assert_eq!(estimate.average_distance, 3.5);
            assert_eq!(estimate.occlusion_ratio, 1.0);
            assert_eq!(estimate.openness_ratio, 0.0);
        }
    }

    #[test]
    fn test_mixed_batch_counts_misses_at_max_distance() {
        let mut outcomes = vec![None; 6];
        outcomes.extend([Some(5.0); 4]);

        let estimate = AcousticEstimate::from_distances(outcomes, 20.0, MissPolicy::MaxDistance);

        assert_eq!(estimate.hit_count, 4);
        assert_eq!(estimate.average_distance, 14.0);
        assert!((estimate.occlusion_ratio - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_exclude_policy_averages_hits_only() {
        let outcomes = [None, None, Some(4.0), Some(8.0)];
        let estimate = AcousticEstimate::from_distances(outcomes, 20.0, MissPolicy::Exclude);
        assert_eq!(estimate.average_distance, 6.0);
        assert_eq!(estimate.occlusion_ratio, 0.5);

        let estimate = AcousticEstimate::from_distances([None, None], 20.0, MissPolicy::Exclude);
        assert_eq!(estimate.average_distance, 20.0);
    }

    #[test]
    fn test_degenerate_batches_fall_back_to_open() {
        let empty = AcousticEstimate::from_distances(Vec::new(), 20.0, MissPolicy::MaxDistance);
        assert_eq!(empty, AcousticEstimate::open(20.0));
        assert_eq!(empty.average_distance, 20.0);

        let no_range =
            AcousticEstimate::from_distances([Some(2.0)], 0.0, MissPolicy::MaxDistance);
        assert_eq!(no_range.average_distance, 0.0);
        assert_eq!(no_range.occlusion_ratio, 0.0);

        let negative = AcousticEstimate::from_distances([None], -5.0, MissPolicy::MaxDistance);
        assert!(negative.average_distance.is_finite());
        assert_eq!(negative.occlusion_ratio, 0.0);
    }

    #[test]
    fn test_hit_distances_are_clamped_to_range() {
        let outcomes = [Some(50.0), Some(-1.0)];
        let estimate = AcousticEstimate::from_distances(outcomes, 20.0, MissPolicy::MaxDistance);
        assert_eq!(estimate.average_distance, 10.0);
    }

    #[test]
    fn test_batch_estimate() {
        let mut batch = SampleBatch::new(Vec3::ZERO, 10.0);
        batch.push(Vec3::X, Some(RayHit::along(Vec3::ZERO, Vec3::X, 2.0)));
        batch.push(-Vec3::X, None);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.hit_count(), 1);
        let estimate = batch.estimate(MissPolicy::MaxDistance);
        assert_eq!(estimate.average_distance, 6.0);
        assert_eq!(estimate.occlusion_ratio, 0.5);
    }
}
