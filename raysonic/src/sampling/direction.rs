//! Direction sets for ray batches.

use crate::math::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates ray directions from its own random generator.
///
/// Two samplers built with the same seed produce the same sequence of
/// directions, which keeps sampling passes reproducible in tests.
#[derive(Debug, Clone)]
pub struct DirectionSampler {
    rng: StdRng,
}

impl DirectionSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// `count` unit vectors uniformly distributed on the sphere.
    pub fn sample_sphere(&mut self, count: usize) -> Vec<Vec3> {
        (0..count).map(|_| self.sphere_point()).collect()
    }

    /// `count` unit vectors in the hemisphere around `normal`.
    ///
    /// A zero-length `normal` falls back to +Y.
    pub fn sample_hemisphere(&mut self, normal: Vec3, count: usize) -> Vec<Vec3> {
        let normal = normal.try_normalize().unwrap_or(Vec3::Y);
        (0..count)
            .map(|_| {
                let dir = self.sphere_point();
                let d = dir.dot(normal);
                if d < 0.0 { dir - normal * (2.0 * d) } else { dir }
            })
            .collect()
    }

    /// `count` directions obtained by rotating `forward` by a random yaw in
    /// `[-horizontal_half_angle, horizontal_half_angle]` and a random pitch in
    /// `[-vertical_half_angle, vertical_half_angle]` (degrees).
    ///
    /// A zero-length `forward` falls back to -Z.
    pub fn sample_cone(
        &mut self,
        forward: Vec3,
        horizontal_half_angle: f32,
        vertical_half_angle: f32,
        count: usize,
    ) -> Vec<Vec3> {
        let forward = forward.try_normalize().unwrap_or(-Vec3::Z);
        let (right, up) = cone_basis(forward);

        (0..count)
            .map(|_| {
                let yaw = self.symmetric(horizontal_half_angle).to_radians();
                let pitch = self.symmetric(vertical_half_angle).to_radians();
                let rotation = Quat::from_axis_angle(up, yaw) * Quat::from_axis_angle(right, pitch);
                (rotation * forward).try_normalize().unwrap_or(forward)
            })
            .collect()
    }

    // Marsaglia, G. "Choosing a Point from the Surface of a Sphere."
    // Ann. Math. Stat. 43, 645-646, 1972.
    fn sphere_point(&mut self) -> Vec3 {
        loop {
            let x1: f32 = self.rng.gen_range(-1.0..1.0);
            let x2: f32 = self.rng.gen_range(-1.0..1.0);
            let sq = x1 * x1 + x2 * x2;
            if sq < 1.0 {
                let t = 2.0 * (1.0 - sq).sqrt();
                let point = Vec3::new(t * x1, t * x2, 1.0 - 2.0 * sq);
                if let Some(dir) = point.try_normalize() {
                    break dir;
                }
            }
        }
    }

    /// Uniform value in `[-half, half]` degrees, 0 for empty or invalid ranges.
    fn symmetric(&mut self, half: f32) -> f32 {
        if half.is_nan() || half <= 0.0 {
            return 0.0;
        }
        let half = half.min(360.0);
        self.rng.gen_range(-half..=half)
    }
}

impl Default for DirectionSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Right and up axes perpendicular to `forward` (which must be normalized).
fn cone_basis(forward: Vec3) -> (Vec3, Vec3) {
    let world_up = if forward.dot(Vec3::Y).abs() > 0.999 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let right = forward.cross(world_up).normalize();
    let up = right.cross(forward);
    (right, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_unit(v: Vec3) -> bool {
        (v.length() - 1.0).abs() < 1e-4
    }

    #[test]
    fn test_sphere_directions_are_unit_vectors() {
        let mut sampler = DirectionSampler::new(7);
        let dirs = sampler.sample_sphere(256);
        assert_eq!(dirs.len(), 256);
        assert!(dirs.iter().all(|d| is_unit(*d)));
    }

    #[test]
    fn test_sphere_is_roughly_uniform() {
        let mut sampler = DirectionSampler::new(42);
        let dirs = sampler.sample_sphere(8000);

        let mean = dirs.iter().copied().sum::<Vec3>() / dirs.len() as f32;
        assert!(mean.length() < 0.05, "mean direction {mean:?}");

        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let upper = dirs.iter().filter(|d| d.dot(axis) > 0.0).count();
            let fraction = upper as f32 / dirs.len() as f32;
            assert!((fraction - 0.5).abs() < 0.03, "axis {axis:?}: {fraction}");
        }
    }

    #[test]
    fn test_same_seed_same_directions() {
        let a = DirectionSampler::new(99).sample_sphere(16);
        let b = DirectionSampler::new(99).sample_sphere(16);
        assert_eq!(a, b);

        let mut sampler = DirectionSampler::new(1);
        let first = sampler.sample_sphere(4);
        sampler.reseed(1);
        assert_eq!(sampler.sample_sphere(4), first);
    }

    #[test]
    fn test_zero_count_yields_nothing() {
        let mut sampler = DirectionSampler::new(3);
        assert!(sampler.sample_sphere(0).is_empty());
        assert!(sampler.sample_cone(Vec3::X, 30.0, 30.0, 0).is_empty());
    }

    #[test]
    fn test_cone_stays_within_half_angles() {
        let mut sampler = DirectionSampler::new(5);
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let dirs = sampler.sample_cone(forward, 10.0, 10.0, 500);

        for dir in dirs {
            assert!(is_unit(dir));
            let angle = forward.angle_between(dir).to_degrees();
            assert!(angle <= 20.0 + 1e-2, "angle {angle}");
        }
    }

    #[test]
    fn test_cone_with_zero_angles_returns_forward() {
        let mut sampler = DirectionSampler::new(5);
        let dirs = sampler.sample_cone(Vec3::new(0.0, 0.0, 3.0), 0.0, 0.0, 3);
        for dir in dirs {
            assert!((dir - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn test_cone_handles_vertical_and_zero_forward() {
        let mut sampler = DirectionSampler::new(11);
        for dir in sampler.sample_cone(Vec3::Y, 15.0, 15.0, 50) {
            assert!(is_unit(dir));
            assert!(Vec3::Y.angle_between(dir).to_degrees() <= 30.0 + 1e-2);
        }
        for dir in sampler.sample_cone(Vec3::ZERO, 0.0, 0.0, 2) {
            assert!((dir + Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn test_hemisphere_faces_normal() {
        let mut sampler = DirectionSampler::new(13);
        let normal = Vec3::new(0.0, 0.0, -2.0);
        for dir in sampler.sample_hemisphere(normal, 300) {
            assert!(is_unit(dir));
            assert!(dir.dot(-Vec3::Z) >= 0.0);
        }
    }
}
