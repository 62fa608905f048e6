//! Math types for RaySonic

pub use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * (-Vec3::Z)
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.position.distance(other.position)
    }

    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward != Vec3::ZERO {
            self.rotation = Quat::from_rotation_arc(-Vec3::Z, forward);
        }
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Linear interpolation between `a` and `b` with `t` clamped to [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`, clamped to [0, 1].
///
/// Returns 0 when the range is empty.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Clamps a ratio to [0, 1], mapping NaN to 0.
pub fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_forward_is_negative_z() {
        let pose = Pose::identity();
        assert_eq!(pose.forward(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let mut pose = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));
        pose.look_at(Vec3::new(5.0, 0.0, 0.0));
        assert!((pose.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_lerp_and_inverse_lerp() {
        assert_eq!(lerp(22000.0, 500.0, 0.0), 22000.0);
        assert_eq!(lerp(22000.0, 500.0, 1.0), 500.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(inverse_lerp(0.0, 20.0, 5.0), 0.25);
        assert_eq!(inverse_lerp(0.0, 20.0, 40.0), 1.0);
        assert_eq!(inverse_lerp(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn test_clamp_ratio_handles_nan() {
        assert_eq!(clamp_ratio(f32::NAN), 0.0);
        assert_eq!(clamp_ratio(-0.5), 0.0);
        assert_eq!(clamp_ratio(1.5), 1.0);
        assert_eq!(clamp_ratio(0.3), 0.3);
    }
}
