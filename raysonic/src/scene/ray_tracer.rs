//! Ray casting callback trait for environment sampling.
//!
//! RaySonic never owns scene geometry. The embedding engine implements
//! [`RayTracer`] on top of its physics or collision system and hands it to the
//! world, which casts every sampling ray through it.

use crate::math::Vec3;

/// Opaque set of collidable layers passed through to the ray tracer.
///
/// RaySonic only stores and forwards the mask; what a bit means is up to the
/// embedding scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask with a single layer bit set. Layers above 31 yield an empty mask.
    pub fn layer(index: u32) -> Self {
        Self(1u32.checked_shl(index).unwrap_or(0))
    }

    pub fn contains(&self, layer: u32) -> bool {
        self.intersects(Self::layer(layer))
    }

    pub fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn with(self, layer: u32) -> Self {
        Self(self.0 | Self::layer(layer).0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Nearest intersection of a ray with environment geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from ray origin to hit point (in meters)
    pub distance: f32,

    /// Hit point in world space
    pub point: Vec3,
}

impl RayHit {
    pub fn new(distance: f32, point: Vec3) -> Self {
        Self { distance, point }
    }

    /// Builds a hit `distance` units along a ray.
    pub fn along(origin: Vec3, direction: Vec3, distance: f32) -> Self {
        Self {
            distance,
            point: origin + direction * distance,
        }
    }
}

/// Trait for providing ray intersection queries to the acoustic sampler.
///
/// # Example
///
/// ```
/// use raysonic::math::Vec3;
/// use raysonic::scene::{LayerMask, RayHit, RayTracer};
///
/// /// Infinite floor plane at y = 0.
/// struct FloorTracer;
///
/// impl RayTracer for FloorTracer {
///     fn cast_ray(
///         &self,
///         origin: Vec3,
///         direction: Vec3,
///         max_distance: f32,
///         _mask: LayerMask,
///     ) -> Option<RayHit> {
///         if direction.y >= 0.0 {
///             return None;
///         }
///         let t = -origin.y / direction.y;
///         (t >= 0.0 && t <= max_distance).then(|| RayHit::along(origin, direction, t))
///     }
/// }
///
/// let hit = FloorTracer.cast_ray(Vec3::Y, -Vec3::Y, 10.0, LayerMask::ALL);
/// assert_eq!(hit.map(|h| h.distance), Some(1.0));
/// ```
pub trait RayTracer: Send + Sync {
    /// Test if a ray intersects any geometry on the layers in `mask`.
    ///
    /// # Parameters
    ///
    /// * `origin` - Ray starting position in world space (meters)
    /// * `direction` - Ray direction (normalized)
    /// * `max_distance` - Maximum ray distance to test (meters, > 0)
    /// * `mask` - Layers the ray may collide with
    ///
    /// # Returns
    ///
    /// The **closest** hit within `max_distance`, or `None`. A miss is not an
    /// error: the sampler reads it as open space.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    /// Called once per world update before any ray casts (optional).
    fn begin_frame(&mut self) {}

    /// Called once per world update after all ray casts (optional).
    fn end_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopTracer;

    impl RayTracer for NoopTracer {
        fn cast_ray(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
            None
        }
    }

    #[test]
    fn test_noop_tracer() {
        let result = NoopTracer.cast_ray(Vec3::ZERO, Vec3::Z, 100.0, LayerMask::ALL);
        assert!(result.is_none());
    }

    #[test]
    fn test_ray_hit_along() {
        let hit = RayHit::along(Vec3::new(1.0, 0.0, 0.0), Vec3::Y, 3.0);
        assert_eq!(hit.distance, 3.0);
        assert_eq!(hit.point, Vec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::layer(2).with(5);
        assert!(mask.contains(2));
        assert!(mask.contains(5));
        assert!(!mask.contains(3));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
        assert_eq!(LayerMask::layer(40), LayerMask::NONE);
    }
}
