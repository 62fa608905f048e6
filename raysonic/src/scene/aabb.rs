//! Axis-aligned box scene implementing [`RayTracer`].
//!
//! Small enough for tests and demos: every query walks all boxes. Engines with
//! real collision worlds implement [`RayTracer`] themselves.

use super::ray_tracer::{LayerMask, RayHit, RayTracer};
use crate::math::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test. Returns the entry distance along `direction`, or 0 when
    /// `origin` is inside the box.
    pub fn intersect(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                // Parallel to this slab
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

#[derive(Debug, Clone)]
struct SceneBox {
    bounds: Aabb,
    layers: LayerMask,
}

/// Collection of boxes, each on a set of layers.
///
/// # Example
///
/// ```
/// use raysonic::math::Vec3;
/// use raysonic::scene::{AabbScene, LayerMask, RayTracer};
///
/// let mut scene = AabbScene::new();
/// scene.add_wall(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.5, 5.0, 5.0));
///
/// let hit = scene.cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::ALL).unwrap();
/// assert_eq!(hit.distance, 4.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AabbScene {
    boxes: Vec<SceneBox>,
}

impl AabbScene {
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Adds a box on the given layers and returns its index.
    pub fn add_box(&mut self, bounds: Aabb, layers: LayerMask) -> usize {
        self.boxes.push(SceneBox { bounds, layers });
        self.boxes.len() - 1
    }

    /// Adds a box on every layer, given by center and half extents.
    pub fn add_wall(&mut self, center: Vec3, half_extents: Vec3) -> usize {
        self.add_box(Aabb::from_center(center, half_extents), LayerMask::ALL)
    }

    /// Builds a closed room: six slabs of `thickness` around the interior box
    /// `[interior_min, interior_max]`, all on `layers`.
    pub fn closed_room(
        interior_min: Vec3,
        interior_max: Vec3,
        thickness: f32,
        layers: LayerMask,
    ) -> Self {
        let mut scene = Self::new();
        scene.add_room(interior_min, interior_max, thickness, layers);
        scene
    }

    /// Adds the six slabs of a closed room to this scene.
    pub fn add_room(
        &mut self,
        interior_min: Vec3,
        interior_max: Vec3,
        thickness: f32,
        layers: LayerMask,
    ) {
        let inner = Aabb::new(interior_min, interior_max);
        let outer_min = inner.min - Vec3::splat(thickness);
        let outer_max = inner.max + Vec3::splat(thickness);

        for axis in 0..3 {
            let mut low_max = outer_max;
            low_max[axis] = inner.min[axis];
            self.add_box(Aabb::new(outer_min, low_max), layers);

            let mut high_min = outer_min;
            high_min[axis] = inner.max[axis];
            self.add_box(Aabb::new(high_min, outer_max), layers);
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }
}

impl RayTracer for AabbScene {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        if max_distance.is_nan() || max_distance <= 0.0 {
            return None;
        }

        self.boxes
            .iter()
            .filter(|b| b.layers.intersects(mask))
            .filter_map(|b| b.bounds.intersect(origin, direction, max_distance))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit::along(origin, direction, distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersect_front_and_miss() {
        let aabb = Aabb::new(Vec3::new(2.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0));
        assert_eq!(aabb.intersect(Vec3::ZERO, Vec3::X, 10.0), Some(2.0));
        assert_eq!(aabb.intersect(Vec3::ZERO, -Vec3::X, 10.0), None);
        assert_eq!(aabb.intersect(Vec3::ZERO, Vec3::X, 1.5), None);
        assert_eq!(aabb.intersect(Vec3::new(0.0, 5.0, 0.0), Vec3::X, 10.0), None);
    }

    #[test]
    fn test_aabb_origin_inside() {
        let aabb = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains(Vec3::ZERO));
        assert_eq!(aabb.intersect(Vec3::ZERO, Vec3::Y, 10.0), Some(0.0));
    }

    #[test]
    fn test_scene_returns_closest_hit() {
        let mut scene = AabbScene::new();
        scene.add_wall(Vec3::new(8.0, 0.0, 0.0), Vec3::new(0.5, 2.0, 2.0));
        scene.add_wall(Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.5, 2.0, 2.0));

        let hit = scene
            .cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::ALL)
            .expect("should hit the nearer wall");
        assert_eq!(hit.distance, 3.5);
        assert_eq!(hit.point, Vec3::new(3.5, 0.0, 0.0));
    }

    #[test]
    fn test_scene_respects_layer_mask() {
        let mut scene = AabbScene::new();
        scene.add_box(
            Aabb::from_center(Vec3::new(4.0, 0.0, 0.0), Vec3::splat(0.5)),
            LayerMask::layer(3),
        );

        let blocked = scene.cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::layer(1));
        assert!(blocked.is_none());
        let hit = scene.cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::layer(3));
        assert!(hit.is_some());
    }

    #[test]
    fn test_closed_room_blocks_every_axis() {
        let scene =
            AabbScene::closed_room(Vec3::splat(-5.0), Vec3::splat(5.0), 0.5, LayerMask::ALL);
        assert_eq!(scene.len(), 6);

        for dir in [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z] {
            let hit = scene.cast_ray(Vec3::ZERO, dir, 20.0, LayerMask::ALL);
            assert_eq!(hit.map(|h| h.distance), Some(5.0), "direction {dir:?}");
        }
    }
}
