//! Ray batches for ambient and source-directed acoustic estimates.

use super::direction::DirectionSampler;
use super::estimate::{AcousticEstimate, MissPolicy, SampleBatch};
use crate::config::{ConeConfig, ListenerConfig, ReverbProbe, SourceConfig};
use crate::mapping;
use crate::math::Vec3;
use crate::scene::{LayerMask, RayHit, RayTracer};

/// What a ray was cast for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Uniform sphere around the listener
    Ambient,
    /// Single ray from the listener to a source
    DirectOcclusion,
    /// Narrow cone from the listener toward a source
    VolumeCone,
    /// Single ray from a source away from the listener
    Echo,
    /// Wide cone from a source away from the listener
    EchoCone,
    /// Sphere or hemisphere around a source
    Reverb,
}

/// A single cast ray, as reported to the ray observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayRecord {
    pub kind: RayKind,
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
    pub hit: Option<RayHit>,
}

/// Callback invoked with every cast ray, e.g. for debug drawing.
pub type RayObserver = dyn FnMut(&RayRecord) + Send;

/// Everything one listener/source pass measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceAcoustics {
    /// The straight listener-to-source ray was blocked
    pub direct_occluded: bool,
    /// Cone from the listener toward the source, limited to the source distance
    pub volume: AcousticEstimate,
    /// Cone from the source away from the listener
    pub echo: AcousticEstimate,
    /// Reverb probe around the source
    pub reverb: AcousticEstimate,
    /// `base_reflection_strength / max(1, d)` for the echo ray, 0 on a miss
    pub echo_strength: f32,
}

/// Casts ray batches through a [`RayTracer`] and aggregates them.
pub struct AcousticSampler {
    directions: DirectionSampler,
    observer: Option<Box<RayObserver>>,
    rays_cast: u64,
}

impl AcousticSampler {
    pub fn new(directions: DirectionSampler) -> Self {
        Self {
            directions,
            observer: None,
            rays_cast: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(DirectionSampler::new(seed))
    }

    /// Installs a callback that sees every ray this sampler casts.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&RayRecord) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Total number of rays handed to a tracer so far.
    pub fn rays_cast(&self) -> u64 {
        self.rays_cast
    }

    pub fn directions_mut(&mut self) -> &mut DirectionSampler {
        &mut self.directions
    }

    /// Casts `ray_count` uniform rays from `origin`.
    pub fn sample_sphere(
        &mut self,
        tracer: &dyn RayTracer,
        kind: RayKind,
        origin: Vec3,
        ray_count: usize,
        max_distance: f32,
        mask: LayerMask,
    ) -> SampleBatch {
        let directions = self.directions.sample_sphere(ray_count);
        self.cast_batch(tracer, kind, origin, directions, max_distance, mask)
    }

    /// Casts `ray_count` rays from `origin` into the hemisphere around
    /// `normal`.
    #[allow(clippy::too_many_arguments)]
    pub fn sample_hemisphere(
        &mut self,
        tracer: &dyn RayTracer,
        kind: RayKind,
        origin: Vec3,
        normal: Vec3,
        ray_count: usize,
        max_distance: f32,
        mask: LayerMask,
    ) -> SampleBatch {
        let directions = self.directions.sample_hemisphere(normal, ray_count);
        self.cast_batch(tracer, kind, origin, directions, max_distance, mask)
    }

    /// Casts the rays of `cone` around `forward` from `origin`.
    #[allow(clippy::too_many_arguments)]
    pub fn sample_cone(
        &mut self,
        tracer: &dyn RayTracer,
        kind: RayKind,
        origin: Vec3,
        forward: Vec3,
        cone: &ConeConfig,
        max_distance: f32,
        mask: LayerMask,
    ) -> SampleBatch {
        let directions = self.directions.sample_cone(
            forward,
            cone.horizontal_half_angle,
            cone.vertical_half_angle,
            cone.ray_count,
        );
        self.cast_batch(tracer, kind, origin, directions, max_distance, mask)
    }

    /// Ambient estimate around a listener.
    pub fn ambient_estimate(
        &mut self,
        tracer: &dyn RayTracer,
        origin: Vec3,
        config: &ListenerConfig,
    ) -> AcousticEstimate {
        let batch = self.sample_sphere(
            tracer,
            RayKind::Ambient,
            origin,
            config.ambient_ray_count,
            config.max_distance,
            config.environment_mask,
        );
        let estimate = batch.estimate(config.miss_policy);
        log::debug!(
            "Ambient estimate at {:?}: {} rays, {} hits, avg distance {:.2}",
            origin,
            estimate.ray_count,
            estimate.hit_count,
            estimate.average_distance
        );
        estimate
    }

    /// Casts one ray from `listener` to `source`. Blocked iff it hits
    /// geometry strictly before reaching the source.
    pub fn direct_occlusion(
        &mut self,
        tracer: &dyn RayTracer,
        listener: Vec3,
        source: Vec3,
        mask: LayerMask,
    ) -> bool {
        let distance = listener.distance(source);
        let Some(direction) = (source - listener).try_normalize() else {
            return false;
        };
        self.cast(
            tracer,
            RayKind::DirectOcclusion,
            listener,
            direction,
            distance,
            mask,
        )
        .is_some_and(|hit| hit.distance < distance)
    }

    /// Casts one ray from `source` directly away from `listener`.
    ///
    /// Returns `base_reflection_strength / max(1, d)` for a hit at `d`, or 0
    /// on a miss or when the two positions coincide.
    pub fn echo_strength(
        &mut self,
        tracer: &dyn RayTracer,
        source: Vec3,
        listener: Vec3,
        base_reflection_strength: f32,
        max_distance: f32,
        mask: LayerMask,
    ) -> f32 {
        let Some(away) = (source - listener).try_normalize() else {
            return 0.0;
        };
        match self.cast(tracer, RayKind::Echo, source, away, max_distance, mask) {
            Some(hit) => mapping::echo_strength(base_reflection_strength, hit.distance),
            None => 0.0,
        }
    }

    /// Runs every source-directed probe for one listener/source pair.
    pub fn sample_source(
        &mut self,
        tracer: &dyn RayTracer,
        listener: Vec3,
        source: Vec3,
        listener_config: &ListenerConfig,
        source_config: &SourceConfig,
    ) -> SourceAcoustics {
        let mask = listener_config.environment_mask;
        let policy = listener_config.miss_policy;
        let distance = listener.distance(source);

        let direct_occluded = self.direct_occlusion(tracer, listener, source, mask);

        let volume = if distance > f32::EPSILON {
            self.sample_cone(
                tracer,
                RayKind::VolumeCone,
                listener,
                source - listener,
                &listener_config.volume_cone,
                distance,
                mask,
            )
            .estimate(policy)
        } else {
            AcousticEstimate::open(distance)
        };

        let echo_strength = self.echo_strength(
            tracer,
            source,
            listener,
            source_config.reflection_strength,
            source_config.max_distance,
            mask,
        );

        let echo = match (source - listener).try_normalize() {
            Some(away) => self
                .sample_cone(
                    tracer,
                    RayKind::EchoCone,
                    source,
                    away,
                    &listener_config.echo_cone,
                    source_config.max_distance,
                    mask,
                )
                .estimate(policy),
            None => AcousticEstimate::open(source_config.max_distance),
        };

        let reverb = match listener_config.reverb_probe {
            ReverbProbe::Sphere => self.sample_sphere(
                tracer,
                RayKind::Reverb,
                source,
                listener_config.reverb_ray_count,
                source_config.max_distance,
                mask,
            ),
            ReverbProbe::Hemisphere { normal } => self.sample_hemisphere(
                tracer,
                RayKind::Reverb,
                source,
                normal,
                listener_config.reverb_ray_count,
                source_config.max_distance,
                mask,
            ),
        }
        .estimate(policy);

        log::debug!(
            "Source probe {:?} -> {:?}: direct blocked {}, volume occlusion {:.2}, echo {:.3}, reverb openness {:.2}",
            listener,
            source,
            direct_occluded,
            volume.occlusion_ratio,
            echo_strength,
            reverb.openness_ratio
        );

        SourceAcoustics {
            direct_occluded,
            volume,
            echo,
            reverb,
            echo_strength,
        }
    }

    fn cast_batch(
        &mut self,
        tracer: &dyn RayTracer,
        kind: RayKind,
        origin: Vec3,
        directions: Vec<Vec3>,
        max_distance: f32,
        mask: LayerMask,
    ) -> SampleBatch {
        let mut batch = SampleBatch::new(origin, max_distance);
        for direction in directions {
            let hit = self.cast(tracer, kind, origin, direction, max_distance, mask);
            batch.push(direction, hit);
        }
        batch
    }

    fn cast(
        &mut self,
        tracer: &dyn RayTracer,
        kind: RayKind,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        // Tracers are promised a positive range
        let hit = if max_distance > 0.0 {
            self.rays_cast += 1;
            tracer.cast_ray(origin, direction, max_distance, mask)
        } else {
            None
        };

        log::trace!(
            "{:?} ray from {:?} along {:?}: {:?}",
            kind,
            origin,
            direction,
            hit.map(|h| h.distance)
        );

        if let Some(observer) = self.observer.as_mut() {
            observer(&RayRecord {
                kind,
                origin,
                direction,
                max_distance,
                hit,
            });
        }

        hit
    }
}

impl Default for AcousticSampler {
    fn default() -> Self {
        Self::new(DirectionSampler::default())
    }
}

impl std::fmt::Debug for AcousticSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcousticSampler")
            .field("directions", &self.directions)
            .field("has_observer", &self.observer.is_some())
            .field("rays_cast", &self.rays_cast)
            .finish()
    }
}
