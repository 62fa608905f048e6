use super::MixerBindings;
use crate::error::{RaySonicError, Result};
use crate::mapping::{DEFAULT_MUFFLE_FLOOR_HZ, OPEN_CUTOFF_HZ};
use crate::math::Vec3;
use crate::sampling::MissPolicy;
use crate::scene::LayerMask;

/// Angular range and ray budget of one directional probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeConfig {
    /// Maximum yaw offset from the cone axis, in degrees
    pub horizontal_half_angle: f32,
    /// Maximum pitch offset from the cone axis, in degrees
    pub vertical_half_angle: f32,
    /// Rays cast per pass
    pub ray_count: usize,
}

impl ConeConfig {
    pub fn new(horizontal_half_angle: f32, vertical_half_angle: f32, ray_count: usize) -> Self {
        Self {
            horizontal_half_angle,
            vertical_half_angle,
            ray_count,
        }
    }

    /// Narrow probe used for the listener-to-source volume test.
    pub fn narrow() -> Self {
        Self::new(10.0, 10.0, 8)
    }

    /// Wide probe used for the echo test behind the source.
    pub fn wide() -> Self {
        Self::new(60.0, 30.0, 16)
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        for (axis, angle) in [
            ("horizontal", self.horizontal_half_angle),
            ("vertical", self.vertical_half_angle),
        ] {
            if !(0.0..=360.0).contains(&angle) {
                return Err(RaySonicError::Configuration(format!(
                    "{name} {axis} half angle must be between 0 and 360 degrees, got {angle}"
                )));
            }
        }
        if self.ray_count == 0 {
            return Err(RaySonicError::Configuration(format!(
                "{name} ray count must be positive"
            )));
        }
        Ok(())
    }
}

/// Shape of the ray set cast around each source for its reverb openness.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReverbProbe {
    /// Uniform rays in every direction
    #[default]
    Sphere,
    /// Uniform rays in the half space around `normal`. With `Vec3::Y` the
    /// ground under a source no longer counts as enclosure.
    Hemisphere { normal: Vec3 },
}

/// Sampling configuration for one listener and the sources it tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerConfig {
    /// Rays cast uniformly around the listener per ambient pass
    pub ambient_ray_count: usize,
    /// Range of ambient rays (meters)
    pub max_distance: f32,
    /// Seconds between two ambient passes
    pub update_interval: f32,
    /// Seconds between two passes of each tracked listener/source pair
    pub source_update_interval: f32,
    /// Layers that count as environment geometry
    pub environment_mask: LayerMask,
    /// How rays that hit nothing enter the average distance
    pub miss_policy: MissPolicy,
    /// Probe from the listener toward each source (muffling)
    pub volume_cone: ConeConfig,
    /// Probe from each source away from the listener (echo density)
    pub echo_cone: ConeConfig,
    /// Rays cast around each source for its reverb openness
    pub reverb_ray_count: usize,
    /// Shape of the reverb ray set
    pub reverb_probe: ReverbProbe,
    /// Cutoff frequency reached when a source is fully blocked (Hz)
    pub muffle_floor_hz: f32,
    /// Mixer names for the ambient outputs
    pub bindings: MixerBindings,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            ambient_ray_count: 64,
            max_distance: 20.0,
            update_interval: 0.2,
            source_update_interval: 0.2,
            environment_mask: LayerMask::ALL,
            miss_policy: MissPolicy::MaxDistance,
            volume_cone: ConeConfig::narrow(),
            echo_cone: ConeConfig::wide(),
            reverb_ray_count: 32,
            reverb_probe: ReverbProbe::Sphere,
            muffle_floor_hz: DEFAULT_MUFFLE_FLOOR_HZ,
            bindings: MixerBindings::listener_defaults(),
        }
    }
}

impl ListenerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ambient_ray_count(mut self, count: usize) -> Self {
        self.ambient_ray_count = count;
        self
    }

    pub fn max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    pub fn update_interval(mut self, seconds: f32) -> Self {
        self.update_interval = seconds;
        self
    }

    pub fn source_update_interval(mut self, seconds: f32) -> Self {
        self.source_update_interval = seconds;
        self
    }

    pub fn environment_mask(mut self, mask: LayerMask) -> Self {
        self.environment_mask = mask;
        self
    }

    pub fn miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }

    pub fn volume_cone(mut self, cone: ConeConfig) -> Self {
        self.volume_cone = cone;
        self
    }

    pub fn echo_cone(mut self, cone: ConeConfig) -> Self {
        self.echo_cone = cone;
        self
    }

    pub fn reverb_ray_count(mut self, count: usize) -> Self {
        self.reverb_ray_count = count;
        self
    }

    pub fn reverb_probe(mut self, probe: ReverbProbe) -> Self {
        self.reverb_probe = probe;
        self
    }

    pub fn muffle_floor_hz(mut self, hz: f32) -> Self {
        self.muffle_floor_hz = hz;
        self
    }

    pub fn bindings(mut self, bindings: MixerBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Checks for degenerate values.
    ///
    /// The world accepts configurations that fail this check and the sampler
    /// degrades safely on them, so this is a diagnostic, not a gate.
    pub fn validate(&self) -> Result<()> {
        if self.ambient_ray_count == 0 {
            return Err(RaySonicError::Configuration(
                "ambient ray count must be positive".into(),
            ));
        }
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(RaySonicError::Configuration(format!(
                "max distance must be a positive number, got {}",
                self.max_distance
            )));
        }
        for (name, interval) in [
            ("update interval", self.update_interval),
            ("source update interval", self.source_update_interval),
        ] {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(RaySonicError::Configuration(format!(
                    "{name} must be a positive number of seconds, got {interval}"
                )));
            }
        }
        self.volume_cone.validate("volume cone")?;
        self.echo_cone.validate("echo cone")?;
        if self.reverb_ray_count == 0 {
            return Err(RaySonicError::Configuration(
                "reverb ray count must be positive".into(),
            ));
        }
        if let ReverbProbe::Hemisphere { normal } = self.reverb_probe {
            if normal.try_normalize().is_none() {
                return Err(RaySonicError::Configuration(format!(
                    "reverb hemisphere normal must be a nonzero finite vector, got {normal}"
                )));
            }
        }
        if !(self.muffle_floor_hz > 0.0 && self.muffle_floor_hz <= OPEN_CUTOFF_HZ) {
            return Err(RaySonicError::Configuration(format!(
                "muffle floor must be in (0, {OPEN_CUTOFF_HZ}] Hz, got {}",
                self.muffle_floor_hz
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ListenerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ambient_ray_count, 64);
        assert_eq!(config.max_distance, 20.0);
        assert_eq!(config.update_interval, 0.2);
    }

    #[test]
    fn test_builder_setters() {
        let config = ListenerConfig::new()
            .ambient_ray_count(10)
            .max_distance(35.0)
            .muffle_floor_hz(80.0)
            .miss_policy(MissPolicy::Exclude);
        assert_eq!(config.ambient_ray_count, 10);
        assert_eq!(config.max_distance, 35.0);
        assert_eq!(config.muffle_floor_hz, 80.0);
        assert_eq!(config.miss_policy, MissPolicy::Exclude);
    }

    #[test]
    fn test_degenerate_values_are_reported() {
        assert!(ListenerConfig::new().ambient_ray_count(0).validate().is_err());
        assert!(ListenerConfig::new().max_distance(0.0).validate().is_err());
        assert!(ListenerConfig::new().max_distance(f32::NAN).validate().is_err());
        assert!(ListenerConfig::new().update_interval(-1.0).validate().is_err());
        assert!(ListenerConfig::new().muffle_floor_hz(0.0).validate().is_err());
        assert!(
            ListenerConfig::new()
                .reverb_probe(ReverbProbe::Hemisphere { normal: Vec3::ZERO })
                .validate()
                .is_err()
        );
        assert!(
            ListenerConfig::new()
                .reverb_probe(ReverbProbe::Hemisphere { normal: Vec3::Y })
                .validate()
                .is_ok()
        );
        assert!(
            ListenerConfig::new()
                .volume_cone(ConeConfig::new(400.0, 10.0, 4))
                .validate()
                .is_err()
        );
        assert!(
            ListenerConfig::new()
                .echo_cone(ConeConfig::new(10.0, 10.0, 0))
                .validate()
                .is_err()
        );
    }
}
