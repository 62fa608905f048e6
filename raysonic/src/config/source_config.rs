use super::MixerBindings;
use crate::error::{RaySonicError, Result};

/// Acoustic properties of an audio source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Range of rays cast from the source (meters)
    pub max_distance: f32,
    /// Strength of the echo off a surface one meter behind the source (0.0 - 1.0)
    pub reflection_strength: f32,
    /// Reverb send when the source stands in fully open space (0.0 - 1.0)
    pub reverb_factor: f32,
    /// Mixer names for this source's outputs
    pub bindings: MixerBindings,
}

/// Prefix of the mixer names bound by [`SourceConfig::default`].
///
/// Sources sharing one mixer should each get their own prefix through
/// [`SourceConfig::named`].
pub const DEFAULT_SOURCE_PREFIX: &str = "Source";

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            max_distance: 50.0,
            reflection_strength: 0.5,
            reverb_factor: 0.5,
            bindings: MixerBindings::source_defaults(DEFAULT_SOURCE_PREFIX),
        }
    }
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with mixer names prefixed by `prefix`.
    pub fn named(prefix: &str) -> Self {
        Self {
            bindings: MixerBindings::source_defaults(prefix),
            ..Self::default()
        }
    }

    pub fn max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    pub fn reflection_strength(mut self, strength: f32) -> Self {
        self.reflection_strength = strength;
        self
    }

    pub fn reverb_factor(mut self, factor: f32) -> Self {
        self.reverb_factor = factor;
        self
    }

    pub fn bindings(mut self, bindings: MixerBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(RaySonicError::Configuration(format!(
                "source max distance must be a positive number, got {}",
                self.max_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.reflection_strength) {
            return Err(RaySonicError::Configuration(
                "reflection strength must be between 0.0 and 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reverb_factor) {
            return Err(RaySonicError::Configuration(
                "reverb factor must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}
