//! Mapping from geometric sampling statistics to mixer control values.
//!
//! Every function here is pure. Inputs are expected to be pre-clamped by the
//! caller, and every output is clamped again before it is returned.

mod controls;

pub use controls::{ControlParameter, ControlValues};

use crate::math::{clamp_ratio, inverse_lerp, lerp};
use crate::sampling::{AcousticEstimate, SourceAcoustics};

/// Cutoff frequency of an unobstructed path (Hz)
pub const OPEN_CUTOFF_HZ: f32 = 22_000.0;
/// Default cutoff of a fully obstructed path (Hz)
pub const DEFAULT_MUFFLE_FLOOR_HZ: f32 = 500.0;
/// Attenuation mapped from a ratio of 0
pub const SILENT_DB: f32 = -80.0;
/// Attenuation mapped from a ratio of 1
pub const UNITY_DB: f32 = 0.0;
/// Reflections never fall below this level, even in fully open space
pub const MIN_REFLECTION_STRENGTH: f32 = 0.1;
/// Echo send relative to echo strength
pub const ECHO_VOLUME_SCALE: f32 = 0.5;
/// Echo falloff is flat below this distance (meters)
pub const MIN_ECHO_DISTANCE: f32 = 1.0;

/// `clamp(avg_distance / max_distance, 0.1, 1.0)`.
///
/// A non-positive `max_distance` maps to 1.0, the value of a batch whose
/// average is pinned at max range.
pub fn reflection_strength(avg_distance: f32, max_distance: f32) -> f32 {
    if max_distance.is_nan() || max_distance <= 0.0 {
        return 1.0;
    }
    clamp_ratio(avg_distance / max_distance).max(MIN_REFLECTION_STRENGTH)
}

/// Reverb from how far rays travel on average: `avg_distance / max_distance`
/// clamped to [0, 1].
pub fn distance_reverb_factor(avg_distance: f32, max_distance: f32) -> f32 {
    if max_distance.is_nan() || max_distance <= 0.0 {
        return 1.0;
    }
    inverse_lerp(0.0, max_distance, avg_distance)
}

/// `1 - occlusion_ratio`, clamped to [0, 1].
pub fn openness(occlusion_ratio: f32) -> f32 {
    1.0 - clamp_ratio(occlusion_ratio)
}

/// `base_reverb_factor * openness`, in [0, base_reverb_factor].
pub fn reverb_factor(base_reverb_factor: f32, occlusion_ratio: f32) -> f32 {
    clamp_ratio(clamp_ratio(base_reverb_factor) * openness(occlusion_ratio))
}

/// Lowpass cutoff interpolated linearly from 22 kHz (nothing blocked) down to
/// `floor_hz` (everything blocked).
///
/// The interpolation runs in the ratio domain, not on a perceptual log scale.
pub fn muffle_cutoff_hz(blocked_ratio: f32, floor_hz: f32) -> f32 {
    let floor_hz = if floor_hz.is_nan() {
        DEFAULT_MUFFLE_FLOOR_HZ
    } else {
        floor_hz.clamp(0.0, OPEN_CUTOFF_HZ)
    };
    lerp(OPEN_CUTOFF_HZ, floor_hz, clamp_ratio(blocked_ratio)).clamp(floor_hz, OPEN_CUTOFF_HZ)
}

/// `lerp(-80, 0, ratio)`: a linear ratio expressed as decibels of attenuation.
pub fn ratio_to_db(ratio: f32) -> f32 {
    lerp(SILENT_DB, UNITY_DB, clamp_ratio(ratio))
}

/// `base_reflection_strength / max(1, distance)`.
pub fn echo_strength(base_reflection_strength: f32, distance: f32) -> f32 {
    clamp_ratio(base_reflection_strength) / distance.max(MIN_ECHO_DISTANCE)
}

/// `echo_strength * 0.5`.
pub fn echo_volume(echo_strength: f32) -> f32 {
    clamp_ratio(echo_strength) * ECHO_VOLUME_SCALE
}

/// Turns sampling results into named control values.
///
/// Holds only configuration; the same inputs always produce the same outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterMapper {
    pub muffle_floor_hz: f32,
}

impl Default for ParameterMapper {
    fn default() -> Self {
        Self {
            muffle_floor_hz: DEFAULT_MUFFLE_FLOOR_HZ,
        }
    }
}

impl ParameterMapper {
    pub fn new(muffle_floor_hz: f32) -> Self {
        Self { muffle_floor_hz }
    }

    /// Listener outputs from an ambient estimate.
    pub fn ambient(&self, estimate: &AcousticEstimate) -> ControlValues {
        let reflection = reflection_strength(estimate.average_distance, estimate.max_distance);
        let reverb = distance_reverb_factor(estimate.average_distance, estimate.max_distance);

        ControlValues::new()
            .with(ControlParameter::ReflectionStrength, reflection)
            .with(ControlParameter::ReflectionDb, ratio_to_db(reflection))
            .with(ControlParameter::ReverbFactor, reverb)
            .with(ControlParameter::ReverbDb, ratio_to_db(reverb))
            .with(ControlParameter::Openness, openness(estimate.occlusion_ratio))
    }

    /// Per-source outputs from one listener/source pass.
    pub fn source(&self, acoustics: &SourceAcoustics, base_reverb_factor: f32) -> ControlValues {
        let blocked = clamp_ratio(acoustics.volume.occlusion_ratio);
        let reverb = reverb_factor(base_reverb_factor, acoustics.reverb.occlusion_ratio);
        let direct_blocked = if acoustics.direct_occluded { 1.0 } else { 0.0 };

        ControlValues::new()
            .with(ControlParameter::ReverbFactor, reverb)
            .with(ControlParameter::ReverbDb, ratio_to_db(reverb))
            .with(
                ControlParameter::Openness,
                openness(acoustics.reverb.occlusion_ratio),
            )
            .with(
                ControlParameter::MuffleCutoffHz,
                muffle_cutoff_hz(blocked, self.muffle_floor_hz),
            )
            .with(ControlParameter::MuffleDb, ratio_to_db(1.0 - blocked))
            .with(
                ControlParameter::LowpassCutoffHz,
                muffle_cutoff_hz(direct_blocked, self.muffle_floor_hz),
            )
            .with(
                ControlParameter::EchoVolume,
                echo_volume(acoustics.echo_strength),
            )
            .with(
                ControlParameter::EchoDensity,
                clamp_ratio(acoustics.echo.occlusion_ratio),
            )
    }
}
