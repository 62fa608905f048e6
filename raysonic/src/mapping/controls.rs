use crate::config::MixerBindings;
use crate::mixer::MixerSink;
use std::collections::BTreeMap;
use std::fmt;

/// Named control outputs produced by the parameter mapper.
///
/// Hz-domain and dB-domain variants of the same concept are distinct
/// parameters; bind whichever the mixer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlParameter {
    /// Early reflection level, 0.1 - 1.0
    ReflectionStrength,
    /// `ReflectionStrength` as attenuation, -80 - 0 dB
    ReflectionDb,
    /// Reverb send, 0.0 - 1.0
    ReverbFactor,
    /// `ReverbFactor` as attenuation, -80 - 0 dB
    ReverbDb,
    /// Fraction of sampling rays that escaped, 0.0 - 1.0
    Openness,
    /// Lowpass cutoff from the volume cone, floor - 22000 Hz
    MuffleCutoffHz,
    /// High band attenuation from the volume cone, -80 - 0 dB
    MuffleDb,
    /// Lowpass cutoff from the direct listener-to-source ray, floor or 22000 Hz
    LowpassCutoffHz,
    /// Echo send, 0.0 - 0.5
    EchoVolume,
    /// Fraction of echo cone rays that found a reflecting surface, 0.0 - 1.0
    EchoDensity,
}

impl ControlParameter {
    pub const ALL: [Self; 10] = [
        Self::ReflectionStrength,
        Self::ReflectionDb,
        Self::ReverbFactor,
        Self::ReverbDb,
        Self::Openness,
        Self::MuffleCutoffHz,
        Self::MuffleDb,
        Self::LowpassCutoffHz,
        Self::EchoVolume,
        Self::EchoDensity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReflectionStrength => "ReflectionStrength",
            Self::ReflectionDb => "ReflectionDb",
            Self::ReverbFactor => "ReverbFactor",
            Self::ReverbDb => "ReverbDb",
            Self::Openness => "Openness",
            Self::MuffleCutoffHz => "MuffleCutoffHz",
            Self::MuffleDb => "MuffleDb",
            Self::LowpassCutoffHz => "LowpassCutoffHz",
            Self::EchoVolume => "EchoVolume",
            Self::EchoDensity => "EchoDensity",
        }
    }
}

impl fmt::Display for ControlParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control values computed by one sampling pass.
///
/// Overwritten wholesale on every pass; no history is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlValues {
    values: BTreeMap<ControlParameter, f32>,
}

impl ControlValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parameter: ControlParameter) -> Option<f32> {
        self.values.get(&parameter).copied()
    }

    pub fn set(&mut self, parameter: ControlParameter, value: f32) {
        self.values.insert(parameter, value);
    }

    pub fn with(mut self, parameter: ControlParameter, value: f32) -> Self {
        self.set(parameter, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlParameter, f32)> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes every bound value to `sink` and returns how many were written.
    pub fn write_to(&self, bindings: &MixerBindings, sink: &mut dyn MixerSink) -> usize {
        let mut written = 0;
        for (parameter, value) in self.iter() {
            match bindings.name(parameter) {
                Some(name) => {
                    sink.set_parameter(name, value);
                    written += 1;
                }
                None => log::trace!("{} has no mixer binding, not written", parameter),
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::ParameterStore;

    #[test]
    fn test_write_to_only_writes_bound_values() {
        let values = ControlValues::new()
            .with(ControlParameter::ReflectionStrength, 0.7)
            .with(ControlParameter::ReverbFactor, 0.4)
            .with(ControlParameter::MuffleDb, -20.0);
        let bindings = MixerBindings::listener_defaults();
        let mut store = ParameterStore::new();

        let written = values.write_to(&bindings, &mut store);

        assert_eq!(written, 2);
        assert_eq!(store.get("ReflectionStrength"), Some(0.7));
        assert_eq!(store.get("ReverbFactor"), Some(0.4));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_parameter_names_are_unique() {
        let mut names: Vec<_> = ControlParameter::ALL.iter().map(|p| p.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ControlParameter::ALL.len());
    }
}
