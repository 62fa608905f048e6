use crate::mapping::ControlParameter;
use std::collections::BTreeMap;

/// Maps control outputs to the names of the mixer parameters that receive them.
///
/// Outputs without a binding are computed but never written. Which unit
/// convention a mixer expects (Hz or dB) is decided here, by binding either
/// `MuffleCutoffHz` or `MuffleDb`, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixerBindings {
    names: BTreeMap<ControlParameter, String>,
}

impl MixerBindings {
    /// Bindings with nothing bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default listener bindings: `ReflectionStrength` and `ReverbFactor`.
    pub fn listener_defaults() -> Self {
        Self::new()
            .bind(ControlParameter::ReflectionStrength, "ReflectionStrength")
            .bind(ControlParameter::ReverbFactor, "ReverbFactor")
    }

    /// Default per-source bindings, each name prefixed with `prefix`.
    ///
    /// Binds reverb, muffle cutoff (Hz), lowpass cutoff and echo volume.
    pub fn source_defaults(prefix: &str) -> Self {
        Self::new()
            .bind(ControlParameter::ReverbFactor, format!("{prefix}ReverbFactor"))
            .bind(
                ControlParameter::MuffleCutoffHz,
                format!("{prefix}MuffleCutoff"),
            )
            .bind(
                ControlParameter::LowpassCutoffHz,
                format!("{prefix}LowpassCutoff"),
            )
            .bind(ControlParameter::EchoVolume, format!("{prefix}EchoVolume"))
    }

    pub fn bind(mut self, parameter: ControlParameter, name: impl Into<String>) -> Self {
        self.names.insert(parameter, name.into());
        self
    }

    pub fn unbind(mut self, parameter: ControlParameter) -> Self {
        self.names.remove(&parameter);
        self
    }

    pub fn set(&mut self, parameter: ControlParameter, name: impl Into<String>) {
        self.names.insert(parameter, name.into());
    }

    pub fn remove(&mut self, parameter: ControlParameter) -> Option<String> {
        self.names.remove(&parameter)
    }

    /// Mixer parameter name bound to `parameter`, if any.
    pub fn name(&self, parameter: ControlParameter) -> Option<&str> {
        self.names.get(&parameter).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlParameter, &str)> {
        self.names.iter().map(|(p, n)| (*p, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First mixer name bound both here and in `other`, if any.
    ///
    /// Two passes writing one name on independent timers would make the
    /// mixer value alternate between their outputs.
    pub fn shared_name(&self, other: &MixerBindings) -> Option<&str> {
        self.names
            .values()
            .find(|name| other.names.values().any(|n| n == *name))
            .map(String::as_str)
    }
}
