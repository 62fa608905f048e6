//! Mixer parameter sink.
//!
//! The mixer is external: RaySonic only ever writes named float parameters
//! into it and never reads them back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Write-only store of named float parameters, such as an audio mixer's
/// exposed parameters.
pub trait MixerSink {
    /// Sets `name` to `value`. Failures are the sink's own business; nothing
    /// is reported back to the sampler.
    fn set_parameter(&mut self, name: &str, value: f32);
}

impl MixerSink for HashMap<String, f32> {
    fn set_parameter(&mut self, name: &str, value: f32) {
        self.insert(name.to_owned(), value);
    }
}

/// In-memory [`MixerSink`] whose clones share the same parameters.
///
/// Hand one clone to the world and keep another to read values back.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    values: Arc<Mutex<HashMap<String, f32>>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.lock().get(name).copied()
    }

    /// Copy of every parameter currently set.
    pub fn snapshot(&self) -> HashMap<String, f32> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, f32>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MixerSink for ParameterStore {
    fn set_parameter(&mut self, name: &str, value: f32) {
        self.lock().insert(name.to_owned(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_store_clones_share_values() {
        let store = ParameterStore::new();
        let mut writer = store.clone();

        writer.set_parameter("ReverbFactor", 0.4);
        writer.set_parameter("ReverbFactor", 0.6);

        assert_eq!(store.get("ReverbFactor"), Some(0.6));
        assert_eq!(store.len(), 1);
        assert!(store.get("Missing").is_none());

        store.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_hash_map_sink() {
        let mut map: HashMap<String, f32> = HashMap::new();
        map.set_parameter("A", 1.0);
        assert_eq!(map.get("A"), Some(&1.0));
    }
}
