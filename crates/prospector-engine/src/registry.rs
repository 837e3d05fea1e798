//! Detector identity → binding lookup.

use std::collections::HashMap;

use tracing::info;

use prospector_core::binding::Binding;

/// Registered bindings, keyed by detector identity.
#[derive(Debug, Default, Clone)]
pub struct BindingRegistry {
    bindings: HashMap<String, Binding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, replacing any existing one with the same detector id.
    pub fn add(&mut self, binding: Binding) -> Option<Binding> {
        info!(detector = binding.detector_id(), "Adding detector binding");
        self.bindings
            .insert(binding.detector_id().to_owned(), binding)
    }

    /// Remove a binding. Absent ids are ignored.
    pub fn remove(&mut self, detector_id: &str) -> Option<Binding> {
        info!(detector = detector_id, "Removing detector binding");
        self.bindings.remove(detector_id)
    }

    pub fn get(&self, detector_id: &str) -> Option<&Binding> {
        self.bindings.get(detector_id)
    }

    pub fn contains(&self, detector_id: &str) -> bool {
        self.bindings.contains_key(detector_id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Registered detector ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bindings.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
