use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// One cached classifier handle per model label, shared across requests.
///
/// The registry is built once at startup and immutable afterwards, which
/// replaces the original service's per-request model loading: lookups
/// clone an `Arc`, never reload a model.
#[derive(Debug, Default)]
pub struct ModelRegistry<C> {
    models: HashMap<String, Arc<C>>,
}

impl<C> ModelRegistry<C> {
    pub fn new() -> Self {
        ModelRegistry { models: HashMap::new() }
    }

    /// register stores a classifier under `label`, replacing any earlier
    /// handle with the same label.
    pub fn register(&mut self, label: impl Into<String>, classifier: C) -> &mut Self {
        self.models.insert(label.into(), Arc::new(classifier));
        self
    }

    /// get returns the handle for `label`, failing with
    /// `Error::InvalidModelLabel` for labels never registered. The
    /// pipeline calls this before touching the request image.
    pub fn get(&self, label: &str) -> Result<Arc<C>> {
        self.models
            .get(label)
            .cloned()
            .ok_or_else(|| Error::InvalidModelLabel(label.to_string()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}
