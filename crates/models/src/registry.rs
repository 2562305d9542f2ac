//! Model registry: algorithm name -> loaded predictor.
//!
//! Populated once at startup and read-only afterwards, so it is shared across
//! request handlers behind an `Arc` without any locking.

use crate::algorithms::AlgorithmKind;
use crate::error::Result;
use crate::persist::model_path;
use crate::predictor::{FittedModel, Predictor};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<dyn Predictor>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every known algorithm found in `dir`.
    ///
    /// Missing files are skipped with a warning; a file that exists but cannot
    /// be decoded is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let loaded: Vec<Option<FittedModel>> = AlgorithmKind::ALL
            .par_iter()
            .map(|&kind| {
                let path = model_path(dir, kind);
                if !path.exists() {
                    warn!("Model {} not found at {:?}. Please train it first.", kind, path);
                    return Ok(None);
                }
                let model = FittedModel::load(&path)?;
                info!("Loaded model: {}", kind);
                Ok(Some(model))
            })
            .collect::<Result<_>>()?;

        let mut registry = Self::new();
        for model in loaded.into_iter().flatten() {
            registry.insert(model.kind().name(), Arc::new(model));
        }

        info!("Model registry ready with {} model(s)", registry.len());
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, model: Arc<dyn Predictor>) {
        self.models.insert(name.into(), model);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Predictor>> {
        self.models.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.names())
            .finish()
    }
}
