//! Saving and loading fitted models as JSON files, one per algorithm.

use crate::algorithms::AlgorithmKind;
use crate::error::{ModelError, Result};
use crate::predictor::FittedModel;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the model for `kind` lives inside `dir`
pub fn model_path(dir: &Path, kind: AlgorithmKind) -> PathBuf {
    dir.join(kind.file_name())
}

impl FittedModel {
    /// Write the model to `<dir>/<algorithm name>.json`, creating `dir` if needed
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = model_path(dir, self.kind());

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;

        debug!("Saved {} to {:?}", self.kind(), path);
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|source| ModelError::Load {
            path: path.display().to_string(),
            source,
        })
    }
}
