//! Trained model artifact and the start-up mode decision
//!
//! The artifact is loaded once before the server binds. A failed load is not
//! fatal: the caller turns the `LoadError` into `Mode::Heuristic` and the
//! process keeps that mode for its whole lifetime.

pub mod encoder;
pub mod regressor;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ArtifactsConfig;

pub use encoder::{LabelEncoder, UnknownCategoryError};
pub use regressor::{Features, Regressor, FEATURE_COUNT, FEATURE_NAMES};

/// Reasons the artifact could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("invalid {name}: {reason}")]
    InvalidEncoder { name: &'static str, reason: String },
}

/// On-disk layout of the encoders file
#[derive(Debug, Deserialize)]
struct EncoderFile {
    make_encoder: LabelEncoder,
    model_encoder: LabelEncoder,
}

/// Regressor plus the encoders for its categorical inputs
#[derive(Debug, Clone)]
///
/// Only constructible through `Artifact::new`, so every held regressor has
/// passed its structural checks.
pub struct Artifact {
    regressor: Regressor,
    make_encoder: LabelEncoder,
    model_encoder: LabelEncoder,
}

impl Artifact {
    pub fn new(
        regressor: Regressor,
        make_encoder: LabelEncoder,
        model_encoder: LabelEncoder,
    ) -> Result<Self, LoadError> {
        regressor.check().map_err(LoadError::InvalidModel)?;
        make_encoder
            .check()
            .map_err(|reason| LoadError::InvalidEncoder {
                name: "make_encoder",
                reason,
            })?;
        model_encoder
            .check()
            .map_err(|reason| LoadError::InvalidEncoder {
                name: "model_encoder",
                reason,
            })?;

        Ok(Self {
            regressor,
            make_encoder,
            model_encoder,
        })
    }

    pub fn regressor(&self) -> &Regressor {
        &self.regressor
    }

    pub fn make_encoder(&self) -> &LabelEncoder {
        &self.make_encoder
    }

    pub fn model_encoder(&self) -> &LabelEncoder {
        &self.model_encoder
    }
}

/// Load the model and encoder artifacts from the configured paths
pub fn load_artifact(config: &ArtifactsConfig) -> Result<Artifact, LoadError> {
    let regressor: Regressor = read_json(&config.model_path)?;
    let encoders: EncoderFile = read_json(&config.encoders_path)?;

    Artifact::new(regressor, encoders.make_encoder, encoders.model_encoder)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// How prices are estimated for the lifetime of the process
#[derive(Debug, Clone)]
pub enum Mode {
    ModelBacked(Artifact),
    Heuristic,
}

impl Mode {
    /// Degrade to heuristic mode on a failed load, logging the reason
    pub fn from_load_result(result: Result<Artifact, LoadError>) -> Self {
        match result {
            Ok(artifact) => {
                info!(
                    regressor = artifact.regressor().kind(),
                    makes = artifact.make_encoder().len(),
                    models = artifact.model_encoder().len(),
                    "Model artifact loaded"
                );
                Mode::ModelBacked(artifact)
            }
            Err(e) => {
                warn!(error = %e, "Model artifact unavailable, using heuristic estimates");
                Mode::Heuristic
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::ModelBacked(_) => "model",
            Mode::Heuristic => "heuristic",
        }
    }
}
