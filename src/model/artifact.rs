//! JSON model artifact exported by the offline training pipeline.
//!
//! The pipeline fits a one-hot encoder over the three categorical columns
//! followed by a logistic regression, then flattens both into this document.
//! Coefficient layout: one column per categorical level in
//! [`CategoryDomains`] field order (batting_team, bowling_team, city), then
//! one per entry of `numeric_features`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric feature names the inference side can supply.
pub const KNOWN_NUMERIC_FEATURES: [&str; 6] = [
    "runs_left",
    "balls_left",
    "wickets",
    "total_runs_x",
    "crr",
    "rrr",
];

/// Artifact that cannot be read, parsed or shape-checked. Startup aborts on
/// any of these.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("model artifact is malformed: {0}")]
    Shape(String),
}

/// Versioning and held-out evaluation metadata carried alongside the fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: String,
    /// Data window of the fit, e.g. "IPL 2008-2023 second innings".
    pub trained_on: String,
    pub n_samples: usize,
    pub log_loss: Option<f64>,
    pub accuracy: Option<f64>,
}

/// Categorical domains the one-hot encoder was fitted on, in encoder column
/// order. An inference-time value outside its domain is a hard error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDomains {
    pub batting_team: Vec<String>,
    pub bowling_team: Vec<String>,
    pub city: Vec<String>,
}

/// A fitted one-hot + logistic-regression pipeline, flattened to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub categories: CategoryDomains,
    pub numeric_features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl ModelArtifact {
    /// Read and parse an artifact. Shape checking happens in
    /// [`validate`](Self::validate), run by the classifier constructor.
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Coefficient count the shape implies: one per one-hot column plus one
    /// per numeric feature.
    pub fn expected_coefficients(&self) -> usize {
        self.categories.batting_team.len()
            + self.categories.bowling_team.len()
            + self.categories.city.len()
            + self.numeric_features.len()
    }

    /// Fail fast on an artifact whose shape cannot be scored. A mismatch
    /// means the artifact and this binary disagree about the feature set.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let expected = self.expected_coefficients();
        if self.coefficients.len() != expected {
            return Err(ArtifactError::Shape(format!(
                "expected {} coefficients ({} one-hot columns + {} numeric), found {}",
                expected,
                expected - self.numeric_features.len(),
                self.numeric_features.len(),
                self.coefficients.len()
            )));
        }
        for name in &self.numeric_features {
            if !KNOWN_NUMERIC_FEATURES.contains(&name.as_str()) {
                return Err(ArtifactError::Shape(format!(
                    "unknown numeric feature {name:?}"
                )));
            }
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err(ArtifactError::Shape(
                "coefficients and intercept must be finite".into(),
            ));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
