//! Prediction adapter: packages [`DerivedFeatures`] for an injected
//! classifier capability and normalizes its two class probabilities into a
//! [`PredictionResult`].

use serde::Serialize;
use thiserror::Error;

use super::features::DerivedFeatures;

/// Class index the classifier was fitted with for "chase fails".
pub const LOSS_CLASS: usize = 0;
/// Class index the classifier was fitted with for "chase succeeds".
pub const WIN_CLASS: usize = 1;

/// Accepted deviation of the returned probability pair from summing to 1.
const SUM_TOLERANCE: f64 = 1e-6;

/// The named feature record handed to the classifier.
///
/// Field names are the training pipeline's column names and must not drift:
/// `wickets` counts wickets in hand (not lost) and `total_runs_x` is the
/// chase target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub batting_team: &'static str,
    pub bowling_team: &'static str,
    pub city: &'static str,
    pub runs_left: f64,
    pub balls_left: f64,
    pub wickets: f64,
    pub total_runs_x: f64,
    pub crr: f64,
    pub rrr: f64,
}

impl FeatureRecord {
    pub fn from_features(features: &DerivedFeatures) -> Self {
        FeatureRecord {
            batting_team: features.batting_team.as_str(),
            bowling_team: features.bowling_team.as_str(),
            city: features.city.as_str(),
            runs_left: features.runs_left as f64,
            balls_left: f64::from(features.balls_left),
            wickets: f64::from(features.wickets_in_hand),
            total_runs_x: f64::from(features.target),
            crr: features.current_run_rate,
            rrr: features.required_run_rate,
        }
    }
}

/// Failure inside the classifier capability or in its output contract.
/// Surfaced to the caller as-is; there is no fallback prediction.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("feature {feature} has value {value:?} outside the fitted domain")]
    UnknownLevel {
        feature: &'static str,
        value: String,
    },

    #[error("classifier invocation failed: {0}")]
    Invocation(String),

    #[error("classifier returned an invalid probability pair [{loss}, {win}]")]
    InvalidProbabilities { loss: f64, win: f64 },
}

/// The injected classification capability: one structured record in, one
/// probability per class out, indexed [`LOSS_CLASS`] then [`WIN_CLASS`].
///
/// Implementations must be stateless per invocation so a single loaded
/// instance can serve concurrent requests.
pub trait Classifier: Send + Sync {
    fn class_probabilities(&self, record: &FeatureRecord) -> Result<[f64; 2], ClassifierError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Complementary outcome probabilities for the batting side.
/// `win_probability + loss_probability` is exactly 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub win_probability: f64,
    pub loss_probability: f64,
}

/// Run one prediction: package the features, invoke the classifier exactly
/// once, validate its output and pin the class order. Index 0 = loss and
/// index 1 = win, fixed at training time.
pub fn predict(
    features: &DerivedFeatures,
    classifier: &dyn Classifier,
) -> Result<PredictionResult, ClassifierError> {
    let record = FeatureRecord::from_features(features);
    let probabilities = classifier.class_probabilities(&record)?;

    let loss = probabilities[LOSS_CLASS];
    let win = probabilities[WIN_CLASS];
    let valid = loss.is_finite()
        && win.is_finite()
        && (0.0..=1.0).contains(&loss)
        && (0.0..=1.0).contains(&win)
        && (loss + win - 1.0).abs() <= SUM_TOLERANCE;
    if !valid {
        return Err(ClassifierError::InvalidProbabilities { loss, win });
    }

    // Renormalize so the returned pair sums to exactly 1 even when the
    // classifier was only within tolerance.
    let win_probability = win / (win + loss);
    Ok(PredictionResult {
        win_probability,
        loss_probability: 1.0 - win_probability,
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────
