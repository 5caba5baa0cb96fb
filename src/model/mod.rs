//! Shipped classifier: a one-hot + logistic-regression pipeline restored
//! from a JSON artifact.

pub mod artifact;

pub use artifact::{ArtifactError, ModelArtifact, ModelMetadata};

use std::path::Path;

use crate::predictor::{Classifier, ClassifierError, FeatureRecord};

/// Chase-outcome classifier backed by a [`ModelArtifact`].
///
/// Scoring is a dot product over the one-hot encoded categoricals and the
/// numeric features, mapped through a sigmoid. The instance is stateless
/// per invocation; one loaded copy serves all requests.
pub struct ChaseClassifier {
    artifact: ModelArtifact,
}

impl ChaseClassifier {
    /// Load and shape-check the artifact. Called once at startup.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        Self::from_artifact(ModelArtifact::from_file(path)?)
    }

    /// Wrap a parsed artifact after shape-checking it.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ArtifactError> {
        artifact.validate()?;
        Ok(ChaseClassifier { artifact })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.artifact.metadata
    }

    /// Linear score (logit) of the win class for one record.
    fn logit(&self, record: &FeatureRecord) -> Result<f64, ClassifierError> {
        let coefficients = &self.artifact.coefficients;
        let mut z = self.artifact.intercept;
        let mut offset = 0;

        // One-hot blocks, in the artifact's fixed column order.
        let categorical = [
            (
                "batting_team",
                record.batting_team,
                &self.artifact.categories.batting_team,
            ),
            (
                "bowling_team",
                record.bowling_team,
                &self.artifact.categories.bowling_team,
            ),
            ("city", record.city, &self.artifact.categories.city),
        ];
        for (feature, value, domain) in categorical {
            let position = domain
                .iter()
                .position(|level| level.as_str() == value)
                .ok_or_else(|| ClassifierError::UnknownLevel {
                    feature,
                    value: value.to_string(),
                })?;
            z += coefficients[offset + position];
            offset += domain.len();
        }

        for name in &self.artifact.numeric_features {
            let value = match name.as_str() {
                "runs_left" => record.runs_left,
                "balls_left" => record.balls_left,
                "wickets" => record.wickets,
                "total_runs_x" => record.total_runs_x,
                "crr" => record.crr,
                "rrr" => record.rrr,
                // Unreachable after artifact validation; kept as a hard
                // error rather than a silent zero contribution.
                other => {
                    return Err(ClassifierError::Invocation(format!(
                        "numeric feature {other:?} has no source field"
                    )))
                }
            };
            z += coefficients[offset] * value;
            offset += 1;
        }

        Ok(z)
    }
}

impl Classifier for ChaseClassifier {
    fn class_probabilities(&self, record: &FeatureRecord) -> Result<[f64; 2], ClassifierError> {
        let win = sigmoid(self.logit(record)?);
        Ok([1.0 - win, win])
    }

    fn name(&self) -> &str {
        "chase-logistic"
    }
}

/// Numerically stable logistic sigmoid.
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::{CategoryDomains, KNOWN_NUMERIC_FEATURES};
    use crate::predictor::{catalog, derive, predict, MatchState, MatchStateInput};
    use approx::assert_relative_eq;

    /// Artifact with hand-pickable coefficients: two teams, two cities,
    /// all six numeric features.
    fn tiny_artifact(
        batting_csk: f64,
        wickets: f64,
        runs_left: f64,
        intercept: f64,
    ) -> ModelArtifact {
        // Coefficient layout: batting [CSK, MI], bowling [CSK, MI],
        // city [Chennai, Mumbai], then the six numeric features.
        let mut coefficients = vec![0.0; 12];
        coefficients[0] = batting_csk;
        coefficients[6] = runs_left; // "runs_left" is numeric slot 0
        coefficients[8] = wickets; // "wickets" is numeric slot 2
        ModelArtifact {
            metadata: ModelMetadata {
                version: "test".into(),
                trained_on: "unit fixtures".into(),
                n_samples: 10,
                log_loss: None,
                accuracy: None,
            },
            categories: CategoryDomains {
                batting_team: vec!["Chennai Super Kings".into(), "Mumbai Indians".into()],
                bowling_team: vec!["Chennai Super Kings".into(), "Mumbai Indians".into()],
                city: vec!["Chennai".into(), "Mumbai".into()],
            },
            numeric_features: KNOWN_NUMERIC_FEATURES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            coefficients,
            intercept,
        }
    }

    fn record(runs_left: f64, wickets: f64) -> FeatureRecord {
        FeatureRecord {
            batting_team: "Chennai Super Kings",
            bowling_team: "Mumbai Indians",
            city: "Chennai",
            runs_left,
            balls_left: 60.0,
            wickets,
            total_runs_x: 180.0,
            crr: 0.0,
            rrr: 0.0,
        }
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_relative_eq!(sigmoid(0.0), 0.5, epsilon = 1e-12);
        assert!(sigmoid(10.0) > 0.9999);
        assert!(sigmoid(-10.0) < 0.0001);
        // Far outside the exp() range in naive form.
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0) < sigmoid(800.0));
    }

    #[test]
    fn logit_matches_hand_computation() {
        let classifier =
            ChaseClassifier::from_artifact(tiny_artifact(0.5, 0.0, -0.01, 0.2)).unwrap();
        // z = intercept + batting(CSK) + runs_left coefficient * 80
        let expected = 0.2 + 0.5 - 0.01 * 80.0;
        let probs = classifier.class_probabilities(&record(80.0, 8.0)).unwrap();
        assert_relative_eq!(probs[1], sigmoid(expected), epsilon = 1e-12);
        assert_relative_eq!(probs[0] + probs[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unknown_level_is_a_hard_error() {
        let classifier =
            ChaseClassifier::from_artifact(tiny_artifact(0.0, 0.0, 0.0, 0.0)).unwrap();
        let mut unknown_city = record(50.0, 5.0);
        unknown_city.city = "Sharjah"; // valid catalog name, absent from this fit
        let error = classifier.class_probabilities(&unknown_city).unwrap_err();
        assert!(matches!(
            error,
            ClassifierError::UnknownLevel { feature: "city", .. }
        ));
    }

    #[test]
    fn fewer_runs_left_means_higher_win_probability() {
        let classifier =
            ChaseClassifier::from_artifact(tiny_artifact(0.0, 0.0, -0.02, 0.0)).unwrap();
        let easy = classifier.class_probabilities(&record(20.0, 8.0)).unwrap();
        let hard = classifier.class_probabilities(&record(90.0, 8.0)).unwrap();
        assert!(easy[1] > hard[1]);
    }

    #[test]
    fn more_wickets_in_hand_means_higher_win_probability() {
        let classifier =
            ChaseClassifier::from_artifact(tiny_artifact(0.0, 0.3, 0.0, 0.0)).unwrap();
        let deep = classifier.class_probabilities(&record(60.0, 9.0)).unwrap();
        let thin = classifier.class_probabilities(&record(60.0, 3.0)).unwrap();
        assert!(deep[1] > thin[1]);
    }

    #[test]
    fn malformed_artifact_is_rejected_by_constructor() {
        let mut artifact = tiny_artifact(0.0, 0.0, 0.0, 0.0);
        artifact.coefficients.truncate(5);
        assert!(ChaseClassifier::from_artifact(artifact).is_err());
    }

    // ── Shipped artifact ─────────────────────────────────────────────────────

    fn shipped() -> ChaseClassifier {
        ChaseClassifier::load(Path::new("model/pipe.json")).expect("shipped artifact loads")
    }

    #[test]
    fn shipped_artifact_covers_the_whole_catalog() {
        let classifier = shipped();
        let domains = &classifier.artifact.categories;
        for team in catalog::TEAMS {
            assert!(domains.batting_team.iter().any(|level| level == team));
            assert!(domains.bowling_team.iter().any(|level| level == team));
        }
        for city in catalog::CITIES {
            assert!(domains.city.iter().any(|level| level == city));
        }
    }

    #[test]
    fn shipped_artifact_scores_a_live_chase() {
        let classifier = shipped();
        let input = MatchStateInput {
            batting_team: "Chennai Super Kings".into(),
            bowling_team: "Mumbai Indians".into(),
            city: "Chennai".into(),
            target: 180,
            score: 100,
            overs: 10.0,
            wickets_lost: 2,
        };
        let state = MatchState::from_input(&input, false).unwrap();
        let result = predict(&derive(&state), &classifier).unwrap();
        assert!(result.win_probability > 0.0 && result.win_probability < 1.0);
        assert_relative_eq!(
            result.win_probability + result.loss_probability,
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn shipped_artifact_prefers_the_easier_chase() {
        let classifier = shipped();
        let chase = |score: u32, wickets_lost: u8| {
            let input = MatchStateInput {
                batting_team: "Rajasthan Royals".into(),
                bowling_team: "Delhi Capitals".into(),
                city: "Jaipur".into(),
                target: 170,
                score,
                overs: 12.0,
                wickets_lost,
            };
            let state = MatchState::from_input(&input, false).unwrap();
            predict(&derive(&state), &classifier).unwrap().win_probability
        };
        // Same overs, better score: easier chase must not rate lower.
        assert!(chase(130, 2) > chase(80, 2));
        // Same score, fewer wickets down.
        assert!(chase(100, 1) > chase(100, 8));
    }
}
