//! Inference core: validated match state in, win/loss probability pair out.
//!
//! The per-request pipeline is linear and free of I/O:
//! request DTO → [`MatchState`] → [`derive`] → [`predict`] → result.
//! The classifier behind [`predict`] is an injected capability, loaded once
//! at startup and shared read-only across requests.

pub mod adapter;
pub mod catalog;
pub mod features;
pub mod match_state;

pub use adapter::{predict, Classifier, ClassifierError, FeatureRecord, PredictionResult};
pub use catalog::{City, Team};
pub use features::{derive, DerivedFeatures};
pub use match_state::{InputError, MatchState, MatchStateInput, Overs};
