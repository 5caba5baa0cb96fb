//! Pure derivation of classifier features from a validated match state.

use super::catalog::{City, Team};
use super::match_state::{MatchState, TOTAL_WICKETS};

/// Balls in a full T20 innings.
pub const TOTAL_BALLS: u32 = 120;

/// The derived feature set plus the passthrough categoricals, one value per
/// column the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub city: City,
    pub target: u32,
    /// Runs still required. Deliberately not clamped: once the target has
    /// been reached this goes to zero or negative.
    pub runs_left: i64,
    pub balls_left: u32,
    pub wickets_in_hand: u8,
    pub current_run_rate: f64,
    pub required_run_rate: f64,
}

/// Derive the classifier features for one state. Pure and total: identical
/// input yields identical output, and the two degenerate divisions (no ball
/// bowled yet, no ball remaining) are defined to yield a 0 rate rather than
/// an error or an infinity.
pub fn derive(state: &MatchState) -> DerivedFeatures {
    let balls_bowled = state.overs.balls_bowled();
    let balls_left = TOTAL_BALLS - balls_bowled;
    let runs_left = i64::from(state.target) - i64::from(state.score);

    let current_run_rate = if balls_bowled == 0 {
        0.0
    } else {
        f64::from(state.score) * 6.0 / f64::from(balls_bowled)
    };

    // A chase that should already be over (no balls left, or runs_left
    // negative with balls remaining) still produces a defined rate; the 0
    // for an exhausted innings is policy, not an accident of arithmetic.
    let required_run_rate = if balls_left == 0 {
        0.0
    } else {
        runs_left as f64 * 6.0 / f64::from(balls_left)
    };

    DerivedFeatures {
        batting_team: state.batting_team,
        bowling_team: state.bowling_team,
        city: state.city,
        target: state.target,
        runs_left,
        balls_left,
        wickets_in_hand: TOTAL_WICKETS - state.wickets_lost,
        current_run_rate,
        required_run_rate,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
