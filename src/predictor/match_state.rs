//! Input boundary: raw request fields to a validated [`MatchState`].
//!
//! Everything downstream (feature derivation, classifier invocation) assumes
//! fields are inside their documented domains, so this is the single place
//! where ranges, catalog membership and the overs notation are checked.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::catalog::{City, Team};

/// Innings length of the T20 format, in overs.
pub const MAX_OVERS: u8 = 20;

/// Wickets available to a batting side.
pub const TOTAL_WICKETS: u8 = 10;

/// Slack when checking that the overs fraction is a single ball digit.
/// Scorecard values arrive as `f64`, so `10.3` is really `10.2999…`.
const NOTATION_TOLERANCE: f64 = 1e-6;

/// A raw input outside its documented domain, rejected before the core
/// runs. One variant per constraint, each carrying the offending value.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("unknown team: {0}")]
    UnknownTeam(String),

    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("batting and bowling team are both {0}")]
    SameTeam(String),

    #[error("target must be at least 1, got {0}")]
    TargetTooLow(u32),

    #[error("wickets lost must be between 0 and 10, got {0}")]
    WicketsOutOfRange(u8),

    #[error("overs must be between 0.0 and 20.0, got {0}")]
    OversOutOfRange(f64),

    #[error("the overs fraction counts balls in the current over and must be a single digit 0-5, got {0}")]
    InvalidBallCount(f64),
}

/// Bowling progress in cricket notation: the integer part counts completed
/// overs, the single fractional digit counts legal balls bowled in the
/// current over. `10.3` is 10 overs and 3 balls, 63 balls in total.
///
/// The notation is validated strictly. A value like `10.7` or `10.34` never
/// appeared on a scorecard, and quietly treating it as 10.7 decimal overs
/// would shift the balls-remaining arithmetic, so it is rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overs {
    completed: u8,
    balls: u8,
}

impl Overs {
    /// Parse the numeric scorecard notation used by the wire DTO.
    pub fn parse(value: f64) -> Result<Self, InputError> {
        if !value.is_finite() || value < 0.0 || value > f64::from(MAX_OVERS) {
            return Err(InputError::OversOutOfRange(value));
        }
        let completed = value.trunc() as u8;
        let ball_digit = (value - value.trunc()) * 10.0;
        let balls = ball_digit.round();
        if (ball_digit - balls).abs() > NOTATION_TOLERANCE || balls > 5.0 {
            return Err(InputError::InvalidBallCount(value));
        }
        Ok(Overs {
            completed,
            balls: balls as u8,
        })
    }

    /// Legal balls bowled so far. At most 120 by construction.
    pub fn balls_bowled(&self) -> u32 {
        u32::from(self.completed) * 6 + u32::from(self.balls)
    }

    /// Back to the numeric notation, for response echoes.
    pub fn as_notation(&self) -> f64 {
        f64::from(self.completed) + f64::from(self.balls) / 10.0
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.completed, self.balls)
    }
}

/// Raw prediction request, exactly the fields the predictor page collects.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchStateInput {
    pub batting_team: String,
    pub bowling_team: String,
    pub city: String,
    pub target: u32,
    pub score: u32,
    pub overs: f64,
    pub wickets_lost: u8,
}

/// A validated in-progress chase. [`MatchState::from_input`] is the only
/// construction path, so every field is inside its documented domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchState {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub city: City,
    pub target: u32,
    pub score: u32,
    pub overs: Overs,
    pub wickets_lost: u8,
}

impl MatchState {
    /// Validate one raw request. `allow_same_team` restores the historical
    /// permissiveness of accepting the same franchise in both roles; it is
    /// off unless explicitly configured.
    pub fn from_input(input: &MatchStateInput, allow_same_team: bool) -> Result<Self, InputError> {
        let batting_team = Team::parse(&input.batting_team)
            .ok_or_else(|| InputError::UnknownTeam(input.batting_team.clone()))?;
        let bowling_team = Team::parse(&input.bowling_team)
            .ok_or_else(|| InputError::UnknownTeam(input.bowling_team.clone()))?;
        if !allow_same_team && batting_team == bowling_team {
            return Err(InputError::SameTeam(input.batting_team.clone()));
        }
        let city = City::parse(&input.city)
            .ok_or_else(|| InputError::UnknownCity(input.city.clone()))?;
        if input.target < 1 {
            return Err(InputError::TargetTooLow(input.target));
        }
        if input.wickets_lost > TOTAL_WICKETS {
            return Err(InputError::WicketsOutOfRange(input.wickets_lost));
        }
        let overs = Overs::parse(input.overs)?;

        Ok(MatchState {
            batting_team,
            bowling_team,
            city,
            target: input.target,
            score: input.score,
            overs,
            wickets_lost: input.wickets_lost,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn valid_input() -> MatchStateInput {
        MatchStateInput {
            batting_team: "Chennai Super Kings".into(),
            bowling_team: "Mumbai Indians".into(),
            city: "Chennai".into(),
            target: 180,
            score: 100,
            overs: 10.0,
            wickets_lost: 2,
        }
    }

    // ── Overs notation ───────────────────────────────────────────────────────

    #[test]
    fn overs_parse_accepts_whole_and_ball_fractions() {
        for (value, bowled) in [
            (0.0, 0),
            (0.5, 5),
            (10.0, 60),
            (10.3, 63),
            (19.5, 119),
            (20.0, 120),
        ] {
            let overs = Overs::parse(value).expect("valid notation");
            assert_eq!(overs.balls_bowled(), bowled, "for {value}");
        }
    }

    #[test]
    fn overs_parse_rejects_seventh_ball_digit() {
        assert_eq!(Overs::parse(10.7), Err(InputError::InvalidBallCount(10.7)));
        assert_eq!(Overs::parse(0.6), Err(InputError::InvalidBallCount(0.6)));
    }

    #[test]
    fn overs_parse_rejects_second_fractional_digit() {
        assert_eq!(
            Overs::parse(10.34),
            Err(InputError::InvalidBallCount(10.34))
        );
        assert_eq!(Overs::parse(5.55), Err(InputError::InvalidBallCount(5.55)));
    }

    #[test]
    fn overs_parse_rejects_out_of_range() {
        assert_eq!(Overs::parse(-0.1), Err(InputError::OversOutOfRange(-0.1)));
        assert_eq!(Overs::parse(20.1), Err(InputError::OversOutOfRange(20.1)));
        assert_eq!(Overs::parse(25.0), Err(InputError::OversOutOfRange(25.0)));
        assert!(matches!(
            Overs::parse(f64::NAN),
            Err(InputError::OversOutOfRange(_))
        ));
        assert!(matches!(
            Overs::parse(f64::INFINITY),
            Err(InputError::OversOutOfRange(_))
        ));
    }

    #[test]
    fn overs_round_trips_through_notation() {
        for value in [0.0, 0.1, 3.4, 10.3, 19.5, 20.0] {
            let overs = Overs::parse(value).unwrap();
            assert_relative_eq!(overs.as_notation(), value, epsilon = 1e-9);
        }
    }

    #[test]
    fn overs_display_uses_scorecard_form() {
        assert_eq!(Overs::parse(10.3).unwrap().to_string(), "10.3");
        assert_eq!(Overs::parse(20.0).unwrap().to_string(), "20.0");
    }

    // ── Field validation ─────────────────────────────────────────────────────

    #[test]
    fn from_input_accepts_valid_state() {
        let state = MatchState::from_input(&valid_input(), false).unwrap();
        assert_eq!(state.batting_team.as_str(), "Chennai Super Kings");
        assert_eq!(state.bowling_team.as_str(), "Mumbai Indians");
        assert_eq!(state.city.as_str(), "Chennai");
        assert_eq!(state.target, 180);
        assert_eq!(state.score, 100);
        assert_eq!(state.overs.balls_bowled(), 60);
        assert_eq!(state.wickets_lost, 2);
    }

    #[test]
    fn from_input_rejects_unknown_team_and_city() {
        let mut input = valid_input();
        input.batting_team = "Pune Warriors".into();
        assert_eq!(
            MatchState::from_input(&input, false),
            Err(InputError::UnknownTeam("Pune Warriors".into()))
        );

        let mut input = valid_input();
        input.city = "Gotham".into();
        assert_eq!(
            MatchState::from_input(&input, false),
            Err(InputError::UnknownCity("Gotham".into()))
        );
    }

    #[test]
    fn from_input_rejects_same_team_by_default() {
        let mut input = valid_input();
        input.bowling_team = input.batting_team.clone();
        assert_eq!(
            MatchState::from_input(&input, false),
            Err(InputError::SameTeam("Chennai Super Kings".into()))
        );
    }

    #[test]
    fn from_input_allows_same_team_with_escape_hatch() {
        let mut input = valid_input();
        input.bowling_team = input.batting_team.clone();
        let state = MatchState::from_input(&input, true).unwrap();
        assert_eq!(state.batting_team, state.bowling_team);
    }

    #[test]
    fn from_input_rejects_zero_target() {
        let mut input = valid_input();
        input.target = 0;
        assert_eq!(
            MatchState::from_input(&input, false),
            Err(InputError::TargetTooLow(0))
        );
    }

    #[test]
    fn from_input_rejects_eleven_wickets() {
        let mut input = valid_input();
        input.wickets_lost = 11;
        assert_eq!(
            MatchState::from_input(&input, false),
            Err(InputError::WicketsOutOfRange(11))
        );
    }

    #[test]
    fn from_input_propagates_overs_errors() {
        let mut input = valid_input();
        input.overs = 12.8;
        assert_eq!(
            MatchState::from_input(&input, false),
            Err(InputError::InvalidBallCount(12.8))
        );
    }

    #[test]
    fn score_past_target_is_accepted() {
        // score < target is the interesting predictive regime but is not a
        // boundary constraint.
        let mut input = valid_input();
        input.score = 200;
        assert!(MatchState::from_input(&input, false).is_ok());
    }

    #[test]
    fn input_deserializes_from_page_json() {
        let json = r#"{
            "batting_team": "Rajasthan Royals",
            "bowling_team": "Delhi Capitals",
            "city": "Jaipur",
            "target": 165,
            "score": 78,
            "overs": 9.2,
            "wickets_lost": 3
        }"#;
        let input: MatchStateInput = serde_json::from_str(json).unwrap();
        let state = MatchState::from_input(&input, false).unwrap();
        assert_eq!(state.overs.balls_bowled(), 56);
    }

    #[test]
    fn out_of_range_integers_fail_deserialization() {
        // Integer fields reject out-of-type values at parse time, before
        // from_input runs; the predict endpoint maps that rejection to the
        // same 400 as any other input failure.
        let oversized_wickets = r#"{
            "batting_team": "Chennai Super Kings",
            "bowling_team": "Mumbai Indians",
            "city": "Chennai",
            "target": 180,
            "score": 100,
            "overs": 10.0,
            "wickets_lost": 300
        }"#;
        assert!(serde_json::from_str::<MatchStateInput>(oversized_wickets).is_err());

        let negative_score = r#"{
            "batting_team": "Chennai Super Kings",
            "bowling_team": "Mumbai Indians",
            "city": "Chennai",
            "target": 180,
            "score": -5,
            "overs": 10.0,
            "wickets_lost": 2
        }"#;
        assert!(serde_json::from_str::<MatchStateInput>(negative_score).is_err());
    }
}
