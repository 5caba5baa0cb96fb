//! Fixed team and venue enumerations.
//!
//! These lists are the categorical domains the classifier was trained on.
//! They double as the selection catalog for the predictor page and as the
//! membership check at the input boundary: an unknown name is rejected
//! there instead of surfacing later as a classifier failure.

use std::fmt;

/// The eight franchises present in the training data, in training-data order.
pub const TEAMS: [&str; 8] = [
    "Sunrisers Hyderabad",
    "Mumbai Indians",
    "Royal Challengers Bangalore",
    "Kolkata Knight Riders",
    "Kings XI Punjab",
    "Chennai Super Kings",
    "Rajasthan Royals",
    "Delhi Capitals",
];

/// Host cities present in the training data, in training-data order.
/// Bangalore and Bengaluru are distinct entries because the source data
/// recorded both spellings.
pub const CITIES: [&str; 29] = [
    "Hyderabad",
    "Bangalore",
    "Mumbai",
    "Indore",
    "Kolkata",
    "Delhi",
    "Chandigarh",
    "Jaipur",
    "Chennai",
    "Cape Town",
    "Port Elizabeth",
    "Durban",
    "Centurion",
    "East London",
    "Johannesburg",
    "Kimberley",
    "Bloemfontein",
    "Ahmedabad",
    "Cuttack",
    "Nagpur",
    "Dharamsala",
    "Visakhapatnam",
    "Pune",
    "Raipur",
    "Ranchi",
    "Abu Dhabi",
    "Sharjah",
    "Mohali",
    "Bengaluru",
];

/// A validated team name, always one of [`TEAMS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Team(&'static str);

impl Team {
    /// Look up a team by its exact catalog name.
    pub fn parse(name: &str) -> Option<Self> {
        TEAMS.iter().copied().find(|team| *team == name).map(Team)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A validated host city, always one of [`CITIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct City(&'static str);

impl City {
    /// Look up a city by its exact catalog name.
    pub fn parse(name: &str) -> Option<Self> {
        CITIES.iter().copied().find(|city| *city == name).map(City)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Team names sorted alphabetically, for the selects on the predictor page.
pub fn teams_sorted() -> Vec<&'static str> {
    let mut teams = TEAMS.to_vec();
    teams.sort_unstable();
    teams
}

/// City names sorted alphabetically, for the selects on the predictor page.
pub fn cities_sorted() -> Vec<&'static str> {
    let mut cities = CITIES.to_vec();
    cities.sort_unstable();
    cities
}

// ── Tests ────────────────────────────────────────────────────────────────────
