//! The kinds of action the resolver understands.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// An action a player or AI can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Extract ore from an asteroid.
    Mining,
    /// Strip a wreck for parts.
    Scavenging,
    /// Investigate a derelict vessel.
    Derelict,
    /// Send a team to a planet surface.
    AwayTeam,
    /// Attack an opponent.
    Combat,
    /// Escape a pursuer.
    Flee,
    /// Patch the hull.
    Repair,
    /// Hand in a mission.
    Mission,
}

impl ActionType {
    /// All action types.
    pub fn all() -> &'static [Self] {
        &[
            Self::Mining,
            Self::Scavenging,
            Self::Derelict,
            Self::AwayTeam,
            Self::Combat,
            Self::Flee,
            Self::Repair,
            Self::Mission,
        ]
    }

    /// Canonical label, also used as the primary substream label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mining => "mining",
            Self::Scavenging => "scavenging",
            Self::Derelict => "derelict",
            Self::AwayTeam => "away_team",
            Self::Combat => "combat",
            Self::Flee => "flee",
            Self::Repair => "repair",
            Self::Mission => "mission",
        }
    }

    /// Whether near misses grade as a partial success.
    pub fn has_partial_band(self) -> bool {
        matches!(
            self,
            Self::Mining | Self::Scavenging | Self::AwayTeam | Self::Repair
        )
    }

    /// Accumulated risk added by attempting the action at all.
    pub fn base_risk(self) -> i32 {
        match self {
            Self::Mining | Self::Scavenging | Self::Flee => 1,
            Self::Derelict | Self::AwayTeam | Self::Combat => 2,
            Self::Repair | Self::Mission => 0,
        }
    }
}

impl FromStr for ActionType {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "mining" | "mine" => Ok(Self::Mining),
            "scavenging" | "scavenge" | "salvage" => Ok(Self::Scavenging),
            "derelict" => Ok(Self::Derelict),
            "away_team" | "awayteam" => Ok(Self::AwayTeam),
            "combat" | "attack" => Ok(Self::Combat),
            "flee" => Ok(Self::Flee),
            "repair" => Ok(Self::Repair),
            "mission" => Ok(Self::Mission),
            _ => Err(RulesError::UnknownAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mining => write!(f, "Mining"),
            Self::Scavenging => write!(f, "Scavenging"),
            Self::Derelict => write!(f, "Derelict"),
            Self::AwayTeam => write!(f, "Away Team"),
            Self::Combat => write!(f, "Combat"),
            Self::Flee => write!(f, "Flee"),
            Self::Repair => write!(f, "Repair"),
            Self::Mission => write!(f, "Mission"),
        }
    }
}
