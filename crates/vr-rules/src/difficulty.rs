//! Difficulty labels and their target numbers.

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// A named difficulty category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Barely a check.
    Trivial,
    /// Routine for a competent crew.
    Easy,
    /// The default.
    Normal,
    /// Needs skill or gear.
    Hard,
    /// Needs skill and gear.
    VeryHard,
    /// Only specialists should try.
    Extreme,
    /// Needs a natural 20 without heavy bonuses.
    Impossible,
}

impl Difficulty {
    /// Parse a difficulty from a user-supplied label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "trivial" => Some(Self::Trivial),
            "easy" => Some(Self::Easy),
            "normal" | "medium" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            "very_hard" | "veryhard" => Some(Self::VeryHard),
            "extreme" => Some(Self::Extreme),
            "impossible" => Some(Self::Impossible),
            _ => None,
        }
    }

    /// All difficulties from easiest to hardest.
    pub fn all() -> &'static [Self] {
        &[
            Self::Trivial,
            Self::Easy,
            Self::Normal,
            Self::Hard,
            Self::VeryHard,
            Self::Extreme,
            Self::Impossible,
        ]
    }

    /// Canonical snake_case label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::VeryHard => "very_hard",
            Self::Extreme => "extreme",
            Self::Impossible => "impossible",
        }
    }

    /// Default target number.
    pub fn default_target(self) -> i32 {
        match self {
            Self::Trivial => 5,
            Self::Easy => 8,
            Self::Normal => 11,
            Self::Hard => 14,
            Self::VeryHard => 17,
            Self::Extreme => 20,
            Self::Impossible => 23,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Trivial => 0,
            Self::Easy => 1,
            Self::Normal => 2,
            Self::Hard => 3,
            Self::VeryHard => 4,
            Self::Extreme => 5,
            Self::Impossible => 6,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trivial => write!(f, "Trivial"),
            Self::Easy => write!(f, "Easy"),
            Self::Normal => write!(f, "Normal"),
            Self::Hard => write!(f, "Hard"),
            Self::VeryHard => write!(f, "Very Hard"),
            Self::Extreme => write!(f, "Extreme"),
            Self::Impossible => write!(f, "Impossible"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RulesError::UnknownDifficulty(s.to_string()))
    }
}

/// Target numbers for every difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTable {
    targets: [i32; 7],
}

impl Default for DifficultyTable {
    fn default() -> Self {
        let mut targets = [0; 7];
        for d in Difficulty::all() {
            targets[d.index()] = d.default_target();
        }
        Self { targets }
    }
}

impl DifficultyTable {
    /// The default table (5, 8, 11, 14, 17, 20, 23).
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one target number.
    pub fn with_target(mut self, difficulty: Difficulty, target: i32) -> Self {
        self.set_target(difficulty, target);
        self
    }

    /// Override one target number in place.
    pub fn set_target(&mut self, difficulty: Difficulty, target: i32) {
        self.targets[difficulty.index()] = target;
    }

    /// Target number for a difficulty.
    pub fn target_for(&self, difficulty: Difficulty) -> i32 {
        self.targets[difficulty.index()]
    }

    /// Target number for a label; unknown labels are an error.
    pub fn target(&self, label: &str) -> RulesResult<i32> {
        let difficulty: Difficulty = label.parse()?;
        Ok(self.target_for(difficulty))
    }

    /// `(difficulty, target)` pairs from easiest to hardest.
    pub fn entries(&self) -> impl Iterator<Item = (Difficulty, i32)> + '_ {
        Difficulty::all().iter().map(|&d| (d, self.target_for(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets() {
        let table = DifficultyTable::new();
        let targets: Vec<i32> = table.entries().map(|(_, t)| t).collect();
        assert_eq!(targets, vec![5, 8, 11, 14, 17, 20, 23]);
    }

    #[test]
    fn parse_variants() {
        assert_eq!(Difficulty::parse("Normal"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::parse("very hard"), Some(Difficulty::VeryHard));
        assert_eq!(Difficulty::parse("very-hard"), Some(Difficulty::VeryHard));
        assert_eq!(Difficulty::parse("very_hard"), Some(Difficulty::VeryHard));
        assert_eq!(Difficulty::parse("legendary"), None);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = DifficultyTable::new().target("legendary").unwrap_err();
        assert!(matches!(err, RulesError::UnknownDifficulty(ref l) if l == "legendary"));
    }

    #[test]
    fn overrides_apply() {
        let table = DifficultyTable::new().with_target(Difficulty::Normal, 8);
        assert_eq!(table.target("normal").unwrap(), 8);
        assert_eq!(table.target("hard").unwrap(), 14);
    }

    #[test]
    fn labels_round_trip() {
        for d in Difficulty::all() {
            assert_eq!(Difficulty::parse(d.label()), Some(*d));
        }
        assert_eq!(Difficulty::VeryHard.to_string(), "Very Hard");
    }
}
