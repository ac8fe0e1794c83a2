//! Engine configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::difficulty::{Difficulty, DifficultyTable};
use crate::error::{RulesError, RulesResult};
use crate::modifiers::sources::crew::DEFAULT_CREW_CAP;

/// Tunable numbers for the resolution pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Difficulty used when the context names none.
    pub default_difficulty: String,
    /// How far below the target a roll still grades as partial.
    pub partial_band: i32,
    /// Cap on the crew bonus, in either direction.
    pub crew_bonus_cap: i32,
    /// Hull points restored by a bare success.
    pub repair_base: u32,
    /// Extra hull points per point of margin.
    pub repair_per_point: u32,
    /// Target-number overrides by difficulty label.
    pub difficulty_overrides: BTreeMap<String, i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_difficulty: "normal".to_string(),
            partial_band: 3,
            crew_bonus_cap: DEFAULT_CREW_CAP,
            repair_base: 5,
            repair_per_point: 2,
            difficulty_overrides: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON. Missing keys keep defaults.
    pub fn from_json(content: &str) -> RulesResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> RulesResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Set the default difficulty label.
    pub fn with_default_difficulty(mut self, label: impl Into<String>) -> Self {
        self.default_difficulty = label.into();
        self
    }

    /// Set the partial band (clamped to 0-10).
    pub fn with_partial_band(mut self, band: i32) -> Self {
        self.partial_band = band.clamp(0, 10);
        self
    }

    /// Set the crew bonus cap (clamped to 0-20).
    pub fn with_crew_bonus_cap(mut self, cap: i32) -> Self {
        self.crew_bonus_cap = cap.clamp(0, 20);
        self
    }

    /// Set the repair amounts.
    pub fn with_repair(mut self, base: u32, per_point: u32) -> Self {
        self.repair_base = base;
        self.repair_per_point = per_point;
        self
    }

    /// Override the target number of one difficulty.
    pub fn with_difficulty_target(mut self, difficulty: Difficulty, target: i32) -> Self {
        self.difficulty_overrides
            .insert(difficulty.label().to_string(), target);
        self
    }

    /// Check labels and ranges.
    pub fn validate(&self) -> RulesResult<()> {
        if Difficulty::parse(&self.default_difficulty).is_none() {
            return Err(RulesError::UnknownDifficulty(
                self.default_difficulty.clone(),
            ));
        }
        if !(0..=10).contains(&self.partial_band) {
            return Err(RulesError::InvalidConfig(format!(
                "partial_band must be 0-10, got {}",
                self.partial_band
            )));
        }
        if !(0..=20).contains(&self.crew_bonus_cap) {
            return Err(RulesError::InvalidConfig(format!(
                "crew_bonus_cap must be 0-20, got {}",
                self.crew_bonus_cap
            )));
        }
        self.difficulty_table().map(|_| ())
    }

    /// The default difficulty table with this configuration's overrides.
    pub fn difficulty_table(&self) -> RulesResult<DifficultyTable> {
        let mut table = DifficultyTable::new();
        for (label, target) in &self.difficulty_overrides {
            let difficulty: Difficulty = label.parse()?;
            table.set_target(difficulty, *target);
        }
        Ok(table)
    }
}
