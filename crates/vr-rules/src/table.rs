//! Weighted tables for hazards, discoveries, loot, and mission bonuses.
//!
//! Table contents are data, not code. A default set ships embedded in the
//! crate (`data/tables.json`); content designers can point the engine at
//! their own file instead. Every table is validated once at load time, so
//! the resolution pipeline never sees an empty or all-zero table.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};
use crate::seed::Stream;

/// Table names the resolution pipeline requires.
pub mod names {
    /// Hazards rolled alongside every mining check.
    pub const MINING_HAZARDS: &str = "mining.hazards";
    /// Ore yield on a successful mining check.
    pub const MINING_YIELD: &str = "mining.yield";
    /// Salvage loot.
    pub const SALVAGE_LOOT: &str = "salvage.loot";
    /// Derelict discoveries.
    pub const DERELICT_DISCOVERIES: &str = "derelict.discoveries";
    /// Extra derelict loot on a critical success.
    pub const DERELICT_LOOT: &str = "derelict.loot";
    /// Away-team hazards.
    pub const AWAY_HAZARDS: &str = "away_team.hazards";
    /// Away-team discoveries.
    pub const AWAY_DISCOVERIES: &str = "away_team.discoveries";
    /// Default mission bonus pool.
    pub const MISSION_BONUS: &str = "mission.bonus";

    /// Every required weighted table.
    pub const REQUIRED: &[&str] = &[
        MINING_HAZARDS,
        MINING_YIELD,
        SALVAGE_LOOT,
        DERELICT_DISCOVERIES,
        DERELICT_LOOT,
        AWAY_HAZARDS,
        AWAY_DISCOVERIES,
        MISSION_BONUS,
    ];
}

const EMBEDDED_TABLES: &str = include_str!("../data/tables.json");

/// Faces on the combat status die.
pub const STATUS_DIE_FACES: usize = 6;

/// A value paired with a selection weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry<T> {
    /// Relative weight (non-negative).
    pub weight: f64,
    /// The selectable value.
    #[serde(flatten)]
    pub value: T,
}

impl<T> WeightedEntry<T> {
    /// Pair a value with a weight.
    pub fn new(value: T, weight: f64) -> Self {
        Self { weight, value }
    }
}

/// Draw one entry with probability proportional to its weight.
///
/// Entries with non-positive weight are never selected while any entry has a
/// positive weight. If rounding exhausts the walk, the last positive entry is
/// returned; if no weight is positive, the first entry is. Only an empty
/// slice yields `None`. Consumes exactly one draw when the slice is non-empty.
pub fn select_weighted<'a, T>(
    entries: &'a [WeightedEntry<T>],
    stream: &mut Stream,
) -> Option<&'a WeightedEntry<T>> {
    let first = entries.first()?;
    let total: f64 = entries
        .iter()
        .map(|e| e.weight)
        .filter(|w| *w > 0.0)
        .sum();

    let mut r = stream.next_f64() * total;
    if total <= 0.0 || !total.is_finite() {
        return Some(first);
    }

    let mut last_positive = first;
    for entry in entries.iter().filter(|e| e.weight > 0.0) {
        last_positive = entry;
        r -= entry.weight;
        if r <= 0.0 {
            return Some(entry);
        }
    }
    Some(last_positive)
}

/// Quality grade of a loot item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Barely worth hauling.
    Scrap,
    /// Standard goods.
    Common,
    /// Processed or well-kept.
    Refined,
    /// Hard to find.
    Rare,
    /// Unique or alien.
    Exotic,
}

impl Quality {
    /// One grade better, saturating at exotic.
    pub fn upgraded(self) -> Self {
        match self {
            Self::Scrap => Self::Common,
            Self::Common => Self::Refined,
            Self::Refined => Self::Rare,
            Self::Rare | Self::Exotic => Self::Exotic,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scrap => write!(f, "scrap"),
            Self::Common => write!(f, "common"),
            Self::Refined => write!(f, "refined"),
            Self::Rare => write!(f, "rare"),
            Self::Exotic => write!(f, "exotic"),
        }
    }
}

/// One row of a content table. Fields a table doesn't use stay at defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    /// Unique label within the table.
    pub label: String,
    /// Item granted, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Quality of the granted item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    /// Inclusive quantity range of the granted item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<(u32, u32)>,
    /// Credits granted.
    pub credits: u32,
    /// Hull damage dealt.
    pub damage: u32,
    /// Accumulated-risk change.
    pub risk: i32,
    /// Status effect applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Whether this hazard can injure a crew member.
    pub injury: bool,
    /// Story flag unlocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl TableRow {
    /// A row with just a label.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// A named, validated weighted table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTable {
    /// Table name.
    pub name: String,
    /// Rows with weights.
    pub entries: Vec<WeightedEntry<TableRow>>,
}

impl WeightedTable {
    /// Build and validate a table.
    pub fn new(
        name: impl Into<String>,
        entries: Vec<WeightedEntry<TableRow>>,
    ) -> RulesResult<Self> {
        let table = Self {
            name: name.into(),
            entries,
        };
        table.validate()?;
        Ok(table)
    }

    /// Check weights, labels, and quantity ranges.
    pub fn validate(&self) -> RulesResult<()> {
        let invalid = |reason: String| RulesError::InvalidTable {
            table: self.name.clone(),
            reason,
        };

        if self.entries.is_empty() {
            return Err(invalid("table has no entries".to_string()));
        }

        let mut seen = HashSet::new();
        let mut total = 0.0;
        for entry in &self.entries {
            let row = &entry.value;
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(invalid(format!(
                    "entry '{}' has invalid weight {}",
                    row.label, entry.weight
                )));
            }
            if row.label.trim().is_empty() {
                return Err(invalid("entry with empty label".to_string()));
            }
            if !seen.insert(row.label.as_str()) {
                return Err(invalid(format!("duplicate label '{}'", row.label)));
            }
            if let Some((min, max)) = row.quantity {
                if min > max {
                    return Err(invalid(format!(
                        "entry '{}' has quantity range {min}-{max}",
                        row.label
                    )));
                }
            }
            total += entry.weight;
        }

        if total <= 0.0 {
            return Err(invalid("total weight must be positive".to_string()));
        }
        Ok(())
    }

    /// Draw a row.
    pub fn select(&self, stream: &mut Stream) -> Option<&TableRow> {
        select_weighted(&self.entries, stream).map(|e| &e.value)
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Selection probability of each row, in table order.
    pub fn probabilities(&self) -> Vec<(&str, f64)> {
        let total = self.total_weight();
        self.entries
            .iter()
            .map(|e| (e.value.label.as_str(), e.weight / total))
            .collect()
    }
}

/// On-disk shape of a table file.
#[derive(Debug, Deserialize)]
struct TableFile {
    tables: BTreeMap<String, Vec<WeightedEntry<TableRow>>>,
    combat_status: Vec<TableRow>,
}

/// Every content table the resolution pipeline draws from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSet {
    tables: BTreeMap<String, WeightedTable>,
    combat_status: Vec<TableRow>,
}

impl TableSet {
    /// The tables that ship with the crate.
    pub fn embedded() -> RulesResult<Self> {
        Self::from_json(EMBEDDED_TABLES)
    }

    /// Load tables from a JSON file.
    pub fn load(path: &Path) -> RulesResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate tables from JSON.
    pub fn from_json(content: &str) -> RulesResult<Self> {
        let file: TableFile = serde_json::from_str(content)?;

        let mut tables = BTreeMap::new();
        for (name, entries) in file.tables {
            let table = WeightedTable::new(name.clone(), entries)?;
            tables.insert(name, table);
        }

        for required in names::REQUIRED {
            if !tables.contains_key(*required) {
                return Err(RulesError::InvalidTable {
                    table: (*required).to_string(),
                    reason: "required table is missing".to_string(),
                });
            }
        }

        if file.combat_status.len() != STATUS_DIE_FACES {
            return Err(RulesError::InvalidTable {
                table: "combat_status".to_string(),
                reason: format!(
                    "expected {STATUS_DIE_FACES} faces, found {}",
                    file.combat_status.len()
                ),
            });
        }

        let mut labels = HashSet::new();
        for row in &file.combat_status {
            if row.label.trim().is_empty() || !labels.insert(row.label.as_str()) {
                return Err(RulesError::InvalidTable {
                    table: "combat_status".to_string(),
                    reason: format!("duplicate or empty label '{}'", row.label),
                });
            }
        }

        Ok(Self {
            tables,
            combat_status: file.combat_status,
        })
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> RulesResult<&WeightedTable> {
        self.tables.get(name).ok_or_else(|| RulesError::InvalidTable {
            table: name.to_string(),
            reason: "no such table".to_string(),
        })
    }

    /// All tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &WeightedTable> {
        self.tables.values()
    }

    /// The status-effect row for a d6 face (1-6).
    pub fn combat_status(&self, face: u32) -> Option<&TableRow> {
        let index = usize::try_from(face).ok()?.checked_sub(1)?;
        self.combat_status.get(index)
    }
}
