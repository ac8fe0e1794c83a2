//! What a resolution produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ActionType;
use crate::modifiers::ModifierResult;
use crate::table::Quality;

/// The graded result of a check, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// A catastrophic failure with additional consequences.
    CriticalFailure,
    /// A standard failure.
    Failure,
    /// A mixed result: succeed at a cost.
    Partial,
    /// A standard success.
    Success,
    /// An exceptional success beyond normal limits.
    CriticalSuccess,
}

impl Tier {
    /// All tiers from best to worst.
    pub fn all() -> &'static [Self] {
        &[
            Self::CriticalSuccess,
            Self::Success,
            Self::Partial,
            Self::Failure,
            Self::CriticalFailure,
        ]
    }

    /// Success or critical success.
    pub fn is_success(self) -> bool {
        self >= Self::Success
    }

    /// Either critical tier.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::CriticalSuccess | Self::CriticalFailure)
    }

    /// Canonical snake_case label.
    pub fn label(self) -> &'static str {
        match self {
            Self::CriticalSuccess => "critical_success",
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failure => "failure",
            Self::CriticalFailure => "critical_failure",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::Success => write!(f, "Success"),
            Self::Partial => write!(f, "Partial Success"),
            Self::Failure => write!(f, "Failure"),
            Self::CriticalFailure => write!(f, "Critical Failure"),
        }
    }
}

/// The result of one secondary roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecondaryRoll {
    /// A weighted table draw.
    Table {
        /// Table drawn from.
        table: String,
        /// Label of the selected row.
        label: String,
        /// Quantity drawn from the row's range, if it has one.
        quantity: Option<u32>,
    },
    /// A d100 roll against a trigger chance.
    Percentile {
        /// Value rolled (1-100).
        value: u32,
        /// Trigger chance in percent.
        chance: u32,
        /// Whether the event happened.
        triggered: bool,
        /// The event was forced regardless of the roll.
        forced: bool,
    },
    /// A dice-notation damage roll.
    Damage {
        /// Notation rolled.
        notation: String,
        /// Individual dice.
        rolls: Vec<u32>,
        /// Total after the notation's modifier.
        total: i32,
    },
    /// A single die.
    Die {
        /// Die size.
        sides: u32,
        /// Value rolled.
        value: u32,
    },
}

/// An item gained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    /// Item id.
    pub item: String,
    /// Quality grade.
    pub quality: Quality,
    /// Quantity gained.
    pub quantity: u32,
}

/// Hull damage taken from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageTaken {
    /// What dealt the damage.
    pub source: String,
    /// Hull points lost.
    pub amount: u32,
}

/// A status effect applied to the ship, a crew member, or an opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Who is affected.
    pub target: String,
    /// Effect id.
    pub effect: String,
}

impl StatusEffect {
    /// Create a status effect.
    pub fn new(target: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            effect: effect.into(),
        }
    }
}

/// Everything that changes as a result of a resolution.
///
/// The rules core only describes these changes; applying them to game state
/// is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequences {
    /// Items gained.
    pub loot: Vec<LootItem>,
    /// Credits gained.
    pub credits: u32,
    /// Hull damage taken, per source.
    pub damage: Vec<DamageTaken>,
    /// Damage dealt to the opponent.
    pub damage_dealt: u32,
    /// Hull points restored.
    pub hull_repaired: u32,
    /// Status effects applied.
    pub statuses: Vec<StatusEffect>,
    /// Change in accumulated risk.
    pub risk_delta: i32,
    /// Story flags unlocked.
    pub unlocks: Vec<String>,
    /// A follow-on combat encounter starts.
    pub combat_triggered: bool,
}

impl Consequences {
    /// Total hull damage taken.
    pub fn total_damage(&self) -> u32 {
        self.damage.iter().map(|d| d.amount).sum()
    }

    /// Whether nothing happened.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn take_damage(&mut self, source: impl Into<String>, amount: u32) {
        if amount > 0 {
            self.damage.push(DamageTaken {
                source: source.into(),
                amount,
            });
        }
    }

    pub(crate) fn add_loot(&mut self, item: impl Into<String>, quality: Quality, quantity: u32) {
        if quantity > 0 {
            self.loot.push(LootItem {
                item: item.into(),
                quality,
                quantity,
            });
        }
    }

    pub(crate) fn apply_status(&mut self, target: impl Into<String>, effect: impl Into<String>) {
        self.statuses.push(StatusEffect::new(target, effect));
    }

    pub(crate) fn unlock(&mut self, flag: impl Into<String>) {
        let flag = flag.into();
        if !self.unlocks.contains(&flag) {
            self.unlocks.push(flag);
        }
    }
}

/// Where the target number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// A difficulty label.
    Difficulty,
    /// The combat target's defense.
    Defense,
    /// The pursuer's pursuit rating plus encounter length.
    Pursuit,
}

/// The full record of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// Action resolved.
    pub action: ActionType,
    /// Seed text the resolution was derived from.
    pub seed: String,
    /// Graded result.
    pub tier: Tier,
    /// The d20 face.
    pub natural_roll: u32,
    /// Natural roll plus modifiers.
    pub total_roll: i32,
    /// Number the total was compared against.
    pub target_difficulty: i32,
    /// Difficulty label in effect.
    pub difficulty: String,
    /// Where the target number came from.
    pub target_source: TargetSource,
    /// `total_roll - target_difficulty`, saturating at the `i32` limits.
    pub margin: i32,
    /// `total_roll >= target_difficulty`, before critical overrides.
    pub success: bool,
    /// Modifier total, breakdown, and isolated faults.
    pub modifiers: ModifierResult,
    /// Secondary rolls by name.
    pub secondary_rolls: BTreeMap<String, SecondaryRoll>,
    /// What changes.
    pub consequences: Consequences,
}
