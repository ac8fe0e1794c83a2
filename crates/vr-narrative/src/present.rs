//! Turn a resolution outcome into player-facing text.
//!
//! [`present`] is pure: the same outcome always yields the same presentation.
//! It reads only the outcome, never any game state.

use serde::{Deserialize, Serialize};
use vr_rules::{ResolutionOutcome, SecondaryRoll, Tier};

use crate::commentary::commentary;

/// How a piece of text should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Exceptional good news.
    Triumph,
    /// Good news.
    Good,
    /// Informational.
    Neutral,
    /// Something went wrong, but not badly.
    Warning,
    /// Harm done.
    Danger,
}

impl Severity {
    /// The severity that matches a tier.
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::CriticalSuccess => Self::Triumph,
            Tier::Success => Self::Good,
            Tier::Partial => Self::Neutral,
            Tier::Failure => Self::Warning,
            Tier::CriticalFailure => Self::Danger,
        }
    }
}

/// Suggested animation for the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationHint {
    /// Critical success.
    Celebrate,
    /// Success.
    Confirm,
    /// Partial success.
    Waver,
    /// Failure.
    Falter,
    /// Critical failure.
    Shake,
}

impl AnimationHint {
    /// The animation for a tier.
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::CriticalSuccess => Self::Celebrate,
            Tier::Success => Self::Confirm,
            Tier::Partial => Self::Waver,
            Tier::Failure => Self::Falter,
            Tier::CriticalFailure => Self::Shake,
        }
    }
}

/// One titled block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Block title.
    pub title: String,
    /// Block body; may span lines.
    pub text: String,
    /// Styling tag.
    pub severity: Severity,
}

impl Section {
    fn new(title: &str, text: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            text: text.into(),
            severity,
        }
    }
}

/// Player-facing rendering of an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// One-line summary.
    pub headline: String,
    /// Detail blocks, check first.
    pub sections: Vec<Section>,
    /// Canned flavor line.
    pub commentary: String,
    /// Suggested animation.
    pub animation: AnimationHint,
}

impl Presentation {
    /// The most severe tag among the sections, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.sections.iter().map(|s| s.severity).max()
    }

    /// A section by title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Present an outcome.
pub fn present(outcome: &ResolutionOutcome) -> Presentation {
    let tier = outcome.tier;
    let mut sections = vec![check_section(outcome)];

    if !outcome.modifiers.breakdown.is_empty() {
        let lines: Vec<String> = outcome
            .modifiers
            .breakdown
            .iter()
            .map(|c| format!("{:+} {}", c.value, c.source))
            .collect();
        sections.push(Section::new("Modifiers", lines.join("\n"), Severity::Neutral));
    }
    if !outcome.modifiers.warnings.is_empty() {
        let lines: Vec<String> = outcome
            .modifiers
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect();
        sections.push(Section::new("Warnings", lines.join("\n"), Severity::Warning));
    }
    if !outcome.secondary_rolls.is_empty() {
        let lines: Vec<String> = outcome
            .secondary_rolls
            .iter()
            .map(|(name, roll)| format!("{name}: {}", describe_roll(roll)))
            .collect();
        sections.push(Section::new("Rolls", lines.join("\n"), Severity::Neutral));
    }

    let c = &outcome.consequences;
    if !c.loot.is_empty() || c.credits > 0 {
        let mut lines: Vec<String> = c
            .loot
            .iter()
            .map(|l| format!("{} x{} ({})", l.item, l.quantity, l.quality))
            .collect();
        if c.credits > 0 {
            lines.push(format!("{} credits", c.credits));
        }
        let severity = if tier == Tier::CriticalSuccess {
            Severity::Triumph
        } else {
            Severity::Good
        };
        sections.push(Section::new("Gains", lines.join("\n"), severity));
    }
    if c.damage_dealt > 0 {
        sections.push(Section::new(
            "Damage Dealt",
            format!("{} damage to the target", c.damage_dealt),
            Severity::Good,
        ));
    }
    if c.hull_repaired > 0 {
        sections.push(Section::new(
            "Repairs",
            format!("{} hull restored", c.hull_repaired),
            Severity::Good,
        ));
    }
    if !c.damage.is_empty() {
        let lines: Vec<String> = c
            .damage
            .iter()
            .map(|d| format!("{} hull damage from {}", d.amount, d.source))
            .collect();
        sections.push(Section::new("Damage Taken", lines.join("\n"), Severity::Danger));
    }
    if !c.statuses.is_empty() {
        let lines: Vec<String> = c
            .statuses
            .iter()
            .map(|s| format!("{}: {}", s.target, s.effect))
            .collect();
        sections.push(Section::new("Status Effects", lines.join("\n"), Severity::Warning));
    }
    if !c.unlocks.is_empty() {
        sections.push(Section::new(
            "Unlocked",
            c.unlocks.join("\n"),
            Severity::Triumph,
        ));
    }
    if c.risk_delta != 0 {
        let severity = if c.risk_delta > 0 {
            Severity::Warning
        } else {
            Severity::Good
        };
        sections.push(Section::new(
            "Risk",
            format!("{:+} accumulated risk", c.risk_delta),
            severity,
        ));
    }
    if c.combat_triggered {
        sections.push(Section::new(
            "Contact",
            "Hostiles engage. Combat begins.",
            Severity::Danger,
        ));
    }

    Presentation {
        headline: format!("{}: {}", outcome.action, tier),
        sections,
        commentary: commentary(outcome.action, tier).to_string(),
        animation: AnimationHint::for_tier(tier),
    }
}

fn check_section(outcome: &ResolutionOutcome) -> Section {
    let text = format!(
        "d20 {} {:+} = {} vs {} ({}), margin {:+}",
        outcome.natural_roll,
        outcome.modifiers.total,
        outcome.total_roll,
        outcome.target_difficulty,
        outcome.difficulty,
        outcome.margin
    );
    Section::new("Check", text, Severity::for_tier(outcome.tier))
}

fn describe_roll(roll: &SecondaryRoll) -> String {
    match roll {
        SecondaryRoll::Table {
            table,
            label,
            quantity,
        } => match quantity {
            Some(q) => format!("{label} x{q} on {table}"),
            None => format!("{label} on {table}"),
        },
        SecondaryRoll::Percentile {
            value,
            chance,
            triggered,
            forced,
        } => {
            let result = match (triggered, forced) {
                (true, true) => "forced",
                (true, false) => "triggered",
                _ => "avoided",
            };
            format!("d100 {value} vs {chance}% ({result})")
        }
        SecondaryRoll::Damage {
            notation,
            rolls,
            total,
        } => format!("{notation} {rolls:?} = {total}"),
        SecondaryRoll::Die { sides, value } => format!("d{sides} {value}"),
    }
}
