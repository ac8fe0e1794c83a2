//! Bonuses from completed research.

use crate::context::{ActionContext, ContextSection};
use crate::modifiers::{ModifierSource, SourceFault};
use crate::resolution::ActionType;

/// `(research id, action, bonus)`.
pub const RESEARCH_BONUSES: &[(&str, ActionType, i32)] = &[
    ("advanced_drilling", ActionType::Mining, 2),
    ("deep_core_survey", ActionType::Mining, 1),
    ("salvage_protocols", ActionType::Scavenging, 2),
    ("xeno_archaeology", ActionType::Derelict, 2),
    ("xeno_archaeology", ActionType::AwayTeam, 1),
    ("field_medicine", ActionType::AwayTeam, 1),
    ("targeting_computers", ActionType::Combat, 2),
    ("evasive_maneuvers", ActionType::Flee, 2),
    ("nanite_repair", ActionType::Repair, 2),
    ("diplomatic_corps", ActionType::Mission, 1),
];

/// Fixed bonuses for unlocked research ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResearchSource;

impl ResearchSource {
    /// Registered name.
    pub const NAME: &'static str = "research";
}

impl ModifierSource for ResearchSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> &'static [ContextSection] {
        &[ContextSection::Research]
    }

    fn evaluate(&self, action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault> {
        let Some(research) = &ctx.research else {
            return Ok(0);
        };
        Ok(RESEARCH_BONUSES
            .iter()
            .filter(|(id, a, _)| *a == action && research.is_unlocked(id))
            .map(|(_, _, bonus)| bonus)
            .sum())
    }
}
