//! Character attributes and skills.

use crate::context::{ActionContext, ContextSection};
use crate::modifiers::{ModifierSource, SourceFault};
use crate::resolution::ActionType;

/// Attribute score treated as average when absent.
pub const AVERAGE_ATTRIBUTE: i32 = 10;

/// Attribute modifier plus skill rank for the action's pairing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingSource;

impl TrainingSource {
    /// Registered name.
    pub const NAME: &'static str = "training";
}

/// The `(attribute, skill)` an action tests.
pub fn pairing(action: ActionType) -> (&'static str, &'static str) {
    match action {
        ActionType::Mining => ("strength", "mining"),
        ActionType::Scavenging => ("dexterity", "salvage"),
        ActionType::Derelict => ("intelligence", "investigation"),
        ActionType::AwayTeam => ("wisdom", "survival"),
        ActionType::Combat => ("dexterity", "gunnery"),
        ActionType::Flee => ("dexterity", "piloting"),
        ActionType::Repair => ("intelligence", "engineering"),
        ActionType::Mission => ("charisma", "negotiation"),
    }
}

/// `(score - 10) / 2`, rounded toward negative infinity.
pub fn attribute_modifier(score: i32) -> i32 {
    (score - AVERAGE_ATTRIBUTE).div_euclid(2)
}

impl ModifierSource for TrainingSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> &'static [ContextSection] {
        &[ContextSection::Character]
    }

    fn evaluate(&self, action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault> {
        let Some(character) = &ctx.character else {
            return Ok(0);
        };
        let (attribute, skill) = pairing(action);
        let score = character
            .attributes
            .get(attribute)
            .copied()
            .unwrap_or(AVERAGE_ATTRIBUTE);
        let rank = character.skills.get(skill).copied().unwrap_or(0);
        Ok(attribute_modifier(score) + rank)
    }
}
