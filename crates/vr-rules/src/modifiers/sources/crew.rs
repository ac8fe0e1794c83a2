//! Crew roles and personalities.

use crate::context::{ActionContext, ContextSection, CrewRole, Personality};
use crate::modifiers::{ModifierSource, SourceFault};
use crate::resolution::ActionType;

/// Default cap on the total crew bonus, in either direction.
pub const DEFAULT_CREW_CAP: i32 = 5;

/// Role bonuses and personality adjustments of the available crew.
///
/// Docked and injured crew members are ignored. The total is capped at
/// `±cap`.
#[derive(Debug, Clone, Copy)]
pub struct CrewSource {
    cap: i32,
}

impl Default for CrewSource {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CREW_CAP,
        }
    }
}

impl CrewSource {
    /// Registered name.
    pub const NAME: &'static str = "crew";

    /// A crew source with a custom cap.
    pub fn with_cap(cap: i32) -> Self {
        Self { cap: cap.abs() }
    }

    /// The configured cap.
    pub fn cap(&self) -> i32 {
        self.cap
    }
}

/// Bonus a role gives to an action.
pub fn role_bonus(role: CrewRole, action: ActionType) -> i32 {
    use ActionType as A;
    match (role, action) {
        (CrewRole::Engineer, A::Repair) => 2,
        (CrewRole::Engineer, A::Mining | A::Scavenging) => 1,
        (CrewRole::Pilot, A::Flee) => 2,
        (CrewRole::Pilot, A::Combat | A::Mining) => 1,
        (CrewRole::Scientist, A::Derelict) => 2,
        (CrewRole::Scientist, A::AwayTeam | A::Mission) => 1,
        (CrewRole::Security, A::Combat) => 2,
        (CrewRole::Security, A::AwayTeam | A::Derelict) => 1,
        (CrewRole::Medic, A::AwayTeam) => 1,
        _ => 0,
    }
}

/// Adjustment a personality makes to an action.
pub fn personality_adjustment(personality: Personality, action: ActionType) -> i32 {
    use ActionType as A;
    match (personality, action) {
        (Personality::Bold, A::Combat | A::Derelict) => 1,
        (Personality::Bold, A::Flee) => -1,
        (Personality::Cautious, A::Flee | A::Repair) => 1,
        (Personality::Cautious, A::Combat) => -1,
        (Personality::Reckless, A::Combat) => 1,
        (Personality::Reckless, A::Repair | A::Scavenging | A::Mining) => -1,
        (Personality::Curious, A::Derelict | A::AwayTeam) => 1,
        (Personality::Curious, A::Mission) => -1,
        (Personality::Steady, A::Repair | A::Mining) => 1,
        _ => 0,
    }
}

impl ModifierSource for CrewSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> &'static [ContextSection] {
        &[ContextSection::Crew]
    }

    fn evaluate(&self, action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault> {
        let raw: i32 = ctx
            .available_crew()
            .map(|m| {
                role_bonus(m.role, action)
                    + m.personality
                        .map_or(0, |p| personality_adjustment(p, action))
            })
            .sum();
        Ok(raw.clamp(-self.cap, self.cap))
    }
}
