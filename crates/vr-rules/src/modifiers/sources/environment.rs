//! Local conditions: radiation, zone, atmosphere, structural stability.

use crate::context::{
    ActionContext, Atmosphere, ContextSection, Radiation, Stability, ZoneType,
};
use crate::modifiers::{ModifierSource, SourceFault};
use crate::resolution::ActionType;

/// Penalties and bonuses from the environment section.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSource;

impl EnvironmentSource {
    /// Registered name.
    pub const NAME: &'static str = "environment";
}

/// Radiation penalty. Missions are handed in from a station and ignore it.
pub fn radiation_modifier(radiation: Radiation, action: ActionType) -> i32 {
    if action == ActionType::Mission {
        return 0;
    }
    match radiation {
        Radiation::None => 0,
        Radiation::Low => -1,
        Radiation::High => -2,
        Radiation::Extreme => -4,
    }
}

/// Zone-type modifier.
pub fn zone_modifier(zone: ZoneType, action: ActionType) -> i32 {
    use ActionType as A;
    match (zone, action) {
        (ZoneType::AsteroidField, A::Mining) => 2,
        (ZoneType::AsteroidField, A::Flee) => 1,
        (ZoneType::AsteroidField, A::Combat) => -1,
        (ZoneType::Nebula, A::Flee) => 2,
        (ZoneType::Nebula, A::Combat) => -2,
        (ZoneType::Nebula, A::Derelict) => -1,
        (ZoneType::DebrisField, A::Scavenging) => 2,
        (ZoneType::DebrisField, A::Flee) => -1,
        (ZoneType::Anomaly, A::Derelict) => 1,
        (ZoneType::Anomaly, A::Mission) => 0,
        (ZoneType::Anomaly, _) => -1,
        _ => 0,
    }
}

/// Atmosphere modifier; only matters for away teams and derelict boarding.
pub fn atmosphere_modifier(atmosphere: Atmosphere, action: ActionType) -> i32 {
    if !matches!(action, ActionType::AwayTeam | ActionType::Derelict) {
        return 0;
    }
    match atmosphere {
        Atmosphere::Breathable => 0,
        Atmosphere::Thin => -1,
        Atmosphere::Toxic | Atmosphere::Vacuum => -2,
        Atmosphere::Corrosive => -3,
    }
}

/// Structural-stability modifier for salvage, derelicts and away teams.
pub fn stability_modifier(stability: Stability, action: ActionType) -> i32 {
    if !matches!(
        action,
        ActionType::Scavenging | ActionType::Derelict | ActionType::AwayTeam
    ) {
        return 0;
    }
    match stability {
        Stability::Stable => 0,
        Stability::Unstable => -2,
        Stability::Collapsing => -4,
    }
}

impl ModifierSource for EnvironmentSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> &'static [ContextSection] {
        &[ContextSection::Environment]
    }

    fn evaluate(&self, action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault> {
        let Some(env) = ctx.environment else {
            return Ok(0);
        };
        Ok(radiation_modifier(env.radiation, action)
            + zone_modifier(env.zone, action)
            + atmosphere_modifier(env.atmosphere, action)
            + stability_modifier(env.stability, action))
    }
}
