//! Ship equipment: the component suited to the action, and hull condition.

use crate::context::{ActionContext, ComponentKind, ContextSection, ShipState};
use crate::modifiers::{ModifierSource, SourceFault};
use crate::resolution::ActionType;

/// Bonus from the best matching component, minus the hull-damage penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquipmentSource;

impl EquipmentSource {
    /// Registered name.
    pub const NAME: &'static str = "equipment";
}

/// The component that helps with an action.
pub fn component_for(action: ActionType) -> Option<ComponentKind> {
    match action {
        ActionType::Mining => Some(ComponentKind::Drill),
        ActionType::Scavenging => Some(ComponentKind::SalvageRig),
        ActionType::Derelict | ActionType::AwayTeam => Some(ComponentKind::Scanner),
        ActionType::Combat => Some(ComponentKind::Weapon),
        ActionType::Flee => Some(ComponentKind::Engine),
        ActionType::Repair => Some(ComponentKind::RepairBay),
        ActionType::Mission => None,
    }
}

/// Penalty for hull damage: none above 75%, then -1, -3, -5.
pub fn hull_penalty(hull: f64) -> i32 {
    if hull >= 0.75 {
        0
    } else if hull >= 0.5 {
        -1
    } else if hull >= 0.25 {
        -3
    } else {
        -5
    }
}

fn hull_matters(action: ActionType) -> bool {
    !matches!(action, ActionType::AwayTeam | ActionType::Mission)
}

fn fraction_ok(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

impl EquipmentSource {
    fn component_bonus(ship: &ShipState, kind: ComponentKind) -> Result<i32, SourceFault> {
        let mut best = 0;
        for component in ship.components.iter().filter(|c| c.kind == kind) {
            if !fraction_ok(component.health) {
                return Err(SourceFault::new(
                    Self::NAME,
                    format!("component health {} is not a fraction", component.health),
                ));
            }
            let tier = i32::try_from(component.tier).unwrap_or(i32::MAX);
            let bonus = if component.health < 0.5 { tier / 2 } else { tier };
            best = best.max(bonus);
        }
        Ok(best)
    }
}

impl ModifierSource for EquipmentSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> &'static [ContextSection] {
        &[ContextSection::Ship]
    }

    fn evaluate(&self, action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault> {
        let Some(ship) = &ctx.ship else {
            return Ok(0);
        };

        let component = match component_for(action) {
            Some(kind) => Self::component_bonus(ship, kind)?,
            None => 0,
        };

        let hull = if hull_matters(action) {
            if !fraction_ok(ship.hull) {
                return Err(SourceFault::new(
                    Self::NAME,
                    format!("hull {} is not a fraction", ship.hull),
                ));
            }
            hull_penalty(ship.hull)
        } else {
            0
        };

        Ok(component + hull)
    }
}
