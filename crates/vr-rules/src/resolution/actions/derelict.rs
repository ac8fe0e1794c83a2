//! Derelicts: discoveries on success, extra loot on a critical, structural
//! collapse and ambush rolls.

use crate::context::Stability;
use crate::dice::DiceNotation;
use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::{ActionRun, scale_quantity};
use crate::table::names;

const AMBUSH_CHANCE: u32 = 15;
const AMBUSH_RISK: i32 = 2;

fn structure_chance(stability: Stability) -> u32 {
    match stability {
        Stability::Stable => 10,
        Stability::Unstable => 30,
        Stability::Collapsing => 60,
    }
}

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    if run.tier >= Tier::Success {
        if let Some(find) = run.table_roll("discovery", names::DERELICT_DISCOVERIES)? {
            run.grant(&find, find.quantity, false);
        }
    }
    if run.tier == Tier::CriticalSuccess {
        if let Some(loot) = run.table_roll("loot", names::DERELICT_LOOT)? {
            let quantity = scale_quantity(loot.quantity, Tier::Success);
            run.grant(&loot, quantity, false);
        }
    }

    let stability = run.ctx.environment.map(|e| e.stability).unwrap_or_default();
    if run.percentile("structure", structure_chance(stability), false) {
        let damage = run.damage("structure_damage", &DiceNotation::new(2, 6, 0));
        run.consequences.take_damage("structural collapse", damage);
    }

    let ambush = if run.tier <= Tier::Failure {
        AMBUSH_CHANCE + 10
    } else {
        AMBUSH_CHANCE
    };
    if run.percentile("ambush", ambush, run.tier == Tier::CriticalFailure) {
        run.consequences.combat_triggered = true;
        run.consequences.risk_delta += AMBUSH_RISK;
    }
    Ok(())
}
