//! Scavenging: loot on partial or better, plus independent trap and
//! detection rolls.

use crate::context::Stability;
use crate::dice::DiceNotation;
use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::{ActionRun, scale_quantity};
use crate::table::names;

const TRAP_CHANCE: u32 = 15;
const DETECTION_CHANCE: u32 = 20;
const DETECTION_RISK: i32 = 3;

fn trap_chance(stability: Stability) -> u32 {
    match stability {
        Stability::Stable => TRAP_CHANCE,
        Stability::Unstable => TRAP_CHANCE + 10,
        Stability::Collapsing => TRAP_CHANCE + 25,
    }
}

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    if run.tier >= Tier::Partial {
        if let Some(loot) = run.table_roll("loot", names::SALVAGE_LOOT)? {
            let quantity = scale_quantity(loot.quantity, run.tier);
            run.grant(&loot, quantity, run.tier == Tier::CriticalSuccess);
        }
    }

    let stability = run.ctx.environment.map(|e| e.stability).unwrap_or_default();
    let critical_failure = run.tier == Tier::CriticalFailure;
    if run.percentile("trap", trap_chance(stability), critical_failure) {
        let dice = if critical_failure {
            DiceNotation::new(2, 6, 0)
        } else {
            DiceNotation::new(1, 6, 0)
        };
        let damage = run.damage("trap_damage", &dice);
        run.consequences.take_damage("trap", damage);
    }

    let detection = if run.tier <= Tier::Failure {
        DETECTION_CHANCE + 10
    } else {
        DETECTION_CHANCE
    };
    if run.percentile("detection", detection, false) {
        run.consequences.risk_delta += DETECTION_RISK;
    }
    Ok(())
}
