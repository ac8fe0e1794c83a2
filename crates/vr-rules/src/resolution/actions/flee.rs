//! Fleeing: one opposed check; a failed escape lets the pursuer hit.

use crate::dice::DiceNotation;
use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::ActionRun;

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    if run.tier >= Tier::Success {
        return Ok(());
    }
    let dice = if run.tier == Tier::CriticalFailure {
        DiceNotation::new(2, 6, 0)
    } else {
        DiceNotation::new(1, 6, 0)
    };
    let damage = run.damage("pursuit_damage", &dice);
    run.consequences.take_damage("pursuit", damage);
    run.consequences.combat_triggered = true;
    if run.tier == Tier::CriticalFailure {
        run.consequences.apply_status("ship", "engines_strained");
    }
    Ok(())
}
