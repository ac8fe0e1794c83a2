//! Mining: a hazard rolled alongside the check, ore on partial or better.

use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::{ActionRun, scale_hazard, scale_quantity};
use crate::table::names;

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    if let Some(hazard) = run.table_roll("hazard", names::MINING_HAZARDS)? {
        if run.tier <= Tier::Partial {
            let damage = scale_hazard(hazard.row.damage, run.tier);
            run.suffer("mining hazard", &hazard.row, damage, "ship");
        }
    }

    if run.tier >= Tier::Partial {
        if let Some(ore) = run.table_roll("yield", names::MINING_YIELD)? {
            let quantity = scale_quantity(ore.quantity, run.tier);
            run.grant(&ore, quantity, false);
        }
    }
    Ok(())
}
