//! Away teams: a hazard and discovery pair; failures can injure crew.

use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::{ActionRun, scale_hazard, scale_quantity};
use crate::table::names;

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    let hazard = run.table_roll("hazard", names::AWAY_HAZARDS)?;
    let discovery = run.table_roll("discovery", names::AWAY_DISCOVERIES)?;

    if run.tier >= Tier::Partial {
        if let Some(find) = discovery {
            let quantity = scale_quantity(find.quantity, run.tier);
            run.grant(&find, quantity, false);
        }
    }

    let Some(hazard) = hazard else {
        return Ok(());
    };
    if run.tier > Tier::Partial {
        return Ok(());
    }

    let damage = scale_hazard(hazard.row.damage, run.tier);
    run.suffer("away team hazard", &hazard.row, damage, "away_team");

    if run.tier <= Tier::Failure && hazard.row.injury {
        let available: Vec<&str> = run.ctx.available_crew().map(|m| m.name.as_str()).collect();
        let mut stream = run.stream("casualty");
        if let Some(name) = stream.pick(&available) {
            let name = (*name).to_string();
            run.consequences.apply_status(name, "injured");
        }
    }
    Ok(())
}
