//! Mission hand-in: a fixed baseline scaled by tier plus one bonus draw.

use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::ActionRun;
use crate::table::{WeightedTable, names};

/// Baseline payout percentage for a tier.
pub(crate) fn payout_percent(tier: Tier) -> u32 {
    match tier {
        Tier::CriticalSuccess => 150,
        Tier::Success | Tier::Partial => 100,
        Tier::Failure => 50,
        Tier::CriticalFailure => 0,
    }
}

fn scaled(amount: u32, percent: u32) -> u32 {
    amount.saturating_mul(percent) / 100
}

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    let percent = payout_percent(run.tier);

    if let Some(mission) = run.ctx.mission.as_ref() {
        for reward in &mission.items {
            run.consequences
                .add_loot(reward.item.clone(), reward.quality, scaled(reward.quantity, percent));
        }
        run.consequences.credits += scaled(mission.credits, percent);
        if run.tier.is_success() {
            if let Some(flag) = &mission.story_flag {
                run.consequences.unlock(flag.clone());
            }
        }
    }

    if !run.tier.is_success() {
        return Ok(());
    }

    let custom_pool = run
        .ctx
        .mission
        .as_ref()
        .filter(|m| !m.bonus_pool.is_empty())
        .map(|m| WeightedTable::new(format!("mission.{}.bonus", m.id), m.bonus_pool.clone()))
        .transpose()?;
    let bonus = match &custom_pool {
        Some(table) => run.table_roll_from("bonus", table),
        None => run.table_roll("bonus", names::MISSION_BONUS)?,
    };
    if let Some(bonus) = bonus {
        run.grant(&bonus, bonus.quantity, false);
    }
    Ok(())
}
