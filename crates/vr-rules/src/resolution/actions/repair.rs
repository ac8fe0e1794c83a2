//! Repair: hull restored in proportion to the margin.

use crate::dice::DiceNotation;
use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::ActionRun;

/// Hull points restored for a tier and margin.
pub(crate) fn repair_amount(tier: Tier, margin: i32, base: u32, per_point: u32) -> u32 {
    let margin = u32::try_from(margin.max(0)).unwrap_or(0);
    let full = base.saturating_add(margin.saturating_mul(per_point));
    match tier {
        Tier::CriticalSuccess => full.saturating_mul(2),
        Tier::Success => full,
        Tier::Partial => full / 2,
        Tier::Failure | Tier::CriticalFailure => 0,
    }
}

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    run.consequences.hull_repaired = repair_amount(
        run.tier,
        run.margin,
        run.config.repair_base,
        run.config.repair_per_point,
    );
    if run.tier == Tier::CriticalFailure {
        let damage = run.damage("mishap", &DiceNotation::new(1, 4, 0));
        run.consequences.take_damage("repair mishap", damage);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_scales_with_margin() {
        assert_eq!(repair_amount(Tier::Success, 0, 5, 2), 5);
        assert_eq!(repair_amount(Tier::Success, 3, 5, 2), 11);
        assert_eq!(repair_amount(Tier::CriticalSuccess, 3, 5, 2), 22);
        assert_eq!(repair_amount(Tier::Partial, -2, 5, 2), 2);
        assert_eq!(repair_amount(Tier::Failure, -5, 5, 2), 0);
        assert_eq!(repair_amount(Tier::CriticalFailure, 4, 5, 2), 0);
    }
}
