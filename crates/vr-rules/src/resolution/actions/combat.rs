//! Combat: the primary roll is the to-hit check. A hit rolls weapon damage,
//! then a d6 on the status table.

use crate::context::ActionContext;
use crate::dice::{DiceNotation, Die};
use crate::error::RulesResult;
use crate::resolution::Tier;
use crate::resolution::run::ActionRun;

/// Weapon damage when the context names none.
pub(crate) const DEFAULT_WEAPON: &str = "1d8";

/// The attacker's weapon notation, parsed.
pub(crate) fn weapon_notation(ctx: &ActionContext) -> RulesResult<DiceNotation> {
    ctx.combat
        .as_ref()
        .and_then(|c| c.weapon_damage.as_deref())
        .unwrap_or(DEFAULT_WEAPON)
        .parse()
}

/// Damage after armor: at least 1, doubled on a critical hit.
pub(crate) fn damage_after_armor(raw: i64, armor: i32, critical: bool) -> u32 {
    let reduced = (raw - i64::from(armor)).max(1);
    let reduced = u32::try_from(reduced).unwrap_or(u32::MAX);
    if critical {
        reduced.saturating_mul(2)
    } else {
        reduced
    }
}

pub(super) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    let notation = weapon_notation(run.ctx)?;
    let (target, armor) = run
        .ctx
        .combat
        .as_ref()
        .map_or_else(|| ("hostile".to_string(), 0), |c| (c.target.clone(), c.armor));

    if run.tier.is_success() {
        let raw = run.damage("damage", &notation);
        run.consequences.damage_dealt =
            damage_after_armor(i64::from(raw), armor, run.tier == Tier::CriticalSuccess);

        let face = run.die("status", Die::D6);
        let status = run
            .tables
            .combat_status(face)
            .and_then(|row| row.status.clone());
        if let Some(status) = status {
            run.consequences.apply_status(target, status);
        }
    } else if run.tier == Tier::CriticalFailure {
        run.consequences.apply_status("ship", "weapon_jammed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CombatState;

    #[test]
    fn armor_never_reduces_below_one() {
        assert_eq!(damage_after_armor(5, 2, false), 3);
        assert_eq!(damage_after_armor(2, 6, false), 1);
        assert_eq!(damage_after_armor(5, 2, true), 6);
        assert_eq!(damage_after_armor(1, 9, true), 2);
    }

    #[test]
    fn weapon_defaults_to_d8() {
        let n = weapon_notation(&ActionContext::new()).unwrap();
        assert_eq!(n.to_string(), "1d8");
        let ctx = ActionContext::new().with_combat(CombatState::new("raider", 12).with_weapon("2d6+1"));
        assert_eq!(weapon_notation(&ctx).unwrap().to_string(), "2d6+1");
        let bad = ActionContext::new().with_combat(CombatState::new("raider", 12).with_weapon("2x6"));
        assert!(weapon_notation(&bad).is_err());
    }
}
