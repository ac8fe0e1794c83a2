//! Analytic odds that agree with [`Resolver`] without rolling dice.
//!
//! The check die has twenty faces. Face 1 and face 20 are always the critical
//! tiers, 5% each. Of the eighteen faces in between, a face passes when
//! `face + modifier >= target`, which is `clamp(20 - needed, 0, 18)` faces
//! for `needed = target - modifier`. Actions with a partial band count the
//! failing faces that land within the band as partial. Every face is worth
//! exactly 5%.

use serde::{Deserialize, Serialize};

use crate::context::ActionContext;
use crate::dice::DiceNotation;
use crate::difficulty::Difficulty;
use crate::error::RulesResult;
use crate::modifiers::{ModifierContribution, SourceFault};
use crate::resolution::{
    ActionType, CHECK_DIE_SIDES, Resolver, TargetSource, damage_after_armor, weapon_notation,
};

/// Percent each d20 face is worth.
pub const PERCENT_PER_FACE: f64 = 100.0 / CHECK_DIE_SIDES as f64;

/// Non-critical faces on the check die (2 through 19).
pub const NON_CRITICAL_FACES: i32 = 18;

/// How many faces of the d20 land in each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCounts {
    /// Always 1 (the natural 20).
    pub critical_success: u32,
    /// Non-critical faces that meet the target.
    pub success: u32,
    /// Non-critical faces inside the partial band.
    pub partial: u32,
    /// Remaining non-critical faces.
    pub failure: u32,
    /// Always 1 (the natural 1).
    pub critical_failure: u32,
}

impl FaceCounts {
    /// Count faces per tier for a modifier, target, and optional partial band.
    pub fn compute(modifier_total: i32, target: i32, partial_band: Option<i32>) -> Self {
        let needed = target.saturating_sub(modifier_total);
        let passing = 20i32.saturating_sub(needed).clamp(0, NON_CRITICAL_FACES);

        // Failing non-critical faces are 2..=min(19, needed - 1); those at or
        // above needed - band are partial.
        let partial = match partial_band {
            Some(band) if passing < NON_CRITICAL_FACES => {
                let highest_failing = needed.saturating_sub(1).min(19);
                let lowest_partial = needed.saturating_sub(band).max(2);
                (highest_failing - lowest_partial + 1).max(0)
            }
            _ => 0,
        };
        let failure = NON_CRITICAL_FACES - passing - partial;

        Self {
            critical_success: 1,
            success: passing as u32,
            partial: partial as u32,
            failure: failure as u32,
            critical_failure: 1,
        }
    }
}

/// Tier probabilities in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierOdds {
    /// Critical success chance.
    pub critical_success: f64,
    /// Plain success chance.
    pub success: f64,
    /// Partial success chance.
    pub partial: f64,
    /// Failure chance.
    pub failure: f64,
    /// Critical failure chance.
    pub critical_failure: f64,
}

impl From<FaceCounts> for TierOdds {
    fn from(faces: FaceCounts) -> Self {
        let pct = |n: u32| f64::from(n) * PERCENT_PER_FACE;
        Self {
            critical_success: pct(faces.critical_success),
            success: pct(faces.success),
            partial: pct(faces.partial),
            failure: pct(faces.failure),
            critical_failure: pct(faces.critical_failure),
        }
    }
}

impl TierOdds {
    /// Critical success plus success.
    pub fn success_chance(&self) -> f64 {
        self.critical_success + self.success
    }
}

/// Qualitative bucket for a success chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceLabel {
    /// 90% and up.
    NearCertain,
    /// 70% and up.
    Likely,
    /// 55% and up.
    Favorable,
    /// 45% and up.
    EvenOdds,
    /// 30% and up.
    Risky,
    /// 15% and up.
    Unlikely,
    /// Below 15%.
    Desperate,
}

impl ChanceLabel {
    /// Bucket a success chance given in percent.
    pub fn from_chance(percent: f64) -> Self {
        if percent >= 90.0 {
            Self::NearCertain
        } else if percent >= 70.0 {
            Self::Likely
        } else if percent >= 55.0 {
            Self::Favorable
        } else if percent >= 45.0 {
            Self::EvenOdds
        } else if percent >= 30.0 {
            Self::Risky
        } else if percent >= 15.0 {
            Self::Unlikely
        } else {
            Self::Desperate
        }
    }
}

impl std::fmt::Display for ChanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NearCertain => write!(f, "Near Certain"),
            Self::Likely => write!(f, "Likely"),
            Self::Favorable => write!(f, "Favorable"),
            Self::EvenOdds => write!(f, "Even Odds"),
            Self::Risky => write!(f, "Risky"),
            Self::Unlikely => write!(f, "Unlikely"),
            Self::Desperate => write!(f, "Desperate"),
        }
    }
}

/// Odds for one action in one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsReport {
    /// Action previewed.
    pub action: ActionType,
    /// Number to meet or beat.
    pub target_difficulty: i32,
    /// Where the number came from.
    pub target_source: TargetSource,
    /// Difficulty label in effect.
    pub difficulty: String,
    /// Aggregated modifier.
    pub modifier_total: i32,
    /// Non-zero contributions.
    pub modifier_breakdown: Vec<ModifierContribution>,
    /// Sources that failed and were counted as zero.
    pub warnings: Vec<SourceFault>,
    /// Faces per tier.
    pub faces: FaceCounts,
    /// Tier probabilities in percent.
    pub probabilities: TierOdds,
    /// Critical success plus success, in percent.
    pub success_chance: f64,
    /// Qualitative bucket.
    pub label: ChanceLabel,
    /// One-line summary.
    pub summary: String,
}

/// Preview the tier distribution of an action. Consumes no randomness.
pub fn preview_odds(
    resolver: &Resolver,
    action: ActionType,
    ctx: &ActionContext,
) -> RulesResult<OddsReport> {
    let modifiers = resolver.registry().aggregate(action, ctx);
    let target = resolver.target_for(action, ctx)?;
    let faces = FaceCounts::compute(modifiers.total, target.value, resolver.partial_band(action));
    let probabilities = TierOdds::from(faces);
    let success_chance = probabilities.success_chance();
    let label = ChanceLabel::from_chance(success_chance);
    let summary = format!(
        "{label}: {success_chance:.0}% to succeed at {action} (target {}, modifier {:+})",
        target.value, modifiers.total
    );

    Ok(OddsReport {
        action,
        target_difficulty: target.value,
        target_source: target.source,
        difficulty: target.difficulty.label().to_string(),
        modifier_total: modifiers.total,
        modifier_breakdown: modifiers.breakdown,
        warnings: modifiers.warnings,
        faces,
        probabilities,
        success_chance,
        label,
        summary,
    })
}

/// The difficulty label whose success chance (percent) is closest to
/// `target_chance`. Ties go to the easier label.
pub fn find_difficulty_for_chance(
    resolver: &Resolver,
    action: ActionType,
    ctx: &ActionContext,
    target_chance: f64,
) -> RulesResult<Difficulty> {
    let modifier = resolver.registry().aggregate(action, ctx).total;
    let band = resolver.partial_band(action);

    let mut best = Difficulty::Normal;
    let mut best_distance = f64::INFINITY;
    for (difficulty, target) in resolver.difficulties().entries() {
        let chance = TierOdds::from(FaceCounts::compute(modifier, target, band)).success_chance();
        let distance = (chance - target_chance).abs();
        if distance < best_distance {
            best = difficulty;
            best_distance = distance;
        }
    }
    Ok(best)
}

/// Hit chance and damage expectation for one attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitOddsReport {
    /// Opponent name.
    pub target: String,
    /// Number to meet or beat.
    pub defense: i32,
    /// Where the number came from.
    pub target_source: TargetSource,
    /// Aggregated modifier.
    pub modifier_total: i32,
    /// Weapon notation.
    pub weapon: String,
    /// Opponent armor.
    pub armor: i32,
    /// Tier probabilities in percent.
    pub probabilities: TierOdds,
    /// Chance to hit (any success), in percent.
    pub hit_chance: f64,
    /// Chance of a critical hit, in percent.
    pub critical_chance: f64,
    /// Mean damage of a normal hit after armor.
    pub damage_per_hit: f64,
    /// Mean damage per attack, misses and crits included.
    pub expected_damage: f64,
    /// Qualitative bucket for the hit chance.
    pub label: ChanceLabel,
}

/// Preview a combat attack with the same grading `resolve("combat")` uses.
pub fn preview_combat_hit(resolver: &Resolver, ctx: &ActionContext) -> RulesResult<HitOddsReport> {
    let notation = weapon_notation(ctx)?;
    let modifiers = resolver.registry().aggregate(ActionType::Combat, ctx);
    let target = resolver.target_for(ActionType::Combat, ctx)?;
    let (name, armor) = ctx
        .combat
        .as_ref()
        .map_or_else(|| ("hostile".to_string(), 0), |c| (c.target.clone(), c.armor));

    let probabilities = TierOdds::from(FaceCounts::compute(
        modifiers.total,
        target.value,
        resolver.partial_band(ActionType::Combat),
    ));
    let damage_per_hit = expected_damage_after_armor(&notation, armor);
    let expected_damage = (probabilities.success * damage_per_hit
        + probabilities.critical_success * damage_per_hit * 2.0)
        / 100.0;
    let hit_chance = probabilities.success_chance();

    Ok(HitOddsReport {
        target: name,
        defense: target.value,
        target_source: target.source,
        modifier_total: modifiers.total,
        weapon: notation.to_string(),
        armor,
        probabilities,
        hit_chance,
        critical_chance: probabilities.critical_success,
        damage_per_hit,
        expected_damage,
        label: ChanceLabel::from_chance(hit_chance),
    })
}

/// Largest `count * sides^2` convolved exactly.
const EXACT_DISTRIBUTION_LIMIT: u64 = 2_000_000;

/// Mean of `max(total - armor, 1)` for a damage expression.
///
/// Exact by convolution for ordinary expressions; very large pools fall back
/// to the clamped mean.
pub fn expected_damage_after_armor(notation: &DiceNotation, armor: i32) -> f64 {
    let count = u64::from(notation.count);
    let sides = u64::from(notation.die.sides());
    if count.saturating_mul(sides).saturating_mul(sides) > EXACT_DISTRIBUTION_LIMIT {
        return (notation.average().max(0.0) - f64::from(armor)).max(1.0);
    }

    // dist[s] = probability that the dice sum to s
    let mut dist = vec![1.0f64];
    let p = 1.0 / sides as f64;
    for _ in 0..count {
        let mut next = vec![0.0; dist.len() + sides as usize];
        for (sum, weight) in dist.iter().enumerate() {
            for face in 1..=sides as usize {
                next[sum + face] += weight * p;
            }
        }
        dist = next;
    }

    dist.iter()
        .enumerate()
        .filter(|(_, w)| **w > 0.0)
        .map(|(sum, w)| {
            let total = (sum as i64 + i64::from(notation.modifier)).max(0);
            w * f64::from(damage_after_armor(total, armor, false))
        })
        .sum()
}
