//! The resolution pipeline.
//!
//! One generalized core handles every action shape:
//!
//! 1. roll a d20 on the `<action>` substream
//! 2. aggregate modifiers
//! 3. look up the target number
//! 4. grade the result, critical faces first
//! 5. run the action's secondary rolls, each on its own `<action>:<roll>`
//!    substream
//!
//! Nothing is persisted between calls; a [`Resolver`] only holds read-only
//! rules data once it has been configured.

pub mod action;
mod actions;
pub mod outcome;
mod run;

pub use action::ActionType;
pub use outcome::{
    Consequences, DamageTaken, LootItem, ResolutionOutcome, SecondaryRoll, StatusEffect,
    TargetSource, Tier,
};

pub(crate) use actions::{damage_after_armor, weapon_notation};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::context::ActionContext;
use crate::dice::{CheckRoll, Critical, check_critical, roll_d20};
use crate::difficulty::{Difficulty, DifficultyTable};
use crate::error::RulesResult;
use crate::modifiers::ModifierRegistry;
use crate::odds::{self, HitOddsReport, OddsReport};
use crate::seed::make_stream;
use crate::table::TableSet;
use run::ActionRun;

/// Largest encounter-length bonus a pursuer gets.
pub const MAX_PURSUIT_ROUNDS: u32 = 5;

/// Faces on the check die.
pub const CHECK_DIE_SIDES: u32 = 20;

/// Grade a check. Critical faces override the arithmetic; otherwise the
/// total is compared with the target and, when the action has one, the
/// partial band below it.
pub fn grade(natural: u32, sides: u32, total: i32, target: i32, partial_band: Option<i32>) -> Tier {
    match check_critical(natural, sides) {
        Some(Critical::Failure) => Tier::CriticalFailure,
        Some(Critical::Success) => Tier::CriticalSuccess,
        None if total >= target => Tier::Success,
        None => match partial_band {
            Some(band) if total >= target.saturating_sub(band) => Tier::Partial,
            _ => Tier::Failure,
        },
    }
}

/// A resolved target number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// The number to meet or beat.
    pub value: i32,
    /// Difficulty label in effect.
    pub difficulty: Difficulty,
    /// Where the number came from.
    pub source: TargetSource,
}

/// Resolves actions against contexts.
#[derive(Debug)]
pub struct Resolver {
    registry: ModifierRegistry,
    difficulties: DifficultyTable,
    tables: TableSet,
    config: EngineConfig,
}

impl Resolver {
    /// Assemble a resolver from its parts. The configuration is validated.
    pub fn new(
        registry: ModifierRegistry,
        tables: TableSet,
        config: EngineConfig,
    ) -> RulesResult<Self> {
        config.validate()?;
        let difficulties = config.difficulty_table()?;
        Ok(Self {
            registry,
            difficulties,
            tables,
            config,
        })
    }

    /// Standard sources, embedded tables, default configuration.
    pub fn with_defaults() -> RulesResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Standard sources and embedded tables with a custom configuration.
    pub fn with_config(config: EngineConfig) -> RulesResult<Self> {
        let registry = ModifierRegistry::from_config(&config);
        Self::new(registry, TableSet::embedded()?, config)
    }

    /// Replace the difficulty table.
    pub fn with_difficulties(mut self, difficulties: DifficultyTable) -> Self {
        self.difficulties = difficulties;
        self
    }

    /// Replace the table set.
    pub fn with_tables(mut self, tables: TableSet) -> Self {
        self.tables = tables;
        self
    }

    /// The modifier registry.
    pub fn registry(&self) -> &ModifierRegistry {
        &self.registry
    }

    /// The modifier registry, for registering sources at startup.
    pub fn registry_mut(&mut self) -> &mut ModifierRegistry {
        &mut self.registry
    }

    /// The difficulty table.
    pub fn difficulties(&self) -> &DifficultyTable {
        &self.difficulties
    }

    /// The content tables.
    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Partial band for an action, if it has one.
    pub fn partial_band(&self, action: ActionType) -> Option<i32> {
        action
            .has_partial_band()
            .then_some(self.config.partial_band)
    }

    /// The difficulty label in effect for a context.
    pub fn difficulty_for(&self, ctx: &ActionContext) -> RulesResult<Difficulty> {
        ctx.difficulty
            .as_deref()
            .unwrap_or(&self.config.default_difficulty)
            .parse()
    }

    /// The target number for an action.
    ///
    /// Combat uses the opponent's defense and fleeing uses the pursuer's
    /// rating plus one per elapsed round (at most five) when the context has
    /// a combat section; everything else uses the difficulty table. The
    /// difficulty label is validated in every case.
    pub fn target_for(&self, action: ActionType, ctx: &ActionContext) -> RulesResult<Target> {
        let difficulty = self.difficulty_for(ctx)?;
        let target = match (action, ctx.combat.as_ref()) {
            (ActionType::Combat, Some(combat)) => Target {
                value: combat.defense,
                difficulty,
                source: TargetSource::Defense,
            },
            (ActionType::Flee, Some(combat)) => {
                let rounds = combat.rounds.min(MAX_PURSUIT_ROUNDS) as i32;
                Target {
                    value: combat.pursuit.saturating_add(rounds),
                    difficulty,
                    source: TargetSource::Pursuit,
                }
            }
            _ => Target {
                value: self.difficulties.target_for(difficulty),
                difficulty,
                source: TargetSource::Difficulty,
            },
        };
        Ok(target)
    }

    /// Resolve an action named by a string.
    pub fn resolve(
        &self,
        action: &str,
        ctx: &ActionContext,
        seed: &str,
    ) -> RulesResult<ResolutionOutcome> {
        self.resolve_action(action.parse()?, ctx, seed)
    }

    /// Resolve an action, rolling the check die on the action's substream.
    pub fn resolve_action(
        &self,
        action: ActionType,
        ctx: &ActionContext,
        seed: &str,
    ) -> RulesResult<ResolutionOutcome> {
        let mut stream = make_stream(seed, action.label());
        let check = roll_d20(&mut stream);
        self.resolve_check(action, ctx, seed, check)
    }

    /// Resolve with a known natural roll (clamped to 1-20), for replaying
    /// recorded rolls. Secondary rolls still come from their substreams.
    pub fn resolve_with_roll(
        &self,
        action: ActionType,
        ctx: &ActionContext,
        seed: &str,
        natural: u32,
    ) -> RulesResult<ResolutionOutcome> {
        let check = CheckRoll::from_value(natural.clamp(1, CHECK_DIE_SIDES), CHECK_DIE_SIDES);
        self.resolve_check(action, ctx, seed, check)
    }

    fn resolve_check(
        &self,
        action: ActionType,
        ctx: &ActionContext,
        seed: &str,
        check: CheckRoll,
    ) -> RulesResult<ResolutionOutcome> {
        let modifiers = self.registry.aggregate(action, ctx);
        let target = self.target_for(action, ctx)?;

        let natural = i32::try_from(check.value).unwrap_or(i32::MAX);
        let total = natural.saturating_add(modifiers.total);
        let margin = total.saturating_sub(target.value);
        let tier = grade(
            check.value,
            check.sides,
            total,
            target.value,
            self.partial_band(action),
        );

        tracing::debug!(
            action = action.label(),
            seed,
            natural = check.value,
            modifier = modifiers.total,
            target = target.value,
            tier = tier.label(),
            "resolved check"
        );

        let mut run = ActionRun {
            action,
            seed,
            ctx,
            tables: &self.tables,
            config: &self.config,
            tier,
            margin,
            secondary: BTreeMap::new(),
            consequences: Consequences::default(),
        };
        actions::apply(&mut run)?;
        run.consequences.risk_delta += action.base_risk();

        Ok(ResolutionOutcome {
            action,
            seed: seed.to_string(),
            tier,
            natural_roll: check.value,
            total_roll: total,
            target_difficulty: target.value,
            difficulty: target.difficulty.label().to_string(),
            target_source: target.source,
            margin,
            success: total >= target.value,
            modifiers,
            secondary_rolls: run.secondary,
            consequences: run.consequences,
        })
    }

    /// Analytic tier probabilities for an action named by a string.
    pub fn preview_odds(&self, action: &str, ctx: &ActionContext) -> RulesResult<OddsReport> {
        odds::preview_odds(self, action.parse()?, ctx)
    }

    /// Hit chance and expected damage for a combat attack.
    pub fn preview_combat_hit(&self, ctx: &ActionContext) -> RulesResult<HitOddsReport> {
        odds::preview_combat_hit(self, ctx)
    }

    /// The difficulty label whose success chance is closest to `chance`.
    pub fn find_difficulty_for_chance(
        &self,
        action: &str,
        ctx: &ActionContext,
        chance: f64,
    ) -> RulesResult<Difficulty> {
        odds::find_difficulty_for_chance(self, action.parse()?, ctx, chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CombatState, CrewMember, CrewRole, MissionState};
    use crate::error::RulesError;
    use crate::modifiers::FnSource;

    fn resolver() -> Resolver {
        Resolver::with_defaults().unwrap()
    }

    fn fixed(modifier: i32, normal: i32) -> Resolver {
        let mut registry = ModifierRegistry::new();
        registry
            .register(FnSource::constant("fixed", modifier), 0)
            .unwrap();
        let config = EngineConfig::default().with_difficulty_target(Difficulty::Normal, normal);
        Resolver::new(registry, TableSet::embedded().unwrap(), config).unwrap()
    }

    #[test]
    fn grade_ladder() {
        assert_eq!(grade(1, 20, 30, 10, None), Tier::CriticalFailure);
        assert_eq!(grade(20, 20, 5, 30, None), Tier::CriticalSuccess);
        assert_eq!(grade(10, 20, 12, 12, None), Tier::Success);
        assert_eq!(grade(10, 20, 10, 12, Some(3)), Tier::Partial);
        assert_eq!(grade(10, 20, 9, 12, Some(3)), Tier::Partial);
        assert_eq!(grade(10, 20, 8, 12, Some(3)), Tier::Failure);
        assert_eq!(grade(10, 20, 11, 12, None), Tier::Failure);
    }

    #[test]
    fn extreme_numbers_saturate_instead_of_wrapping() {
        let r = fixed(i32::MAX, 11);
        let ctx = ActionContext::new().with_combat(CombatState::new("void", i32::MIN));
        let high = r
            .resolve_with_roll(ActionType::Combat, &ctx, "limits", 20)
            .unwrap();
        assert_eq!(high.total_roll, i32::MAX);
        assert_eq!(high.margin, i32::MAX);
        assert_eq!(high.tier, Tier::CriticalSuccess);

        let r = fixed(i32::MIN, 11);
        let low = r
            .resolve_with_roll(ActionType::Mining, &ActionContext::new(), "limits", 10)
            .unwrap();
        assert_eq!(low.total_roll, i32::MIN + 10);
        assert_eq!(low.margin, i32::MIN);
        assert_eq!(low.tier, Tier::Failure);

        let fleeing = ActionContext::new().with_combat(
            CombatState::new("hunter", 12)
                .with_pursuit(i32::MAX)
                .with_rounds(3),
        );
        let target = resolver().target_for(ActionType::Flee, &fleeing).unwrap();
        assert_eq!(target.value, i32::MAX);
        assert_eq!(grade(10, 20, 0, i32::MIN, Some(3)), Tier::Success);
        assert_eq!(grade(10, 20, i32::MIN, i32::MIN + 1, Some(3)), Tier::Partial);
    }

    #[test]
    fn same_seed_same_outcome() {
        let r = resolver();
        let ctx = ActionContext::new();
        for action in ActionType::all() {
            let a = r.resolve_action(*action, &ctx, "replay-42").unwrap();
            let b = r.resolve_action(*action, &ctx, "replay-42").unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn primary_roll_comes_from_action_stream() {
        let r = resolver();
        let outcome = r.resolve("mining", &ActionContext::new(), "voidreach").unwrap();
        // first d20 on make_stream("voidreach", "mining")
        assert_eq!(outcome.natural_roll, 12);
        assert_eq!(outcome.target_difficulty, 11);
        assert_eq!(outcome.total_roll, 12);
        assert_eq!(outcome.tier, Tier::Success);
    }

    #[test]
    fn forced_rolls_and_overrides() {
        let r = fixed(4, 8);
        let ctx = ActionContext::new();

        let hit = r.resolve_with_roll(ActionType::Derelict, &ctx, "a", 10).unwrap();
        assert_eq!(hit.total_roll, 14);
        assert_eq!(hit.target_difficulty, 8);
        assert_eq!(hit.margin, 6);
        assert!(hit.success);
        assert_eq!(hit.tier, Tier::Success);

        let fumble = r.resolve_with_roll(ActionType::Derelict, &ctx, "a", 1).unwrap();
        assert_eq!(fumble.tier, Tier::CriticalFailure);

        let strong = fixed(30, 8);
        let fumble = strong.resolve_with_roll(ActionType::Derelict, &ctx, "a", 1).unwrap();
        assert!(fumble.success);
        assert_eq!(fumble.tier, Tier::CriticalFailure);

        let heavy = fixed(-30, 8);
        let crit = heavy.resolve_with_roll(ActionType::Derelict, &ctx, "a", 20).unwrap();
        assert!(!crit.success);
        assert_eq!(crit.tier, Tier::CriticalSuccess);
    }

    #[test]
    fn unknown_action_and_difficulty() {
        let r = resolver();
        let err = r.resolve("warp", &ActionContext::new(), "s").unwrap_err();
        assert!(matches!(err, RulesError::UnknownAction(_)));

        let ctx = ActionContext::new().with_difficulty("legendary");
        let err = r.resolve("mining", &ctx, "s").unwrap_err();
        assert!(matches!(err, RulesError::UnknownDifficulty(_)));
    }

    #[test]
    fn combat_uses_defense_and_flee_uses_pursuit() {
        let r = resolver();
        let ctx = ActionContext::new().with_combat(
            CombatState::new("raider", 15)
                .with_pursuit(9)
                .with_rounds(8),
        );
        let attack = r.target_for(ActionType::Combat, &ctx).unwrap();
        assert_eq!((attack.value, attack.source), (15, TargetSource::Defense));
        let flight = r.target_for(ActionType::Flee, &ctx).unwrap();
        assert_eq!((flight.value, flight.source), (14, TargetSource::Pursuit));
        let mining = r.target_for(ActionType::Mining, &ctx).unwrap();
        assert_eq!(mining.value, 11);
    }

    #[test]
    fn malformed_weapon_is_an_error() {
        let r = resolver();
        let ctx = ActionContext::new()
            .with_combat(CombatState::new("raider", 10).with_weapon("lots"));
        let err = r.resolve("combat", &ctx, "s").unwrap_err();
        assert!(matches!(err, RulesError::InvalidNotation { .. }));
    }

    #[test]
    fn secondary_rolls_use_dedicated_streams() {
        let r = resolver();
        let outcome = r
            .resolve_with_roll(ActionType::Mining, &ActionContext::new(), "streams", 15)
            .unwrap();
        assert!(outcome.secondary_rolls.contains_key("hazard"));
        assert!(outcome.secondary_rolls.contains_key("yield"));

        let mut hazard_stream = make_stream("streams", "mining:hazard");
        let expected = r
            .tables()
            .get(crate::table::names::MINING_HAZARDS)
            .unwrap()
            .select(&mut hazard_stream)
            .unwrap()
            .label
            .clone();
        match &outcome.secondary_rolls["hazard"] {
            SecondaryRoll::Table { label, .. } => assert_eq!(label, &expected),
            other => panic!("unexpected roll {other:?}"),
        }
    }

    #[test]
    fn failed_mining_skips_yield() {
        let r = fixed(-10, 11);
        let outcome = r
            .resolve_with_roll(ActionType::Mining, &ActionContext::new(), "dry", 5)
            .unwrap();
        assert_eq!(outcome.tier, Tier::Failure);
        assert!(!outcome.secondary_rolls.contains_key("yield"));
        assert!(outcome.consequences.loot.is_empty());
    }

    #[test]
    fn combat_hit_deals_damage_and_rolls_status() {
        let r = fixed(0, 11);
        let ctx = ActionContext::new()
            .with_combat(CombatState::new("raider", 10).with_armor(100));
        let outcome = r.resolve_with_roll(ActionType::Combat, &ctx, "fight", 15).unwrap();
        assert_eq!(outcome.tier, Tier::Success);
        assert_eq!(outcome.consequences.damage_dealt, 1);
        assert!(outcome.secondary_rolls.contains_key("damage"));
        assert!(outcome.secondary_rolls.contains_key("status"));

        let crit = r.resolve_with_roll(ActionType::Combat, &ctx, "fight", 20).unwrap();
        assert_eq!(crit.consequences.damage_dealt, 2);

        let jam = r.resolve_with_roll(ActionType::Combat, &ctx, "fight", 1).unwrap();
        assert_eq!(jam.consequences.damage_dealt, 0);
        assert!(
            jam.consequences
                .statuses
                .iter()
                .any(|s| s.effect == "weapon_jammed")
        );
    }

    #[test]
    fn repair_scales_with_margin() {
        let r = fixed(0, 10);
        let ctx = ActionContext::new();
        let ok = r.resolve_with_roll(ActionType::Repair, &ctx, "fix", 13).unwrap();
        assert_eq!(ok.margin, 3);
        assert_eq!(ok.consequences.hull_repaired, 11);
        let partial = r.resolve_with_roll(ActionType::Repair, &ctx, "fix", 8).unwrap();
        assert_eq!(partial.tier, Tier::Partial);
        assert_eq!(partial.consequences.hull_repaired, 2);
        let mishap = r.resolve_with_roll(ActionType::Repair, &ctx, "fix", 1).unwrap();
        assert_eq!(mishap.consequences.hull_repaired, 0);
        assert!(mishap.consequences.total_damage() >= 1);
    }

    #[test]
    fn mission_baseline_and_story_flag() {
        let r = fixed(0, 10);
        let ctx = ActionContext::new().with_mission(
            MissionState::new("courier", 100)
                .with_item("fuel_cell", 4)
                .with_story_flag("courier_done"),
        );

        let win = r.resolve_with_roll(ActionType::Mission, &ctx, "m", 20).unwrap();
        assert_eq!(win.tier, Tier::CriticalSuccess);
        assert!(win.consequences.credits >= 150);
        assert!(win.consequences.loot.iter().any(|l| l.item == "fuel_cell" && l.quantity == 6));
        assert!(win.consequences.unlocks.contains(&"courier_done".to_string()));
        assert!(win.secondary_rolls.contains_key("bonus"));

        let loss = r.resolve_with_roll(ActionType::Mission, &ctx, "m", 5).unwrap();
        assert_eq!(loss.tier, Tier::Failure);
        assert_eq!(loss.consequences.credits, 50);
        assert!(loss.consequences.unlocks.is_empty());
        assert!(!loss.secondary_rolls.contains_key("bonus"));

        let wipe = r.resolve_with_roll(ActionType::Mission, &ctx, "m", 1).unwrap();
        assert_eq!(wipe.consequences.credits, 0);
        assert!(wipe.consequences.loot.is_empty());
    }

    #[test]
    fn derelict_critical_failure_forces_ambush() {
        let r = resolver();
        let outcome = r
            .resolve_with_roll(ActionType::Derelict, &ActionContext::new(), "dark", 1)
            .unwrap();
        assert!(outcome.consequences.combat_triggered);
        assert!(!outcome.secondary_rolls.contains_key("discovery"));
    }

    #[test]
    fn scavenging_critical_failure_springs_trap() {
        let r = resolver();
        let outcome = r
            .resolve_with_roll(ActionType::Scavenging, &ActionContext::new(), "wreck", 1)
            .unwrap();
        assert!(outcome.secondary_rolls.contains_key("trap_damage"));
        assert!(outcome.consequences.damage.iter().any(|d| d.source == "trap"));
    }

    #[test]
    fn failed_flight_triggers_combat() {
        let r = fixed(0, 11);
        let ctx = ActionContext::new().with_combat(CombatState::new("hunter", 10).with_pursuit(15));
        let outcome = r.resolve_with_roll(ActionType::Flee, &ctx, "run", 5).unwrap();
        assert_eq!(outcome.tier, Tier::Failure);
        assert!(outcome.consequences.combat_triggered);
        assert!(outcome.consequences.total_damage() >= 1);
    }

    #[test]
    fn away_team_failure_can_only_injure_available_crew() {
        let r = fixed(-20, 11);
        let ctx = ActionContext::new().with_crew(vec![
            CrewMember::new("Vasquez", CrewRole::Security),
            CrewMember::new("Okafor", CrewRole::Medic).docked(),
        ]);
        for i in 0..200 {
            let outcome = r
                .resolve_with_roll(ActionType::AwayTeam, &ctx, &format!("s{i}"), 5)
                .unwrap();
            for status in &outcome.consequences.statuses {
                if status.effect == "injured" {
                    assert_eq!(status.target, "Vasquez");
                }
            }
        }
    }

    #[test]
    fn resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();
    }
}
