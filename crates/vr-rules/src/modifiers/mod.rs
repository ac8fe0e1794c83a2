//! Pluggable modifier sources and their aggregation.
//!
//! A [`ModifierSource`] turns `(action, context)` into a signed bonus. The
//! [`ModifierRegistry`] holds an explicit, statically composed list of
//! sources and sums them into a [`ModifierResult`]. The sum is
//! order-independent; evaluation order (priority ascending, then registration
//! order) only affects how the breakdown is displayed.
//!
//! A source that returns an error or panics never aborts aggregation. It
//! contributes zero, and the fault is recorded as a warning in the result.

pub mod sources;

pub use sources::{
    ConsequenceSource, CrewSource, EnvironmentSource, EquipmentSource, ResearchSource,
    TrainingSource,
};

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::context::{ActionContext, ContextSection};
use crate::error::{RulesError, RulesResult};
use crate::resolution::ActionType;

/// A modifier source that failed to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("modifier source '{name}' failed: {message}")]
pub struct SourceFault {
    /// Name of the failing source.
    pub name: String,
    /// What went wrong.
    pub message: String,
}

impl SourceFault {
    /// Create a fault for the named source.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// A named contributor of an integer bonus or penalty.
///
/// Sources are pure: the same action and context always give the same value.
/// A source returns `Ok(0)` when it has nothing to say about an action or
/// when the sections it reads are missing.
pub trait ModifierSource: Send + Sync + std::fmt::Debug {
    /// Unique name, used in the breakdown.
    fn name(&self) -> &str;

    /// Context sections this source reads.
    fn reads(&self) -> &'static [ContextSection];

    /// Compute the contribution for an action.
    fn evaluate(&self, action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault>;
}

type SourceFn = dyn Fn(ActionType, &ActionContext) -> Result<i32, SourceFault> + Send + Sync;

/// A modifier source backed by a closure.
pub struct FnSource {
    name: String,
    reads: &'static [ContextSection],
    func: Box<SourceFn>,
}

impl FnSource {
    /// Wrap a closure as a source that declares no sections.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(ActionType, &ActionContext) -> Result<i32, SourceFault> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            reads: &[],
            func: Box::new(func),
        }
    }

    /// A source that always contributes the same value.
    pub fn constant(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, move |_, _| Ok(value))
    }

    /// Declare the sections the closure reads.
    pub fn reading(mut self, sections: &'static [ContextSection]) -> Self {
        self.reads = sections;
        self
    }
}

impl std::fmt::Debug for FnSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource")
            .field("name", &self.name)
            .field("reads", &self.reads)
            .finish_non_exhaustive()
    }
}

impl ModifierSource for FnSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn reads(&self) -> &'static [ContextSection] {
        self.reads
    }

    fn evaluate(&self, action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault> {
        (self.func)(action, ctx)
    }
}

/// One source's share of a modifier total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierContribution {
    /// Source name.
    pub source: String,
    /// Signed contribution.
    pub value: i32,
}

/// The aggregated modifier for one action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierResult {
    /// Sum of all contributions.
    pub total: i32,
    /// Non-zero contributions in evaluation order.
    pub breakdown: Vec<ModifierContribution>,
    /// Sources that failed and were counted as zero.
    pub warnings: Vec<SourceFault>,
}

impl ModifierResult {
    /// Contribution of a named source (zero if absent).
    pub fn contribution(&self, source: &str) -> i32 {
        self.breakdown
            .iter()
            .find(|c| c.source == source)
            .map_or(0, |c| c.value)
    }
}

#[derive(Debug)]
struct RegisteredSource {
    source: Box<dyn ModifierSource>,
    priority: i32,
    order: u64,
}

/// Standard source priorities, in evaluation order.
pub mod priority {
    /// Ship equipment.
    pub const EQUIPMENT: i32 = 10;
    /// Crew roles and personalities.
    pub const CREW: i32 = 20;
    /// Character attributes and skills.
    pub const TRAINING: i32 = 30;
    /// Unlocked research.
    pub const RESEARCH: i32 = 40;
    /// Local conditions.
    pub const ENVIRONMENT: i32 = 50;
    /// Accumulated risk and fatigue.
    pub const CONSEQUENCE: i32 = 60;
}

/// An ordered set of modifier sources.
#[derive(Debug, Default)]
pub struct ModifierRegistry {
    entries: Vec<RegisteredSource>,
    next_order: u64,
}

impl ModifierRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The six standard sources with default settings.
    pub fn standard() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// The six standard sources with settings from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut registry = Self::new();
        registry.push(Box::new(EquipmentSource), priority::EQUIPMENT);
        registry.push(
            Box::new(CrewSource::with_cap(config.crew_bonus_cap)),
            priority::CREW,
        );
        registry.push(Box::new(TrainingSource), priority::TRAINING);
        registry.push(Box::new(ResearchSource), priority::RESEARCH);
        registry.push(Box::new(EnvironmentSource), priority::ENVIRONMENT);
        registry.push(Box::new(ConsequenceSource), priority::CONSEQUENCE);
        registry
    }

    /// Register a source. Names must be unique.
    pub fn register<S: ModifierSource + 'static>(
        &mut self,
        source: S,
        priority: i32,
    ) -> RulesResult<()> {
        self.register_boxed(Box::new(source), priority)
    }

    /// Register an already boxed source.
    pub fn register_boxed(
        &mut self,
        source: Box<dyn ModifierSource>,
        priority: i32,
    ) -> RulesResult<()> {
        if self.contains(source.name()) {
            return Err(RulesError::DuplicateSource(source.name().to_string()));
        }
        self.push(source, priority);
        Ok(())
    }

    fn push(&mut self, source: Box<dyn ModifierSource>, priority: i32) {
        let order = self.next_order;
        self.next_order += 1;
        let at = self
            .entries
            .partition_point(|e| (e.priority, e.order) <= (priority, order));
        self.entries.insert(
            at,
            RegisteredSource {
                source,
                priority,
                order,
            },
        );
    }

    /// Remove a source by name. Returns whether it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.source.name() != name);
        self.entries.len() != before
    }

    /// Whether a source with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.source.name() == name)
    }

    /// Source names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.source.name()).collect()
    }

    /// Sections each source reads, in evaluation order.
    pub fn declared_reads(&self) -> Vec<(&str, &'static [ContextSection])> {
        self.entries
            .iter()
            .map(|e| (e.source.name(), e.source.reads()))
            .collect()
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sources are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every source and sum the results.
    pub fn aggregate(&self, action: ActionType, ctx: &ActionContext) -> ModifierResult {
        let mut result = ModifierResult::default();

        for entry in &self.entries {
            let name = entry.source.name();
            let evaluated = catch_unwind(AssertUnwindSafe(|| entry.source.evaluate(action, ctx)));
            let fault = match evaluated {
                Ok(Ok(0)) => continue,
                Ok(Ok(value)) => match result.total.checked_add(value) {
                    Some(total) => {
                        result.total = total;
                        result.breakdown.push(ModifierContribution {
                            source: name.to_string(),
                            value,
                        });
                        continue;
                    }
                    None => SourceFault::new(
                        name,
                        format!(
                            "contribution {value} overflows the running total {}",
                            result.total
                        ),
                    ),
                },
                Ok(Err(fault)) => SourceFault::new(name, fault.message),
                Err(payload) => SourceFault::new(name, panic_message(payload.as_ref())),
            };

            tracing::warn!(
                source = name,
                action = action.label(),
                error = %fault.message,
                "modifier source failed; counting it as zero"
            );
            result.warnings.push(fault);
        }

        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn standard_registry_order() {
        let registry = ModifierRegistry::standard();
        assert_eq!(
            registry.names(),
            vec![
                "equipment",
                "crew",
                "training",
                "research",
                "environment",
                "consequence"
            ]
        );
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn empty_registry_sums_to_zero() {
        let registry = ModifierRegistry::new();
        assert!(registry.is_empty());
        let result = registry.aggregate(ActionType::Mining, &ActionContext::new());
        assert_eq!(result, ModifierResult::default());
    }

    #[test]
    fn standard_sources_tolerate_empty_context() {
        let registry = ModifierRegistry::standard();
        for action in ActionType::all() {
            let result = registry.aggregate(*action, &ActionContext::new());
            assert_eq!(result.total, 0);
            assert!(result.warnings.is_empty());
        }
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut registry = ModifierRegistry::new();
        registry.register(FnSource::constant("luck", 1), 0).unwrap();
        let err = registry.register(FnSource::constant("luck", 2), 5).unwrap_err();
        assert!(matches!(err, RulesError::DuplicateSource(ref n) if n == "luck"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn priority_then_registration_order() {
        let mut registry = ModifierRegistry::new();
        registry.register(FnSource::constant("late", 1), 50).unwrap();
        registry.register(FnSource::constant("early", 1), 10).unwrap();
        registry.register(FnSource::constant("tie_a", 1), 20).unwrap();
        registry.register(FnSource::constant("tie_b", 1), 20).unwrap();
        assert_eq!(registry.names(), vec!["early", "tie_a", "tie_b", "late"]);

        let result = registry.aggregate(ActionType::Repair, &ActionContext::new());
        let order: Vec<&str> = result.breakdown.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(order, vec!["early", "tie_a", "tie_b", "late"]);
    }

    #[test]
    fn unregister_removes_source() {
        let mut registry = ModifierRegistry::standard();
        assert!(registry.unregister("crew"));
        assert!(!registry.unregister("crew"));
        assert!(!registry.contains("crew"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn zero_contributions_omitted() {
        let mut registry = ModifierRegistry::new();
        registry.register(FnSource::constant("nothing", 0), 0).unwrap();
        registry.register(FnSource::constant("bonus", 3), 1).unwrap();
        registry.register(FnSource::constant("penalty", -1), 2).unwrap();
        let result = registry.aggregate(ActionType::Mining, &ActionContext::new());
        assert_eq!(result.total, 2);
        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.contribution("nothing"), 0);
        assert_eq!(result.contribution("bonus"), 3);
        assert_eq!(result.contribution("penalty"), -1);
    }

    #[test]
    fn failing_source_is_isolated() {
        let mut registry = ModifierRegistry::new();
        registry.register(FnSource::constant("before", 2), 0).unwrap();
        registry
            .register(
                FnSource::new("broken", |_, _| Err(SourceFault::new("broken", "sensor offline"))),
                1,
            )
            .unwrap();
        registry.register(FnSource::constant("after", 3), 2).unwrap();

        let result = registry.aggregate(ActionType::Combat, &ActionContext::new());
        assert_eq!(result.total, 5);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].name, "broken");
        assert_eq!(result.warnings[0].message, "sensor offline");
    }

    #[test]
    fn panicking_source_is_isolated() {
        let mut registry = ModifierRegistry::new();
        registry.register(FnSource::constant("steady", 4), 0).unwrap();
        registry
            .register(
                FnSource::new("volatile", |_, _| panic!("divide by zero")),
                1,
            )
            .unwrap();
        registry.register(FnSource::constant("also_steady", -1), 2).unwrap();

        let result = registry.aggregate(ActionType::Flee, &ActionContext::new());
        assert_eq!(result.total, 3);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].name, "volatile");
        assert!(result.warnings[0].message.contains("divide by zero"));
        assert_eq!(result.contribution("volatile"), 0);
    }

    #[test]
    fn overflowing_source_is_isolated() {
        let mut registry = ModifierRegistry::new();
        registry.register(FnSource::constant("a", i32::MAX), 0).unwrap();
        registry.register(FnSource::constant("b", 1), 1).unwrap();
        registry.register(FnSource::constant("c", -7), 2).unwrap();

        let result = registry.aggregate(ActionType::Mining, &ActionContext::new());
        assert_eq!(result.total, i32::MAX - 7);
        assert_eq!(result.contribution("b"), 0);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].name, "b");
        assert!(result.warnings[0].message.contains("overflows"));
    }

    #[test]
    fn extreme_contributions_at_both_limits() {
        let mut registry = ModifierRegistry::new();
        registry.register(FnSource::constant("floor", i32::MIN), 0).unwrap();
        registry.register(FnSource::constant("sink", -1), 1).unwrap();
        registry.register(FnSource::constant("ceiling", i32::MAX), 2).unwrap();

        let result = registry.aggregate(ActionType::Repair, &ActionContext::new());
        assert_eq!(result.total, -1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].name, "sink");
    }

    #[test]
    fn fault_display() {
        let fault = SourceFault::new("crew", "roster corrupted");
        assert_eq!(
            fault.to_string(),
            "modifier source 'crew' failed: roster corrupted"
        );
    }

    proptest! {
        #[test]
        fn total_is_order_independent(
            values in proptest::collection::vec((-5i32..6, -100i32..100), 0..12)
        ) {
            let mut forward = ModifierRegistry::new();
            let mut reversed = ModifierRegistry::new();
            for (i, (value, prio)) in values.iter().enumerate() {
                forward.register(FnSource::constant(format!("s{i}"), *value), *prio).unwrap();
            }
            for (i, (value, prio)) in values.iter().enumerate().rev() {
                reversed.register(FnSource::constant(format!("s{i}"), *value), -*prio).unwrap();
            }
            let ctx = ActionContext::new();
            let a = forward.aggregate(ActionType::Mining, &ctx);
            let b = reversed.aggregate(ActionType::Mining, &ctx);
            let expected: i32 = values.iter().map(|(v, _)| v).sum();
            prop_assert_eq!(a.total, expected);
            prop_assert_eq!(b.total, expected);
        }

        #[test]
        fn aggregate_never_panics_on_large_values(
            values in proptest::collection::vec(any::<i32>(), 0..8)
        ) {
            let mut registry = ModifierRegistry::new();
            for (i, value) in values.iter().enumerate() {
                registry.register(FnSource::constant(format!("s{i}"), *value), 0).unwrap();
            }
            let result = registry.aggregate(ActionType::Combat, &ActionContext::new());
            let kept: i64 = result.breakdown.iter().map(|c| i64::from(c.value)).sum();
            prop_assert_eq!(i64::from(result.total), kept);
            prop_assert_eq!(
                result.breakdown.len() + result.warnings.len(),
                values.iter().filter(|v| **v != 0).count()
            );
        }
    }
}
