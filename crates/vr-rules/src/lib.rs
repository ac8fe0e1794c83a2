//! Deterministic action-resolution rules core for Voidreach.
//!
//! Turns an action (mining, scavenging, a derelict, an away team, combat,
//! flight, repair, a mission hand-in) plus a structured context into a graded
//! tier and a set of consequences. All randomness comes from named substreams
//! of a seed string, so every resolution can be replayed exactly. The odds
//! preview computes the same tier distribution analytically.
//!
//! ```
//! use vr_rules::{ActionContext, Resolver};
//!
//! let resolver = Resolver::with_defaults().unwrap();
//! let ctx = ActionContext::new().with_difficulty("hard");
//! let outcome = resolver.resolve("mining", &ctx, "run-7").unwrap();
//! let again = resolver.resolve("mining", &ctx, "run-7").unwrap();
//! assert_eq!(outcome, again);
//!
//! let odds = resolver.preview_odds("mining", &ctx).unwrap();
//! assert!(odds.success_chance > 0.0);
//! ```

pub mod config;
pub mod context;
pub mod dice;
pub mod difficulty;
pub mod error;
pub mod modifiers;
pub mod odds;
pub mod resolution;
pub mod seed;
pub mod table;

pub use config::EngineConfig;
pub use context::{ActionContext, ContextSection};
pub use dice::{CheckRoll, DiceNotation, DicePool, Die, NotationRoll, RollResult, roll_notation};
pub use difficulty::{Difficulty, DifficultyTable};
pub use error::{RulesError, RulesResult};
pub use modifiers::{
    FnSource, ModifierContribution, ModifierRegistry, ModifierResult, ModifierSource, SourceFault,
};
pub use odds::{ChanceLabel, HitOddsReport, OddsReport, TierOdds};
pub use resolution::{
    ActionType, Consequences, ResolutionOutcome, Resolver, SecondaryRoll, Tier,
};
pub use seed::{Stream, hash_to_seed, make_stream};
pub use table::{TableRow, TableSet, WeightedEntry, WeightedTable, select_weighted};
