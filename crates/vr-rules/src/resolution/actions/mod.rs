//! Secondary rolls and consequences for each action shape.
//!
//! Every handler runs after the primary check has been graded and only draws
//! from its own `"<action>:<roll>"` substreams.

mod away_team;
mod combat;
mod derelict;
mod flee;
mod mining;
mod mission;
mod repair;
mod scavenging;

pub(crate) use combat::{damage_after_armor, weapon_notation};

use super::ActionType;
use super::run::ActionRun;
use crate::error::RulesResult;

/// Run the handler for `run.action`.
pub(crate) fn apply(run: &mut ActionRun<'_>) -> RulesResult<()> {
    match run.action {
        ActionType::Mining => mining::apply(run),
        ActionType::Scavenging => scavenging::apply(run),
        ActionType::Derelict => derelict::apply(run),
        ActionType::AwayTeam => away_team::apply(run),
        ActionType::Combat => combat::apply(run),
        ActionType::Flee => flee::apply(run),
        ActionType::Repair => repair::apply(run),
        ActionType::Mission => mission::apply(run),
    }
}
