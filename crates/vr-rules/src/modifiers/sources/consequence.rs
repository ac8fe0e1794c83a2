//! Wear from the expedition so far.

use crate::context::{ActionContext, ContextSection};
use crate::modifiers::{ModifierSource, SourceFault};
use crate::resolution::ActionType;

/// Penalties from accumulated risk, fatigue, and elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsequenceSource;

impl ConsequenceSource {
    /// Registered name.
    pub const NAME: &'static str = "consequence";
}

/// -1 per 10 accumulated risk, at most -5.
pub fn risk_penalty(accumulated_risk: u32) -> i32 {
    -((accumulated_risk / 10).min(5) as i32)
}

/// -1 per 3 fatigue, at most -3.
pub fn fatigue_penalty(fatigue: u32) -> i32 {
    -((fatigue / 3).min(3) as i32)
}

/// -1 past 12 hours, -2 past 24.
pub fn time_penalty(elapsed_hours: f64) -> i32 {
    if elapsed_hours > 24.0 {
        -2
    } else if elapsed_hours > 12.0 {
        -1
    } else {
        0
    }
}

impl ModifierSource for ConsequenceSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reads(&self) -> &'static [ContextSection] {
        &[ContextSection::Risk]
    }

    fn evaluate(&self, _action: ActionType, ctx: &ActionContext) -> Result<i32, SourceFault> {
        let Some(risk) = ctx.risk else {
            return Ok(0);
        };
        if risk.elapsed_hours.is_nan() {
            return Err(SourceFault::new(Self::NAME, "elapsed hours is NaN"));
        }
        Ok(risk_penalty(risk.accumulated_risk)
            + fatigue_penalty(risk.fatigue)
            + time_penalty(risk.elapsed_hours))
    }
}
