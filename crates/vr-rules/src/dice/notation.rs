//! Dice notation such as `2d8+3`.
//!
//! Grammar: `[count]d<sides>[(+|-)modifier]`, case-insensitive, whitespace
//! ignored. A missing count means one die. Malformed input is always an
//! error, never a silent zero.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DicePool, Die, RollResult};
use crate::error::{RulesError, RulesResult};
use crate::seed::Stream;

/// Largest accepted dice count.
pub const MAX_DICE: u32 = 100;

/// Largest accepted number of sides on a parsed die.
pub const MAX_SIDES: u32 = 1000;

/// A parsed dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceNotation {
    /// Number of dice rolled.
    pub count: u32,
    /// Die type.
    pub die: Die,
    /// Flat modifier added to the sum.
    pub modifier: i32,
}

impl DiceNotation {
    /// Build an expression from its parts.
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            die: Die::from_sides(sides),
            modifier,
        }
    }

    /// Roll this expression on the given stream.
    pub fn roll(&self, stream: &mut Stream) -> NotationRoll {
        let rolls = DicePool::new().add(self.die, self.count).roll(stream);
        let raw_total = rolls.signed_total();
        NotationRoll {
            notation: *self,
            rolls,
            raw_total,
            modifier: self.modifier,
            total: raw_total.saturating_add(self.modifier),
        }
    }

    /// Smallest possible total.
    pub fn min_total(&self) -> i32 {
        clamp_i32(u64::from(self.count)).saturating_add(self.modifier)
    }

    /// Largest possible total.
    pub fn max_total(&self) -> i32 {
        let dice = u64::from(self.count) * u64::from(self.die.sides());
        clamp_i32(dice).saturating_add(self.modifier)
    }

    /// Mean total.
    pub fn average(&self) -> f64 {
        f64::from(self.count) * (f64::from(self.die.sides()) + 1.0) / 2.0
            + f64::from(self.modifier)
    }
}

fn clamp_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// A run of ASCII digits as a number. Signs are not digits.
fn unsigned(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for DiceNotation {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RulesError::InvalidNotation {
            notation: s.to_string(),
            reason: reason.to_string(),
        };

        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.is_empty() {
            return Err(invalid("empty expression"));
        }

        let (count_part, rest) = compact
            .split_once('d')
            .ok_or_else(|| invalid("missing 'd' separator"))?;

        let count = if count_part.is_empty() {
            1
        } else {
            unsigned(count_part).ok_or_else(|| invalid("dice count is not a number"))?
        };
        if count == 0 || count > MAX_DICE {
            return Err(invalid(&format!("dice count must be 1-{MAX_DICE}")));
        }

        let split_at = rest.find(['+', '-']);
        let (sides_part, modifier_part) = match split_at {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };

        let sides = unsigned(sides_part).ok_or_else(|| invalid("die sides is not a number"))?;
        if sides < 2 {
            return Err(invalid("a die needs at least 2 sides"));
        }
        if sides > MAX_SIDES {
            return Err(invalid(&format!("a die has at most {MAX_SIDES} sides")));
        }

        let modifier = if modifier_part.is_empty() {
            0
        } else {
            let (sign, digits) = modifier_part.split_at(1);
            let magnitude = unsigned(digits)
                .and_then(|m| i32::try_from(m).ok())
                .ok_or_else(|| invalid("modifier is not a number"))?;
            if sign == "-" { -magnitude } else { magnitude }
        };

        Ok(Self {
            count,
            die: Die::from_sides(sides),
            modifier,
        })
    }
}

impl std::fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.die)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// The result of rolling a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotationRoll {
    /// The expression that was rolled.
    pub notation: DiceNotation,
    /// Individual dice.
    pub rolls: RollResult,
    /// Sum of the dice before the modifier.
    pub raw_total: i32,
    /// Flat modifier.
    pub modifier: i32,
    /// `raw_total + modifier`.
    pub total: i32,
}

/// Parse and roll a dice expression.
pub fn roll_notation(notation: &str, stream: &mut Stream) -> RulesResult<NotationRoll> {
    let parsed: DiceNotation = notation.parse()?;
    Ok(parsed.roll(stream))
}
