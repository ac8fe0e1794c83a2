//! Dice types, single rolls, pools, and notation.
//!
//! All rolls draw from a seeded [`Stream`], never from ambient entropy.
//! A die roll is `floor(stream() * sides) + 1`.

pub mod notation;
pub mod pool;
pub mod roll;

pub use notation::{DiceNotation, NotationRoll, roll_notation};
pub use pool::DicePool;
pub use roll::{DieResult, RollResult};

use serde::{Deserialize, Serialize};

use crate::seed::Stream;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with the given number of sides.
    pub fn from_sides(sides: u32) -> Self {
        match sides {
            4 => Self::D4,
            6 => Self::D6,
            8 => Self::D8,
            10 => Self::D10,
            12 => Self::D12,
            20 => Self::D20,
            100 => Self::D100,
            n => Self::Custom(n),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A single check die with its critical flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRoll {
    /// The value rolled.
    pub value: u32,
    /// Number of sides on the die.
    pub sides: u32,
    /// The natural maximum was rolled.
    pub is_crit_success: bool,
    /// The natural minimum was rolled.
    pub is_crit_fail: bool,
}

impl CheckRoll {
    /// Build a check roll from a known value (replays and fixed-roll tests).
    pub fn from_value(value: u32, sides: u32) -> Self {
        let critical = check_critical(value, sides);
        Self {
            value,
            sides,
            is_crit_success: critical == Some(Critical::Success),
            is_crit_fail: critical == Some(Critical::Failure),
        }
    }
}

/// A natural extreme on a die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Critical {
    /// Natural maximum.
    Success,
    /// Natural minimum.
    Failure,
}

/// Classify a natural roll as critical for a die with `sides` faces.
pub fn check_critical(value: u32, sides: u32) -> Option<Critical> {
    if value == 1 {
        Some(Critical::Failure)
    } else if value == sides {
        Some(Critical::Success)
    } else {
        None
    }
}

/// Roll a single die.
pub fn roll(die: Die, stream: &mut Stream) -> u32 {
    let sides = die.sides().max(1);
    let face = ((stream.next_f64() * f64::from(sides)).floor() as u32).saturating_add(1);
    face.min(sides)
}

/// Roll a d20 check die.
pub fn roll_d20(stream: &mut Stream) -> CheckRoll {
    CheckRoll::from_value(roll(Die::D20, stream), 20)
}

/// Roll a d6.
pub fn roll_d6(stream: &mut Stream) -> u32 {
    roll(Die::D6, stream)
}

/// Roll a d10.
pub fn roll_d10(stream: &mut Stream) -> u32 {
    roll(Die::D10, stream)
}

/// Roll a d12.
pub fn roll_d12(stream: &mut Stream) -> u32 {
    roll(Die::D12, stream)
}

/// Roll a percentile die (1-100).
pub fn roll_d100(stream: &mut Stream) -> u32 {
    roll(Die::D100, stream)
}

/// Roll `count` dice of the same type.
pub fn roll_multiple(count: u32, die: Die, stream: &mut Stream) -> RollResult {
    DicePool::new().add(die, count).roll(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::make_stream;
    use proptest::prelude::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D6.sides(), 6);
        assert_eq!(Die::D8.sides(), 8);
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D12.sides(), 12);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::D100.sides(), 100);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn from_sides_prefers_named_dice() {
        assert_eq!(Die::from_sides(20), Die::D20);
        assert_eq!(Die::from_sides(100), Die::D100);
        assert_eq!(Die::from_sides(30), Die::Custom(30));
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }

    #[test]
    fn golden_d20_rolls() {
        let mut s = make_stream("voidreach", "mining");
        let rolls: Vec<u32> = (0..10).map(|_| roll_d20(&mut s).value).collect();
        assert_eq!(rolls, vec![12, 17, 13, 11, 2, 14, 8, 18, 17, 13]);
    }

    #[test]
    fn critical_detection() {
        assert_eq!(check_critical(1, 20), Some(Critical::Failure));
        assert_eq!(check_critical(20, 20), Some(Critical::Success));
        assert_eq!(check_critical(6, 6), Some(Critical::Success));
        assert_eq!(check_critical(10, 20), None);

        let nat20 = CheckRoll::from_value(20, 20);
        assert!(nat20.is_crit_success && !nat20.is_crit_fail);
        let nat1 = CheckRoll::from_value(1, 20);
        assert!(nat1.is_crit_fail && !nat1.is_crit_success);
    }

    #[test]
    fn fixed_helpers_stay_in_range() {
        let mut s = make_stream("helpers", "dice");
        for _ in 0..500 {
            assert!((1..=6).contains(&roll_d6(&mut s)));
            assert!((1..=10).contains(&roll_d10(&mut s)));
            assert!((1..=12).contains(&roll_d12(&mut s)));
            assert!((1..=100).contains(&roll_d100(&mut s)));
        }
    }

    #[test]
    fn roll_multiple_totals() {
        let mut s = make_stream("multi", "3d6");
        let r = roll_multiple(3, Die::D6, &mut s);
        assert_eq!(r.count(), 3);
        assert_eq!(r.total(), r.dice.iter().map(|d| u64::from(d.value)).sum::<u64>());
    }

    #[test]
    fn every_d20_face_appears() {
        let mut s = make_stream("faces", "d20");
        let mut seen = [0u32; 20];
        for _ in 0..20_000 {
            seen[(roll_d20(&mut s).value - 1) as usize] += 1;
        }
        for count in seen {
            assert!((800..1200).contains(&count), "face count {count}");
        }
    }

    proptest! {
        #[test]
        fn roll_within_sides(sides in 2u32..200, seed in "[a-z]{1,12}") {
            let mut s = make_stream(&seed, "prop");
            for _ in 0..20 {
                let v = roll(Die::from_sides(sides), &mut s);
                prop_assert!((1..=sides).contains(&v));
            }
        }
    }
}
