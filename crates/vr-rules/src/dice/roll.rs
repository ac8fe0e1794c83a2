//! Rolled dice and their sums.

use serde::{Deserialize, Serialize};

use super::Die;

/// One die as it landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// Die type.
    pub die: Die,
    /// Face shown, `1..=die.sides()`.
    pub value: u32,
}

/// Every die of a pool, in roll order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual dice.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Sum of the faces. Widened so that no pool can overflow it.
    pub fn total(&self) -> u64 {
        self.dice.iter().map(|d| u64::from(d.value)).sum()
    }

    /// Sum of the faces as a signed total, pinned at `i32::MAX`.
    pub fn signed_total(&self) -> i32 {
        i32::try_from(self.total()).unwrap_or(i32::MAX)
    }

    /// Faces in roll order.
    pub fn values(&self) -> Vec<u32> {
        self.dice.iter().map(|d| d.value).collect()
    }

    /// Number of dice.
    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landed(die: Die, values: &[u32]) -> RollResult {
        RollResult {
            dice: values.iter().map(|&value| DieResult { die, value }).collect(),
        }
    }

    #[test]
    fn sums_faces_in_order() {
        let r = landed(Die::D8, &[7, 2, 5]);
        assert_eq!(r.total(), 14);
        assert_eq!(r.signed_total(), 14);
        assert_eq!(r.values(), vec![7, 2, 5]);
        assert_eq!(r.count(), 3);
    }

    #[test]
    fn empty_pool_sums_to_zero() {
        let r = RollResult::default();
        assert_eq!(r.total(), 0);
        assert_eq!(r.signed_total(), 0);
    }

    #[test]
    fn huge_faces_do_not_wrap() {
        let r = landed(Die::Custom(u32::MAX), &[u32::MAX, u32::MAX]);
        assert_eq!(r.total(), 2 * u64::from(u32::MAX));
        assert_eq!(r.signed_total(), i32::MAX);
    }
}
