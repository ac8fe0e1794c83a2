//! Per-call state shared by the action handlers.

use std::collections::BTreeMap;

use super::{ActionType, Consequences, SecondaryRoll, Tier};
use crate::config::EngineConfig;
use crate::context::ActionContext;
use crate::dice::{self, DiceNotation, Die};
use crate::error::RulesResult;
use crate::seed::{Stream, make_stream};
use crate::table::{TableRow, TableSet, WeightedTable};

/// A row drawn from a table, with its quantity already rolled.
#[derive(Debug, Clone)]
pub(crate) struct TableDraw {
    pub row: TableRow,
    pub quantity: u32,
}

/// Everything an action handler reads and writes during one resolution.
pub(crate) struct ActionRun<'a> {
    pub action: ActionType,
    pub seed: &'a str,
    pub ctx: &'a ActionContext,
    pub tables: &'a TableSet,
    pub config: &'a EngineConfig,
    pub tier: Tier,
    pub margin: i32,
    pub secondary: BTreeMap<String, SecondaryRoll>,
    pub consequences: Consequences,
}

impl ActionRun<'_> {
    /// The dedicated substream `"<action>:<roll>"`.
    pub fn stream(&self, roll: &str) -> Stream {
        make_stream(self.seed, &format!("{}:{roll}", self.action.label()))
    }

    fn record(&mut self, roll: &str, result: SecondaryRoll) {
        tracing::trace!(action = self.action.label(), roll, ?result, "secondary roll");
        self.secondary.insert(roll.to_string(), result);
    }

    /// Draw from a named table in the table set.
    pub fn table_roll(&mut self, roll: &str, table: &str) -> RulesResult<Option<TableDraw>> {
        let table = self.tables.get(table)?;
        Ok(self.table_roll_from(roll, table))
    }

    /// Draw from a specific table.
    pub fn table_roll_from(&mut self, roll: &str, table: &WeightedTable) -> Option<TableDraw> {
        let mut stream = self.stream(roll);
        let row = table.select(&mut stream)?.clone();
        let quantity = match row.quantity {
            Some((min, max)) => {
                let drawn = stream.range_inclusive(i64::from(min), i64::from(max));
                u32::try_from(drawn).unwrap_or(min)
            }
            None => 0,
        };
        self.record(
            roll,
            SecondaryRoll::Table {
                table: table.name.clone(),
                label: row.label.clone(),
                quantity: row.quantity.map(|_| quantity),
            },
        );
        Some(TableDraw { row, quantity })
    }

    /// Roll d100 against `chance` percent. A forced event still consumes its
    /// roll so the stream stays aligned for replays.
    pub fn percentile(&mut self, roll: &str, chance: u32, forced: bool) -> bool {
        let mut stream = self.stream(roll);
        let value = dice::roll_d100(&mut stream);
        let chance = chance.min(100);
        let triggered = forced || value <= chance;
        self.record(
            roll,
            SecondaryRoll::Percentile {
                value,
                chance,
                triggered,
                forced,
            },
        );
        triggered
    }

    /// Roll a single die.
    pub fn die(&mut self, roll: &str, die: Die) -> u32 {
        let mut stream = self.stream(roll);
        let value = dice::roll(die, &mut stream);
        self.record(
            roll,
            SecondaryRoll::Die {
                sides: die.sides(),
                value,
            },
        );
        value
    }

    /// Roll a damage expression; never negative.
    pub fn damage(&mut self, roll: &str, notation: &DiceNotation) -> u32 {
        let mut stream = self.stream(roll);
        let rolled = notation.roll(&mut stream);
        self.record(
            roll,
            SecondaryRoll::Damage {
                notation: notation.to_string(),
                rolls: rolled.rolls.values(),
                total: rolled.total,
            },
        );
        u32::try_from(rolled.total).unwrap_or(0)
    }

    /// Grant whatever a drawn row carries: item, credits, story flag.
    pub fn grant(&mut self, draw: &TableDraw, quantity: u32, upgrade: bool) {
        let row = &draw.row;
        if let Some(item) = &row.item {
            let quality = row.quality.unwrap_or(crate::table::Quality::Common);
            let quality = if upgrade { quality.upgraded() } else { quality };
            self.consequences.add_loot(item.clone(), quality, quantity);
        }
        self.consequences.credits += row.credits;
        if let Some(flag) = &row.flag {
            self.consequences.unlock(flag.clone());
        }
    }

    /// Apply a hazard row's damage, risk and status, with damage scaled.
    pub fn suffer(&mut self, source: &str, row: &TableRow, damage: u32, status_target: &str) {
        self.consequences.take_damage(source, damage);
        self.consequences.risk_delta += row.risk;
        if let Some(status) = &row.status {
            self.consequences.apply_status(status_target, status.clone());
        }
    }
}

/// Quantity scaled by tier: half (rounded up) on partial, double on critical
/// success, none on failure.
pub(crate) fn scale_quantity(quantity: u32, tier: Tier) -> u32 {
    match tier {
        Tier::CriticalSuccess => quantity.saturating_mul(2),
        Tier::Success => quantity,
        Tier::Partial => quantity.div_ceil(2),
        Tier::Failure | Tier::CriticalFailure => 0,
    }
}

/// Hazard damage scaled by tier: none on success, half on partial, full on
/// failure, double on critical failure.
pub(crate) fn scale_hazard(damage: u32, tier: Tier) -> u32 {
    match tier {
        Tier::CriticalSuccess | Tier::Success => 0,
        Tier::Partial => damage / 2,
        Tier::Failure => damage,
        Tier::CriticalFailure => damage.saturating_mul(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_scaling() {
        assert_eq!(scale_quantity(5, Tier::CriticalSuccess), 10);
        assert_eq!(scale_quantity(5, Tier::Success), 5);
        assert_eq!(scale_quantity(5, Tier::Partial), 3);
        assert_eq!(scale_quantity(1, Tier::Partial), 1);
        assert_eq!(scale_quantity(5, Tier::Failure), 0);
    }

    #[test]
    fn hazard_scaling() {
        assert_eq!(scale_hazard(6, Tier::Success), 0);
        assert_eq!(scale_hazard(6, Tier::Partial), 3);
        assert_eq!(scale_hazard(6, Tier::Failure), 6);
        assert_eq!(scale_hazard(6, Tier::CriticalFailure), 12);
    }
}
