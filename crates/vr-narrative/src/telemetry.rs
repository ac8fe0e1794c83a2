//! Compact snapshots of resolutions and the sinks that receive them.
//!
//! The rules core knows nothing about storage. Hosts build a
//! [`TelemetrySnapshot`] from each outcome and hand it to a [`TelemetrySink`].

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use vr_rules::resolution::LootItem;
use vr_rules::{ActionType, ResolutionOutcome, Tier};

use crate::error::NarrativeResult;

/// What one resolution looked like, for analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Action resolved.
    pub action: ActionType,
    /// Graded result.
    pub tier: Tier,
    /// Natural roll plus modifiers.
    pub total_roll: i32,
    /// Items gained.
    pub loot: Vec<LootItem>,
    /// Total hull damage taken.
    pub damage: u32,
}

impl TelemetrySnapshot {
    /// Build a snapshot from an outcome.
    pub fn from_outcome(outcome: &ResolutionOutcome) -> Self {
        Self {
            action: outcome.action,
            tier: outcome.tier,
            total_roll: outcome.total_roll,
            loot: outcome.consequences.loot.clone(),
            damage: outcome.consequences.total_damage(),
        }
    }
}

impl From<&ResolutionOutcome> for TelemetrySnapshot {
    fn from(outcome: &ResolutionOutcome) -> Self {
        Self::from_outcome(outcome)
    }
}

/// Receives telemetry snapshots.
pub trait TelemetrySink {
    /// Record one snapshot.
    fn record(&mut self, snapshot: TelemetrySnapshot) -> NarrativeResult<()>;

    /// Flush buffered snapshots, if the sink buffers.
    fn flush(&mut self) -> NarrativeResult<()> {
        Ok(())
    }
}

/// Keeps snapshots in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    snapshots: Vec<TelemetrySnapshot>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn snapshots(&self) -> &[TelemetrySnapshot] {
        &self.snapshots
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots per tier.
    pub fn tier_counts(&self) -> BTreeMap<Tier, usize> {
        let mut counts = BTreeMap::new();
        for snapshot in &self.snapshots {
            *counts.entry(snapshot.tier).or_insert(0) += 1;
        }
        counts
    }

    /// Total damage across all snapshots.
    pub fn total_damage(&self) -> u64 {
        self.snapshots.iter().map(|s| u64::from(s.damage)).sum()
    }

    /// Drop everything recorded.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl TelemetrySink for MemorySink {
    fn record(&mut self, snapshot: TelemetrySnapshot) -> NarrativeResult<()> {
        self.snapshots.push(snapshot);
        Ok(())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn record(&mut self, snapshot: TelemetrySnapshot) -> NarrativeResult<()> {
        serde_json::to_writer(&mut self.writer, &snapshot)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        tracing::trace!(action = snapshot.action.label(), tier = snapshot.tier.label(), "telemetry");
        Ok(())
    }

    fn flush(&mut self) -> NarrativeResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vr_rules::{ActionContext, Resolver};

    fn outcomes() -> Vec<ResolutionOutcome> {
        let r = Resolver::with_defaults().unwrap();
        let ctx = ActionContext::new();
        (0..20)
            .map(|i| r.resolve("mining", &ctx, &format!("t{i}")).unwrap())
            .collect()
    }

    #[test]
    fn snapshot_copies_outcome_fields() {
        let r = Resolver::with_defaults().unwrap();
        let outcome = r
            .resolve_with_roll(ActionType::Scavenging, &ActionContext::new(), "trap", 1)
            .unwrap();
        let snap = TelemetrySnapshot::from_outcome(&outcome);
        assert_eq!(snap.action, ActionType::Scavenging);
        assert_eq!(snap.tier, Tier::CriticalFailure);
        assert_eq!(snap.total_roll, outcome.total_roll);
        assert_eq!(snap.damage, outcome.consequences.total_damage());
        assert!(snap.damage > 0);
    }

    #[test]
    fn memory_sink_tallies() {
        let mut sink = MemorySink::new();
        assert!(sink.is_empty());
        let outcomes = outcomes();
        for outcome in &outcomes {
            sink.record(outcome.into()).unwrap();
        }
        assert_eq!(sink.len(), 20);
        assert_eq!(sink.tier_counts().values().sum::<usize>(), 20);
        let expected: u64 = outcomes
            .iter()
            .map(|o| u64::from(o.consequences.total_damage()))
            .sum();
        assert_eq!(sink.total_damage(), expected);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn json_lines_sink_writes_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        for outcome in outcomes().iter().take(3) {
            sink.record(outcome.into()).unwrap();
        }
        sink.flush().unwrap();
        assert_eq!(sink.written(), 3);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let snap: TelemetrySnapshot = serde_json::from_str(line).unwrap();
            assert_eq!(snap.action, ActionType::Mining);
        }
    }
}
