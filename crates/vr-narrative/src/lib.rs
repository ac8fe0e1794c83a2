//! Presentation and telemetry for Voidreach resolutions.
//!
//! The rules core produces a [`ResolutionOutcome`](vr_rules::ResolutionOutcome)
//! and stops there. This crate turns outcomes into player-facing text with
//! severity tags and an animation hint, and into compact telemetry snapshots
//! for whatever sink the host provides.

/// Canned commentary lines.
pub mod commentary;
/// Error types for the narrative layer.
pub mod error;
/// Outcome presentation.
pub mod present;
/// Telemetry snapshots and sinks.
pub mod telemetry;

pub use commentary::commentary;
pub use error::{NarrativeError, NarrativeResult};
pub use present::{AnimationHint, Presentation, Section, Severity, present};
pub use telemetry::{JsonLinesSink, MemorySink, TelemetrySink, TelemetrySnapshot};
