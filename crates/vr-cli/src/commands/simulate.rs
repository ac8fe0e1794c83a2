use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use vr_narrative::{MemorySink, TelemetrySink, TelemetrySnapshot};
use vr_rules::Tier;

use super::DataPaths;

pub fn run(
    data: &DataPaths,
    action: &str,
    iterations: u32,
    context: Option<&Path>,
    seed: Option<String>,
) -> Result<(), String> {
    if iterations == 0 {
        return Err("iterations must be at least 1".into());
    }
    let resolver = data.resolver()?;
    let ctx = super::load_context(context)?;
    let report = resolver
        .preview_odds(action, &ctx)
        .map_err(|e| e.to_string())?;
    let seed = super::seed_or_random(seed);

    let mut sink = MemorySink::new();
    let mut credits = 0u64;
    for i in 0..iterations {
        let outcome = resolver
            .resolve_action(report.action, &ctx, &format!("{seed}-{i}"))
            .map_err(|e| e.to_string())?;
        credits += u64::from(outcome.consequences.credits);
        sink.record(TelemetrySnapshot::from_outcome(&outcome))
            .map_err(|e| e.to_string())?;
    }
    tracing::debug!(iterations, action = report.action.label(), "simulation finished");

    let counts = sink.tier_counts();
    let n = f64::from(iterations);
    let p = report.probabilities;
    let expected = [
        (Tier::CriticalSuccess, p.critical_success),
        (Tier::Success, p.success),
        (Tier::Partial, p.partial),
        (Tier::Failure, p.failure),
        (Tier::CriticalFailure, p.critical_failure),
    ];

    println!(
        "  {} {}",
        format!("Simulated {} x{iterations}", report.action).bold(),
        format!("(seed {seed}, target {})", report.target_difficulty).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Tier", "Count", "Observed", "Preview", "Delta"]);
    let mut worst_delta = 0.0f64;
    for (tier, preview) in expected {
        let count = counts.get(&tier).copied().unwrap_or(0);
        let observed = count as f64 * 100.0 / n;
        let delta = observed - preview;
        worst_delta = worst_delta.max(delta.abs());
        table.add_row(vec![
            tier.to_string(),
            count.to_string(),
            super::percent(observed),
            super::percent(preview),
            format!("{delta:+.1}"),
        ]);
    }
    println!("{table}");
    println!();

    let loot: u64 = sink
        .snapshots()
        .iter()
        .flat_map(|s| &s.loot)
        .map(|l| u64::from(l.quantity))
        .sum();
    println!("  {} {:.2}", "Avg hull damage:".dimmed(), sink.total_damage() as f64 / n);
    println!("  {} {:.2}", "Avg loot units: ".dimmed(), loot as f64 / n);
    println!("  {} {:.1}", "Avg credits:    ".dimmed(), credits as f64 / n);
    println!("  {} {worst_delta:.1} points", "Largest deviation:".dimmed());
    Ok(())
}
