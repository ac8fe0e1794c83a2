use std::fs::OpenOptions;
use std::path::Path;

use colored::Colorize;
use vr_narrative::{JsonLinesSink, TelemetrySink, TelemetrySnapshot, present};

use super::DataPaths;

pub fn run(
    data: &DataPaths,
    action: &str,
    context: Option<&Path>,
    seed: Option<String>,
    json: bool,
    telemetry: Option<&Path>,
) -> Result<(), String> {
    let resolver = data.resolver()?;
    let ctx = super::load_context(context)?;
    let seed = super::seed_or_random(seed);
    let outcome = resolver
        .resolve(action, &ctx, &seed)
        .map_err(|e| e.to_string())?;

    if let Some(path) = telemetry {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
        let mut sink = JsonLinesSink::new(file);
        sink.record(TelemetrySnapshot::from_outcome(&outcome))
            .and_then(|()| sink.flush())
            .map_err(|e| e.to_string())?;
    }

    if json {
        let out = serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let presentation = present(&outcome);
    println!(
        "  {}",
        super::color_tier(outcome.tier, &presentation.headline)
    );
    println!("  {}", format!("seed {}", outcome.seed).dimmed());
    println!();

    for section in &presentation.sections {
        println!(
            "  {}",
            super::color_severity(section.severity, &section.title).underline()
        );
        for line in section.text.lines() {
            println!("    {line}");
        }
        println!();
    }

    println!("  {}", presentation.commentary.italic());
    Ok(())
}
