use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use vr_rules::Tier;

use super::DataPaths;

pub fn run(data: &DataPaths, action: &str, context: Option<&Path>, json: bool) -> Result<(), String> {
    let resolver = data.resolver()?;
    let ctx = super::load_context(context)?;
    let report = resolver
        .preview_odds(action, &ctx)
        .map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        report.action.to_string().bold(),
        format!(
            "(target {}, {}, modifier {:+})",
            report.target_difficulty, report.difficulty, report.modifier_total
        )
        .dimmed()
    );
    println!();

    let faces = report.faces;
    let p = report.probabilities;
    let rows = [
        (Tier::CriticalSuccess, faces.critical_success, p.critical_success),
        (Tier::Success, faces.success, p.success),
        (Tier::Partial, faces.partial, p.partial),
        (Tier::Failure, faces.failure, p.failure),
        (Tier::CriticalFailure, faces.critical_failure, p.critical_failure),
    ];

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Tier", "Faces", "Chance"]);
    for (tier, count, chance) in rows {
        table.add_row(vec![
            tier.to_string(),
            count.to_string(),
            super::percent(chance),
        ]);
    }
    println!("{table}");
    println!();

    if !report.modifier_breakdown.is_empty() {
        println!("  {}", "Modifiers".bold().underline());
        for c in &report.modifier_breakdown {
            println!("    {:+} {}", c.value, c.source);
        }
        println!();
    }
    for warning in &report.warnings {
        println!("  {} {warning}", "warning:".yellow());
    }

    println!(
        "  {} {}",
        super::color_chance(report.label),
        report.summary.dimmed()
    );
    Ok(())
}
