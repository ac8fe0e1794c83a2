use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::DataPaths;

pub fn run(data: &DataPaths, context: Option<&Path>, json: bool) -> Result<(), String> {
    let resolver = data.resolver()?;
    let ctx = super::load_context(context)?;
    let report = resolver
        .preview_combat_hit(&ctx)
        .map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        format!("Attack on {}", report.target).bold(),
        format!(
            "(defense {}, armor {}, weapon {}, modifier {:+})",
            report.defense, report.armor, report.weapon, report.modifier_total
        )
        .dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Measure", "Value"]);
    table.add_row(vec!["Hit chance".to_string(), super::percent(report.hit_chance)]);
    table.add_row(vec![
        "Critical hit".to_string(),
        super::percent(report.critical_chance),
    ]);
    table.add_row(vec![
        "Fumble".to_string(),
        super::percent(report.probabilities.critical_failure),
    ]);
    table.add_row(vec![
        "Damage per hit".to_string(),
        format!("{:.2}", report.damage_per_hit),
    ]);
    table.add_row(vec![
        "Expected damage".to_string(),
        format!("{:.2}", report.expected_damage),
    ]);
    println!("{table}");
    println!();
    println!("  {}", super::color_chance(report.label));
    Ok(())
}
