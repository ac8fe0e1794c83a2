use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use vr_rules::TableSet;
use vr_rules::table::STATUS_DIE_FACES;

pub fn run(file: Option<&Path>) -> Result<(), String> {
    let (tables, source) = match file {
        Some(path) => (
            TableSet::load(path).map_err(|e| e.to_string())?,
            path.display().to_string(),
        ),
        None => (
            TableSet::embedded().map_err(|e| e.to_string())?,
            "built-in".to_string(),
        ),
    };

    println!("  {} {}", "Tables".bold(), format!("({source}, valid)").dimmed());
    println!();

    for weighted in tables.tables() {
        println!(
            "  {} {}",
            weighted.name.bold().underline(),
            format!("total weight {}", weighted.total_weight()).dimmed()
        );
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Entry", "Chance"]);
        for (label, probability) in weighted.probabilities() {
            table.add_row(vec![label.to_string(), super::percent(probability * 100.0)]);
        }
        println!("{table}");
        println!();
    }

    println!("  {}", "combat_status".bold().underline());
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["d6", "Entry", "Effect"]);
    for face in 1..=STATUS_DIE_FACES as u32 {
        if let Some(row) = tables.combat_status(face) {
            table.add_row(vec![
                face.to_string(),
                row.label.clone(),
                row.status.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}
