use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use vr_rules::ActionType;
use vr_rules::odds::{FaceCounts, TierOdds};

use super::DataPaths;

pub fn run(data: &DataPaths, action: &str, chance: f64, context: Option<&Path>) -> Result<(), String> {
    if !(0.0..=100.0).contains(&chance) {
        return Err(format!("chance must be between 0 and 100, got {chance}"));
    }
    let resolver = data.resolver()?;
    let ctx = super::load_context(context)?;
    let action: ActionType = action.parse().map_err(|e: vr_rules::RulesError| e.to_string())?;
    let best = resolver
        .find_difficulty_for_chance(action.label(), &ctx, chance)
        .map_err(|e| e.to_string())?;

    let modifier = resolver.registry().aggregate(action, &ctx).total;
    let band = resolver.partial_band(action);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Difficulty", "Target", "Success"]);
    for (difficulty, target) in resolver.difficulties().entries() {
        let odds = TierOdds::from(FaceCounts::compute(modifier, target, band));
        let mut row = vec![
            difficulty.to_string(),
            target.to_string(),
            super::percent(odds.success_chance()),
        ];
        if difficulty == best {
            row = row.into_iter().map(|cell| format!("> {cell}")).collect();
        }
        table.add_row(row);
    }

    println!(
        "  {} {}",
        format!("Closest to {chance:.0}% for {action}:").bold(),
        best.to_string().green().bold()
    );
    println!("  {}", format!("modifier {modifier:+}").dimmed());
    println!();
    println!("{table}");
    Ok(())
}
