use colored::Colorize;
use vr_rules::{make_stream, roll_notation};

pub fn run(notation: &str, seed: Option<String>, label: &str) -> Result<(), String> {
    let seed = super::seed_or_random(seed);
    let mut stream = make_stream(&seed, label);
    let rolled = roll_notation(notation, &mut stream).map_err(|e| e.to_string())?;

    let dice: Vec<String> = rolled.rolls.values().iter().map(u32::to_string).collect();
    let modifier = match rolled.modifier {
        0 => String::new(),
        m => format!(" {m:+}"),
    };
    println!(
        "  {} [{}]{modifier} = {}",
        rolled.notation.to_string().bold(),
        dice.join(", "),
        rolled.total.to_string().bold()
    );
    println!(
        "  {}",
        format!(
            "range {}-{}, average {:.1}",
            rolled.notation.min_total(),
            rolled.notation.max_total(),
            rolled.notation.average()
        )
        .dimmed()
    );
    Ok(())
}
