pub mod balance;
pub mod hit;
pub mod odds;
pub mod resolve;
pub mod roll;
pub mod simulate;
pub mod tables;

use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use rand::Rng;
use vr_narrative::Severity;
use vr_rules::{ActionContext, ChanceLabel, EngineConfig, Resolver, TableSet, Tier};

/// Data files named by the global flags.
pub struct DataPaths {
    pub config: Option<PathBuf>,
    pub tables: Option<PathBuf>,
}

impl DataPaths {
    /// Build a resolver from the configured data files, or the defaults.
    pub fn resolver(&self) -> Result<Resolver, String> {
        let config = match &self.config {
            Some(path) => EngineConfig::load(path).map_err(|e| e.to_string())?,
            None => EngineConfig::default(),
        };
        let resolver = Resolver::with_config(config).map_err(|e| e.to_string())?;
        match &self.tables {
            Some(path) => {
                let tables = TableSet::load(path).map_err(|e| e.to_string())?;
                Ok(resolver.with_tables(tables))
            }
            None => Ok(resolver),
        }
    }
}

/// Load a context file, or start from an empty context.
fn load_context(path: Option<&Path>) -> Result<ActionContext, String> {
    match path {
        Some(path) => ActionContext::load(path).map_err(|e| e.to_string()),
        None => Ok(ActionContext::new()),
    }
}

/// Use the given seed, or generate one and say so on stderr so the run can
/// be replayed.
fn seed_or_random(seed: Option<String>) -> String {
    seed.unwrap_or_else(|| {
        let generated = format!("{:016x}", rand::rng().random::<u64>());
        eprintln!("  {} {generated}", "seed:".dimmed());
        generated
    })
}

fn color_tier(tier: Tier, text: &str) -> ColoredString {
    match tier {
        Tier::CriticalSuccess => text.bright_green().bold(),
        Tier::Success => text.green(),
        Tier::Partial => text.yellow(),
        Tier::Failure => text.red(),
        Tier::CriticalFailure => text.bright_red().bold(),
    }
}

fn color_severity(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Triumph => text.bright_green().bold(),
        Severity::Good => text.green(),
        Severity::Neutral => text.normal(),
        Severity::Warning => text.yellow(),
        Severity::Danger => text.red().bold(),
    }
}

fn color_chance(label: ChanceLabel) -> ColoredString {
    let text = label.to_string();
    match label {
        ChanceLabel::NearCertain | ChanceLabel::Likely => text.green(),
        ChanceLabel::Favorable | ChanceLabel::EvenOdds => text.yellow(),
        ChanceLabel::Risky | ChanceLabel::Unlikely => text.red(),
        ChanceLabel::Desperate => text.bright_red().bold(),
    }
}

fn percent(value: f64) -> String {
    format!("{value:.1}%")
}
