use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use damage_sim::{report, Scenario, Simulation};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

/// Step a combined scalar damage scenario and print the damage history
#[derive(Debug, Parser)]
#[command(name = "damage_sim", version)]
struct Cli {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Override the number of steps from the scenario
    #[arg(long)]
    steps: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: Format,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let scenario = Scenario::load(&cli.scenario)
        .with_context(|| format!("loading scenario {}", cli.scenario.display()))?;
    let steps = cli.steps.unwrap_or(scenario.simulation.steps);

    let mut simulation = Simulation::new(scenario).context("setting up materials")?;
    info!(steps, "running scenario");
    let records = simulation.run(steps);

    match cli.format {
        Format::Table => print!("{}", report::render_table(&records)),
        Format::Json => println!("{}", report::render_json(&records)?),
    }
    Ok(())
}
