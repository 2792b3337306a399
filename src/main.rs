//! Headless autoplay runner (default binary).
//!
//! Populates a board from `MATCH3_*` settings, plays the top hint repeatedly
//! and prints the final layout and stats (or a JSON report with `--json`).

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use match3::autoplay::{parse_autoplay_args, run_autoplay};
use match3::engine::SimConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_autoplay_args(&args)?;
    let config = SimConfig::from_env();
    config.validate()?;

    let report = run_autoplay(config, &args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("seed {} - {} moves played", report.seed, report.moves_played);
    for row in &report.board.layout {
        println!("{row}");
    }
    let stats = &report.stats;
    println!(
        "swaps {}  resolved {}  obstacles {}  powerups {}/{}  cascades {}  shuffles {}",
        stats.swaps,
        stats.resolved,
        stats.obstacles_destroyed,
        stats.powerups_created,
        stats.powerups_activated,
        stats.cascade_passes,
        stats.shuffles,
    );
    Ok(())
}
