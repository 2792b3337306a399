//! Headless autoplay: populate a board and keep playing the top hint.

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::BoardSnapshot;
use crate::engine::{SimConfig, SimStats, Simulation};

/// Ticks a single move may take before autoplay gives up on it
const SETTLE_LIMIT_TICKS: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayArgs {
    /// Overrides the configured seed
    pub seed: Option<u64>,
    pub moves: u32,
    pub json: bool,
}

impl Default for AutoplayArgs {
    fn default() -> Self {
        Self {
            seed: None,
            moves: 20,
            json: false,
        }
    }
}

pub fn parse_autoplay_args(args: &[String]) -> Result<AutoplayArgs> {
    let mut parsed = AutoplayArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("autoplay: missing value for --seed"))?;
                parsed.seed = Some(
                    v.parse::<u64>()
                        .map_err(|_| anyhow!("autoplay: invalid --seed value: {}", v))?,
                );
            }
            "--moves" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("autoplay: missing value for --moves"))?;
                parsed.moves = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("autoplay: invalid --moves value: {}", v))?;
            }
            "--json" => parsed.json = true,
            other => {
                return Err(anyhow!("autoplay: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(parsed)
}

/// What an autoplay run leaves behind
#[derive(Debug, Clone, Serialize)]
pub struct AutoplayReport {
    pub seed: u64,
    pub moves_played: u32,
    pub stats: SimStats,
    pub board: BoardSnapshot,
}

pub fn run_autoplay(mut config: SimConfig, args: &AutoplayArgs) -> Result<AutoplayReport> {
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;
    let mut sim = Simulation::new(config)?;
    sim.populate()?;

    let mut moves_played = 0;
    while moves_played < args.moves {
        let Some(best) = sim.best_move() else {
            warn!(moves_played, "no move available; stopping");
            break;
        };
        sim.handle_swap(best.from, best.to)?;
        if !sim.settle(SETTLE_LIMIT_TICKS) {
            return Err(anyhow!(
                "autoplay: move {} did not settle within {} ticks",
                moves_played + 1,
                SETTLE_LIMIT_TICKS
            ));
        }
        moves_played += 1;
    }

    let stats = sim.stats();
    info!(moves_played, resolved = stats.resolved, "autoplay finished");
    Ok(AutoplayReport {
        seed,
        moves_played,
        stats,
        board: sim.snapshot(),
    })
}
