//! Engine - cooperative, tick-driven orchestration of the grid rules
//!
//! Everything here runs on one thread. Transactions (a swap, a powerup touch,
//! the initial population) are `futures` tasks on a
//! [`LocalPool`](futures::executor::LocalPool) owned by the [`Simulation`].
//! They suspend on animation completions, logical-clock timers and group
//! barriers, and resume when the host calls [`Simulation::tick`].
//!
//! # Transaction flow
//!
//! ```text
//! handle_swap ─► exchange ─► match? ──no──► revert ─────────────┐
//!                              │yes                             │
//!                              ▼                                ▼
//!                 resolve group ─► join ─► cascade ─► availability check ─► hint
//! ```
//!
//! Only one transaction runs at a time. Requests that arrive while one is in
//! flight are rejected with [`InputError::Busy`].
//!
//! # Example
//!
//! ```
//! use match3_engine::{SimConfig, Simulation};
//!
//! let mut sim = Simulation::new(SimConfig::default().with_seed(42)).unwrap();
//! sim.populate().unwrap();
//!
//! let best = sim.best_move().expect("a fresh board has a move");
//! sim.handle_swap(best.from, best.to).unwrap();
//! assert!(sim.settle(10_000));
//! assert_eq!(sim.stats().swaps, 1);
//! ```

mod availability;
pub mod barrier;
mod cascade;
pub mod clock;
pub mod config;
mod context;
pub mod error;
mod motion;
mod powerup;
pub mod presenter;
mod resolve;
pub mod simulation;
mod stats;
mod swap;

pub use barrier::{GroupBarrier, GroupId, GroupTicket};
pub use clock::{Clock, Sleep};
pub use config::{ObstacleLayout, SimConfig};
pub use context::Phase;
pub use error::{ConfigError, InputError, SimError};
pub use presenter::{
    Completion, EffectParams, EventLog, InstantPresenter, PresentationEvent, Presenter,
    RecordingPresenter, TimedPresenter,
};
pub use simulation::{Simulation, SimulationBuilder};
pub use stats::SimStats;
