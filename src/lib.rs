//! Tile-matching grid simulation (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `match3::{types, core, engine}` and hosts the headless
//! [`autoplay`] driver used by the `autoplay` binary.

pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_types as types;

pub mod autoplay;
