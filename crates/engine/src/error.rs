//! Engine error types.
//!
//! All of them map onto [`ErrorClass`]: configuration errors abort setup,
//! rejected input is recovered as a no-op.

use match3_core::{ErrorClass, GridError, LayoutError};
use match3_types::Position;
use thiserror::Error;

/// Invalid [`SimConfig`](crate::SimConfig)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid dimensions: width {width}, play height {play_height}, spawn rows {spawn_rows}")]
    InvalidDimensions {
        width: i32,
        play_height: i32,
        spawn_rows: i32,
    },
    #[error("at least one token color is required")]
    NoColors,
    #[error("shuffle attempt limit must be positive")]
    NoShuffleAttempts,
    #[error("bomb radius must not be negative, got {0}")]
    NegativeRadius(i32),
}

impl ConfigError {
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Configuration
    }
}

/// Rejected swap, touch or debug request. The board is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("a transaction is already in progress")]
    Busy,
    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),
    #[error("position {0} is outside the play area")]
    OutsidePlayArea(Position),
    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: Position, to: Position },
    #[error("no token at {0}")]
    Empty(Position),
    #[error("token at {0} cannot be moved")]
    Blocked(Position),
    #[error("token at {0} is still animating")]
    TokenBusy(Position),
    #[error("token at {0} is not a powerup")]
    NotPowerup(Position),
    #[error("token at {0} is not a normal token")]
    NotNormal(Position),
}

impl InputError {
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::OutOfBounds(_) | Self::OutsidePlayArea(_) => ErrorClass::Bounds,
            _ => ErrorClass::State,
        }
    }
}

/// Simulation setup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl SimError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Config(err) => err.class(),
            Self::Grid(err) => err.class(),
            Self::Layout(err) => err.class(),
        }
    }
}
