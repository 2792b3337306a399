//! Error types for grid storage and board construction.
//!
//! Every error maps onto an [`ErrorClass`] so callers can decide between
//! aborting setup and recovering locally without string matching.

use match3_types::Position;
use thiserror::Error;

/// Recovery class of an error.
///
/// - **Configuration**: invalid setup parameters, fatal at initialization
/// - **Bounds**: access outside the grid, recovered locally with no mutation
/// - **State**: operation not valid in the current state, recovered as a no-op
/// - **Exhaustion**: a bounded heuristic ran out of options; logged, never fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Configuration,
    Bounds,
    State,
    Exhaustion,
}

impl ErrorClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Bounds => "bounds",
            Self::State => "state",
            Self::Exhaustion => "exhaustion",
        }
    }

    /// Only configuration errors abort; everything else is recovered in place.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration)
    }
}

/// Failure of a [`Grid`](crate::Grid) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),
    #[error("grid is not initialized")]
    NotInitialized,
    #[error("position {0} is already occupied")]
    Occupied(Position),
}

impl GridError {
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidDimensions { .. } => ErrorClass::Configuration,
            Self::OutOfBounds(_) => ErrorClass::Bounds,
            Self::NotInitialized | Self::Occupied(_) => ErrorClass::State,
        }
    }
}

/// Failure while building a board from a text layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown layout glyph {0:?}")]
    UnknownGlyph(char),
    #[error("play height {play_height} does not fit a layout of {rows} rows")]
    PlayHeight { play_height: i32, rows: usize },
    #[error("token pool exhausted while building layout")]
    PoolExhausted,
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl LayoutError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::PoolExhausted => ErrorClass::Exhaustion,
            Self::Grid(err) => err.class(),
            _ => ErrorClass::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_error_classes() {
        assert!(GridError::InvalidDimensions {
            width: 0,
            height: 3
        }
        .class()
        .is_fatal());
        assert_eq!(
            GridError::OutOfBounds(Position::new(-1, 0)).class(),
            ErrorClass::Bounds
        );
        assert_eq!(GridError::NotInitialized.class(), ErrorClass::State);
    }

    #[test]
    fn test_layout_error_wraps_grid_class() {
        let err = LayoutError::from(GridError::NotInitialized);
        assert_eq!(err.class(), ErrorClass::State);
        assert_eq!(LayoutError::UnknownGlyph('?').class().as_str(), "configuration");
    }
}
