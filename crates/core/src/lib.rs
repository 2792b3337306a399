//! Core grid logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the tile-matching grid and nothing else. It
//! has **no dependencies** on timing, animation, or I/O, making it:
//!
//! - **Deterministic**: the same seed produces the same board, refills and shuffles
//! - **Synchronous**: every operation completes before returning
//! - **Testable**: boards are built from short text layouts
//!
//! Orchestration (swap transactions, cascades over time, hints) lives in the
//! engine crate, which drives these functions.
//!
//! # Module Structure
//!
//! - [`grid`]: generic 2-D spatial store with bounds-checked access
//! - [`token`]: grid occupants and the pool contract
//! - [`board`]: grid of tokens split into play area and spawn buffer
//! - [`matching`]: match tree builder and classification
//! - [`gravity`]: column compaction and diagonal settling
//! - [`fill`]: refill with match avoidance, obstacle placement
//! - [`effects`]: powerup target selection
//! - [`moves`]: move availability scanner
//! - [`shuffle`]: deadlock recovery
//! - [`rng`]: seeded random source
//! - [`snapshot`]: serializable board copies
//!
//! # Example
//!
//! ```
//! use match3_core::{find_match, Board, MatchClass, Orientation, RecyclingPool};
//! use match3_core::types::Position;
//!
//! let mut pool = RecyclingPool::new();
//! let board = Board::from_layout(&["bcb", "aaa"], 2, &mut pool).unwrap();
//!
//! let tree = find_match(&board, Position::new(1, 0)).unwrap();
//! assert_eq!(tree.class(), Some(MatchClass::Three));
//! assert_eq!(tree.orientation(), Orientation::Horizontal);
//! ```

pub mod board;
pub mod effects;
pub mod error;
pub mod fill;
pub mod gravity;
pub mod grid;
pub mod matching;
pub mod moves;
pub mod rng;
pub mod shuffle;
pub mod snapshot;
pub mod token;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ObstacleHit};
pub use effects::{select_targets, EffectTargets};
pub use error::{ErrorClass, GridError, LayoutError};
pub use fill::{fill_vacancies, pick_color, place_edge_obstacles, ColorPick, FillReport, Spawned};
pub use gravity::{collapse, compact, settle_diagonal, Relocation};
pub use grid::Grid;
pub use matching::{find_match, scan_matches, MatchClass, MatchTree, MatchedToken, Orientation};
pub use moves::{has_any_move, has_immediate_match, scan_moves, PotentialMove};
pub use rng::TileRng;
pub use shuffle::{shuffle_board, ShuffleReport};
pub use snapshot::{BoardSnapshot, TokenSnapshot};
pub use token::{RecyclingPool, Token, TokenPool};
