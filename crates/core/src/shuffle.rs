//! Shuffle module - deadlock recovery
//!
//! When no move is left, every non-obstacle token in the play area is lifted
//! off the board and dealt back into the same cells in a random order. A deal
//! is accepted when it has no immediate run of three and at least one move.
//! After `limit` rejected deals the last one is kept and a warning is logged.

use tracing::{debug, warn};

use match3_types::{Position, TokenId};

use crate::board::Board;
use crate::moves::{has_any_move, has_immediate_match};
use crate::rng::TileRng;

/// Outcome of [`shuffle_board`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleReport {
    pub attempts: u32,
    /// The committed layout has no immediate match and at least one move
    pub valid: bool,
    /// Final cell of every dealt token
    pub placements: Vec<(TokenId, Position)>,
}

/// Reshuffle the play area in place
pub fn shuffle_board(board: &mut Board, rng: &mut TileRng, limit: u32) -> ShuffleReport {
    let cells: Vec<Position> = board
        .play_positions()
        .filter(|&pos| board.token(pos).is_some_and(|t| !t.kind().is_obstacle()))
        .collect();
    let mut tokens: Vec<_> = cells
        .iter()
        .filter_map(|&pos| board.take(pos).ok().flatten())
        .collect();

    let mut report = ShuffleReport::default();
    if tokens.is_empty() {
        return report;
    }

    let limit = limit.max(1);
    loop {
        report.attempts += 1;
        rng.shuffle(&mut tokens);
        for (&cell, token) in cells.iter().zip(tokens.drain(..)) {
            if let Err(err) = board.place(cell, token) {
                warn!(%cell, %err, "failed to deal token during shuffle");
            }
        }
        if !has_immediate_match(board) && has_any_move(board) {
            report.valid = true;
            break;
        }
        if report.attempts >= limit {
            warn!(
                attempts = report.attempts,
                "no valid shuffle found; keeping the last permutation"
            );
            break;
        }
        tokens.extend(cells.iter().filter_map(|&pos| board.take(pos).ok().flatten()));
    }

    report.placements = cells
        .iter()
        .filter_map(|&pos| board.token(pos).map(|t| (t.id(), pos)))
        .collect();
    debug!(attempts = report.attempts, valid = report.valid, "shuffle committed");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::scan_moves;
    use crate::token::RecyclingPool;

    #[test]
    fn test_shuffle_finds_valid_layout() {
        let rows = ["abca", "cabc", "bcab", "abca"];
        let mut b = Board::from_layout(&rows, 4, &mut RecyclingPool::new()).unwrap();
        let mut rng = TileRng::new(8);
        let before = b.tokens().count();
        let report = shuffle_board(&mut b, &mut rng, 10_000);
        assert!(report.valid);
        assert!(!has_immediate_match(&b));
        assert!(!scan_moves(&b).is_empty());
        assert_eq!(b.tokens().count(), before);
        assert_eq!(report.placements.len(), before);
        for (id, pos) in &report.placements {
            assert_eq!(b.token(*pos).map(|t| t.id()), Some(*id));
        }
    }

    #[test]
    fn test_shuffle_keeps_obstacles_in_place() {
        let rows = ["#abc", "#bca", "#cab"];
        let mut b = Board::from_layout(&rows, 3, &mut RecyclingPool::new()).unwrap();
        shuffle_board(&mut b, &mut TileRng::new(2), 50);
        for y in 0..3 {
            assert!(b
                .token(Position::new(0, y))
                .is_some_and(|t| t.kind().is_immovable()));
        }
        assert_eq!(b.tokens().count(), 12);
    }

    #[test]
    fn test_shuffle_exhaustion_keeps_last_deal() {
        // Two colors on a 2x2 can never yield a move.
        let rows = ["ab", "ba"];
        let mut b = Board::from_layout(&rows, 2, &mut RecyclingPool::new()).unwrap();
        let report = shuffle_board(&mut b, &mut TileRng::new(4), 25);
        assert!(!report.valid);
        assert_eq!(report.attempts, 25);
        assert_eq!(b.tokens().count(), 4);
    }

    #[test]
    fn test_shuffle_ignores_spawn_buffer() {
        let rows = ["dd", "ab"];
        let mut b = Board::from_layout(&rows, 1, &mut RecyclingPool::new()).unwrap();
        shuffle_board(&mut b, &mut TileRng::new(4), 3);
        assert_eq!(b.layout()[0], "dd");
    }
}
