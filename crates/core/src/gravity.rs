//! Gravity module - column compaction and diagonal settling
//!
//! Collapse runs in two steps:
//!
//! 1. [`compact`]: per column, a write/read two-pointer scan from the bottom of
//!    the full grid. Movable tokens drop into the lowest free slot; a static
//!    obstacle never moves and resets the write pointer to the slot above it.
//! 2. [`settle_diagonal`]: one token inside the play area slides to an empty
//!    cell diagonally below it (below-right first) when the cell directly
//!    below is occupied. Callers compact again after every slide.
//!
//! [`collapse`] chains both steps until nothing moves.

use match3_types::{Position, TokenId};

use crate::board::Board;

/// One token moved by gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub token: TokenId,
    pub from: Position,
    pub to: Position,
}

/// Drop every movable token as far as it can fall in its column
pub fn compact(board: &mut Board) -> Vec<Relocation> {
    let mut moved = Vec::new();
    for x in 0..board.width() {
        let mut write = 0;
        for read in 0..board.height() {
            let from = Position::new(x, read);
            let Some(token) = board.token(from) else {
                continue;
            };
            if token.kind().is_immovable() {
                write = read + 1;
                continue;
            }
            let id = token.id();
            if read != write {
                let to = Position::new(x, write);
                if board.relocate(from, to).is_ok() {
                    moved.push(Relocation { token: id, from, to });
                }
            }
            write += 1;
        }
    }
    moved
}

/// Slide the first eligible token diagonally down, if any
pub fn settle_diagonal(board: &mut Board) -> Option<Relocation> {
    let width = board.width();
    for x in 1..width - 1 {
        for y in 1..board.play_height() {
            let from = Position::new(x, y);
            let Some(token) = board.token(from) else {
                continue;
            };
            if token.kind().is_immovable() || board.token(Position::new(x, y - 1)).is_none() {
                continue;
            }
            let id = token.id();
            for dx in [1, -1] {
                let to = Position::new(x + dx, y - 1);
                if board.is_vacant(to) && board.relocate(from, to).is_ok() {
                    return Some(Relocation { token: id, from, to });
                }
            }
        }
    }
    None
}

/// Compact, then settle diagonally and recompact until the board is stable
pub fn collapse(board: &mut Board) -> Vec<Relocation> {
    let mut moved = compact(board);
    while let Some(slide) = settle_diagonal(board) {
        moved.push(slide);
        moved.extend(compact(board));
    }
    moved
}

/// No movable token hangs over an empty cell
pub fn is_settled(board: &Board) -> bool {
    board.tokens().all(|(pos, token)| {
        token.kind().is_immovable()
            || pos.y == 0
            || !board.is_vacant(Position::new(pos.x, pos.y - 1))
    })
}
