//! Moves module - move availability scanning
//!
//! A move is viable when sliding an idle normal token one cell would line it
//! up with at least two idle tokens of its color on either axis through the
//! destination. This covers the straight case (`x . x x`) as well as both
//! diagonal cases (`x` next to the destination from the side).
//!
//! The destination must hold an idle token of another kind that is allowed
//! to move, since the move is performed as a swap.

use match3_types::{Axis, Color, Direction, Position};

use crate::board::Board;

/// Candidate player move and the tokens it would match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotentialMove {
    pub from: Position,
    pub to: Position,
    /// The moving token first, then the run members at the destination
    pub tokens: Vec<Position>,
}

impl PotentialMove {
    pub fn length(&self) -> usize {
        self.tokens.len()
    }
}

/// Every viable move, longest first (ties keep scan order)
pub fn scan_moves(board: &Board) -> Vec<PotentialMove> {
    let mut moves = Vec::new();
    for from in board.play_positions() {
        let Some(color) = board.idle_color_at(from) else {
            continue;
        };
        for direction in Direction::ALL {
            if let Some(found) = move_in_direction(board, from, direction, color) {
                moves.push(found);
            }
        }
    }
    moves.sort_by(|a, b| b.length().cmp(&a.length()));
    moves
}

pub fn has_any_move(board: &Board) -> bool {
    board.play_positions().any(|from| {
        board.idle_color_at(from).is_some_and(|color| {
            Direction::ALL
                .into_iter()
                .any(|d| move_in_direction(board, from, d, color).is_some())
        })
    })
}

/// Any run of three already sitting in the play area
pub fn has_immediate_match(board: &Board) -> bool {
    board.play_positions().any(|pos| board.has_match_at(pos))
}

fn move_in_direction(
    board: &Board,
    from: Position,
    direction: Direction,
    color: Color,
) -> Option<PotentialMove> {
    let to = from.step(direction);
    if !board.in_play_area(to) {
        return None;
    }
    let partner = board.token(to)?;
    if !partner.is_idle() || partner.kind().is_immovable() || partner.color() == Some(color) {
        return None;
    }

    let mut tokens = vec![from];
    for axis in Axis::BOTH {
        let run = run_through(board, to, axis, color, from);
        if run.len() >= 2 {
            tokens.extend(run);
        }
    }
    if tokens.len() < 3 {
        return None;
    }
    Some(PotentialMove { from, to, tokens })
}

/// Idle `color` tokens next to `at` along `axis`, skipping over nothing and
/// stopping at `vacated` (the moving token's old cell)
fn run_through(
    board: &Board,
    at: Position,
    axis: Axis,
    color: Color,
    vacated: Position,
) -> Vec<Position> {
    let mut run = Vec::new();
    for direction in axis.directions() {
        let mut cursor = at.step(direction);
        while cursor != vacated && board.idle_color_at(cursor) == Some(color) {
            run.push(cursor);
            cursor = cursor.step(direction);
        }
    }
    run
}
