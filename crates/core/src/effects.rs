//! Effects module - powerup target selection
//!
//! Turns an activated powerup into the set of cells it hits. Only idle,
//! occupied play-area cells are targeted; the powerup itself has already been
//! taken off the board when targets are computed.
//!
//! | Powerup | Targets |
//! |---------|---------|
//! | RocketHorizontal | its row |
//! | RocketVertical | its column |
//! | Bomb | square of `radius` around it, clipped to the play area |
//! | DiscoBall | every token of one color present on the board |

use match3_types::{Color, Position, PowerupKind};

use crate::board::Board;
use crate::rng::TileRng;

/// Cells hit by one activation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectTargets {
    pub positions: Vec<Position>,
    /// Color picked by a disco ball
    pub color: Option<Color>,
}

fn is_target(board: &Board, pos: Position) -> bool {
    board.in_play_area(pos) && board.token(pos).is_some_and(|t| t.is_idle())
}

pub fn row_targets(board: &Board, y: i32) -> Vec<Position> {
    (0..board.width())
        .map(|x| Position::new(x, y))
        .filter(|&pos| is_target(board, pos))
        .collect()
}

pub fn column_targets(board: &Board, x: i32) -> Vec<Position> {
    (0..board.play_height())
        .map(|y| Position::new(x, y))
        .filter(|&pos| is_target(board, pos))
        .collect()
}

pub fn area_targets(board: &Board, center: Position, radius: i32) -> Vec<Position> {
    let x0 = (center.x - radius).max(0);
    let x1 = (center.x + radius).min(board.width() - 1);
    let y0 = (center.y - radius).max(0);
    let y1 = (center.y + radius).min(board.play_height() - 1);
    (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| Position::new(x, y)))
        .filter(|&pos| is_target(board, pos))
        .collect()
}

pub fn color_targets(board: &Board, color: Color) -> Vec<Position> {
    board
        .play_positions()
        .filter(|&pos| board.idle_color_at(pos) == Some(color))
        .collect()
}

/// Distinct colors of idle play-area tokens, ascending
pub fn present_colors(board: &Board) -> Vec<Color> {
    let mut colors: Vec<Color> = board
        .play_positions()
        .filter_map(|pos| board.idle_color_at(pos))
        .collect();
    colors.sort();
    colors.dedup();
    colors
}

/// Targets for a powerup of `kind` that stood at `origin`
pub fn select_targets(
    board: &Board,
    kind: PowerupKind,
    origin: Position,
    radius: i32,
    rng: &mut TileRng,
) -> EffectTargets {
    match kind {
        PowerupKind::RocketHorizontal => EffectTargets {
            positions: row_targets(board, origin.y),
            color: None,
        },
        PowerupKind::RocketVertical => EffectTargets {
            positions: column_targets(board, origin.x),
            color: None,
        },
        PowerupKind::Bomb => EffectTargets {
            positions: area_targets(board, origin, radius),
            color: None,
        },
        PowerupKind::DiscoBall => {
            let colors = present_colors(board);
            match rng.pick(&colors).copied() {
                Some(color) => EffectTargets {
                    positions: color_targets(board, color),
                    color: Some(color),
                },
                None => EffectTargets::default(),
            }
        }
    }
}
