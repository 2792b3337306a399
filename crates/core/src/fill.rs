//! Fill module - populating empty cells and placing obstacles
//!
//! Empty cells are visited column by column, bottom to top. Each one receives a
//! fresh token from the pool with a random color. Inside the play area the
//! color is advanced cyclically while it would complete a run of three; if
//! every color matches the last one is kept and the exhaustion is reported.
//!
//! Refilled tokens are staged above the grid: the n-th new token of a column
//! starts at `height + n` so a column drops in as a stack.

use tracing::warn;

use match3_types::{Color, ObstacleKind, Position, TokenId, TokenKind};

use crate::board::Board;
use crate::rng::TileRng;
use crate::token::TokenPool;

/// Color chosen for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPick {
    pub color: Color,
    /// Every color would have matched; `color` still completes a run
    pub exhausted: bool,
}

/// Random color for `pos`, avoiding immediate play-area matches when possible
pub fn pick_color(board: &Board, pos: Position, colors: u8, rng: &mut TileRng) -> ColorPick {
    let first = rng.color(colors);
    let mut color = first;
    if !board.in_play_area(pos) {
        return ColorPick {
            color,
            exhausted: false,
        };
    }
    while board.would_match_at(pos, color) {
        let next = color.next(colors);
        if next == first {
            return ColorPick {
                color,
                exhausted: true,
            };
        }
        color = next;
    }
    ColorPick {
        color,
        exhausted: false,
    }
}

/// A token placed into a previously empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub token: TokenId,
    /// Offscreen start position for the drop animation
    pub spawn_from: Position,
    pub position: Position,
}

/// Outcome of [`fill_vacancies`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// In fill order: column by column, bottom to top
    pub spawned: Vec<Spawned>,
    /// Cells where no color avoided a match
    pub exhausted_colors: usize,
    /// Cells left empty because the pool ran dry
    pub starved: usize,
}

/// Fill every empty cell of the full grid with a new token
pub fn fill_vacancies(
    board: &mut Board,
    pool: &mut dyn TokenPool,
    rng: &mut TileRng,
    colors: u8,
) -> FillReport {
    let mut report = FillReport::default();
    let height = board.height();

    for x in 0..board.width() {
        let mut stacked = 0;
        for y in 0..height {
            let position = Position::new(x, y);
            if !board.is_vacant(position) {
                continue;
            }
            let Some(mut token) = pool.acquire() else {
                report.starved += 1;
                continue;
            };
            let pick = pick_color(board, position, colors, rng);
            if pick.exhausted {
                warn!(%position, "every color completes a match; keeping {:?}", pick.color);
                report.exhausted_colors += 1;
            }
            token.set_kind(TokenKind::Normal(pick.color));
            let id = token.id();
            if board.place(position, token).is_err() {
                continue;
            }
            report.spawned.push(Spawned {
                token: id,
                spawn_from: Position::new(x, height + stacked),
                position,
            });
            stacked += 1;
        }
    }

    if report.starved > 0 {
        warn!(starved = report.starved, "token pool exhausted during fill");
    }
    report
}

/// Place obstacles down both edge columns of the play area.
///
/// Returns how many were placed; occupied cells are skipped.
pub fn place_edge_obstacles(
    board: &mut Board,
    pool: &mut dyn TokenPool,
    kind: ObstacleKind,
    health: u8,
) -> usize {
    let mut columns = vec![0];
    if board.width() > 1 {
        columns.push(board.width() - 1);
    }
    let mut placed = 0;
    for x in columns {
        for y in 0..board.play_height() {
            let pos = Position::new(x, y);
            if !board.is_vacant(pos) {
                continue;
            }
            let Some(mut token) = pool.acquire() else {
                warn!(%pos, "token pool exhausted while placing obstacles");
                return placed;
            };
            token.set_kind(TokenKind::Obstacle { kind, health });
            if board.place(pos, token).is_ok() {
                placed += 1;
            }
        }
    }
    placed
}
