//! Board module - the grid of tokens
//!
//! A [`Board`] wraps a [`Grid<Token>`] and splits it into two bands:
//!
//! ```text
//!   y = height-1 ┌─────────────┐
//!                │ spawn buffer│  offscreen staging for refilled tokens
//!   y = play     ├─────────────┤
//!                │  play area  │  matches are evaluated here only
//!   y = 0        └─────────────┘
//! ```
//!
//! All token movement goes through the board so that each token's cached
//! position always equals the cell that stores it.
//!
//! # Text layouts
//!
//! [`Board::from_layout`] and [`Board::layout`] convert to and from rows of
//! glyphs, top row first:
//!
//! | Glyph | Occupant |
//! |-------|----------|
//! | `.` | empty |
//! | `a`..`i` | normal token of color 0..8 |
//! | `H` `V` | horizontal / vertical rocket |
//! | `D` `B` | disco ball / bomb |
//! | `#` `%` | static obstacle, health 1 / 2+ |
//! | `j` `J` | movable obstacle, health 1 / 2+ |

use arrayvec::ArrayVec;

use match3_types::{Axis, Color, ObstacleKind, Position, PowerupKind, TokenKind, TokenState};

use crate::error::{GridError, LayoutError};
use crate::grid::Grid;
use crate::token::{Token, TokenPool};

/// Result of damaging an obstacle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObstacleHit {
    /// Health reached zero; the obstacle was taken off the board
    Destroyed(Token),
    /// Still standing with this much health
    Damaged { remaining: u8 },
}

/// Grid of tokens with a play area and a spawn buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    grid: Grid<Token>,
    play_height: i32,
}

impl Board {
    /// Empty board `width` wide with `play_height + spawn_rows` rows
    pub fn new(width: i32, play_height: i32, spawn_rows: i32) -> Result<Self, GridError> {
        if play_height <= 0 || spawn_rows < 0 {
            return Err(GridError::InvalidDimensions {
                width,
                height: play_height,
            });
        }
        let grid = Grid::new(width, play_height + spawn_rows)?;
        Ok(Self { grid, play_height })
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    /// Full height, play area plus spawn buffer
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn play_height(&self) -> i32 {
        self.play_height
    }

    pub fn grid(&self) -> &Grid<Token> {
        &self.grid
    }

    pub fn is_within_bounds(&self, pos: Position) -> bool {
        self.grid.is_within_bounds(pos)
    }

    pub fn in_play_area(&self, pos: Position) -> bool {
        self.grid.is_within_bounds(pos) && pos.y < self.play_height
    }

    pub fn get(&self, pos: Position) -> Result<Option<&Token>, GridError> {
        self.grid.get(pos)
    }

    /// Token at `pos`; out of bounds reads as empty
    pub fn token(&self, pos: Position) -> Option<&Token> {
        self.grid.peek(pos)
    }

    pub fn token_mut(&mut self, pos: Position) -> Option<&mut Token> {
        self.grid.get_mut(pos).ok().flatten()
    }

    /// In bounds and unoccupied
    pub fn is_vacant(&self, pos: Position) -> bool {
        self.grid.is_empty(pos).unwrap_or(false)
    }

    /// Store `token` at `pos`, returning the displaced occupant if any
    pub fn place(&mut self, pos: Position, mut token: Token) -> Result<Option<Token>, GridError> {
        if !self.grid.is_within_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        token.set_position(pos);
        self.grid.set(pos, token)
    }

    pub fn take(&mut self, pos: Position) -> Result<Option<Token>, GridError> {
        self.grid.remove(pos)
    }

    /// Move the token at `from` into the empty cell `to`.
    ///
    /// Moving from an empty cell is a no-op.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<(), GridError> {
        if !self.grid.is_empty(to)? {
            return Err(GridError::Occupied(to));
        }
        if let Some(mut token) = self.grid.remove(from)? {
            token.set_position(to);
            self.grid.set(to, token)?;
        }
        Ok(())
    }

    /// Exchange two cells and refresh both cached positions
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), GridError> {
        self.grid.swap(a, b)?;
        for pos in [a, b] {
            if let Some(token) = self.grid.get_mut(pos)? {
                token.set_position(pos);
            }
        }
        Ok(())
    }

    pub fn set_state(&mut self, pos: Position, state: TokenState) {
        if let Some(token) = self.token_mut(pos) {
            token.set_state(state);
        }
    }

    /// Color of an idle normal token inside the play area
    pub fn idle_color_at(&self, pos: Position) -> Option<Color> {
        if !self.in_play_area(pos) {
            return None;
        }
        self.token(pos)
            .filter(|token| token.is_idle())
            .and_then(Token::color)
    }

    /// Consecutive play-area tokens of `color` next to `pos` along `axis`,
    /// not counting `pos` itself. Animation state is ignored.
    pub fn run_beside(&self, pos: Position, axis: Axis, color: Color) -> usize {
        axis.directions()
            .into_iter()
            .map(|direction| {
                let mut count = 0;
                let mut cursor = pos.step(direction);
                while self.in_play_area(cursor)
                    && self.token(cursor).and_then(Token::color) == Some(color)
                {
                    count += 1;
                    cursor = cursor.step(direction);
                }
                count
            })
            .sum()
    }

    /// Would a token of `color` at `pos` complete a run of three?
    pub fn would_match_at(&self, pos: Position, color: Color) -> bool {
        self.in_play_area(pos)
            && Axis::BOTH
                .into_iter()
                .any(|axis| self.run_beside(pos, axis, color) >= 2)
    }

    /// Does the token at `pos` already sit in a run of three?
    pub fn has_match_at(&self, pos: Position) -> bool {
        self.token(pos)
            .and_then(Token::color)
            .is_some_and(|color| self.would_match_at(pos, color))
    }

    /// Orthogonal neighbors of `pos` holding an obstacle
    pub fn adjacent_obstacles(&self, pos: Position) -> ArrayVec<Position, 4> {
        pos.neighbors()
            .into_iter()
            .filter(|&n| self.token(n).is_some_and(|t| t.kind().is_obstacle()))
            .collect()
    }

    /// Apply one point of damage to the obstacle at `pos`.
    ///
    /// Returns `None` if the cell holds no obstacle.
    pub fn damage_obstacle(&mut self, pos: Position) -> Option<ObstacleHit> {
        let remaining = self.token_mut(pos)?.damage()?;
        if remaining > 0 {
            return Some(ObstacleHit::Damaged { remaining });
        }
        self.take(pos).ok().flatten().map(ObstacleHit::Destroyed)
    }

    /// Occupied cells, bottom row first
    pub fn tokens(&self) -> impl Iterator<Item = (Position, &Token)> {
        self.grid.occupied()
    }

    /// Every play-area coordinate, bottom row first
    pub fn play_positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width();
        (0..self.play_height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Remove every token, returning them for release
    pub fn drain(&mut self) -> Vec<Token> {
        self.grid.drain().unwrap_or_default()
    }

    /// Build a board from glyph rows, top row first.
    ///
    /// The bottom `play_height` rows form the play area; the rest is spawn buffer.
    pub fn from_layout(
        rows: &[&str],
        play_height: i32,
        pool: &mut dyn TokenPool,
    ) -> Result<Self, LayoutError> {
        let first = rows.first().ok_or(LayoutError::Empty)?;
        let width = first.chars().count();
        if play_height <= 0 || play_height as usize > rows.len() {
            return Err(LayoutError::PlayHeight {
                play_height,
                rows: rows.len(),
            });
        }
        let spawn_rows = rows.len() as i32 - play_height;
        let mut board = Board::new(width as i32, play_height, spawn_rows)?;
        let top = rows.len() as i32 - 1;

        for (row_idx, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row: row_idx,
                    expected: width,
                    found,
                });
            }
            let y = top - row_idx as i32;
            for (x, glyph) in row.chars().enumerate() {
                let Some(kind) = kind_from_glyph(glyph)? else {
                    continue;
                };
                let mut token = pool.acquire().ok_or(LayoutError::PoolExhausted)?;
                token.set_kind(kind);
                board.place(Position::new(x as i32, y), token)?;
            }
        }
        Ok(board)
    }

    /// Glyph rows, top row first
    pub fn layout(&self) -> Vec<String> {
        (0..self.height())
            .rev()
            .map(|y| {
                (0..self.width())
                    .map(|x| {
                        self.token(Position::new(x, y))
                            .map_or('.', |token| glyph_for(token.kind()))
                    })
                    .collect()
            })
            .collect()
    }
}

fn kind_from_glyph(glyph: char) -> Result<Option<TokenKind>, LayoutError> {
    let kind = match glyph {
        '.' => return Ok(None),
        'a'..='i' => TokenKind::Normal(Color(glyph as u8 - b'a')),
        'H' => TokenKind::Powerup(PowerupKind::RocketHorizontal),
        'V' => TokenKind::Powerup(PowerupKind::RocketVertical),
        'D' => TokenKind::Powerup(PowerupKind::DiscoBall),
        'B' => TokenKind::Powerup(PowerupKind::Bomb),
        '#' => obstacle(ObstacleKind::Static, 1),
        '%' => obstacle(ObstacleKind::Static, 2),
        'j' => obstacle(ObstacleKind::Movable, 1),
        'J' => obstacle(ObstacleKind::Movable, 2),
        other => return Err(LayoutError::UnknownGlyph(other)),
    };
    Ok(Some(kind))
}

fn obstacle(kind: ObstacleKind, health: u8) -> TokenKind {
    TokenKind::Obstacle { kind, health }
}

fn glyph_for(kind: TokenKind) -> char {
    match kind {
        TokenKind::Normal(Color(c)) if c < 9 => (b'a' + c) as char,
        TokenKind::Normal(_) => '?',
        TokenKind::Powerup(PowerupKind::RocketHorizontal) => 'H',
        TokenKind::Powerup(PowerupKind::RocketVertical) => 'V',
        TokenKind::Powerup(PowerupKind::DiscoBall) => 'D',
        TokenKind::Powerup(PowerupKind::Bomb) => 'B',
        TokenKind::Obstacle {
            kind: ObstacleKind::Static,
            health,
        } => {
            if health <= 1 {
                '#'
            } else {
                '%'
            }
        }
        TokenKind::Obstacle {
            kind: ObstacleKind::Movable,
            health,
        } => {
            if health <= 1 {
                'j'
            } else {
                'J'
            }
        }
    }
}
