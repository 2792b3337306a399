//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the simulation.
//! All types are plain data with no behavior beyond small helpers, making them
//! usable in any context (grid logic, orchestration, presentation glue).
//!
//! # Coordinates
//!
//! Positions are integer `(x, y)` pairs. `x` grows to the right, `y` grows
//! upward: row `0` is the bottom of the grid. The lower rows form the *play
//! area* where matches are evaluated; the rows above it form the *spawn
//! buffer* where refilled tokens are staged before they fall in.
//!
//! # Default Dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 9 | Columns |
//! | `DEFAULT_PLAY_HEIGHT` | 9 | Rows where matching happens |
//! | `DEFAULT_SPAWN_ROWS` | 9 | Offscreen staging rows above the play area |
//! | `DEFAULT_COLOR_COUNT` | 6 | Distinct normal token colors |
//!
//! # Timing Constants
//!
//! The simulation is driven by a fixed tick. Durations are expressed in ticks:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `MOVE_TIMEOUT_TICKS` | 188 | Watchdog before a falling token is snapped into place (~3s) |
//! | `HINT_DELAY_TICKS` | 313 | Idle time before the best move is indicated (~5s) |
//! | `SPAWN_STAGGER_TICKS` | 1 | Delay between consecutive refilled tokens starting to fall |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Color, Direction, Position, PowerupKind, TokenKind};
//!
//! let origin = Position::new(4, 4);
//! assert_eq!(origin.step(Direction::Up), Position::new(4, 5));
//! assert_eq!(origin.step(Direction::Left), Position::new(3, 4));
//!
//! let red = TokenKind::Normal(Color(0));
//! assert_eq!(red.color(), Some(Color(0)));
//!
//! let bomb = TokenKind::Powerup(PowerupKind::Bomb);
//! assert!(bomb.is_powerup());
//! assert_eq!(bomb.color(), None);
//! ```

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Grid width in columns
pub const DEFAULT_WIDTH: i32 = 9;

/// Rows of the play area (bottom of the grid)
pub const DEFAULT_PLAY_HEIGHT: i32 = 9;

/// Rows of the spawn buffer stacked on top of the play area
pub const DEFAULT_SPAWN_ROWS: i32 = 9;

/// Number of distinct normal token colors
pub const DEFAULT_COLOR_COUNT: u8 = 6;

/// Half-size of the square cleared by a bomb (radius 2 => 5x5)
pub const DEFAULT_BOMB_RADIUS: i32 = 2;

/// Starting health of obstacles placed during setup
pub const DEFAULT_OBSTACLE_HEALTH: u8 = 2;

/// Upper bound on shuffle permutations tried before accepting the last one
pub const SHUFFLE_ATTEMPT_LIMIT: u32 = 10_000;

/// Most tokens a single match resolves in one pass (longer runs are rescanned)
pub const MAX_RESOLVED_PER_MATCH: usize = 5;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Watchdog for physics-driven token movement (3000ms)
pub const MOVE_TIMEOUT_TICKS: u32 = 3000_u32.div_ceil(TICK_MS);

/// Delay before the hint indicator is shown (5000ms)
pub const HINT_DELAY_TICKS: u32 = 5000_u32.div_ceil(TICK_MS);

/// Delay between consecutive refilled tokens starting their fall
pub const SPAWN_STAGGER_TICKS: u32 = 1;

/// Integer grid coordinate. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One cell over in the given direction
    pub fn step(self, direction: Direction) -> Self {
        self + direction.delta()
    }

    /// The four orthogonal neighbors (up, down, left, right)
    pub fn neighbors(self) -> [Position; 4] {
        Direction::ALL.map(|d| self.step(d))
    }

    /// True if `other` shares an edge with this position
    pub fn is_adjacent(self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset for this direction
    pub const fn delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, 1),
            Direction::Down => Position::new(0, -1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    /// Direction from `from` to an adjacent `to`, if they are adjacent
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| from.step(*d) == to)
    }
}

/// Line along which a run of tokens is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub const fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// The two directions scanned along this axis, in probe order
    pub const fn directions(self) -> [Direction; 2] {
        match self {
            Axis::Horizontal => [Direction::Left, Direction::Right],
            Axis::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// Color id of a normal token (0-based, below the configured color count)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Color(pub u8);

impl Color {
    /// Successor color, wrapping around `count`
    pub fn next(self, count: u8) -> Color {
        Color((self.0 + 1) % count.max(1))
    }
}

/// Area-clearing token produced by a Four or Five match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Clears the row it sits in
    RocketHorizontal,
    /// Clears the column it sits in
    RocketVertical,
    /// Clears every token of one color
    DiscoBall,
    /// Clears a square area around itself
    Bomb,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::RocketHorizontal,
        PowerupKind::RocketVertical,
        PowerupKind::DiscoBall,
        PowerupKind::Bomb,
    ];
}

/// Obstacle mobility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Falls with gravity like a normal token (jar)
    Movable,
    /// Never relocated; acts as a floor during collapse (ice block)
    Static,
}

/// What a grid cell holds.
///
/// Replaces a shared numeric type code with an explicit variant per family so
/// color ids, powerups and obstacles can never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Normal(Color),
    Powerup(PowerupKind),
    Obstacle { kind: ObstacleKind, health: u8 },
}

impl TokenKind {
    /// Matchable color, `None` for powerups and obstacles
    pub fn color(self) -> Option<Color> {
        match self {
            TokenKind::Normal(color) => Some(color),
            _ => None,
        }
    }

    pub fn is_obstacle(self) -> bool {
        matches!(self, TokenKind::Obstacle { .. })
    }

    pub fn is_powerup(self) -> bool {
        matches!(self, TokenKind::Powerup(_))
    }

    pub fn powerup(self) -> Option<PowerupKind> {
        match self {
            TokenKind::Powerup(kind) => Some(kind),
            _ => None,
        }
    }

    /// Static obstacles never move: not during collapse, not by swapping
    pub fn is_immovable(self) -> bool {
        matches!(
            self,
            TokenKind::Obstacle {
                kind: ObstacleKind::Static,
                ..
            }
        )
    }
}

/// Animation readiness of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TokenState {
    /// Settled; may be matched and swapped
    #[default]
    Idle,
    /// Mid-animation; excluded from matching and swapping
    Busy,
}

/// Stable identity of a pooled token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete request delivered by an input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Exchange two adjacent tokens
    Swap { from: Position, to: Position },
    /// Tap a cell (activates a powerup)
    Touch(Position),
}

impl InputEvent {
    /// Swipe from `from` one cell in `direction`
    pub fn swipe(from: Position, direction: Direction) -> Self {
        InputEvent::Swap {
            from,
            to: from.step(direction),
        }
    }
}
