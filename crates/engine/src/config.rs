//! Simulation configuration
//!
//! Defaults mirror a 9x9 board with nine spawn rows, six colors and ice blocks
//! down both edges. [`SimConfig::from_env`] overlays `MATCH3_*` variables.

use match3_types::{
    ObstacleKind, DEFAULT_BOMB_RADIUS, DEFAULT_COLOR_COUNT, DEFAULT_OBSTACLE_HEALTH,
    DEFAULT_PLAY_HEIGHT, DEFAULT_SPAWN_ROWS, DEFAULT_WIDTH, HINT_DELAY_TICKS, MOVE_TIMEOUT_TICKS,
    SHUFFLE_ATTEMPT_LIMIT, SPAWN_STAGGER_TICKS,
};

use crate::error::ConfigError;

/// Obstacles placed before the first fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleLayout {
    None,
    /// Both edge columns of the play area
    EdgeColumns { kind: ObstacleKind, health: u8 },
}

impl ObstacleLayout {
    /// `none`, `static` or `movable`
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "none" => return Some(ObstacleLayout::None),
            "static" | "ice" => ObstacleKind::Static,
            "movable" | "jar" => ObstacleKind::Movable,
            _ => return None,
        };
        Some(ObstacleLayout::EdgeColumns {
            kind,
            health: DEFAULT_OBSTACLE_HEALTH,
        })
    }
}

/// Initialization parameters for a [`Simulation`](crate::Simulation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub width: i32,
    pub play_height: i32,
    pub spawn_rows: i32,
    pub colors: u8,
    pub obstacles: ObstacleLayout,
    pub bomb_radius: i32,
    pub shuffle_attempts: u32,
    /// Watchdog for token movement before the token is snapped into place
    pub move_timeout_ticks: u32,
    pub hint_delay_ticks: u32,
    /// Delay between consecutive refilled tokens starting to fall
    pub spawn_stagger_ticks: u32,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            play_height: DEFAULT_PLAY_HEIGHT,
            spawn_rows: DEFAULT_SPAWN_ROWS,
            colors: DEFAULT_COLOR_COUNT,
            obstacles: ObstacleLayout::EdgeColumns {
                kind: ObstacleKind::Static,
                health: DEFAULT_OBSTACLE_HEALTH,
            },
            bomb_radius: DEFAULT_BOMB_RADIUS,
            shuffle_attempts: SHUFFLE_ATTEMPT_LIMIT,
            move_timeout_ticks: MOVE_TIMEOUT_TICKS,
            hint_delay_ticks: HINT_DELAY_TICKS,
            spawn_stagger_ticks: SPAWN_STAGGER_TICKS,
            seed: 1,
        }
    }
}

impl SimConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_obstacles(mut self, obstacles: ObstacleLayout) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.play_height <= 0 || self.spawn_rows < 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                play_height: self.play_height,
                spawn_rows: self.spawn_rows,
            });
        }
        if self.colors == 0 {
            return Err(ConfigError::NoColors);
        }
        if self.shuffle_attempts == 0 {
            return Err(ConfigError::NoShuffleAttempts);
        }
        if self.bomb_radius < 0 {
            return Err(ConfigError::NegativeRadius(self.bomb_radius));
        }
        Ok(())
    }

    /// Defaults overlaid with `MATCH3_*` environment variables.
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        let obstacles = env::var("MATCH3_OBSTACLES")
            .ok()
            .and_then(|s| ObstacleLayout::parse(&s))
            .unwrap_or(defaults.obstacles);

        Self {
            width: parsed("MATCH3_WIDTH").unwrap_or(defaults.width),
            play_height: parsed("MATCH3_PLAY_HEIGHT").unwrap_or(defaults.play_height),
            spawn_rows: parsed("MATCH3_SPAWN_ROWS").unwrap_or(defaults.spawn_rows),
            colors: parsed("MATCH3_COLORS").unwrap_or(defaults.colors),
            seed: parsed("MATCH3_SEED").unwrap_or(defaults.seed),
            obstacles,
            ..defaults
        }
    }
}
