//! Token module - grid occupants and the pool they come from
//!
//! A [`Token`] is one grid occupant: its kind, its animation readiness and a
//! cached copy of the cell it sits in. Only [`Board`](crate::Board) writes the
//! cached position, so it always mirrors the grid.
//!
//! Tokens are obtained from a [`TokenPool`] when a cell needs filling and given
//! back when they are resolved. [`RecyclingPool`] is a free-list implementation
//! that mints fresh ids on demand and can be capped.

use match3_types::{Color, ObstacleKind, Position, PowerupKind, TokenId, TokenKind, TokenState};

/// One grid occupant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: TokenId,
    kind: TokenKind,
    state: TokenState,
    position: Position,
}

impl Token {
    pub fn new(id: TokenId, kind: TokenKind) -> Self {
        Self {
            id,
            kind,
            state: TokenState::Idle,
            position: Position::default(),
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn state(&self) -> TokenState {
        self.state
    }

    /// Cached grid coordinate. Equals the cell the board stores this token in.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn color(&self) -> Option<Color> {
        self.kind.color()
    }

    pub fn is_idle(&self) -> bool {
        self.state == TokenState::Idle
    }

    pub fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }

    pub fn set_state(&mut self, state: TokenState) {
        self.state = state;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Promote this token in place into a powerup
    pub fn upgrade(&mut self, powerup: PowerupKind) {
        self.kind = TokenKind::Powerup(powerup);
    }

    /// Apply one point of damage to an obstacle.
    ///
    /// Returns the remaining health, or `None` if this token is not an obstacle.
    pub fn damage(&mut self) -> Option<u8> {
        match &mut self.kind {
            TokenKind::Obstacle { health, .. } => {
                *health = health.saturating_sub(1);
                Some(*health)
            }
            _ => None,
        }
    }

    pub fn obstacle_kind(&self) -> Option<ObstacleKind> {
        match self.kind {
            TokenKind::Obstacle { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Source and sink of tokens.
///
/// `acquire` must not block: it returns `None` when no token can be provided.
pub trait TokenPool {
    fn acquire(&mut self) -> Option<Token>;
    fn release(&mut self, token: Token);
}

/// Free-list pool that mints new ids when empty
#[derive(Debug, Clone, Default)]
pub struct RecyclingPool {
    free: Vec<Token>,
    minted: u32,
    capacity: Option<u32>,
}

impl RecyclingPool {
    /// Unbounded pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool that never mints more than `capacity` tokens in total
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            free: Vec::with_capacity(capacity as usize),
            minted: 0,
            capacity: Some(capacity),
        }
    }

    /// Tokens ever created by this pool
    pub fn minted(&self) -> u32 {
        self.minted
    }

    /// Tokens currently waiting for reuse
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

impl TokenPool for RecyclingPool {
    fn acquire(&mut self) -> Option<Token> {
        if let Some(token) = self.free.pop() {
            return Some(token);
        }
        if self.capacity.is_some_and(|cap| self.minted >= cap) {
            return None;
        }
        let id = TokenId(self.minted);
        self.minted += 1;
        Some(Token::new(id, TokenKind::Normal(Color(0))))
    }

    fn release(&mut self, mut token: Token) {
        token.kind = TokenKind::Normal(Color(0));
        token.state = TokenState::Idle;
        token.position = Position::default();
        self.free.push(token);
    }
}
