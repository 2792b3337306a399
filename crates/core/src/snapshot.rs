use serde::{Deserialize, Serialize};

use match3_types::{Position, TokenId, TokenKind, TokenState};

use crate::board::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub id: TokenId,
    pub kind: TokenKind,
    pub state: TokenState,
    pub position: Position,
}

/// Serializable copy of a board, for debugging dumps and test fixtures
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    pub play_height: i32,
    /// Occupied cells, bottom row first
    pub tokens: Vec<TokenSnapshot>,
    /// Glyph rows, top row first
    pub layout: Vec<String>,
}

impl BoardSnapshot {
    pub fn token_at(&self, pos: Position) -> Option<&TokenSnapshot> {
        self.tokens.iter().find(|t| t.position == pos)
    }

    pub fn occupied(&self) -> usize {
        self.tokens.len()
    }
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            play_height: board.play_height(),
            tokens: board
                .tokens()
                .map(|(position, token)| TokenSnapshot {
                    id: token.id(),
                    kind: token.kind(),
                    state: token.state(),
                    position,
                })
                .collect(),
            layout: board.layout(),
        }
    }
}

impl Board {
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::RecyclingPool;
    use match3_types::{Color, PowerupKind};

    #[test]
    fn test_snapshot_captures_tokens() {
        let board = Board::from_layout(&["B.", "ab"], 1, &mut RecyclingPool::new()).unwrap();
        let snap = board.snapshot();
        assert_eq!((snap.width, snap.height, snap.play_height), (2, 2, 1));
        assert_eq!(snap.occupied(), 3);
        assert_eq!(
            snap.token_at(Position::new(1, 0)).map(|t| t.kind),
            Some(TokenKind::Normal(Color(1)))
        );
        assert_eq!(
            snap.token_at(Position::new(0, 1)).map(|t| t.kind),
            Some(TokenKind::Powerup(PowerupKind::Bomb))
        );
        assert_eq!(snap.layout, vec!["B.".to_string(), "ab".to_string()]);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let board = Board::from_layout(&["%j", "aH"], 2, &mut RecyclingPool::new()).unwrap();
        let snap = board.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
