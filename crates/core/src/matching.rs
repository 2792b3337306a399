//! Matching module - match tree construction and classification
//!
//! [`find_match`] grows a [`MatchTree`] from a seed token:
//!
//! 1. Probe left and right from the seed. If at least two neighbors match,
//!    accept the horizontal run and branch vertically from each run token.
//! 2. Probe up and down from the seed. If at least two neighbors match,
//!    accept the vertical run and branch horizontally from each run token.
//! 3. A branch probes the axis perpendicular to the run it grew from. Branches
//!    with at least two matching cells are merged and branch again with the
//!    axes flipped, which is how L, T and plus shapes join into one tree.
//!
//! A probe walks outward while cells are occupied, inside the play area, idle
//! and of the seed's color. Cells already in the tree are counted in
//! `unlisted` instead of being added twice, so overlapping branches still
//! reach the acceptance threshold without duplicating tokens.
//!
//! # Classification
//!
//! | Count | Class | Horizontal | Vertical | Both |
//! |-------|-------|------------|----------|------|
//! | 3 | Three | - | - | - |
//! | 4 | Four | RocketVertical | RocketHorizontal | - |
//! | 5+ | Five | DiscoBall | DiscoBall | Bomb |

use match3_types::{Axis, Color, Direction, Position, PowerupKind, TokenId, MAX_RESOLVED_PER_MATCH};

use crate::board::Board;

/// Aggregate shape of a match tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Orientation {
    /// Combine the current orientation with that of a merged run
    pub fn merge(self, other: Orientation) -> Orientation {
        use Orientation::*;
        match (self, other) {
            (Both, _) | (_, Both) | (Horizontal, Vertical) | (Vertical, Horizontal) => Both,
            (_, Horizontal) => Horizontal,
            (_, Vertical) => Vertical,
            (current, None) => current,
        }
    }
}

impl From<Axis> for Orientation {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Orientation::Horizontal,
            Axis::Vertical => Orientation::Vertical,
        }
    }
}

/// Size class of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchClass {
    Three,
    Four,
    Five,
}

impl MatchClass {
    /// Counts above five clamp to [`MatchClass::Five`]; below three is no match
    pub fn from_count(count: usize) -> Option<MatchClass> {
        match count {
            0..=2 => None,
            3 => Some(MatchClass::Three),
            4 => Some(MatchClass::Four),
            _ => Some(MatchClass::Five),
        }
    }

    /// Powerup a seed is promoted to for this class and orientation
    pub fn powerup(self, orientation: Orientation) -> Option<PowerupKind> {
        match (self, orientation) {
            (MatchClass::Three, _) => None,
            (MatchClass::Four, Orientation::Horizontal) => Some(PowerupKind::RocketVertical),
            (MatchClass::Four, Orientation::Vertical) => Some(PowerupKind::RocketHorizontal),
            (MatchClass::Four, _) => None,
            (MatchClass::Five, Orientation::Both) => Some(PowerupKind::Bomb),
            (MatchClass::Five, _) => Some(PowerupKind::DiscoBall),
        }
    }
}

/// A token taking part in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchedToken {
    pub id: TokenId,
    pub position: Position,
}

/// Connected set of same-colored idle tokens grown from a seed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchTree {
    tokens: Vec<MatchedToken>,
    unlisted: usize,
    orientation: Orientation,
    seed: Option<MatchedToken>,
}

impl MatchTree {
    fn rooted(seed: MatchedToken) -> Self {
        Self {
            tokens: vec![seed],
            unlisted: 0,
            orientation: Orientation::None,
            seed: Some(seed),
        }
    }

    /// Unique tokens, seed first
    pub fn tokens(&self) -> &[MatchedToken] {
        &self.tokens
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Token eligible for promotion into a powerup
    pub fn seed(&self) -> Option<MatchedToken> {
        self.seed
    }

    /// Tokens revisited by a probe without being added again
    pub fn unlisted(&self) -> usize {
        self.unlisted
    }

    pub fn count(&self) -> usize {
        self.tokens.len() + self.unlisted
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.tokens.iter().any(|t| t.id == id)
    }

    pub fn class(&self) -> Option<MatchClass> {
        MatchClass::from_count(self.count())
    }

    /// Powerup the seed becomes when this tree resolves
    pub fn powerup(&self) -> Option<PowerupKind> {
        self.class()?.powerup(self.orientation)
    }

    /// Tokens removed when this tree resolves.
    ///
    /// A promoted seed stays on the board and is left out. At most five tokens
    /// are resolved per pass; the rest stay matchable for the next scan.
    pub fn resolve_set(&self) -> Vec<MatchedToken> {
        let promoted = self.powerup().and(self.seed);
        let remaining: Vec<MatchedToken> = self
            .tokens
            .iter()
            .copied()
            .filter(|t| Some(*t) != promoted)
            .collect();
        let count = self.count() - usize::from(promoted.is_some());
        let limit = count.min(MAX_RESOLVED_PER_MATCH);
        remaining.into_iter().take(limit).collect()
    }

    /// Append another run's tokens and fold in its orientation.
    ///
    /// The merged run's `unlisted` count is not carried over.
    fn merge(&mut self, other: MatchTree) {
        self.tokens.extend(other.tokens);
        self.orientation = self.orientation.merge(other.orientation);
    }
}

/// Build the match tree rooted at `seed`.
///
/// The seed must be an idle normal token inside the play area. Returns `None`
/// when no run of three passes through it.
pub fn find_match(board: &Board, seed: Position) -> Option<MatchTree> {
    let color = board.idle_color_at(seed)?;
    let id = board.token(seed)?.id();
    let mut tree = MatchTree::rooted(MatchedToken { id, position: seed });

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let run = probe_axis(board, &tree, seed, axis, color);
        if run.count() > 1 {
            let positions: Vec<Position> = run.tokens.iter().map(|t| t.position).collect();
            tree.merge(run);
            grow_branches(board, &mut tree, &positions, axis.perpendicular(), color);
        }
    }

    if tree.count() == 1 {
        return None;
    }
    Some(tree)
}

/// Every idle play-area match, skipping tokens already claimed by an
/// earlier tree in this scan.
pub fn scan_matches(board: &Board) -> Vec<MatchTree> {
    let mut trees: Vec<MatchTree> = Vec::new();
    for pos in board.play_positions() {
        let Some(token) = board.token(pos) else {
            continue;
        };
        if trees.iter().any(|tree| tree.contains(token.id())) {
            continue;
        }
        if let Some(tree) = find_match(board, pos) {
            trees.push(tree);
        }
    }
    trees
}

fn grow_branches(
    board: &Board,
    tree: &mut MatchTree,
    from: &[Position],
    axis: Axis,
    color: Color,
) {
    for &origin in from {
        let branch = probe_axis(board, tree, origin, axis, color);
        if branch.count() > 1 {
            let positions: Vec<Position> = branch.tokens.iter().map(|t| t.position).collect();
            tree.merge(branch);
            grow_branches(board, tree, &positions, axis.perpendicular(), color);
        }
    }
}

/// Both directions of `axis` from `origin`, tagged with that axis
fn probe_axis(
    board: &Board,
    tree: &MatchTree,
    origin: Position,
    axis: Axis,
    color: Color,
) -> MatchTree {
    let mut run = MatchTree {
        orientation: axis.into(),
        ..MatchTree::default()
    };
    for direction in axis.directions() {
        probe_direction(board, tree, origin, direction, color, &mut run);
    }
    run
}

fn probe_direction(
    board: &Board,
    tree: &MatchTree,
    origin: Position,
    direction: Direction,
    color: Color,
    run: &mut MatchTree,
) {
    let mut cursor = origin.step(direction);
    while board.idle_color_at(cursor) == Some(color) {
        let Some(token) = board.token(cursor) else {
            break;
        };
        if tree.contains(token.id()) || run.contains(token.id()) {
            run.unlisted += 1;
        } else {
            run.tokens.push(MatchedToken {
                id: token.id(),
                position: cursor,
            });
        }
        cursor = cursor.step(direction);
    }
}
