//! Swap tests - coordinator transactions end to end

use match3::core::{Token, TokenPool};
use match3::engine::{InputError, ObstacleLayout, Phase, SimConfig, Simulation};
use match3::types::{Color, Position, PowerupKind, TokenId, TokenKind};

/// Pool that never reuses an id, so resolved tokens can be told apart from
/// refills
#[derive(Default)]
struct FreshPool {
    next: u32,
}

impl TokenPool for FreshPool {
    fn acquire(&mut self) -> Option<Token> {
        let id = TokenId(self.next);
        self.next += 1;
        Some(Token::new(id, TokenKind::Normal(Color(0))))
    }

    fn release(&mut self, _token: Token) {}
}

fn config() -> SimConfig {
    SimConfig {
        obstacles: ObstacleLayout::None,
        spawn_stagger_ticks: 0,
        ..SimConfig::default()
    }
}

// Swapping (3,3) with (4,3) completes "bbbb" on row 3 and "aaaa" on column 4
const DOUBLE_FOUR: [&str; 7] = [
    "cdefcde", //
    "efcdefc",
    "cdefade",
    "bbbabfc",
    "cdefade",
    "efcdafc",
    "cdefcde",
];

fn id_at(sim: &Simulation, pos: Position) -> TokenId {
    sim.board().token(pos).unwrap().id()
}

fn find(sim: &Simulation, id: TokenId) -> Option<TokenKind> {
    sim.board()
        .tokens()
        .find(|(_, t)| t.id() == id)
        .map(|(_, t)| t.kind())
}

#[test]
fn test_double_four_creates_two_powerups() {
    let mut sim = Simulation::builder(config().with_seed(99))
        .pool(FreshPool::default())
        .layout(&DOUBLE_FOUR, 7)
        .build()
        .unwrap();

    let moving_left = id_at(&sim, Position::new(4, 3));
    let moving_right = id_at(&sim, Position::new(3, 3));
    let consumed: Vec<TokenId> = [(0, 3), (1, 3), (2, 3), (4, 1), (4, 2), (4, 4)]
        .into_iter()
        .map(|(x, y)| id_at(&sim, Position::new(x, y)))
        .collect();

    sim.handle_swap(Position::new(3, 3), Position::new(4, 3))
        .unwrap();
    assert!(sim.settle(10_000));

    assert_eq!(
        find(&sim, moving_left),
        Some(TokenKind::Powerup(PowerupKind::RocketVertical))
    );
    assert_eq!(
        find(&sim, moving_right),
        Some(TokenKind::Powerup(PowerupKind::RocketHorizontal))
    );
    for id in consumed {
        assert_eq!(find(&sim, id), None, "{id} should have been resolved");
    }

    let stats = sim.stats();
    assert_eq!(stats.swaps, 1);
    assert_eq!(stats.reverts, 0);
    assert!(stats.powerups_created >= 2);
    assert!(stats.resolved >= 6);
    // Refill closed every hole
    assert_eq!(sim.board().tokens().count(), 49);
}

#[test]
fn test_swap_without_match_reverts() {
    let rows = ["abab", "baba", "abab", "babc"];
    let mut sim = Simulation::builder(config())
        .layout(&rows, 4)
        .build()
        .unwrap();
    let before = sim.board().layout();

    sim.handle_swap(Position::new(2, 0), Position::new(3, 0))
        .unwrap();
    assert!(sim.settle(100));

    assert_eq!(sim.board().layout(), before);
    let stats = sim.stats();
    assert_eq!(stats.swaps, 1);
    assert_eq!(stats.reverts, 1);
    assert_eq!(stats.resolved, 0);
}

#[test]
fn test_busy_and_invalid_requests_are_rejected() {
    let builder = Simulation::builder(config());
    let presenter = match3::engine::TimedPresenter::new(builder.clock());
    let mut sim = builder
        .presenter(presenter)
        .layout(&DOUBLE_FOUR, 7)
        .build()
        .unwrap();

    assert_eq!(
        sim.handle_swap(Position::new(3, 3), Position::new(3, 3)),
        Err(InputError::NotAdjacent {
            from: Position::new(3, 3),
            to: Position::new(3, 3)
        })
    );
    assert_eq!(
        sim.handle_swap(Position::new(6, 6), Position::new(7, 6)),
        Err(InputError::OutOfBounds(Position::new(7, 6)))
    );

    sim.handle_swap(Position::new(3, 3), Position::new(4, 3))
        .unwrap();
    assert_eq!(sim.phase(), Phase::Swapping);
    assert_eq!(
        sim.handle_swap(Position::new(0, 0), Position::new(1, 0)),
        Err(InputError::Busy)
    );
    assert_eq!(
        sim.handle_touch(Position::new(0, 0)),
        Err(InputError::Busy)
    );
    assert_eq!(sim.recolor(Position::new(0, 0)), Err(InputError::Busy));

    assert!(sim.settle(10_000));
    assert_eq!(sim.phase(), Phase::Idle);
    assert_eq!(sim.stats().swaps, 1);
}

#[test]
fn test_swap_outside_play_area_is_rejected() {
    let mut sim = Simulation::builder(config())
        .layout(&["ab", "ba", "ab"], 2)
        .build()
        .unwrap();
    assert_eq!(
        sim.handle_swap(Position::new(0, 2), Position::new(1, 2)),
        Err(InputError::OutsidePlayArea(Position::new(0, 2)))
    );
}
