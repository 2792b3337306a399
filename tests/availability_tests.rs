//! Availability tests - move scanning, shuffle fallback and hints

use match3::core::{has_any_move, has_immediate_match, scan_moves, shuffle_board, Board, RecyclingPool, TileRng};
use match3::engine::{
    InstantPresenter, ObstacleLayout, PresentationEvent, RecordingPresenter, SimConfig, Simulation,
};
use match3::types::Position;

// Every row and column holds each color once: no single swap can line up three
const DEADLOCK: [&str; 3] = ["abc", "bca", "cab"];

fn config() -> SimConfig {
    SimConfig {
        obstacles: ObstacleLayout::None,
        spawn_stagger_ticks: 0,
        colors: 3,
        ..SimConfig::default()
    }
}

#[test]
fn test_moves_are_ranked_longest_first() {
    let rows = ["cdad", "aaba", "dcdc", "cdca"];
    let board = Board::from_layout(&rows, 4, &mut RecyclingPool::new()).unwrap();
    let moves = scan_moves(&board);
    assert!(!moves.is_empty());
    assert!(moves.windows(2).all(|w| w[0].length() >= w[1].length()));

    // Dropping the `a` above the `b` completes a row of four
    let best = &moves[0];
    assert_eq!(best.length(), 4);
    assert_eq!(best.from, Position::new(2, 3));
    assert_eq!(best.to, Position::new(2, 2));
}

#[test]
fn test_deadlock_has_no_moves() {
    let board = Board::from_layout(&DEADLOCK, 3, &mut RecyclingPool::new()).unwrap();
    assert!(!has_any_move(&board));
    assert!(!has_immediate_match(&board));
}

#[test]
fn test_shuffle_postcondition() {
    for seed in 0..20 {
        let mut board = Board::from_layout(&DEADLOCK, 3, &mut RecyclingPool::new()).unwrap();
        let mut rng = TileRng::new(seed);
        let report = shuffle_board(&mut board, &mut rng, 10_000);
        if report.valid {
            assert!(!has_immediate_match(&board));
            assert!(has_any_move(&board));
        } else {
            assert_eq!(report.attempts, 10_000);
        }
        assert_eq!(report.placements.len(), 9);
    }
}

#[test]
fn test_populate_shuffles_a_deadlocked_board() {
    let mut sim = Simulation::builder(config().with_seed(4))
        .layout(&DEADLOCK, 3)
        .build()
        .unwrap();
    sim.populate().unwrap();
    assert!(sim.settle(10_000));

    assert_eq!(sim.stats().shuffles, 1);
    let board = sim.board();
    assert!(has_any_move(&board));
    assert!(!has_immediate_match(&board));
    drop(board);
    assert!(sim.best_move().is_some());
}

#[test]
fn test_hint_appears_after_delay_and_clears_on_swap() {
    let presenter = RecordingPresenter::new(InstantPresenter);
    let log = presenter.log();
    let mut sim = Simulation::builder(config().with_seed(8))
        .presenter(presenter)
        .layout(&["abab", "baba", "abab", "babc"], 4)
        .build()
        .unwrap();
    sim.populate().unwrap();
    let best = sim.best_move().unwrap();

    let shown = |log: &match3::engine::EventLog| {
        log.borrow()
            .iter()
            .any(|e| matches!(e, PresentationEvent::HintShown(_)))
    };
    sim.advance(sim.config().hint_delay_ticks - 1);
    assert!(!shown(&log));
    sim.tick();
    assert!(log
        .borrow()
        .contains(&PresentationEvent::HintShown(best.tokens.clone())));

    sim.handle_swap(best.from, best.to).unwrap();
    assert!(log.borrow().contains(&PresentationEvent::HintCancelled));
}

#[test]
fn test_new_hint_replaces_pending_one() {
    let presenter = RecordingPresenter::new(InstantPresenter);
    let log = presenter.log();
    let mut sim = Simulation::builder(config())
        .presenter(presenter)
        .layout(&["abab", "baba", "abab", "babc"], 4)
        .build()
        .unwrap();
    sim.populate().unwrap();

    // A reverted swap restarts the timer before the first hint fires
    let delay = sim.config().hint_delay_ticks;
    sim.advance(delay / 2);
    sim.handle_swap(Position::new(2, 0), Position::new(3, 0))
        .unwrap();
    assert!(sim.settle(100));
    sim.advance(delay - 1);

    let hints = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, PresentationEvent::HintShown(_)))
        .count();
    assert_eq!(hints, 0);
    sim.tick();
    let hints = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, PresentationEvent::HintShown(_)))
        .count();
    assert_eq!(hints, 1);
}
