//! Powerup tests - effect targets and touch activation

use match3::core::effects::area_targets;
use match3::core::{select_targets, Board, RecyclingPool, TileRng};
use match3::engine::{
    InputError, InstantPresenter, ObstacleLayout, PresentationEvent, RecordingPresenter,
    SimConfig, Simulation,
};
use match3::types::{Color, Position, PowerupKind};

/// Matchless filler of colors a..d with `glyph` written at `at`
fn rows_with(width: i32, height: i32, at: Position, glyph: char) -> Vec<String> {
    (0..height)
        .rev()
        .map(|y| {
            (0..width)
                .map(|x| {
                    if Position::new(x, y) == at {
                        glyph
                    } else {
                        (b'a' + ((x + 2 * y) % 4) as u8) as char
                    }
                })
                .collect()
        })
        .collect()
}

fn as_strs(rows: &[String]) -> Vec<&str> {
    rows.iter().map(String::as_str).collect()
}

fn config() -> SimConfig {
    SimConfig {
        obstacles: ObstacleLayout::None,
        spawn_stagger_ticks: 0,
        colors: 4,
        ..SimConfig::default()
    }
}

fn block(x0: i32, x1: i32, y0: i32, y1: i32) -> Vec<Position> {
    (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| Position::new(x, y)))
        .collect()
}

#[test]
fn test_bomb_targets_five_by_five_block() {
    let center = Position::new(4, 4);
    let rows = rows_with(9, 9, center, '.');
    let board = Board::from_layout(&as_strs(&rows), 9, &mut RecyclingPool::new()).unwrap();

    let mut targets = area_targets(&board, center, 2);
    targets.sort();
    let mut expected: Vec<Position> = block(2, 6, 2, 6)
        .into_iter()
        .filter(|&p| p != center)
        .collect();
    expected.sort();
    assert_eq!(targets, expected);
}

#[test]
fn test_bomb_area_is_clipped_to_play_area() {
    let corner = Position::new(0, 8);
    let mut rows = rows_with(9, 9, corner, '.');
    // Spawn buffer row above the play area is never hit
    rows.insert(0, "abcdabcda".to_string());
    let board = Board::from_layout(&as_strs(&rows), 9, &mut RecyclingPool::new()).unwrap();

    let mut targets = area_targets(&board, corner, 2);
    targets.sort();
    let mut expected: Vec<Position> = block(0, 2, 6, 8)
        .into_iter()
        .filter(|&p| p != corner)
        .collect();
    expected.sort();
    assert_eq!(targets, expected);
}

#[test]
fn test_rockets_and_disco_targets() {
    let rows = ["abca", "Hbcb", "cabV", "bcaD"];
    let board = Board::from_layout(&rows, 4, &mut RecyclingPool::new()).unwrap();
    let mut rng = TileRng::new(3);

    let row = select_targets(&board, PowerupKind::RocketHorizontal, Position::new(0, 2), 2, &mut rng);
    // The rocket itself is still on the board here, so it is listed too
    assert_eq!(row.positions.len(), 4);
    assert!(row.positions.iter().all(|p| p.y == 2));

    let column = select_targets(&board, PowerupKind::RocketVertical, Position::new(3, 1), 2, &mut rng);
    assert!(column.positions.iter().all(|p| p.x == 3));
    assert_eq!(column.positions.len(), 4);

    let disco = select_targets(&board, PowerupKind::DiscoBall, Position::new(3, 0), 2, &mut rng);
    let color = disco.color.unwrap();
    assert!(color < Color(3));
    assert!(!disco.positions.is_empty());
    assert!(disco
        .positions
        .iter()
        .all(|&p| board.token(p).unwrap().color() == Some(color)));
}

#[test]
fn test_touching_bomb_resolves_block() {
    let center = Position::new(4, 4);
    let rows = rows_with(9, 9, center, 'B');
    let presenter = RecordingPresenter::new(InstantPresenter);
    let log = presenter.log();
    let mut sim = Simulation::builder(config())
        .presenter(presenter)
        .layout(&as_strs(&rows), 9)
        .build()
        .unwrap();
    log.borrow_mut().clear();

    sim.handle_touch(center).unwrap();
    assert!(sim.settle(10_000));

    let events = log.borrow();
    let effect = events
        .iter()
        .position(|e| {
            matches!(
                e,
                PresentationEvent::PowerupEffect {
                    kind: PowerupKind::Bomb,
                    targets: 24,
                    ..
                }
            )
        })
        .expect("bomb effect played");
    let resolved: Vec<Position> = events[effect + 1..]
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::Resolved { at, .. } => Some(*at),
            _ => None,
        })
        .take(24)
        .collect();
    let mut resolved_sorted = resolved.clone();
    resolved_sorted.sort();
    let mut expected: Vec<Position> = block(2, 6, 2, 6)
        .into_iter()
        .filter(|&p| p != center)
        .collect();
    expected.sort();
    assert_eq!(resolved_sorted, expected);

    let stats = sim.stats();
    assert_eq!(stats.powerups_activated, 1);
    assert!(stats.resolved >= 24);
}

#[test]
fn test_touching_a_normal_token_is_rejected() {
    let rows = rows_with(4, 4, Position::new(0, 0), 'V');
    let mut sim = Simulation::builder(config())
        .layout(&as_strs(&rows), 4)
        .build()
        .unwrap();
    assert_eq!(
        sim.handle_touch(Position::new(1, 1)),
        Err(InputError::NotPowerup(Position::new(1, 1)))
    );
    assert_eq!(
        sim.handle_touch(Position::new(9, 9)),
        Err(InputError::OutOfBounds(Position::new(9, 9)))
    );
    sim.handle_touch(Position::new(0, 0)).unwrap();
    assert!(sim.settle(10_000));
    assert_eq!(sim.stats().powerups_activated, 1);
}
