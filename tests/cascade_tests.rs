//! Cascade tests - gravity, refill and the fixed point

use match3::core::gravity::is_settled;
use match3::core::{
    collapse, fill_vacancies, scan_matches, Board, RecyclingPool, TileRng,
};
use match3::engine::{ObstacleLayout, SimConfig, Simulation};
use match3::types::Position;

fn board(rows: &[&str], play: i32, pool: &mut RecyclingPool) -> Board {
    Board::from_layout(rows, play, pool).unwrap()
}

fn random_rows(rng: &mut TileRng, width: usize, height: usize) -> Vec<String> {
    const GLYPHS: &[u8] = b"....abcd#j";
    (0..height)
        .map(|_| {
            (0..width)
                .map(|_| GLYPHS[rng.next_range(GLYPHS.len() as u32) as usize] as char)
                .collect()
        })
        .collect()
}

#[test]
fn test_collapse_leaves_no_hanging_tokens() {
    let mut rng = TileRng::new(77);
    for _ in 0..100 {
        let rows = random_rows(&mut rng, 7, 10);
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let mut pool = RecyclingPool::new();
        let mut b = board(&rows, 6, &mut pool);
        let statics_before: Vec<Position> = b
            .tokens()
            .filter(|(_, t)| t.kind().is_immovable())
            .map(|(p, _)| p)
            .collect();
        let count_before = b.tokens().count();

        collapse(&mut b);

        assert!(is_settled(&b), "unsettled after collapse: {:?}", b.layout());
        assert_eq!(b.tokens().count(), count_before);
        let statics_after: Vec<Position> = b
            .tokens()
            .filter(|(_, t)| t.kind().is_immovable())
            .map(|(p, _)| p)
            .collect();
        assert_eq!(statics_before, statics_after);
        // Cached positions mirror the grid
        assert!(b.tokens().all(|(p, t)| t.position() == p));
    }
}

#[test]
fn test_static_obstacle_is_a_floor() {
    let mut pool = RecyclingPool::new();
    let mut b = board(&["a", "b", ".", "#", "."], 5, &mut pool);
    collapse(&mut b);
    assert_eq!(b.layout(), [".", "a", "b", "#", "."]);
}

#[test]
fn test_cascade_is_idempotent_on_a_settled_board() {
    let mut pool = RecyclingPool::new();
    let rows = ["abcd", "bcda", "cdab", "dabc"];
    let mut b = board(&rows, 4, &mut pool);
    let before = b.clone();
    let mut rng = TileRng::new(5);

    assert!(collapse(&mut b).is_empty());
    let report = fill_vacancies(&mut b, &mut pool, &mut rng, 4);
    assert!(report.spawned.is_empty());
    assert!(scan_matches(&b).is_empty());
    assert_eq!(b, before);
}

#[test]
fn test_cascades_reach_a_fixed_point() {
    for seed in [1, 2, 3] {
        let config = SimConfig {
            obstacles: ObstacleLayout::None,
            ..SimConfig::default().with_seed(seed)
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.populate().unwrap();
        for _ in 0..5 {
            let Some(best) = sim.best_move() else {
                break;
            };
            sim.handle_swap(best.from, best.to).unwrap();
            assert!(sim.settle(50_000));

            let board = sim.board();
            assert!(scan_matches(&board).is_empty());
            assert!(is_settled(&board));
            assert!(board.tokens().all(|(_, t)| t.is_idle()));
            assert_eq!(board.tokens().count(), (board.width() * board.height()) as usize);
        }
        assert!(sim.stats().cascade_passes >= sim.stats().swaps);
    }
}
