use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match3::core::{
    collapse, fill_vacancies, scan_matches, scan_moves, shuffle_board, Board, RecyclingPool,
    TileRng,
};
use match3::engine::{SimConfig, Simulation};
use match3::types::Position;

fn populated(seed: u64) -> Board {
    let mut board = Board::new(9, 9, 9).unwrap();
    let mut pool = RecyclingPool::new();
    let mut rng = TileRng::new(seed);
    fill_vacancies(&mut board, &mut pool, &mut rng, 6);
    board
}

fn bench_scan_matches(c: &mut Criterion) {
    let board = populated(12345);

    c.bench_function("scan_matches_9x9", |b| {
        b.iter(|| scan_matches(black_box(&board)))
    });
}

fn bench_scan_moves(c: &mut Criterion) {
    let board = populated(12345);

    c.bench_function("scan_moves_9x9", |b| {
        b.iter(|| scan_moves(black_box(&board)))
    });
}

fn bench_collapse(c: &mut Criterion) {
    let template = populated(12345);

    c.bench_function("collapse_bottom_3_rows", |b| {
        b.iter(|| {
            let mut board = template.clone();
            // Clear the bottom 3 rows of the play area
            for y in 0..3 {
                for x in 0..9 {
                    let _ = board.take(Position::new(x, y));
                }
            }
            collapse(&mut board)
        })
    });
}

fn bench_shuffle(c: &mut Criterion) {
    let template = populated(12345);
    let mut rng = TileRng::new(7);

    c.bench_function("shuffle_9x9", |b| {
        b.iter(|| {
            let mut board = template.clone();
            shuffle_board(&mut board, &mut rng, 10_000)
        })
    });
}

fn bench_best_move_swap(c: &mut Criterion) {
    c.bench_function("populate_and_swap", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(SimConfig::default().with_seed(12345)).unwrap();
            sim.populate().unwrap();
            if let Some(best) = sim.best_move() {
                sim.handle_swap(best.from, best.to).unwrap();
                sim.settle(10_000);
            }
            sim.stats()
        })
    });
}

criterion_group!(
    benches,
    bench_scan_matches,
    bench_scan_moves,
    bench_collapse,
    bench_shuffle,
    bench_best_move_swap
);
criterion_main!(benches);
