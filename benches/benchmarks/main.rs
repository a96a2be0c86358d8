use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use itertools::Itertools as _;
use rand::{SeedableRng, rngs::StdRng};
use twenty_fourty_eight_expectimax::{
    board::{Direction, Grid, test_utils},
    search::{Expectimax, HeuristicConfig, SearchConfig, evaluate},
};

/// Generate a vector of random boards for benchmarking.
fn generate_boards(count: usize) -> Vec<Grid> {
    let rng = &mut StdRng::seed_from_u64(0);

    (0..16u8)
        .cartesian_product(0..count)
        .map(|(filled, _)| test_utils::generate_random_board(rng, filled, filled / 2))
        .collect()
}

fn bench_swipe(c: &mut Criterion) {
    const COUNT: usize = 100;

    let mut group = c.benchmark_group("swipe");

    let boards = generate_boards(COUNT);
    group.throughput(Throughput::Elements(boards.len() as u64));

    group.bench_function("baseline_swipe", |b| {
        b.iter(|| {
            for &board in &boards {
                black_box(test_utils::baseline_swipe(board, Direction::Left));
            }
        });
    });

    group.bench_function("swipe", |b| {
        b.iter(|| {
            for &board in &boards {
                black_box(board.swipe(Direction::Left));
            }
        });
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let boards = generate_boards(20);
    let config = HeuristicConfig::default();

    let mut group = c.benchmark_group("heuristic");
    group.throughput(Throughput::Elements(boards.len() as u64));
    group.bench_function("evaluate", |b| {
        b.iter(|| {
            for board in &boards {
                black_box(evaluate(board, &config));
            }
        });
    });
}

fn bench_search(c: &mut Criterion) {
    let board = Grid::from_values([[0, 0, 0, 2], [0, 0, 4, 8], [2, 4, 16, 32], [4, 8, 64, 128]])
        .unwrap();

    let mut group = c.benchmark_group("expectimax");
    group.sample_size(10);

    for depth in [1, 2, 3] {
        let mut engine = Expectimax::new(HeuristicConfig::default(), SearchConfig::default());
        group.bench_function(format!("depth_{depth}"), |b| {
            b.iter(|| black_box(engine.search_with_depth(board, depth)));
        });
    }
}

criterion_group!(benches, bench_swipe, bench_evaluate, bench_search);
criterion_main!(benches);
