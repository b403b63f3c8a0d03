use std::time::Duration;

use chess_engine::position::Position;
use chess_engine::search::Searcher;

use criterion::{criterion_group, criterion_main, Criterion};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("find best move from the starting position, depth 4", |b| {
        b.iter(|| {
            let mut searcher = Searcher::new();
            searcher.find_best_move(&Position::starting_position(), 4, Duration::from_secs(10))
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
