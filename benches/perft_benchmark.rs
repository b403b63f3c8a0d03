use chess_engine::movegen;
use chess_engine::position::Position;

use criterion::{criterion_group, criterion_main, Criterion};

fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = movegen::legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| {
            let child = movegen::make_move(position, *mv).expect("legal move applies");
            perft(&child, depth - 1)
        })
        .sum()
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("count all legal positions to depth 3", |b| {
        b.iter(|| perft(&Position::starting_position(), 3))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
