use chess_engine::movegen;
use chess_engine::position::Position;

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

#[test]
fn test_perft_depth_1() {
    let pos = Position::starting_position();
    assert_eq!(perft(&pos, 1), 20);
}

#[test]
fn test_perft_depth_2() {
    let pos = Position::starting_position();
    assert_eq!(perft(&pos, 2), 400);
}

#[test]
fn test_perft_depth_3() {
    let pos = Position::starting_position();
    assert_eq!(perft(&pos, 3), 8_902);
}

#[test]
#[ignore = "depth 4 is ~200k leaf nodes, slow without bitboard move generation"]
fn test_perft_depth_4() {
    let pos = Position::starting_position();
    assert_eq!(perft(&pos, 4), 197_281);
}

#[test]
#[ignore = "depth 5 is ~4.9M leaf nodes, too slow to run by default"]
fn test_perft_depth_5() {
    let pos = Position::starting_position();
    assert_eq!(perft(&pos, 5), 4_865_609);
}
