use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::evaluate::evaluate;
use crate::movegen::{self, Move, MoveList};
use crate::position::Position;
use crate::transposition::{Bound, Entry, TranspositionTable};
use crate::zobrist;

/// A forced-mate score, large enough that no realistic evaluation can reach
/// it. Its absolute value exceeding [`MATE_THRESHOLD`] is how
/// [`Searcher::find_best_move`] recognizes a proven mate and stops deepening.
pub const MATE_SCORE: i32 = 1_000_000;
pub const MATE_THRESHOLD: i32 = 10_000;

#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best: Option<Move>,
    pub score: i32,
    pub depth_reached: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Owns the transposition table used across an iterative-deepening run.
/// Single-threaded and synchronous: one `Searcher` mutates no shared state
/// beyond its own table, and is not meant to be shared across concurrent
/// searches.
pub struct Searcher {
    tt: TranspositionTable,
}

impl Searcher {
    pub fn new() -> Self {
        Searcher {
            tt: TranspositionTable::default(),
        }
    }

    pub fn clear(&mut self) {
        self.tt.clear();
    }

    pub fn find_best_move(
        &mut self,
        position: &Position,
        max_depth: u8,
        max_time: Duration,
    ) -> SearchResult {
        let deadline = Instant::now() + max_time;
        let start = Instant::now();
        let mut nodes = 0u64;

        let mut best_move: Option<Move> = None;
        let mut best_score = 0i32;
        let mut depth_reached = 0u8;

        let root_moves = movegen::legal_moves(position);
        if root_moves.is_empty() {
            return SearchResult {
                best: None,
                score: evaluate(position),
                depth_reached: 0,
                nodes: 0,
                elapsed: start.elapsed(),
            };
        }

        for depth in 1..=max_depth {
            if Instant::now() >= deadline {
                break;
            }

            let mut ordered = root_moves.clone();
            order_moves(position, &mut ordered);

            let mut alpha = -MATE_SCORE - 1;
            let beta = MATE_SCORE + 1;
            let mut iteration_best: Option<Move> = None;
            let mut iteration_score = alpha;
            let mut timed_out = false;

            for mv in ordered.iter() {
                let child = match movegen::make_move(position, *mv) {
                    Ok(child) => child,
                    Err(_) => continue,
                };
                if Instant::now() >= deadline {
                    timed_out = true;
                    break;
                }
                let score = -self.negamax(&child, depth - 1, -beta, -alpha, deadline, &mut nodes);
                if score > iteration_score || iteration_best.is_none() {
                    iteration_score = score;
                    iteration_best = Some(*mv);
                }
                if score > alpha {
                    alpha = score;
                }
            }

            if timed_out {
                debug!("search: discarding partial iteration at depth {}", depth);
                break;
            }

            best_move = iteration_best.or(best_move);
            best_score = iteration_score;
            depth_reached = depth;
            debug!(
                "search: depth {} complete, best {:?} score {} nodes {}",
                depth, best_move, best_score, nodes
            );

            if best_score.abs() > MATE_THRESHOLD {
                break;
            }
        }

        SearchResult {
            best: best_move,
            score: best_score,
            depth_reached,
            nodes,
            elapsed: start.elapsed(),
        }
    }

    /// `negamax(pos, depth, alpha, beta) -> score`, from the side-to-move's
    /// perspective.
    fn negamax(
        &mut self,
        position: &Position,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        deadline: Instant,
        nodes: &mut u64,
    ) -> i32 {
        let hash = zobrist::hash(position);
        let original_alpha = alpha;

        if let Some(entry) = self.tt.probe(hash, depth) {
            match entry.bound {
                Bound::Exact => return entry.score,
                Bound::LowerBound => {
                    if entry.score > alpha {
                        alpha = entry.score;
                    }
                }
                Bound::UpperBound => {
                    if entry.score < beta {
                        beta = entry.score;
                    }
                }
            }
            if alpha >= beta {
                return entry.score;
            }
        }

        if Instant::now() >= deadline {
            return 0;
        }

        *nodes += 1;

        let moves = movegen::legal_moves(position);

        if depth == 0 {
            if moves.is_empty() {
                let in_check = crate::attacks::is_in_check(position, position.side_to_move());
                return if in_check { -MATE_SCORE } else { 0 };
            }
            return evaluate(position);
        }

        if moves.is_empty() {
            let in_check = crate::attacks::is_in_check(position, position.side_to_move());
            let score = if in_check { -MATE_SCORE } else { 0 };
            self.tt.store(
                hash,
                Entry {
                    depth,
                    score,
                    bound: Bound::Exact,
                },
            );
            return score;
        }

        let mut ordered = moves;
        order_moves(position, &mut ordered);

        let mut best_score = -MATE_SCORE - 1;
        for mv in ordered.iter() {
            let child = match movegen::make_move(position, *mv) {
                Ok(child) => child,
                Err(_) => continue,
            };
            let score = -self.negamax(&child, depth - 1, -beta, -alpha, deadline, nodes);
            if score > best_score {
                best_score = score;
            }
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                self.tt.store(
                    hash,
                    Entry {
                        depth,
                        score: best_score,
                        bound: Bound::LowerBound,
                    },
                );
                trace!("negamax: beta cutoff at depth {} on {:?}", depth, mv);
                return best_score;
            }
        }

        let bound = if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::UpperBound
        };
        self.tt.store(
            hash,
            Entry {
                depth,
                score: best_score,
                bound,
            },
        );
        best_score
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new()
    }
}

/// Orders moves to make alpha-beta pruning more effective: captures by
/// captured-piece value, then promotions, then centralization. Has no effect
/// on the returned score, only on pruning efficiency.
fn order_moves(position: &Position, moves: &mut MoveList) {
    let mut scored: Vec<(i32, Move)> = moves.iter().map(|mv| (move_score(position, *mv), *mv)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    for (slot, (_, mv)) in moves.iter_mut().zip(scored.into_iter()) {
        *slot = mv;
    }
}

fn move_score(position: &Position, mv: Move) -> i32 {
    let mut score = 0;

    if let Some(captured) = position.get(mv.to).piece() {
        score += 1000 + captured.kind.material_value();
    }

    if let Some(promotion) = mv.promotion {
        score += 500 + promotion.material_value();
    }

    let center_distance = center_distance(mv.to);
    score += (7 - center_distance) * 10;

    score
}

fn center_distance(square: crate::square::Square) -> i32 {
    let row_dist = ((square.row as i32) - 4).abs().min(((square.row as i32) - 3).abs());
    let col_dist = ((square.col as i32) - 4).abs().min(((square.col as i32) - 3).abs());
    row_dist + col_dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn test_mate_in_one_is_found() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut searcher = Searcher::new();
        let result = searcher.find_best_move(&pos, 3, Duration::from_secs(5));
        let mv = result.best.expect("a move should be found");
        let next = movegen::make_move(&pos, mv).unwrap();
        assert!(movegen::legal_moves(&next).is_empty());
        assert!(crate::attacks::is_in_check(&next, next.side_to_move()));
        assert!(result.score.abs() > MATE_THRESHOLD);
    }

    #[test]
    fn test_mate_in_one_is_found_at_depth_one() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut searcher = Searcher::new();
        let result = searcher.find_best_move(&pos, 1, Duration::from_secs(5));
        let mv = result.best.expect("a move should be found");
        let next = movegen::make_move(&pos, mv).unwrap();
        assert!(movegen::legal_moves(&next).is_empty());
        assert!(crate::attacks::is_in_check(&next, next.side_to_move()));
        assert!(result.score.abs() > MATE_THRESHOLD);
    }

    #[test]
    fn test_returns_a_legal_move_at_starting_position() {
        let pos = Position::starting_position();
        let mut searcher = Searcher::new();
        let result = searcher.find_best_move(&pos, 1, Duration::from_secs(1));
        let mv = result.best.expect("a move should be found");
        assert!(movegen::legal_moves(&pos).contains(&mv));
    }

    #[test]
    fn test_checkmated_side_to_move_yields_no_best_move() {
        let pos = Position::from_fen("6k1/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut searcher = Searcher::new();
        let result = searcher.find_best_move(&pos, 3, Duration::from_secs(1));
        assert_eq!(result.best, None);
    }
}
