//! Quiescence search.
//!
//! Extends the search past the nominal horizon along capture chains only, so
//! the evaluation is never taken in the middle of an exchange.

use super::{ordering, Searcher};
use crate::eval::evaluate;
use crate::types::{Board, Move, MoveGen, Score};

/// Recursion cap for capture chains.
const MAX_QDEPTH: i32 = 10;

/// Fail-hard capture-only search within the `(alpha, beta)` window.
pub fn quiescence(
    searcher: &mut Searcher,
    board: &Board,
    mut alpha: Score,
    beta: Score,
    qdepth: i32,
) -> Score {
    if qdepth > MAX_QDEPTH {
        return evaluate(board);
    }

    searcher.visit_node();
    if searcher.stopped() {
        return alpha;
    }

    let stand_pat = evaluate(board);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut captures: Vec<Move> = MoveGen::new_legal(board)
        .filter(|m| board.piece_on(m.get_dest()).is_some())
        .collect();
    ordering::order_moves(board, &mut captures, None);

    for &mv in &captures {
        let child = board.make_move_new(mv);
        let score = -quiescence(searcher, &child, -beta, -alpha, qdepth + 1);

        if searcher.stopped() {
            return alpha;
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::TranspositionTable;
    use std::str::FromStr;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    fn qsearch(fen: &str) -> Score {
        let board = Board::from_str(fen).unwrap();
        let mut tt = TranspositionTable::new(1);
        let stop = Arc::new(AtomicBool::new(false));
        let mut searcher = Searcher::new(
            &mut tt,
            stop,
            Duration::from_secs(60),
            vec![board.get_hash()],
        );
        quiescence(
            &mut searcher,
            &board,
            Score::neg_infinity(),
            Score::INFINITY,
            0,
        )
    }

    #[test]
    fn test_quiet_position_returns_stand_pat() {
        let fen = "4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 1";
        let board = Board::from_str(fen).unwrap();
        assert_eq!(qsearch(fen), evaluate(&board));
    }

    #[test]
    fn test_hanging_queen_is_taken() {
        // White wins the undefended queen on d5; the score must reflect it.
        let fen = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1";
        let board = Board::from_str(fen).unwrap();
        assert!(qsearch(fen) >= evaluate(&board) + Score::cp(800));
    }
}
