//! Negamax alpha-beta search.
//!
//! Fail-hard alpha-beta with principal variation search, null move pruning,
//! transposition-table probing and storing, and draw/terminal handling. At
//! the horizon the search drops into quiescence.

use super::qsearch::quiescence;
use super::tt::Bound;
use super::{ordering, Searcher};
use crate::eval::is_insufficient_material;
use crate::types::{Board, BoardStatus, Move, MoveGen, Piece, Score, EMPTY, SCORE_MATE};

/// Search `board` to `depth` plies within the `(alpha, beta)` window.
///
/// `halfmove` is the halfmove clock of `board`; `null_allowed` is false
/// directly after a null move so two cannot be played in a row.
pub fn negamax(
    searcher: &mut Searcher,
    board: &Board,
    halfmove: u32,
    depth: i32,
    mut alpha: Score,
    beta: Score,
    null_allowed: bool,
) -> Score {
    if searcher.stopped() {
        return alpha;
    }

    if depth <= 0 {
        return quiescence(searcher, board, alpha, beta, 0);
    }

    searcher.visit_node();
    if searcher.stopped() {
        return alpha;
    }

    let hash = board.get_hash();
    let mut tt_move: Option<Move> = None;

    if let Some(entry) = searcher.tt.probe(hash) {
        tt_move = entry.best_move();
        // Scores from a shallower search cannot be trusted at this depth.
        if entry.depth() >= depth {
            match entry.bound() {
                Bound::Exact => return entry.score(),
                Bound::Upper if entry.score() <= alpha => return alpha,
                Bound::Lower if entry.score() >= beta => return beta,
                _ => {}
            }
        }
    }

    // The 50-move rule and repetitions end the line immediately.
    if halfmove >= 100 || searcher.is_repetition(hash, halfmove) {
        return Score::DRAW;
    }

    match board.status() {
        BoardStatus::Checkmate => {
            // The node-count offset makes mates found earlier score higher.
            return Score::cp(-SCORE_MATE + searcher.nodes as i32);
        }
        BoardStatus::Stalemate => return Score::DRAW,
        BoardStatus::Ongoing => {}
    }
    if is_insufficient_material(board) {
        return Score::DRAW;
    }

    // Null move pruning: give the opponent a free move; if the reduced
    // search still fails high, a real move would too. Skipped in check and
    // in pawn-only endgames where zugzwang breaks the assumption.
    if null_allowed && depth >= 3 && *board.checkers() == EMPTY && has_non_pawn_material(board) {
        if let Some(null_board) = board.null_move() {
            searcher.history.push(null_board.get_hash());
            let null_score = -negamax(
                searcher,
                &null_board,
                halfmove + 1,
                depth - 3,
                -beta,
                -beta + Score::cp(1),
                false,
            );
            searcher.history.pop();

            if null_score >= beta {
                return beta;
            }
        }
    }

    let mut moves: Vec<Move> = MoveGen::new_legal(board).collect();
    if moves.is_empty() {
        return if *board.checkers() != EMPTY {
            Score::cp(-SCORE_MATE + searcher.nodes as i32)
        } else {
            Score::DRAW
        };
    }

    ordering::order_moves(board, &mut moves, tt_move);

    let mut best_score = Score::neg_infinity();
    let mut best_move: Option<Move> = None;
    let mut bound = Bound::Upper;

    for (i, &mv) in moves.iter().enumerate() {
        let child = board.make_move_new(mv);
        let child_halfmove = if resets_halfmove(board, mv) {
            0
        } else {
            halfmove + 1
        };
        searcher.history.push(child.get_hash());

        // The first move gets the full window; later moves are probed with
        // a null window and re-searched only when they beat alpha.
        let score = if i == 0 {
            -negamax(searcher, &child, child_halfmove, depth - 1, -beta, -alpha, true)
        } else {
            let probe = -negamax(
                searcher,
                &child,
                child_halfmove,
                depth - 1,
                -alpha - Score::cp(1),
                -alpha,
                true,
            );
            if probe > alpha && probe < beta {
                -negamax(searcher, &child, child_halfmove, depth - 1, -beta, -alpha, true)
            } else {
                probe
            }
        };

        searcher.history.pop();

        if searcher.stopped() {
            return alpha;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }

        if score >= beta {
            searcher.tt.store(hash, best_move, depth, beta, Bound::Lower);
            return beta;
        }

        if score > alpha {
            alpha = score;
            bound = Bound::Exact;
        }
    }

    searcher.tt.store(hash, best_move, depth, best_score, bound);
    best_score
}

/// True if the side to move has at least one piece besides pawns and king.
fn has_non_pawn_material(board: &Board) -> bool {
    let ours = board.color_combined(board.side_to_move());
    (ours & !(board.pieces(Piece::Pawn) | board.pieces(Piece::King))) != EMPTY
}

/// Captures and pawn moves reset the halfmove clock.
fn resets_halfmove(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.get_dest()).is_some() || board.piece_on(mv.get_source()) == Some(Piece::Pawn)
}
