//! Static evaluation.
//!
//! Material plus piece-square tables, with a pawn-count bonus, a mobility
//! term, an endgame king-distance term and a small in-check penalty. The
//! score is returned from the side-to-move's perspective.

mod psqt;

use crate::types::{
    piece_value, BitBoard, Board, BoardStatus, Color, MoveGen, Piece, Score, Square, EMPTY,
    KING_VALUE, SCORE_MATE,
};

/// Evaluate the position from the side-to-move's perspective.
pub fn evaluate(board: &Board) -> Score {
    match board.status() {
        // The side to move is mated.
        BoardStatus::Checkmate => return Score::cp(-SCORE_MATE),
        BoardStatus::Stalemate => return Score::DRAW,
        BoardStatus::Ongoing => {}
    }
    if is_insufficient_material(board) {
        return Score::DRAW;
    }

    let endgame = non_pawn_piece_count(board) <= 6;
    let mut score = 0;

    for &color in &[Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        let ours = board.color_combined(color);

        for sq in board.pieces(Piece::Pawn) & ours {
            let table = if endgame { &psqt::PAWN_EG } else { &psqt::PAWN };
            score += sign * (piece_value(Piece::Pawn) + table[psqt::index(sq, color)]);
        }
        for sq in board.pieces(Piece::Knight) & ours {
            score += sign * (piece_value(Piece::Knight) + psqt::KNIGHT[psqt::index(sq, color)]);
        }
        for sq in board.pieces(Piece::Bishop) & ours {
            score += sign * (piece_value(Piece::Bishop) + psqt::BISHOP[psqt::index(sq, color)]);
        }
        for sq in board.pieces(Piece::Rook) & ours {
            score += sign * (piece_value(Piece::Rook) + psqt::ROOK[psqt::index(sq, color)]);
        }
        for sq in board.pieces(Piece::Queen) & ours {
            score += sign * (piece_value(Piece::Queen) + psqt::QUEEN[psqt::index(sq, color)]);
        }

        let king_sq = board.king_square(color);
        let table = if endgame { &psqt::KING_EG } else { &psqt::KING };
        score += sign * (KING_VALUE + table[psqt::index(king_sq, color)]);
    }

    // Material already counts pawns; the extra per-pawn bonus is kept anyway.
    let white_pawns = (board.pieces(Piece::Pawn) & board.color_combined(Color::White)).popcnt();
    let black_pawns = (board.pieces(Piece::Pawn) & board.color_combined(Color::Black)).popcnt();
    score += 10 * (white_pawns as i32 - black_pawns as i32);

    score += 5 * (mobility(board, Color::White) - mobility(board, Color::Black));

    if endgame {
        let us = board.side_to_move();
        score += king_distance_term(board.king_square(us), board.king_square(!us));
    }

    if *board.checkers() != EMPTY {
        score += if board.side_to_move() == Color::White {
            -20
        } else {
            20
        };
    }

    if board.side_to_move() == Color::White {
        Score::cp(score)
    } else {
        Score::cp(-score)
    }
}

/// Number of non-pawn, non-king pieces on the board (both colors).
fn non_pawn_piece_count(board: &Board) -> u32 {
    (board.combined() & !(board.pieces(Piece::Pawn) | board.pieces(Piece::King))).popcnt()
}

/// Legal-move count for `color`'s pieces.
///
/// Moves are only generated for the side to move, so the count for the other
/// color is always zero.
fn mobility(board: &Board, color: Color) -> i32 {
    MoveGen::new_legal(board)
        .filter(|m| board.color_on(m.get_source()) == Some(color))
        .count() as i32
}

/// Endgame bonus for driving the opponent king to the edge and bringing our
/// own king closer to it.
fn king_distance_term(friendly: Square, opponent: Square) -> i32 {
    let file = friendly.get_file().to_index() as i32;
    let rank = friendly.get_rank().to_index() as i32;
    let opp_file = opponent.get_file().to_index() as i32;
    let opp_rank = opponent.get_rank().to_index() as i32;

    let opp_dist_from_center =
        (3 - opp_file).max(opp_file - 4) + (3 - opp_rank).max(opp_rank - 4);
    let dist_between_kings = (file - opp_file).abs() + (rank - opp_rank).abs();

    10 * (opp_dist_from_center + 14 - dist_between_kings)
}

/// True if neither side has enough material to deliver mate.
pub fn is_insufficient_material(board: &Board) -> bool {
    let heavy =
        board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    if heavy != EMPTY {
        return false;
    }

    let knights = board.pieces(Piece::Knight);
    let bishops = board.pieces(Piece::Bishop);
    match (knights | bishops).popcnt() {
        0 | 1 => true,
        2 => {
            // Opposite-side bishops on same-colored squares cannot mate.
            let dark = BitBoard::new(0xAA55_AA55_AA55_AA55);
            let dark_bishops = (bishops & dark).popcnt();
            *knights == EMPTY
                && (bishops & board.color_combined(Color::White)).popcnt() == 1
                && (bishops & board.color_combined(Color::Black)).popcnt() == 1
                && (dark_bishops == 0 || dark_bishops == 2)
        }
        _ => false,
    }
}
