//! Search module.
//!
//! # Architecture
//! - `Searcher`: mutable search context (transposition table, node counter,
//!   clock, stop flag, position history) plus the iterative-deepening driver
//! - `negamax`: fail-hard alpha-beta with PVS and null move pruning
//! - `qsearch`: capture-only search at the horizon
//! - `ordering`: move ordering heuristics
//! - `tt`: transposition table
//! - `limits`: time and depth limits derived from `go` parameters

mod limits;
mod negamax;
mod ordering;
mod qsearch;
pub mod tt;

pub use limits::{SearchLimits, DEFAULT_DEPTH, DEFAULT_MOVETIME_MS};
pub use tt::TranspositionTable;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::{Board, Hash, Move, MoveGen, NodeCount, Score};

/// Result of one `search` call.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, `None` only when the root has no legal moves.
    pub best_move: Option<Move>,
    /// Score of the last completed iteration.
    pub score: Score,
    /// Depth of the last completed iteration.
    pub depth: i32,
    /// Total nodes visited.
    pub nodes: NodeCount,
    /// Elapsed wall-clock time in milliseconds.
    pub time_ms: u64,
}

/// Mutable context threaded through the whole search.
pub struct Searcher<'a> {
    pub(crate) tt: &'a mut TranspositionTable,
    pub(crate) stop: Arc<AtomicBool>,
    pub(crate) nodes: NodeCount,
    pub(crate) start_time: Instant,
    pub(crate) time_limit: Duration,
    /// Hashes of every position since the game started, including the
    /// current search path; used for repetition detection.
    pub(crate) history: Vec<Hash>,
}

impl<'a> Searcher<'a> {
    pub fn new(
        tt: &'a mut TranspositionTable,
        stop: Arc<AtomicBool>,
        time_limit: Duration,
        history: Vec<Hash>,
    ) -> Self {
        Self {
            tt,
            stop,
            nodes: 0,
            start_time: Instant::now(),
            time_limit,
            history,
        }
    }

    /// Iterative-deepening driver.
    ///
    /// Searches depth 1, 2, … up to `max_depth`, adopting the root best
    /// move from the transposition table and printing one `info` line after
    /// each completed iteration. An interrupted iteration is discarded and
    /// the move from the last completed one is kept.
    pub fn search(&mut self, board: &Board, halfmove: u32, max_depth: i32) -> SearchResult {
        self.stop.store(false, Ordering::Relaxed);
        self.nodes = 0;
        self.start_time = Instant::now();

        let mut best_move: Option<Move> = None;
        let mut best_score = Score::neg_infinity();
        let mut completed_depth = 0;

        for depth in 1..=max_depth {
            if self.stopped() {
                break;
            }

            let score = negamax::negamax(
                self,
                board,
                halfmove,
                depth,
                -Score::INFINITY,
                Score::INFINITY,
                true,
            );

            if self.stopped() {
                break;
            }

            if let Some(entry) = self.tt.probe(board.get_hash()) {
                if let Some(mv) = entry.best_move() {
                    best_move = Some(mv);
                }
            }
            best_score = score;
            completed_depth = depth;

            println!(
                "info depth {} score cp {} nodes {} time {} pv {}",
                depth,
                score,
                self.nodes,
                self.start_time.elapsed().as_millis(),
                best_move.map_or_else(|| "0000".to_string(), |m| m.to_string()),
            );
        }

        // The table entry may predate this search; never trust it blindly.
        let adopted_is_legal =
            best_move.is_some_and(|mv| MoveGen::new_legal(board).any(|m| m == mv));
        if !adopted_is_legal {
            best_move = MoveGen::new_legal(board).next();
        }

        SearchResult {
            best_move,
            score: best_score,
            depth: completed_depth,
            nodes: self.nodes,
            time_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }

    /// True once the stop flag is set, either externally or by the clock.
    #[inline]
    pub(crate) fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Count a node, polling the clock every 1024 nodes.
    #[inline]
    pub(crate) fn visit_node(&mut self) {
        self.nodes += 1;
        if self.nodes % 1024 == 0 && self.start_time.elapsed() > self.time_limit {
            self.stop.store(true, Ordering::Relaxed);
        }
    }

    /// Whether the position hashing to `hash` (the top of the history stack)
    /// occurred before. Only the last `halfmove` plies can repeat; the hash
    /// covers side to move, castling rights and en passant.
    pub(crate) fn is_repetition(&self, hash: Hash, halfmove: u32) -> bool {
        self.history
            .iter()
            .rev()
            .skip(1)
            .take(halfmove as usize)
            .any(|&h| h == hash)
    }
}
