//! UCI command handler and main loop.
//!
//! Commands are read line by line on the protocol thread; `go` hands the
//! position to a search thread so that `stop` can interrupt a running
//! search. The transposition table is shared behind a mutex that the search
//! thread holds for the duration of one search.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use super::parser::{parse_command, UciCommand};
use super::{parse_move, SearchParams, ENGINE_AUTHOR, ENGINE_NAME};
use crate::search::{SearchLimits, Searcher, TranspositionTable, DEFAULT_MOVETIME_MS};
use crate::types::{Board, Hash, Piece};

/// UCI protocol handler.
pub struct UciHandler {
    /// Current position.
    board: Board,
    /// Halfmove clock of `board`; the `chess` crate does not track it.
    halfmove_clock: u32,
    /// Hashes of every position of the game so far, including `board`.
    history: Vec<Hash>,
    /// Transposition table, shared with the search thread.
    tt: Arc<Mutex<TranspositionTable>>,
    /// Cooperative stop flag, shared with the search thread.
    stop: Arc<AtomicBool>,
    /// Currently running search, if any.
    search_thread: Option<JoinHandle<()>>,
    /// Per-move time budget; persists across `go` commands.
    time_limit_ms: u64,
    /// Echo received commands to stderr.
    debug: bool,
    /// Exit the main loop.
    quit: bool,
}

impl UciHandler {
    pub fn new() -> Self {
        let board = Board::default();
        Self {
            board,
            halfmove_clock: 0,
            history: vec![board.get_hash()],
            tt: Arc::new(Mutex::new(TranspositionTable::default())),
            stop: Arc::new(AtomicBool::new(false)),
            search_thread: None,
            time_limit_ms: DEFAULT_MOVETIME_MS,
            debug: false,
            quit: false,
        }
    }

    /// Run the UCI main loop until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("failed to read from stdin")?;
            if self.debug {
                eprintln!("< {line}");
            }
            self.handle_input(&line);
            if self.quit {
                break;
            }
        }
        self.wait_for_search();
        Ok(())
    }

    /// Handle a single input line.
    pub fn handle_input(&mut self, input: &str) {
        match parse_command(input) {
            UciCommand::Uci => self.cmd_uci(),
            UciCommand::Debug(on) => self.debug = on,
            UciCommand::IsReady => self.send("readyok"),
            UciCommand::SetOption { name, value } => self.cmd_setoption(&name, value.as_deref()),
            UciCommand::UciNewGame => self.cmd_ucinewgame(),
            UciCommand::Position { fen, moves } => self.cmd_position(fen.as_deref(), &moves),
            UciCommand::Go(params) => self.cmd_go(params),
            UciCommand::Stop => self.cmd_stop(),
            UciCommand::Quit => self.cmd_quit(),
            UciCommand::Display => self.cmd_display(),
            UciCommand::Unknown(s) => {
                if self.debug && !s.is_empty() {
                    eprintln!("unknown command: {s}");
                }
            }
        }
    }

    /// Send one line to the GUI.
    fn send(&self, msg: &str) {
        println!("{msg}");
        io::stdout().flush().ok();
    }

    fn cmd_uci(&self) {
        self.send(&format!("id name {ENGINE_NAME}"));
        self.send(&format!("id author {ENGINE_AUTHOR}"));
        self.send("option name Hash type spin default 16 min 1 max 1024");
        self.send("uciok");
    }

    fn cmd_setoption(&mut self, name: &str, value: Option<&str>) {
        match name.to_lowercase().as_str() {
            "hash" => {
                if let Some(mb) = value.and_then(|v| v.parse::<usize>().ok()) {
                    self.wait_for_search();
                    let mut tt = self.tt.lock().expect("transposition table lock poisoned");
                    *tt = TranspositionTable::new(mb.clamp(1, 1024));
                }
            }
            _ => {
                if self.debug {
                    eprintln!("unknown option: {name}");
                }
            }
        }
    }

    fn cmd_ucinewgame(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.wait_for_search();

        self.board = Board::default();
        self.halfmove_clock = 0;
        self.history = vec![self.board.get_hash()];
        self.tt
            .lock()
            .expect("transposition table lock poisoned")
            .clear();
    }

    fn cmd_position(&mut self, fen: Option<&str>, moves: &[String]) {
        self.wait_for_search();

        let (mut board, mut clock) = match fen {
            Some(f) => match Board::from_str(f) {
                Ok(b) => (b, halfmove_clock_from_fen(f)),
                Err(err) => {
                    eprintln!("invalid fen {f:?}: {err}; keeping start position");
                    (Board::default(), 0)
                }
            },
            None => (Board::default(), 0),
        };

        let mut history = vec![board.get_hash()];
        for move_str in moves {
            match parse_move(&board, move_str) {
                Some(mv) => {
                    let resets = board.piece_on(mv.get_dest()).is_some()
                        || board.piece_on(mv.get_source()) == Some(Piece::Pawn);
                    clock = if resets { 0 } else { clock + 1 };
                    board = board.make_move_new(mv);
                    history.push(board.get_hash());
                }
                None => eprintln!("illegal move {move_str:?} ignored"),
            }
        }

        self.board = board;
        self.halfmove_clock = clock;
        self.history = history;
    }

    fn cmd_go(&mut self, params: SearchParams) {
        self.wait_for_search();

        let limits = SearchLimits::from_params(&params, self.board.side_to_move(), self.time_limit_ms);
        if !params.infinite {
            self.time_limit_ms = limits.time_limit.as_millis() as u64;
        }
        self.stop.store(false, Ordering::Relaxed);

        let board = self.board;
        let halfmove = self.halfmove_clock;
        let history = self.history.clone();
        let tt = Arc::clone(&self.tt);
        let stop = Arc::clone(&self.stop);

        self.search_thread = Some(thread::spawn(move || {
            let mut tt = tt.lock().expect("transposition table lock poisoned");
            let mut searcher = Searcher::new(&mut tt, stop, limits.time_limit, history);
            let result = searcher.search(&board, halfmove, limits.depth);

            match result.best_move {
                Some(mv) => println!("bestmove {mv}"),
                None => {
                    eprintln!("no legal moves available");
                    println!("bestmove 0000");
                }
            }
            io::stdout().flush().ok();
        }));
    }

    fn cmd_stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // Joining guarantees `bestmove` is printed before the next command.
        self.wait_for_search();
    }

    fn cmd_quit(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.quit = true;
    }

    fn cmd_display(&self) {
        eprintln!("fen: {}", self.board);
        eprintln!("side to move: {:?}", self.board.side_to_move());
        eprintln!("halfmove clock: {}", self.halfmove_clock);
    }

    /// Block until the current search thread, if any, has finished.
    fn wait_for_search(&mut self) {
        if let Some(handle) = self.search_thread.take() {
            if handle.join().is_err() {
                eprintln!("search thread panicked");
            }
        }
    }
}

impl Default for UciHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// The halfmove clock is FEN field five; `chess::Board` discards it.
fn halfmove_clock_from_fen(fen: &str) -> u32 {
    fen.split_whitespace()
        .nth(4)
        .and_then(|t| t.parse().ok())
        .unwrap_or(0)
}
