//! UCI command parser.

use super::SearchParams;

/// A parsed UCI command.
#[derive(Debug, Clone)]
pub enum UciCommand {
    /// "uci" - identify the engine
    Uci,
    /// "debug on/off"
    Debug(bool),
    /// "isready" - synchronization
    IsReady,
    /// "setoption name X value Y"
    SetOption { name: String, value: Option<String> },
    /// "ucinewgame" - a new game is starting
    UciNewGame,
    /// "position startpos/fen [moves ...]"
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// "go ..." - start searching
    Go(SearchParams),
    /// "stop" - stop searching
    Stop,
    /// "quit" - exit the engine
    Quit,
    /// "d" - display the board (non-standard but common)
    Display,
    /// Anything unrecognized
    Unknown(String),
}

/// Parse one input line into a [`UciCommand`].
pub fn parse_command(input: &str) -> UciCommand {
    let input = input.trim();
    let mut parts = input.split_whitespace();

    match parts.next() {
        Some("uci") => UciCommand::Uci,
        Some("debug") => UciCommand::Debug(parts.next() == Some("on")),
        Some("isready") => UciCommand::IsReady,
        Some("setoption") => parse_setoption(&mut parts),
        Some("ucinewgame") => UciCommand::UciNewGame,
        Some("position") => parse_position(&mut parts),
        Some("go") => parse_go(&mut parts),
        Some("stop") => UciCommand::Stop,
        Some("quit") => UciCommand::Quit,
        Some("d") => UciCommand::Display,
        _ => UciCommand::Unknown(input.to_string()),
    }
}

fn parse_setoption<'a>(parts: &mut impl Iterator<Item = &'a str>) -> UciCommand {
    let mut name = String::new();
    let mut value = None;
    let mut parsing_name = false;
    let mut parsing_value = false;

    for token in parts {
        match token {
            "name" => {
                parsing_name = true;
                parsing_value = false;
            }
            "value" => {
                parsing_name = false;
                parsing_value = true;
            }
            _ => {
                if parsing_name {
                    if !name.is_empty() {
                        name.push(' ');
                    }
                    name.push_str(token);
                } else if parsing_value {
                    let v = value.get_or_insert(String::new());
                    if !v.is_empty() {
                        v.push(' ');
                    }
                    v.push_str(token);
                }
            }
        }
    }

    UciCommand::SetOption { name, value }
}

fn parse_position<'a>(parts: &mut impl Iterator<Item = &'a str>) -> UciCommand {
    let mut fen = None;
    let mut moves = Vec::new();
    let mut parsing_moves = false;

    while let Some(token) = parts.next() {
        match token {
            "startpos" => fen = None,
            "fen" => {
                // A FEN is six whitespace-separated fields.
                let mut fen_parts = Vec::new();
                for _ in 0..6 {
                    match parts.next() {
                        Some("moves") => {
                            parsing_moves = true;
                            break;
                        }
                        Some(part) => fen_parts.push(part),
                        None => break,
                    }
                }
                if !fen_parts.is_empty() {
                    fen = Some(fen_parts.join(" "));
                }
            }
            "moves" => parsing_moves = true,
            _ if parsing_moves => moves.push(token.to_string()),
            _ => {}
        }
    }

    UciCommand::Position { fen, moves }
}

fn parse_go<'a>(parts: &mut impl Iterator<Item = &'a str>) -> UciCommand {
    let mut params = SearchParams::default();

    let tokens: Vec<&str> = parts.collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "infinite" => params.infinite = true,
            "depth" => {
                i += 1;
                params.depth = tokens.get(i).and_then(|t| t.parse().ok());
            }
            "movetime" => {
                i += 1;
                params.movetime = tokens.get(i).and_then(|t| t.parse().ok());
            }
            "wtime" => {
                i += 1;
                params.wtime = tokens.get(i).and_then(|t| t.parse().ok());
            }
            "btime" => {
                i += 1;
                params.btime = tokens.get(i).and_then(|t| t.parse().ok());
            }
            // Recognized but unused; skip their argument.
            "winc" | "binc" | "movestogo" | "nodes" | "mate" => i += 1,
            _ => {}
        }
        i += 1;
    }

    UciCommand::Go(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert!(matches!(parse_command("uci"), UciCommand::Uci));
        assert!(matches!(parse_command("  isready "), UciCommand::IsReady));
        assert!(matches!(parse_command("stop"), UciCommand::Stop));
        assert!(matches!(parse_command("quit"), UciCommand::Quit));
        assert!(matches!(parse_command("ucinewgame"), UciCommand::UciNewGame));
        assert!(matches!(parse_command("debug on"), UciCommand::Debug(true)));
        assert!(matches!(parse_command("debug off"), UciCommand::Debug(false)));
        assert!(matches!(parse_command("banana"), UciCommand::Unknown(_)));
    }

    #[test]
    fn test_parse_position_startpos_with_moves() {
        match parse_command("position startpos moves e2e4 e7e5") {
            UciCommand::Position { fen, moves } => {
                assert!(fen.is_none());
                assert_eq!(moves, vec!["e2e4", "e7e5"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_position_fen() {
        let line = "position fen 6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1 moves a1a8";
        match parse_command(line) {
            UciCommand::Position { fen, moves } => {
                assert_eq!(fen.as_deref(), Some("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"));
                assert_eq!(moves, vec!["a1a8"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_go() {
        match parse_command("go depth 6 movetime 250") {
            UciCommand::Go(params) => {
                assert_eq!(params.depth, Some(6));
                assert_eq!(params.movetime, Some(250));
                assert!(!params.infinite);
            }
            other => panic!("unexpected command {other:?}"),
        }

        match parse_command("go wtime 60000 btime 55000 winc 1000 binc 1000") {
            UciCommand::Go(params) => {
                assert_eq!(params.wtime, Some(60000));
                assert_eq!(params.btime, Some(55000));
                assert!(params.movetime.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(matches!(
            parse_command("go infinite"),
            UciCommand::Go(SearchParams { infinite: true, .. })
        ));
    }

    #[test]
    fn test_parse_setoption() {
        match parse_command("setoption name Hash value 64") {
            UciCommand::SetOption { name, value } => {
                assert_eq!(name, "Hash");
                assert_eq!(value.as_deref(), Some("64"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
