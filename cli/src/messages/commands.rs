use core::fmt;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::str::FromStr;

use anyhow::Result;
use winnow::Parser;
use winnow::Result as WinnowResult;
use winnow::ascii::{digit1, space1};
use winnow::combinator::{alt, preceded};
use winnow::token::rest;

pub trait ReadSessionCommand {
    /// `None` once the input is exhausted.
    fn read_session_command(&mut self) -> Result<Option<String>>;
}

pub struct SessionCommandStdinReader;

impl ReadSessionCommand for SessionCommandStdinReader {
    fn read_session_command(&mut self) -> Result<Option<String>> {
        let mut buffer = String::new();
        let read = io::stdin().lock().read_line(&mut buffer)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buffer))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum SessionCommand {
    NewGame,
    Position { sfen: Option<String> },
    Show,
    Sfen,
    Moves,
    Play { index: usize },
    Export,
    Features,
    Status,
    Perft { depth: usize },
    PerftFull { depth: usize },
    Quit,
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionCommand::NewGame => write!(f, "newgame"),
            SessionCommand::Position { sfen } => match sfen {
                Some(sfen) => write!(f, "position sfen {}", sfen),
                None => write!(f, "position startpos"),
            },
            SessionCommand::Show => write!(f, "show"),
            SessionCommand::Sfen => write!(f, "sfen"),
            SessionCommand::Moves => write!(f, "moves"),
            SessionCommand::Play { index } => write!(f, "play {}", index),
            SessionCommand::Export => write!(f, "export"),
            SessionCommand::Features => write!(f, "features"),
            SessionCommand::Status => write!(f, "status"),
            SessionCommand::Perft { depth } => write!(f, "perft {}", depth),
            SessionCommand::PerftFull { depth } => write!(f, "perft_full {}", depth),
            SessionCommand::Quit => write!(f, "quit"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SessionCommandParseError(String);

impl Display for SessionCommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SessionCommandParseError {}

impl FromStr for SessionCommand {
    type Err = SessionCommandParseError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        alt((
            parse_newgame,
            parse_position,
            parse_show,
            parse_sfen,
            parse_moves,
            parse_play,
            parse_export,
            parse_features,
            parse_status,
            // perft_full must go before perft because they share a prefix
            parse_perft_full,
            parse_perft,
            parse_quit,
        ))
        .parse(input.trim())
        .map_err(|_| SessionCommandParseError(format!("cannot parse: [{}]", input.trim())))
    }
}

fn parse_newgame(input: &mut &str) -> WinnowResult<SessionCommand> {
    "newgame".value(SessionCommand::NewGame).parse_next(input)
}

fn parse_position(input: &mut &str) -> WinnowResult<SessionCommand> {
    preceded(
        ("position", space1),
        alt((
            "startpos".value(None),
            preceded(("sfen", space1), rest.map(|sfen: &str| Some(sfen.to_string()))),
        )),
    )
    .map(|sfen| SessionCommand::Position { sfen })
    .parse_next(input)
}

fn parse_show(input: &mut &str) -> WinnowResult<SessionCommand> {
    "show".value(SessionCommand::Show).parse_next(input)
}

fn parse_sfen(input: &mut &str) -> WinnowResult<SessionCommand> {
    "sfen".value(SessionCommand::Sfen).parse_next(input)
}

fn parse_moves(input: &mut &str) -> WinnowResult<SessionCommand> {
    "moves".value(SessionCommand::Moves).parse_next(input)
}

fn parse_play(input: &mut &str) -> WinnowResult<SessionCommand> {
    preceded(("play", space1), parse_number)
        .map(|index| SessionCommand::Play { index })
        .parse_next(input)
}

fn parse_export(input: &mut &str) -> WinnowResult<SessionCommand> {
    "export".value(SessionCommand::Export).parse_next(input)
}

fn parse_features(input: &mut &str) -> WinnowResult<SessionCommand> {
    "features".value(SessionCommand::Features).parse_next(input)
}

fn parse_status(input: &mut &str) -> WinnowResult<SessionCommand> {
    "status".value(SessionCommand::Status).parse_next(input)
}

fn parse_perft(input: &mut &str) -> WinnowResult<SessionCommand> {
    preceded(("perft", space1), parse_number)
        .map(|depth| SessionCommand::Perft { depth })
        .parse_next(input)
}

fn parse_perft_full(input: &mut &str) -> WinnowResult<SessionCommand> {
    preceded(("perft_full", space1), parse_number)
        .map(|depth| SessionCommand::PerftFull { depth })
        .parse_next(input)
}

fn parse_quit(input: &mut &str) -> WinnowResult<SessionCommand> {
    "quit".value(SessionCommand::Quit).parse_next(input)
}

fn parse_number(input: &mut &str) -> WinnowResult<usize> {
    digit1
        .try_map(|digits: &str| usize::from_str(digits))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case("newgame", SessionCommand::NewGame ; "newgame")]
    #[test_case("position startpos", SessionCommand::Position { sfen: None } ; "startpos")]
    #[test_case(
        "position sfen l4/5/5/5/5/4L b 2P 3",
        SessionCommand::Position { sfen: Some("l4/5/5/5/5/4L b 2P 3".to_string()) } ;
        "sfen"
    )]
    #[test_case("show", SessionCommand::Show ; "show")]
    #[test_case("sfen", SessionCommand::Sfen ; "sfen command")]
    #[test_case("moves", SessionCommand::Moves ; "moves")]
    #[test_case("play 12", SessionCommand::Play { index: 12 } ; "play")]
    #[test_case("export", SessionCommand::Export ; "export")]
    #[test_case("features", SessionCommand::Features ; "features")]
    #[test_case("status", SessionCommand::Status ; "status")]
    #[test_case("perft 3", SessionCommand::Perft { depth: 3 } ; "perft")]
    #[test_case("perft_full 2", SessionCommand::PerftFull { depth: 2 } ; "perft full")]
    #[test_case("quit\n", SessionCommand::Quit ; "trailing newline")]
    fn test_parse(input: &str, want: SessionCommand) -> TestResult {
        let got = SessionCommand::from_str(input)?;
        assert_eq!(got, want);
        Ok(())
    }

    #[test_case("" ; "empty")]
    #[test_case("play" ; "play without index")]
    #[test_case("play -1" ; "negative index")]
    #[test_case("perft x" ; "bad depth")]
    #[test_case("position" ; "position without source")]
    #[test_case("go infinite" ; "unknown")]
    fn test_parse_invalid(input: &str) {
        assert!(SessionCommand::from_str(input).is_err());
    }

    #[test_case(SessionCommand::Play { index: 4 })]
    #[test_case(SessionCommand::Position { sfen: None })]
    #[test_case(SessionCommand::PerftFull { depth: 2 })]
    fn test_display_parses_back(command: SessionCommand) -> TestResult {
        assert_eq!(SessionCommand::from_str(&command.to_string())?, command);
        Ok(())
    }
}
