use std::fmt::Display;
use std::io::Write;
use std::time::Instant;

use statig::prelude::*;
use tracing::{debug, error, info, warn};

use goro_engine::{GenerateMoves, Move, Position, PositionError, perft, perft_full};

use crate::messages::{SessionCommand, SessionResponse};

#[derive(Debug)]
pub(crate) struct SessionState<G, W>
where
    G: GenerateMoves + Copy,
    W: Write,
{
    move_gen: G,
    out: W,
}

impl<G, W> SessionState<G, W>
where
    G: GenerateMoves + Copy,
    W: Write,
{
    pub(crate) fn new(move_gen: G, out: W) -> Self {
        Self { move_gen, out }
    }

    fn before_dispatch(
        &mut self,
        _: StateOrSuperstate<'_, State, Superstate>,
        event: &SessionCommand,
    ) {
        debug!("> {}", event);
    }

    fn respond(&mut self, response: impl Display) {
        let res = writeln!(self.out, "{}", response).and_then(|_| self.out.flush());
        if let Err(err) = res {
            error!("Couldn't write response: {}", err);
        }
    }

    fn respond_error(&mut self, message: impl Display) {
        warn!("{}", message);
        self.respond(SessionResponse::Error {
            message: message.to_string(),
        });
    }
}

#[state_machine(
    initial = "State::idle()",
    before_dispatch = "Self::before_dispatch",
    state(derive(PartialEq, Eq, Debug)),
    superstate(derive(Debug))
)]
impl<G, W> SessionState<G, W>
where
    G: GenerateMoves + Copy,
    W: Write,
{
    #[superstate]
    fn top_level(&mut self, event: &SessionCommand) -> Outcome<State> {
        match event {
            SessionCommand::Quit => Handled,
            SessionCommand::NewGame => Transition(State::playing(Position::start())),
            SessionCommand::Position { sfen: None } => {
                Transition(State::playing(Position::start()))
            }
            SessionCommand::Position { sfen: Some(sfen) } => match Position::from_sfen(sfen) {
                Ok(position) => Transition(State::playing(position)),
                Err(err) => {
                    self.respond_error(format!("invalid sfen `{}`: {}", sfen, err));
                    Handled
                }
            },
            _ => {
                self.respond_error(format!("no game in progress for `{}`", event));
                Handled
            }
        }
    }

    #[state(superstate = "top_level")]
    fn idle() -> Outcome<State> {
        Super
    }

    #[state(superstate = "top_level")]
    fn playing(&mut self, position: &mut Position, event: &SessionCommand) -> Outcome<State> {
        match event {
            SessionCommand::Play { index } => {
                let moves = self.move_gen.gen_moves(position);
                let Some(&mve) = moves.get(*index) else {
                    self.respond_error(format!(
                        "no move at index {}, {} legal moves",
                        index,
                        moves.len()
                    ));
                    return Handled;
                };

                match position.apply_move(mve) {
                    Ok(next) => {
                        self.respond(SessionResponse::Played {
                            mve,
                            status: next.status(),
                        });
                        if next.is_game_over() {
                            info!("Game over after {}: {}", mve, next.status());
                            Transition(State::finished(next))
                        } else {
                            *position = next;
                            Handled
                        }
                    }
                    Err(err) => {
                        self.respond_error(err);
                        Handled
                    }
                }
            }
            SessionCommand::Moves => {
                let moves = self.move_gen.gen_moves(position).to_vec();
                self.respond(SessionResponse::Moves { moves });
                Handled
            }
            _ => self.inspect(position, event),
        }
    }

    #[state(superstate = "top_level")]
    fn finished(&mut self, position: &mut Position, event: &SessionCommand) -> Outcome<State> {
        match event {
            SessionCommand::Play { .. } => {
                match position.winner() {
                    Some(winner) => self.respond_error(PositionError::GameAlreadyOver(winner)),
                    None => self.respond_error("game is over"),
                }
                Handled
            }
            SessionCommand::Moves => {
                self.respond(SessionResponse::Moves { moves: vec![] });
                Handled
            }
            _ => self.inspect(position, event),
        }
    }

    /// Read-only commands shared by every state holding a position.
    fn inspect(&mut self, position: &Position, event: &SessionCommand) -> Outcome<State> {
        match event {
            SessionCommand::Show => {
                self.respond(SessionResponse::Board {
                    position: position.clone(),
                });
                Handled
            }
            SessionCommand::Sfen => {
                self.respond(SessionResponse::Sfen {
                    sfen: position.to_sfen(),
                });
                Handled
            }
            SessionCommand::Status => {
                self.respond(SessionResponse::Status {
                    status: position.status(),
                    turn: position.turn(),
                    move_number: position.move_number(),
                    checkers: self.move_gen.gen_checkers(position).to_squares(),
                });
                Handled
            }
            SessionCommand::Export => {
                match serde_json::to_string(&position.snapshot()) {
                    Ok(json) => self.respond(SessionResponse::Json { json }),
                    Err(err) => self.respond_error(err),
                }
                Handled
            }
            SessionCommand::Features => {
                match serde_json::to_string(&position.features()) {
                    Ok(json) => self.respond(SessionResponse::Json { json }),
                    Err(err) => self.respond_error(err),
                }
                Handled
            }
            SessionCommand::Perft { depth } => {
                let start = Instant::now();
                let (move_counts, total_count) = perft(position, *depth, self.move_gen);
                let time_elapsed = start.elapsed();

                self.write_perft_results(&move_counts, total_count);
                info!(
                    "perft {}: {} nodes in {} ms",
                    depth,
                    total_count,
                    time_elapsed.as_millis()
                );
                Handled
            }
            SessionCommand::PerftFull { depth } => {
                let perft_results = perft_full(position, *depth, self.move_gen);
                self.respond(perft_results);
                Handled
            }
            SessionCommand::Quit => {
                debug!("Exiting with position sfen: {}", position.to_sfen());
                Super
            }
            _ => Super,
        }
    }

    fn write_perft_results(&mut self, move_counts: &[(Move, u64)], total_count: u64) {
        for (mve, count) in move_counts {
            self.respond(format!("{}: {}", mve, count));
        }
        self.respond(format!("total: {}", total_count));
    }
}
