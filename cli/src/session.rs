use std::io::Write;
use std::str::FromStr;

use goro_engine::GenerateMoves;
use statig::prelude::{IntoStateMachineExt, StateMachine};

use crate::{
    messages::{SessionCommand, SessionCommandParseError},
    state::SessionState,
};

/// A line-oriented game session writing every response to `W`.
pub struct Session<G, W>
where
    G: GenerateMoves + Copy,
    W: Write,
{
    state_machine: StateMachine<SessionState<G, W>>,
    quit: bool,
}

impl<G, W> Session<G, W>
where
    G: GenerateMoves + Copy,
    W: Write,
{
    pub fn new(move_gen: G, out: W) -> Self {
        let session_state = SessionState::new(move_gen, out);
        Self {
            state_machine: session_state.state_machine(),
            quit: false,
        }
    }

    pub fn handle_command(&mut self, command: &str) -> Result<(), SessionCommandParseError> {
        let command = SessionCommand::from_str(command)?;
        self.state_machine.handle(&command);
        if command == SessionCommand::Quit {
            self.quit = true;
        }
        Ok(())
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }
}
