mod commands;
mod responses;

pub(crate) use commands::SessionCommand;
pub use commands::{ReadSessionCommand, SessionCommandParseError, SessionCommandStdinReader};
pub(crate) use responses::SessionResponse;
