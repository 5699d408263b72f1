mod messages;
mod session;
mod state;

pub use messages::{ReadSessionCommand, SessionCommandParseError, SessionCommandStdinReader};
pub use session::Session;
