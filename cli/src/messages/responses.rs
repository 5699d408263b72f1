use goro_engine::{GameStatus, Hand, Move, Position, Side, Square};

#[derive(Debug)]
pub(crate) enum SessionResponse {
    Board { position: Position },
    Sfen { sfen: String },
    Moves { moves: Vec<Move> },
    Played { mve: Move, status: GameStatus },
    Status {
        status: GameStatus,
        turn: Side,
        move_number: u16,
        checkers: Vec<Square>,
    },
    Json { json: String },
    Error { message: String },
}

fn hand_str(hand: &Hand) -> String {
    format!("D:{} C:{} P:{}", hand.runner, hand.diagonal, hand.soldier)
}

impl std::fmt::Display for SessionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionResponse::Board { position } => {
                writeln!(f, "{}", position)?;
                writeln!(f, "first hand: {}", hand_str(position.hand(Side::First)))?;
                writeln!(f, "second hand: {}", hand_str(position.hand(Side::Second)))?;
                write!(
                    f,
                    "move {}, {} to move, {}",
                    position.move_number(),
                    position.turn(),
                    position.status()
                )
            }
            SessionResponse::Sfen { sfen } => write!(f, "{}", sfen),
            SessionResponse::Moves { moves } => {
                let lines = moves
                    .iter()
                    .enumerate()
                    .map(|(idx, mve)| format!("{}: {}", idx, mve))
                    .collect::<Vec<_>>();
                write!(f, "{}", lines.join("\n"))?;
                if !moves.is_empty() {
                    writeln!(f)?;
                }
                write!(f, "total: {}", moves.len())
            }
            SessionResponse::Played { mve, status } => write!(f, "played {} ({})", mve, status),
            SessionResponse::Status {
                status,
                turn,
                move_number,
                checkers,
            } => {
                write!(f, "status {}, move {}, {} to move", status, move_number, turn)?;
                if !checkers.is_empty() {
                    let squares: Vec<String> = checkers
                        .iter()
                        .map(|sq| sq.to_string().to_lowercase())
                        .collect();
                    write!(f, ", in check from {}", squares.join(" "))?;
                }
                Ok(())
            }
            SessionResponse::Json { json } => write!(f, "{}", json),
            SessionResponse::Error { message } => write!(f, "error: {}", message),
        }
    }
}
