pub mod bitboard;
pub mod features;
pub mod move_gen;
pub mod movement;
pub mod perft;
pub mod position;

pub use bitboard::{BitBoard, Square, COLS, NUM_SQUARES, ROWS};
pub use features::{action_index, action_to_move, Features, ACTION_SIZE};
pub use move_gen::{legal_moves, GenerateMoves, MoveGen, MoveList, MOVE_GEN};
pub use perft::{perft, perft_full, PerftDepthResult, PerftResult};
pub use position::{
    GameStatus, Hand, Hands, Move, Piece, PieceKind, Position, PositionError, Side, SfenError,
    Snapshot, SnapshotError, Winner, START_SFEN,
};
