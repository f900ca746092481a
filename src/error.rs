//! Error types for the board interaction core
//!
//! Provides custom error types for move commits, cell state contracts,
//! piece editing and history navigation.

use shakmaty::fen::ParseFenError;
use shakmaty::Square;

/// Errors that can occur in the board interaction core
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Move commit rejected by the rules engine (illegal or null move)
    #[error("illegal move {uci}")]
    IllegalMove { uci: String },

    /// Check state set on a cell that does not hold a king
    #[error("cell at {square} does not hold a king")]
    NotAKing { square: Square },

    /// Piece added to a square that is already occupied
    #[error("square {square} is occupied")]
    SquareOccupied { square: Square },

    /// Piece removed from a square that holds nothing
    #[error("no piece at {square}")]
    EmptySquare { square: Square },

    /// History navigation beyond the available depth
    #[error("history index {requested} out of range (available {available})")]
    HistoryOutOfRange { requested: usize, available: usize },

    /// FEN string could not be parsed
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] ParseFenError),

    /// Board edit produced a position the rules engine cannot represent
    #[error("invalid position: {message}")]
    InvalidPosition { message: String },
}

/// Result type alias for board operations
pub type BoardResult<T> = Result<T, BoardError>;
