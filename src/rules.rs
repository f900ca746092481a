//! Adapter over the shakmaty rules engine
//!
//! All legality, notation, and game-state questions go through this
//! module; nothing else in the crate touches `shakmaty::Chess` directly.
//! Keeping the engine behind one seam means move generation rules never
//! leak into interaction or history code.
//!
//! # Architecture
//!
//! shakmaty positions are forward-only, so the adapter keeps the root
//! position plus the full move list and rebuilds by replay when a move is
//! taken back. Replay of a few hundred `play_unchecked` calls is far
//! cheaper than any interaction it could sit behind.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{
    Board, CastlingMode, Chess, Color, EnPassantMode, File, FromSetup, Move, Piece, Position,
    Rank, Role, Setup, Square,
};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{BoardError, BoardResult};
use crate::types::BoardMove;

/// Rules-engine facade owning the current position and move list
#[derive(Debug, Clone)]
pub struct RulesAdapter {
    root: Chess,
    position: Chess,
    moves: Vec<Move>,
}

impl RulesAdapter {
    /// Create an adapter from an optional FEN, defaulting to the
    /// standard starting position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidFen`] for unparseable FEN text and
    /// [`BoardError::InvalidPosition`] for FEN describing an illegal
    /// position.
    pub fn new(fen: Option<&str>) -> BoardResult<Self> {
        let root = match fen {
            Some(text) => parse_position(text)?,
            None => Chess::default(),
        };
        Ok(Self {
            position: root.clone(),
            root,
            moves: Vec::new(),
        })
    }

    /// Drop all moves and return to the root position.
    pub fn reset(&mut self) {
        self.position = self.root.clone();
        self.moves.clear();
    }

    /// Replace the root position and discard the move list.
    pub fn set_fen(&mut self, fen: &str) -> BoardResult<()> {
        self.root = parse_position(fen)?;
        self.position = self.root.clone();
        self.moves.clear();
        Ok(())
    }

    /// Current position as a FEN string.
    pub fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square)
    }

    /// Every occupied square with its piece.
    pub fn piece_map(&self) -> Vec<(Square, Piece)> {
        let board = self.position.board();
        board
            .occupied()
            .into_iter()
            .filter_map(|square| board.piece_at(square).map(|piece| (square, piece)))
            .collect()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.position.board().king_of(color)
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    /// Squares the piece on `from` may legally move to
    ///
    /// Promotions to different roles share a destination, so the result
    /// is deduplicated. Empty when `from` is empty or the piece is
    /// pinned into immobility.
    pub fn legal_destinations(&self, from: Square) -> SmallVec<[Square; 28]> {
        let mut destinations: SmallVec<[Square; 28]> = SmallVec::new();
        for candidate in self.position.legal_moves() {
            let (move_from, move_to) = move_squares(&candidate);
            if move_from == from && !destinations.contains(&move_to) {
                destinations.push(move_to);
            }
        }
        destinations
    }

    /// Find the legal engine move matching a from/to/promotion triple.
    ///
    /// Castling is matched against the king's visual destination (g- or
    /// c-file), not the rook square the engine encodes internally.
    pub fn find_legal(&self, board_move: &BoardMove) -> Option<Move> {
        if board_move.is_null() {
            return None;
        }
        self.position.legal_moves().into_iter().find(|candidate| {
            let (from, to) = move_squares(candidate);
            from == board_move.from && to == board_move.to && candidate.promotion() == board_move.promotion
        })
    }

    pub fn is_legal(&self, board_move: &BoardMove) -> bool {
        self.find_legal(board_move).is_some()
    }

    /// Whether the move needs a promotion role before it can be pushed.
    ///
    /// True when a pawn stands on `from` and `to` lies on its promotion
    /// rank. Legality is not checked here; an illegal candidate fails
    /// later in [`RulesAdapter::push`].
    pub fn is_promotion_candidate(&self, board_move: &BoardMove) -> bool {
        match self.piece_at(board_move.from) {
            Some(piece) if piece.role == Role::Pawn => {
                let target = match piece.color {
                    Color::White => Rank::Eighth,
                    Color::Black => Rank::First,
                };
                board_move.to.rank() == target
            }
            _ => false,
        }
    }

    /// Validate and commit a move, returning the engine move and its SAN.
    ///
    /// # Errors
    ///
    /// [`BoardError::IllegalMove`] when the triple matches no legal move.
    pub fn push(&mut self, board_move: &BoardMove) -> BoardResult<(Move, String)> {
        let engine_move = self.find_legal(board_move).ok_or_else(|| BoardError::IllegalMove {
            uci: board_move.uci(),
        })?;
        let san = self.san(&engine_move);
        self.position.play_unchecked(&engine_move);
        self.moves.push(engine_move.clone());
        debug!("[RULES] Pushed {} ({} plies)", san, self.moves.len());
        Ok((engine_move, san))
    }

    /// Re-commit an engine move taken from the redo buffer.
    ///
    /// # Errors
    ///
    /// [`BoardError::IllegalMove`] if the move is not legal in the
    /// current position, which indicates the position was edited after
    /// the move was recorded.
    pub fn push_engine(&mut self, engine_move: &Move) -> BoardResult<String> {
        if !self.position.is_legal(engine_move) {
            return Err(BoardError::IllegalMove {
                uci: self.uci(engine_move),
            });
        }
        let san = self.san(engine_move);
        self.position.play_unchecked(engine_move);
        self.moves.push(engine_move.clone());
        Ok(san)
    }

    /// Take back the most recent move by replaying from the root.
    ///
    /// # Errors
    ///
    /// [`BoardError::HistoryOutOfRange`] when no moves have been played.
    pub fn pop(&mut self) -> BoardResult<Move> {
        let popped = self.moves.pop().ok_or(BoardError::HistoryOutOfRange {
            requested: 1,
            available: 0,
        })?;
        self.position = self.root.clone();
        for engine_move in &self.moves {
            self.position.play_unchecked(engine_move);
        }
        Ok(popped)
    }

    /// Number of moves committed since the root position.
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Origin and destination of the last committed move, if any.
    pub fn last_move_squares(&self) -> Option<(Square, Square)> {
        self.moves.last().map(move_squares)
    }

    /// SAN for a move that is legal in the current position.
    pub fn san(&self, engine_move: &Move) -> String {
        SanPlus::from_move(self.position.clone(), engine_move).to_string()
    }

    /// UCI rendering of an engine move.
    pub fn uci(&self, engine_move: &Move) -> String {
        engine_move.to_uci(CastlingMode::Standard).to_string()
    }

    /// Place a piece, replacing any occupant, and re-root the game there.
    pub fn set_piece_at(&mut self, square: Square, piece: Piece) -> BoardResult<()> {
        let mut board = self.position.board().clone();
        board.set_piece_at(square, piece);
        self.reroot_with_board(board)
    }

    /// Remove a piece and re-root the game at the edited position.
    ///
    /// # Errors
    ///
    /// [`BoardError::EmptySquare`] when there is nothing to remove.
    pub fn remove_piece_at(&mut self, square: Square) -> BoardResult<Piece> {
        let piece = self
            .piece_at(square)
            .ok_or(BoardError::EmptySquare { square })?;
        let mut board = Board::empty();
        let current = self.position.board();
        for occupied in current.occupied() {
            if occupied == square {
                continue;
            }
            if let Some(kept) = current.piece_at(occupied) {
                board.set_piece_at(occupied, kept);
            }
        }
        self.reroot_with_board(board)?;
        Ok(piece)
    }

    /// Replace the entire piece placement, keeping turn and castling
    /// data where they remain valid.
    pub fn set_piece_map(&mut self, pieces: &[(Square, Piece)]) -> BoardResult<()> {
        let mut board = Board::empty();
        for (square, piece) in pieces {
            board.set_piece_at(*square, *piece);
        }
        self.reroot_with_board(board)
    }

    /// Rebuild the position around an edited board and make it the new
    /// root. The move list no longer applies and is discarded.
    fn reroot_with_board(&mut self, board: Board) -> BoardResult<()> {
        let mut setup: Setup = self.position.clone().into_setup(EnPassantMode::Legal);
        setup.board = board;
        let position = Chess::from_setup(setup, CastlingMode::Standard)
            .or_else(|e| e.ignore_invalid_castling_rights())
            .or_else(|e| e.ignore_invalid_ep_square())
            .or_else(|e| e.ignore_impossible_check())
            .map_err(|e| BoardError::InvalidPosition {
                message: e.to_string(),
            })?;
        self.root = position.clone();
        self.position = position;
        self.moves.clear();
        Ok(())
    }
}

/// Visual origin and destination of an engine move
///
/// shakmaty encodes castling as king-takes-rook; the UI wants the square
/// the king ends up on instead.
pub fn move_squares(engine_move: &Move) -> (Square, Square) {
    match *engine_move {
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            (king, Square::from_coords(file, king.rank()))
        }
        Move::Put { to, .. } => (to, to),
        ref other => (
            other.from().unwrap_or_else(|| other.to()),
            other.to(),
        ),
    }
}

fn parse_position(fen: &str) -> BoardResult<Chess> {
    let parsed: Fen = fen.parse()?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e: shakmaty::PositionError<Chess>| BoardError::InvalidPosition {
            message: e.to_string(),
        })
}
