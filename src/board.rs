//! Board facade
//!
//! [`BoardCore`] wires the rules adapter, cell grid, selection machine,
//! history stack, and event channel into the single object a host embeds.
//! It owns the orientation and interaction policy, translates grid
//! coordinates, and keeps every component consistent after moves,
//! history jumps, and position edits.
//!
//! # Integration
//!
//! ```
//! use chessboard_core::{BoardConfig, BoardCore};
//!
//! let mut board = BoardCore::new(BoardConfig::default()).unwrap();
//! let rx = board.events();
//! board.push(chessboard_core::Square::E2, chessboard_core::Square::E4).unwrap();
//! assert!(rx.try_iter().count() > 0);
//! ```

use crossbeam_channel::Receiver;
use shakmaty::{Color, Piece, Square};
use tracing::{debug, warn};

use crate::cell::{CellGrid, CellState};
use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::events::{BoardEvent, EventSink};
use crate::executor::{self, MoveOutcome};
use crate::history::HistoryStack;
use crate::mapping;
use crate::promotion::{AutoQueen, PromotionOrder, PromotionPicker};
use crate::rules::RulesAdapter;
use crate::selection::{ClickOutcome, SelectionController};
use crate::types::{AccessibleSides, BoardMove};

/// Interactive chess board core
pub struct BoardCore {
    rules: RulesAdapter,
    cells: CellGrid,
    selection: SelectionController,
    history: HistoryStack,
    picker: Box<dyn PromotionPicker + Send>,
    events: EventSink,
    receiver: Receiver<BoardEvent>,
    flipped: bool,
    accessible_sides: AccessibleSides,
    block_interaction_while_rewound: bool,
}

impl BoardCore {
    /// Build a board from configuration.
    ///
    /// # Errors
    ///
    /// Fails only when `config.fen` is unparseable or illegal.
    pub fn new(config: BoardConfig) -> BoardResult<Self> {
        let (events, receiver) = EventSink::unbounded();
        let rules = RulesAdapter::new(config.fen.as_deref())?;
        let mut cells = CellGrid::new(events.clone());
        cells.sync_occupancy(&rules);
        cells.refresh_flags(&rules);
        Ok(Self {
            rules,
            cells,
            selection: SelectionController::default(),
            history: HistoryStack::default(),
            picker: Box::new(AutoQueen),
            events,
            receiver,
            flipped: config.flipped,
            accessible_sides: config.accessible_sides,
            block_interaction_while_rewound: config.block_interaction_while_rewound,
        })
    }

    /// Replace the promotion picker, builder style.
    pub fn with_picker(mut self, picker: impl PromotionPicker + Send + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn set_picker(&mut self, picker: impl PromotionPicker + Send + 'static) {
        self.picker = Box::new(picker);
    }

    /// Receiver for the board's event stream. May be cloned freely; all
    /// clones drain the same channel.
    pub fn events(&self) -> Receiver<BoardEvent> {
        self.receiver.clone()
    }

    // --- pointer input ---------------------------------------------------

    /// Primary click at visual grid position `(row, col)`.
    ///
    /// Returns the SAN of a committed move, `Ok(None)` for every click
    /// that changed only selection state.
    pub fn primary_click(&mut self, row: u8, col: u8) -> BoardResult<Option<String>> {
        self.primary_click_square(mapping::to_square(row, col, self.flipped))
    }

    /// Primary click addressed by square directly.
    pub fn primary_click_square(&mut self, square: Square) -> BoardResult<Option<String>> {
        let outcome = self.selection.on_primary_click(
            square,
            &mut self.cells,
            &self.rules,
            &self.history,
            self.accessible_sides,
            self.block_interaction_while_rewound,
        );
        let ClickOutcome::Dispatch { from, to } = outcome else {
            return Ok(None);
        };

        let order = if self.flipped {
            PromotionOrder::QueenLast
        } else {
            PromotionOrder::QueenFirst
        };
        let result = executor::execute_move(
            from,
            to,
            None,
            self.picker.as_mut(),
            order,
            &mut self.rules,
            &mut self.cells,
            &mut self.history,
            &self.events,
        );
        // The dispatch consumed the selection whatever happened.
        self.selection.reset();
        self.cells.clear_highlights();
        match result {
            Ok(MoveOutcome::Committed { notation }) => Ok(Some(notation)),
            Ok(MoveOutcome::Cancelled) => Ok(None),
            Err(error) => {
                warn!("[BOARD] Dispatched move {from}{to} rejected: {error}");
                Err(error)
            }
        }
    }

    /// Secondary click at visual grid position `(row, col)`.
    pub fn secondary_click(&mut self, row: u8, col: u8) -> bool {
        self.secondary_click_square(mapping::to_square(row, col, self.flipped))
    }

    /// Toggle the mark on a square, clearing any selection.
    pub fn secondary_click_square(&mut self, square: Square) -> bool {
        self.selection.on_secondary_click(square, &mut self.cells)
    }

    // --- programmatic moves ----------------------------------------------

    /// Play a move from code, negotiating promotion through the picker.
    ///
    /// Unlike pointer input this ignores [`AccessibleSides`] and the
    /// rewound block; a host driving an engine uses this path.
    pub fn push(&mut self, from: Square, to: Square) -> BoardResult<Option<String>> {
        let outcome = executor::execute_move(
            from,
            to,
            None,
            self.picker.as_mut(),
            PromotionOrder::QueenFirst,
            &mut self.rules,
            &mut self.cells,
            &mut self.history,
            &self.events,
        )?;
        self.selection.reset();
        match outcome {
            MoveOutcome::Committed { notation } => Ok(Some(notation)),
            MoveOutcome::Cancelled => Ok(None),
        }
    }

    /// Play a fully specified move, promotion role included.
    pub fn make_move(&mut self, board_move: &BoardMove) -> BoardResult<String> {
        let san = executor::apply_move(
            board_move,
            &mut self.rules,
            &mut self.cells,
            &mut self.history,
            &self.events,
        )?;
        self.selection.reset();
        Ok(san)
    }

    // --- history ----------------------------------------------------------

    /// Take back `count` moves.
    pub fn pop(&mut self, count: usize) -> BoardResult<String> {
        let uci = self.history.pop(count, &mut self.rules)?;
        self.after_navigation();
        Ok(uci)
    }

    /// Replay `count` taken-back moves.
    pub fn unpop(&mut self, count: usize) -> BoardResult<String> {
        let uci = self.history.unpop(count, &mut self.rules)?;
        self.after_navigation();
        Ok(uci)
    }

    /// Jump to the position after move `target` (0 is the root).
    pub fn go_to_move(&mut self, target: usize) -> BoardResult<Option<String>> {
        let uci = self.history.go_to_move(target, &mut self.rules)?;
        if uci.is_some() {
            self.after_navigation();
        }
        Ok(uci)
    }

    fn after_navigation(&mut self) {
        self.selection.reset();
        self.cells.clear_highlights();
        self.cells.clear_marks();
        self.cells.sync_occupancy(&self.rules);
        self.cells.refresh_flags(&self.rules);
    }

    pub fn move_count(&self) -> usize {
        self.rules.move_count()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    pub fn is_rewound(&self) -> bool {
        self.history.is_rewound()
    }

    // --- orientation and policy -------------------------------------------

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Rotate the board 180 degrees.
    pub fn flip(&mut self) {
        self.set_flipped(!self.flipped);
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        if self.flipped != flipped {
            debug!("[BOARD] Flipped = {flipped}");
            self.flipped = flipped;
            self.cells.force_repaint();
        }
    }

    pub fn accessible_sides(&self) -> AccessibleSides {
        self.accessible_sides
    }

    /// Change which colors pointer input may move. Drops any live
    /// selection since it may no longer be permitted.
    pub fn set_accessible_sides(&mut self, sides: AccessibleSides) {
        self.accessible_sides = sides;
        self.selection.reset();
        self.cells.clear_highlights();
    }

    pub fn block_interaction_while_rewound(&self) -> bool {
        self.block_interaction_while_rewound
    }

    pub fn set_block_interaction_while_rewound(&mut self, block: bool) {
        self.block_interaction_while_rewound = block;
    }

    // --- position management ----------------------------------------------

    /// Current position as FEN.
    pub fn fen(&self) -> String {
        self.rules.fen()
    }

    /// Load a new root position, discarding all history.
    pub fn set_fen(&mut self, fen: &str) -> BoardResult<()> {
        self.rules.set_fen(fen)?;
        self.history.invalidate();
        self.after_navigation();
        Ok(())
    }

    /// Return to the standard starting position and default orientation.
    pub fn reset(&mut self) -> BoardResult<()> {
        self.rules = RulesAdapter::new(None)?;
        self.history.invalidate();
        self.set_flipped(false);
        self.after_navigation();
        Ok(())
    }

    // --- position editing -------------------------------------------------

    /// Place a piece, replacing any occupant. Re-roots the game at the
    /// edited position; the move history no longer applies.
    pub fn set_piece_at(&mut self, square: Square, piece: Piece) -> BoardResult<()> {
        self.rules.set_piece_at(square, piece)?;
        self.history.invalidate();
        self.after_navigation();
        Ok(())
    }

    /// Place a piece on an empty square.
    ///
    /// # Errors
    ///
    /// [`BoardError::SquareOccupied`] when the square holds a piece.
    pub fn add_piece_at(&mut self, square: Square, piece: Piece) -> BoardResult<()> {
        if self.rules.piece_at(square).is_some() {
            return Err(BoardError::SquareOccupied { square });
        }
        self.set_piece_at(square, piece)
    }

    /// Remove and return the piece on a square.
    pub fn remove_piece_at(&mut self, square: Square) -> BoardResult<Piece> {
        let piece = self.rules.remove_piece_at(square)?;
        self.history.invalidate();
        self.after_navigation();
        Ok(piece)
    }

    /// Replace the whole piece placement in one step. On error nothing
    /// changes.
    pub fn set_piece_map(&mut self, pieces: &[(Square, Piece)]) -> BoardResult<()> {
        self.rules.set_piece_map(pieces)?;
        self.history.invalidate();
        self.after_navigation();
        Ok(())
    }

    // --- queries ------------------------------------------------------------

    pub fn cell(&self, square: Square) -> &CellState {
        self.cells.cell(square)
    }

    /// Cell at visual grid position `(row, col)`.
    pub fn cell_at(&self, row: u8, col: u8) -> &CellState {
        self.cells.cell(mapping::to_square(row, col, self.flipped))
    }

    pub fn selected(&self) -> Option<Square> {
        self.selection.selected()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.rules.piece_at(square)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.rules.king_square(color)
    }

    pub fn turn(&self) -> Color {
        self.rules.turn()
    }

    pub fn is_check(&self) -> bool {
        self.rules.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.rules.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.rules.is_stalemate()
    }

    /// Mark or clear the check flag on a king cell by hand. Used by
    /// hosts that drive the check indicator themselves.
    pub fn set_in_check(&mut self, square: Square, in_check: bool) -> BoardResult<()> {
        self.cells.set_in_check(square, in_check)
    }

    /// Visual grid position of a square under the current orientation.
    pub fn to_visual(&self, square: Square) -> (u8, u8) {
        mapping::to_visual(square, self.flipped)
    }

    /// Square at a visual grid position under the current orientation.
    pub fn square_at(&self, row: u8, col: u8) -> Square {
        mapping::to_square(row, col, self.flipped)
    }
}

impl std::fmt::Debug for BoardCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardCore")
            .field("fen", &self.rules.fen())
            .field("flipped", &self.flipped)
            .field("accessible_sides", &self.accessible_sides)
            .field("move_count", &self.rules.move_count())
            .field("redo_len", &self.history.redo_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Role;

    #[test]
    fn grid_clicks_respect_orientation() {
        let mut board = BoardCore::new(BoardConfig::default()).unwrap();
        // Default orientation: row 6, col 4 is e2.
        assert_eq!(board.square_at(6, 4), Square::E2);
        board.primary_click(6, 4).unwrap();
        assert_eq!(board.selected(), Some(Square::E2));

        board.set_flipped(true);
        assert_eq!(board.square_at(6, 4), Square::D7);
    }

    #[test]
    fn click_pair_commits_a_move() {
        let mut board = BoardCore::new(BoardConfig::default()).unwrap();
        assert_eq!(board.primary_click_square(Square::E2).unwrap(), None);
        let san = board.primary_click_square(Square::E4).unwrap();
        assert_eq!(san.as_deref(), Some("e4"));
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.selected(), None);
        assert!(board.cell(Square::E4).is_just_moved());
    }

    #[test]
    fn reset_restores_start_and_orientation() {
        let mut board = BoardCore::new(BoardConfig {
            flipped: true,
            ..BoardConfig::default()
        })
        .unwrap();
        board.push(Square::E2, Square::E4).unwrap();
        board.reset().unwrap();
        assert_eq!(board.move_count(), 0);
        assert!(!board.is_flipped());
        assert_eq!(
            board.fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn add_piece_at_refuses_occupied_squares() {
        let mut board = BoardCore::new(BoardConfig::default()).unwrap();
        let knight = Piece {
            color: Color::White,
            role: Role::Knight,
        };
        assert!(matches!(
            board.add_piece_at(Square::E2, knight),
            Err(BoardError::SquareOccupied { square: Square::E2 })
        ));
        board.add_piece_at(Square::E4, knight).unwrap();
        assert!(board.cell(Square::E4).is_piece());
    }

    #[test]
    fn edits_invalidate_history() {
        let mut board = BoardCore::new(BoardConfig::default()).unwrap();
        board.push(Square::E2, Square::E4).unwrap();
        board.pop(1).unwrap();
        assert!(board.is_rewound());

        board.remove_piece_at(Square::B1).unwrap();
        assert!(!board.is_rewound());
        assert_eq!(board.move_count(), 0);
        assert!(board.pop(1).is_err());
    }
}
