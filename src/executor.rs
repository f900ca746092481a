//! Single commit path for moves
//!
//! Every way a move enters the board (pointer dispatch, programmatic
//! push, history replay handled elsewhere) funnels through this module,
//! so the invariants around a commit hold no matter the entry point:
//! the redo buffer is discarded, the grid is resynced, and the event
//! cascade fires in a fixed order with at most one terminal event.

use shakmaty::{Role, Square};
use tracing::debug;

use crate::cell::CellGrid;
use crate::error::BoardResult;
use crate::events::{BoardEvent, EventSink};
use crate::history::HistoryStack;
use crate::promotion::{PromotionOrder, PromotionPicker};
use crate::rules::RulesAdapter;
use crate::types::BoardMove;

/// Result of a move attempt that passed validation or was withdrawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was committed; `notation` is its SAN.
    Committed { notation: String },
    /// The user cancelled the promotion dialog; nothing changed.
    Cancelled,
}

/// Attempt an interactive move, negotiating promotion when needed.
///
/// When the move pushes a pawn onto its back rank and no role is preset,
/// `picker` chooses the role; `None` withdraws the move without error.
///
/// # Errors
///
/// Propagates [`crate::error::BoardError::IllegalMove`] from the rules
/// adapter. State is untouched on error.
#[allow(clippy::too_many_arguments)]
pub fn execute_move(
    from: Square,
    to: Square,
    preset: Option<Role>,
    picker: &mut dyn PromotionPicker,
    order: PromotionOrder,
    rules: &mut RulesAdapter,
    cells: &mut CellGrid,
    history: &mut HistoryStack,
    events: &EventSink,
) -> BoardResult<MoveOutcome> {
    let mut board_move = BoardMove::new(from, to);
    board_move.promotion = preset;

    if board_move.promotion.is_none() && rules.is_promotion_candidate(&board_move) {
        let Some(piece) = rules.piece_at(from) else {
            // Candidate implies a pawn on `from`; treat a race as illegal.
            return Err(crate::error::BoardError::EmptySquare { square: from });
        };
        match picker.choose_promotion(piece.color, order) {
            Some(role) => board_move.promotion = Some(role),
            None => {
                debug!("[MOVE] Promotion cancelled for {}", board_move.uci());
                cells.clear_highlights();
                return Ok(MoveOutcome::Cancelled);
            }
        }
    }

    let san = apply_move(&board_move, rules, cells, history, events)?;
    Ok(MoveOutcome::Committed { notation: san })
}

/// Commit a fully specified move without promotion negotiation.
///
/// # Errors
///
/// [`crate::error::BoardError::IllegalMove`] when the move does not
/// match a legal move, including bare promotions missing their role.
pub fn apply_move(
    board_move: &BoardMove,
    rules: &mut RulesAdapter,
    cells: &mut CellGrid,
    history: &mut HistoryStack,
    events: &EventSink,
) -> BoardResult<String> {
    let (_, san) = rules.push(board_move)?;
    finish_commit(rules, cells, history, events, &san);
    Ok(san)
}

/// Post-commit bookkeeping shared by every commit path.
fn finish_commit(
    rules: &RulesAdapter,
    cells: &mut CellGrid,
    history: &mut HistoryStack,
    events: &EventSink,
    san: &str,
) {
    history.invalidate();
    cells.clear_highlights();
    cells.clear_marks();
    cells.sync_occupancy(rules);
    cells.refresh_flags(rules);

    events.emit(BoardEvent::MoveMade {
        notation: san.to_string(),
    });
    if rules.is_checkmate() {
        debug!("[MOVE] {san} mates");
        events.emit(BoardEvent::Checkmate {
            winner: !rules.turn(),
        });
        events.emit(BoardEvent::GameOver);
    } else if rules.is_insufficient_material() {
        debug!("[MOVE] Draw by insufficient material after {san}");
        events.emit(BoardEvent::Draw);
        events.emit(BoardEvent::GameOver);
    } else if rules.is_stalemate() {
        debug!("[MOVE] {san} stalemates");
        events.emit(BoardEvent::Stalemate);
        events.emit(BoardEvent::GameOver);
    }
}
