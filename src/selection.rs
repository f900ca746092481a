//! Click-to-move selection state machine
//!
//! Two states: nothing selected, or one square selected with its legal
//! destinations highlighted. Every primary click resolves to exactly one
//! [`ClickOutcome`], and the controller keeps the highlight set on the
//! grid consistent with its own state at all times.
//!
//! The controller never commits moves itself. A click that completes a
//! move returns [`ClickOutcome::Dispatch`] and the caller hands the pair
//! to the executor, so a rejected promotion or any other late failure
//! cannot leave stale selection state behind.

use shakmaty::Square;
use tracing::debug;

use crate::cell::CellGrid;
use crate::history::HistoryStack;
use crate::rules::RulesAdapter;
use crate::types::AccessibleSides;

/// Current phase of the selection machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    /// A piece on this square is selected and its targets highlighted.
    Selected(Square),
}

/// What a primary click resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click completed a move attempt from `from` to `to`.
    Dispatch { from: Square, to: Square },
    /// A piece was selected and its destinations highlighted.
    Selected { square: Square },
    /// The selected square was clicked again; selection cleared.
    Deselected,
    /// The click could not select or move; any selection was cleared.
    Cancelled,
    /// The click hit nothing actionable while idle.
    Ignored,
}

/// Drives [`SelectionState`] from pointer input
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selected(&self) -> Option<Square> {
        match self.state {
            SelectionState::Selected(square) => Some(square),
            SelectionState::Idle => None,
        }
    }

    /// Drop the selection without touching the grid. Used after the
    /// caller has already rebuilt cell state wholesale.
    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Resolve a primary (left) click on `square`.
    #[allow(clippy::too_many_arguments)]
    pub fn on_primary_click(
        &mut self,
        square: Square,
        cells: &mut CellGrid,
        rules: &RulesAdapter,
        history: &HistoryStack,
        accessible_sides: AccessibleSides,
        block_when_rewound: bool,
    ) -> ClickOutcome {
        if let SelectionState::Selected(from) = self.state {
            if cells.cell(square).is_highlighted() {
                debug!("[SELECT] Dispatching {from} -> {square}");
                return ClickOutcome::Dispatch { from, to: square };
            }
            if square == from {
                debug!("[SELECT] Deselected {square}");
                self.clear(cells);
                return ClickOutcome::Deselected;
            }
        }

        let cell = *cells.cell(square);
        if cell.is_marked() {
            self.clear(cells);
            return ClickOutcome::Cancelled;
        }
        let Some(piece) = cell.occupant() else {
            return if self.selected().is_some() {
                self.clear(cells);
                ClickOutcome::Cancelled
            } else {
                ClickOutcome::Ignored
            };
        };

        let gated = piece.color != rules.turn()
            || !accessible_sides.allows(piece.color)
            || (block_when_rewound && history.is_rewound());
        if gated {
            debug!("[SELECT] Click on {square} gated off");
            let had_selection = self.selected().is_some();
            self.clear(cells);
            return if had_selection {
                ClickOutcome::Cancelled
            } else {
                ClickOutcome::Ignored
            };
        }

        self.clear(cells);
        cells.clear_marks();
        let destinations = rules.legal_destinations(square);
        if destinations.is_empty() {
            debug!("[SELECT] {square} has no legal destinations");
            return ClickOutcome::Cancelled;
        }
        for destination in &destinations {
            cells.set_highlighted(*destination, true);
        }
        self.state = SelectionState::Selected(square);
        debug!("[SELECT] Selected {square} with {} targets", destinations.len());
        ClickOutcome::Selected { square }
    }

    /// Resolve a secondary (right) click: toggle the mark on `square`.
    ///
    /// Marking always clears the selection so highlights and marks never
    /// mix. Returns the new mark state of the cell.
    pub fn on_secondary_click(&mut self, square: Square, cells: &mut CellGrid) -> bool {
        self.clear(cells);
        cells.toggle_marked(square)
    }

    fn clear(&mut self, cells: &mut CellGrid) {
        cells.clear_highlights();
        self.state = SelectionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSink;
    use crate::types::BoardMove;

    struct Fixture {
        cells: CellGrid,
        rules: RulesAdapter,
        history: HistoryStack,
        controller: SelectionController,
    }

    impl Fixture {
        fn new(fen: Option<&str>) -> Self {
            let (sink, _rx) = EventSink::unbounded();
            let rules = RulesAdapter::new(fen).unwrap();
            let mut cells = CellGrid::new(sink);
            cells.sync_occupancy(&rules);
            Self {
                cells,
                rules,
                history: HistoryStack::default(),
                controller: SelectionController::default(),
            }
        }

        fn click(&mut self, square: Square) -> ClickOutcome {
            self.controller.on_primary_click(
                square,
                &mut self.cells,
                &self.rules,
                &self.history,
                AccessibleSides::Both,
                false,
            )
        }
    }

    #[test]
    fn select_highlight_dispatch_cycle() {
        let mut fx = Fixture::new(None);
        assert_eq!(fx.click(Square::E2), ClickOutcome::Selected { square: Square::E2 });
        assert_eq!(
            fx.cells.highlighted_squares(),
            vec![Square::E3, Square::E4]
        );
        assert_eq!(
            fx.click(Square::E4),
            ClickOutcome::Dispatch {
                from: Square::E2,
                to: Square::E4
            }
        );
        // Dispatch leaves cleanup to the caller.
        assert_eq!(fx.controller.selected(), Some(Square::E2));
    }

    #[test]
    fn clicking_the_selection_again_deselects() {
        let mut fx = Fixture::new(None);
        fx.click(Square::E2);
        assert_eq!(fx.click(Square::E2), ClickOutcome::Deselected);
        assert_eq!(fx.controller.state(), SelectionState::Idle);
        assert!(fx.cells.highlighted_squares().is_empty());
    }

    #[test]
    fn selecting_another_own_piece_switches_selection() {
        let mut fx = Fixture::new(None);
        fx.click(Square::E2);
        assert_eq!(fx.click(Square::G1), ClickOutcome::Selected { square: Square::G1 });
        assert_eq!(
            fx.cells.highlighted_squares(),
            vec![Square::F3, Square::H3]
        );
    }

    #[test]
    fn piece_without_moves_aborts_selection() {
        // The a1 rook is boxed in at the start.
        let mut fx = Fixture::new(None);
        assert_eq!(fx.click(Square::A1), ClickOutcome::Cancelled);
        assert_eq!(fx.controller.state(), SelectionState::Idle);
        assert!(fx.cells.highlighted_squares().is_empty());
    }

    #[test]
    fn opponent_piece_and_empty_square_are_inert_while_idle() {
        let mut fx = Fixture::new(None);
        assert_eq!(fx.click(Square::E7), ClickOutcome::Ignored);
        assert_eq!(fx.click(Square::E5), ClickOutcome::Ignored);
    }

    #[test]
    fn accessible_sides_gate_selection() {
        let mut fx = Fixture::new(None);
        let outcome = fx.controller.on_primary_click(
            Square::E2,
            &mut fx.cells,
            &fx.rules,
            &fx.history,
            AccessibleSides::BlackOnly,
            false,
        );
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(fx.controller.state(), SelectionState::Idle);
    }

    #[test]
    fn rewound_position_blocks_selection_when_configured() {
        let mut fx = Fixture::new(None);
        fx.rules.push(&BoardMove::new(Square::E2, Square::E4)).unwrap();
        fx.history.pop(1, &mut fx.rules).unwrap();
        fx.cells.sync_occupancy(&fx.rules);

        let outcome = fx.controller.on_primary_click(
            Square::E2,
            &mut fx.cells,
            &fx.rules,
            &fx.history,
            AccessibleSides::Both,
            true,
        );
        assert_eq!(outcome, ClickOutcome::Ignored);
    }

    #[test]
    fn marking_clears_selection_and_marked_cells_cancel_clicks() {
        let mut fx = Fixture::new(None);
        fx.click(Square::E2);
        assert!(fx.controller.on_secondary_click(Square::D4, &mut fx.cells));
        assert_eq!(fx.controller.state(), SelectionState::Idle);
        assert!(fx.cells.highlighted_squares().is_empty());

        // A marked cell swallows the next primary click.
        assert_eq!(fx.click(Square::D4), ClickOutcome::Cancelled);
        // Starting a fresh selection wipes marks.
        fx.click(Square::G1);
        assert!(fx.cells.marked_squares().is_empty());
    }
}
