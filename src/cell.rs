//! Visual cell state
//!
//! One [`CellState`] per square mirrors what the renderer needs to draw:
//! occupant, highlight, user mark, check flag, last-move trace, and
//! whether the cell currently reacts to a selection click. The grid owns
//! the only mutation paths and reports every actual change through
//! [`BoardEvent::CellChanged`], so a host can repaint exactly the cells
//! that moved.

use shakmaty::{Piece, Role, Square};

use crate::error::{BoardError, BoardResult};
use crate::events::{BoardEvent, EventSink};
use crate::rules::RulesAdapter;

/// Drawable state of a single board cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellState {
    occupant: Option<Piece>,
    highlighted: bool,
    marked: bool,
    in_check: bool,
    just_moved: bool,
    selectable: bool,
}

impl CellState {
    pub fn occupant(&self) -> Option<Piece> {
        self.occupant
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn is_in_check(&self) -> bool {
        self.in_check
    }

    pub fn is_just_moved(&self) -> bool {
        self.just_moved
    }

    /// Whether a primary click on this cell may begin a selection.
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn is_piece(&self) -> bool {
        self.occupant.is_some()
    }

    /// No occupant and no decoration of any kind.
    pub fn is_plain(&self) -> bool {
        *self == CellState::default()
    }
}

/// All 64 cells plus the bookkeeping to keep them consistent
#[derive(Debug)]
pub struct CellGrid {
    cells: [CellState; 64],
    just_moved: Option<(Square, Square)>,
    events: EventSink,
}

impl CellGrid {
    pub fn new(events: EventSink) -> Self {
        Self {
            cells: [CellState::default(); 64],
            just_moved: None,
            events,
        }
    }

    pub fn cell(&self, square: Square) -> &CellState {
        &self.cells[usize::from(square)]
    }

    /// Place or clear a piece on a cell.
    ///
    /// Selectability follows occupancy unless the cell is highlighted,
    /// in which case a click means "move here" and must never start a
    /// new selection.
    pub fn set_occupant(&mut self, square: Square, occupant: Option<Piece>) {
        let cell = &mut self.cells[usize::from(square)];
        let mut next = *cell;
        next.occupant = occupant;
        next.selectable = occupant.is_some() && !next.highlighted;
        self.store(square, next);
    }

    /// Mark or unmark a cell as a legal destination.
    pub fn set_highlighted(&mut self, square: Square, highlighted: bool) {
        let cell = &mut self.cells[usize::from(square)];
        let mut next = *cell;
        next.highlighted = highlighted;
        next.selectable = if highlighted { false } else { next.occupant.is_some() };
        self.store(square, next);
    }

    /// Flip the user mark on a cell, returning the new mark state.
    pub fn toggle_marked(&mut self, square: Square) -> bool {
        let mut next = self.cells[usize::from(square)];
        next.marked = !next.marked;
        self.store(square, next);
        next.marked
    }

    /// Set or clear the check flag on a king's cell.
    ///
    /// # Errors
    ///
    /// [`BoardError::NotAKing`] when the cell does not hold a king.
    pub fn set_in_check(&mut self, square: Square, in_check: bool) -> BoardResult<()> {
        match self.cells[usize::from(square)].occupant {
            Some(piece) if piece.role == Role::King => {
                self.force_check_flag(square, in_check);
                Ok(())
            }
            _ => Err(BoardError::NotAKing { square }),
        }
    }

    fn force_check_flag(&mut self, square: Square, in_check: bool) {
        let mut next = self.cells[usize::from(square)];
        next.in_check = in_check;
        self.store(square, next);
    }

    fn set_just_moved_flag(&mut self, square: Square, just_moved: bool) {
        let mut next = self.cells[usize::from(square)];
        next.just_moved = just_moved;
        self.store(square, next);
    }

    /// Remove every destination highlight.
    pub fn clear_highlights(&mut self) {
        for index in 0..64 {
            let square = Square::new(index);
            if self.cells[usize::from(square)].highlighted {
                self.set_highlighted(square, false);
            }
        }
    }

    /// Remove every user mark.
    pub fn clear_marks(&mut self) {
        for index in 0..64 {
            let square = Square::new(index);
            let cell = self.cells[usize::from(square)];
            if cell.marked {
                let mut next = cell;
                next.marked = false;
                self.store(square, next);
            }
        }
    }

    /// Copy piece placement from the rules engine into the grid.
    pub fn sync_occupancy(&mut self, rules: &RulesAdapter) {
        for index in 0..64 {
            let square = Square::new(index);
            self.set_occupant(square, rules.piece_at(square));
        }
    }

    /// Recompute the last-move trace and check flags from the engine.
    pub fn refresh_flags(&mut self, rules: &RulesAdapter) {
        self.set_just_moved_pair(rules.last_move_squares());
        let checked_king = if rules.is_check() {
            rules.king_square(rules.turn())
        } else {
            None
        };
        for index in 0..64 {
            let square = Square::new(index);
            self.force_check_flag(square, Some(square) == checked_king);
        }
    }

    fn set_just_moved_pair(&mut self, pair: Option<(Square, Square)>) {
        if self.just_moved == pair {
            return;
        }
        if let Some((from, to)) = self.just_moved {
            self.set_just_moved_flag(from, false);
            self.set_just_moved_flag(to, false);
        }
        if let Some((from, to)) = pair {
            self.set_just_moved_flag(from, true);
            self.set_just_moved_flag(to, true);
        }
        self.just_moved = pair;
    }

    /// Announce every cell as changed, for events that invalidate the
    /// whole rendering such as an orientation flip.
    pub fn force_repaint(&self) {
        for index in 0..64 {
            self.events.emit(BoardEvent::CellChanged {
                square: Square::new(index),
            });
        }
    }

    pub fn highlighted_squares(&self) -> Vec<Square> {
        self.squares_where(|cell| cell.highlighted)
    }

    pub fn marked_squares(&self) -> Vec<Square> {
        self.squares_where(|cell| cell.marked)
    }

    fn squares_where(&self, predicate: impl Fn(&CellState) -> bool) -> Vec<Square> {
        (0..64)
            .map(Square::new)
            .filter(|square| predicate(&self.cells[usize::from(*square)]))
            .collect()
    }

    /// Write a cell back, emitting a change event only when it differs.
    fn store(&mut self, square: Square, next: CellState) {
        let cell = &mut self.cells[usize::from(square)];
        if *cell != next {
            *cell = next;
            self.events.emit(BoardEvent::CellChanged { square });
        }
    }

    #[cfg(test)]
    pub(crate) fn king_cell_for_test(&mut self, square: Square, color: shakmaty::Color) {
        self.set_occupant(
            square,
            Some(Piece {
                color,
                role: Role::King,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Receiver;
    use shakmaty::Color;

    fn grid() -> (CellGrid, Receiver<BoardEvent>) {
        let (sink, rx) = EventSink::unbounded();
        (CellGrid::new(sink), rx)
    }

    fn drain(rx: &Receiver<BoardEvent>) -> Vec<BoardEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn unchanged_writes_emit_nothing() {
        let (mut cells, rx) = grid();
        cells.set_occupant(Square::E4, None);
        cells.set_highlighted(Square::E4, false);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn highlight_suppresses_selectability() {
        let (mut cells, rx) = grid();
        cells.king_cell_for_test(Square::E1, Color::White);
        assert!(cells.cell(Square::E1).is_selectable());

        cells.set_highlighted(Square::E1, true);
        assert!(!cells.cell(Square::E1).is_selectable());

        cells.set_highlighted(Square::E1, false);
        assert!(cells.cell(Square::E1).is_selectable());
        assert_eq!(drain(&rx).len(), 3);
    }

    #[test]
    fn check_flag_requires_a_king() {
        let (mut cells, _rx) = grid();
        assert!(matches!(
            cells.set_in_check(Square::E4, true),
            Err(BoardError::NotAKing { square: Square::E4 })
        ));
        cells.king_cell_for_test(Square::E1, Color::White);
        cells.set_in_check(Square::E1, true).unwrap();
        assert!(cells.cell(Square::E1).is_in_check());
    }

    #[test]
    fn refresh_flags_traces_last_move_and_check() {
        let (sink, _rx) = EventSink::unbounded();
        let mut cells = CellGrid::new(sink);
        let mut rules = RulesAdapter::new(Some("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1")).unwrap();
        cells.sync_occupancy(&rules);
        rules
            .push(&crate::types::BoardMove::new(Square::E1, Square::E8))
            .unwrap();
        cells.sync_occupancy(&rules);
        cells.refresh_flags(&rules);

        assert!(cells.cell(Square::E1).is_just_moved());
        assert!(cells.cell(Square::E8).is_just_moved());
        assert!(cells.cell(Square::G8).is_in_check());
        assert!(!cells.cell(Square::E8).is_in_check());
    }

    #[test]
    fn clear_marks_leaves_other_flags_alone() {
        let (mut cells, _rx) = grid();
        cells.king_cell_for_test(Square::E1, Color::White);
        assert!(cells.toggle_marked(Square::E1));
        assert!(cells.toggle_marked(Square::A8));
        cells.clear_marks();
        assert!(cells.marked_squares().is_empty());
        assert!(cells.cell(Square::E1).is_piece());
    }
}
