//! Move history navigation
//!
//! The rules adapter already owns the committed move list; this module
//! adds the redo buffer that makes take-back reversible. Taking a move
//! back parks it here, replaying restores it, and committing a fresh
//! move while rewound discards the buffer, exactly like branching in a
//! text editor's undo stack.

use shakmaty::Move;
use tracing::debug;

use crate::error::{BoardError, BoardResult};
use crate::rules::RulesAdapter;

/// Redo buffer over the rules adapter's committed move list
///
/// Moves are stored newest-first, so `redo.pop()` yields the next move
/// to replay.
#[derive(Debug, Default)]
pub struct HistoryStack {
    redo: Vec<Move>,
}

impl HistoryStack {
    /// Number of taken-back moves available for replay.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Whether the position sits behind the newest known move.
    pub fn is_rewound(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Discard the redo buffer. Called when a fresh move branches away
    /// from the stored continuation.
    pub fn invalidate(&mut self) {
        if !self.redo.is_empty() {
            debug!("[HISTORY] Discarding {} redo moves", self.redo.len());
            self.redo.clear();
        }
    }

    /// Take back the last `count` moves, returning the UCI of the
    /// oldest move undone (the move whose position we land before).
    ///
    /// # Errors
    ///
    /// [`BoardError::HistoryOutOfRange`] when `count` is zero or exceeds
    /// the committed moves; nothing is mutated in that case.
    pub fn pop(&mut self, count: usize, rules: &mut RulesAdapter) -> BoardResult<String> {
        let available = rules.move_count();
        if count == 0 || count > available {
            return Err(BoardError::HistoryOutOfRange {
                requested: count,
                available,
            });
        }
        let mut last = String::new();
        for _ in 0..count {
            let undone = rules.pop()?;
            last = rules.uci(&undone);
            self.redo.push(undone);
        }
        debug!("[HISTORY] Took back {count} moves, {} redoable", self.redo.len());
        Ok(last)
    }

    /// Replay `count` taken-back moves, returning the UCI of the newest
    /// move restored.
    ///
    /// # Errors
    ///
    /// [`BoardError::HistoryOutOfRange`] when `count` is zero or exceeds
    /// the redo buffer; nothing is mutated in that case.
    pub fn unpop(&mut self, count: usize, rules: &mut RulesAdapter) -> BoardResult<String> {
        let available = self.redo.len();
        if count == 0 || count > available {
            return Err(BoardError::HistoryOutOfRange {
                requested: count,
                available,
            });
        }
        let mut last = String::new();
        for _ in 0..count {
            // Length checked above, the buffer cannot run dry here.
            if let Some(redone) = self.redo.pop() {
                last = rules.push_engine(&redone)?;
            }
        }
        debug!("[HISTORY] Replayed {count} moves, {} redoable", self.redo.len());
        Ok(last)
    }

    /// Jump to the position after move number `target` (0 is the root).
    ///
    /// Returns `Ok(None)` when already there, otherwise the UCI of the
    /// boundary move as for [`HistoryStack::pop`] / [`HistoryStack::unpop`].
    ///
    /// # Errors
    ///
    /// [`BoardError::HistoryOutOfRange`] when `target` lies beyond the
    /// known moves, committed and redoable combined.
    pub fn go_to_move(
        &mut self,
        target: usize,
        rules: &mut RulesAdapter,
    ) -> BoardResult<Option<String>> {
        let committed = rules.move_count();
        let known = committed + self.redo.len();
        if target > known {
            return Err(BoardError::HistoryOutOfRange {
                requested: target,
                available: known,
            });
        }
        if target == committed {
            return Ok(None);
        }
        if target < committed {
            self.pop(committed - target, rules).map(Some)
        } else {
            self.unpop(target - committed, rules).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoardMove;
    use shakmaty::Square;

    fn three_moves() -> (HistoryStack, RulesAdapter) {
        let mut rules = RulesAdapter::new(None).unwrap();
        rules.push(&BoardMove::new(Square::E2, Square::E4)).unwrap();
        rules.push(&BoardMove::new(Square::E7, Square::E5)).unwrap();
        rules.push(&BoardMove::new(Square::G1, Square::F3)).unwrap();
        (HistoryStack::default(), rules)
    }

    #[test]
    fn pop_then_unpop_restores_position_and_drains_redo() {
        let (mut history, mut rules) = three_moves();
        let after = rules.fen();
        history.pop(3, &mut rules).unwrap();
        assert_eq!(history.redo_len(), 3);
        assert!(history.is_rewound());

        history.unpop(3, &mut rules).unwrap();
        assert_eq!(rules.fen(), after);
        assert!(!history.is_rewound());
    }

    #[test]
    fn pop_returns_uci_of_oldest_undone_move() {
        let (mut history, mut rules) = three_moves();
        assert_eq!(history.pop(1, &mut rules).unwrap(), "g1f3");
        assert_eq!(history.pop(2, &mut rules).unwrap(), "e2e4");
        assert_eq!(rules.move_count(), 0);
    }

    #[test]
    fn out_of_range_pop_leaves_everything_intact() {
        let (mut history, mut rules) = three_moves();
        let before = rules.fen();
        for count in [0, 4] {
            let err = history.pop(count, &mut rules).unwrap_err();
            assert!(matches!(err, BoardError::HistoryOutOfRange { available: 3, .. }));
        }
        assert_eq!(rules.fen(), before);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn unpop_without_redo_is_out_of_range() {
        let (mut history, mut rules) = three_moves();
        assert!(matches!(
            history.unpop(1, &mut rules),
            Err(BoardError::HistoryOutOfRange {
                requested: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn go_to_move_navigates_both_directions() {
        let (mut history, mut rules) = three_moves();
        assert_eq!(history.go_to_move(3, &mut rules).unwrap(), None);

        history.go_to_move(0, &mut rules).unwrap();
        assert_eq!(rules.move_count(), 0);
        assert_eq!(history.redo_len(), 3);

        history.go_to_move(2, &mut rules).unwrap();
        assert_eq!(rules.move_count(), 2);
        assert_eq!(history.redo_len(), 1);

        assert!(history.go_to_move(4, &mut rules).is_err());
    }

    #[test]
    fn invalidate_clears_the_redo_buffer() {
        let (mut history, mut rules) = three_moves();
        history.pop(2, &mut rules).unwrap();
        history.invalidate();
        assert_eq!(history.redo_len(), 0);
        assert!(history.unpop(1, &mut rules).is_err());
    }
}
