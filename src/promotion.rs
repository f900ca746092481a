//! Promotion piece selection
//!
//! When a pawn reaches the back rank without a preset promotion role the
//! board asks a [`PromotionPicker`] to choose one. A host UI typically
//! implements the trait with a modal dialog; headless callers can use
//! [`AutoQueen`] or a closure. Returning `None` cancels the move cleanly,
//! it is not an error.

use shakmaty::{Color, Role};

/// Order in which promotion choices should be presented
///
/// A dialog rendered next to the promotion square reads top-down for one
/// orientation and bottom-up for the other, so a flipped board wants the
/// queen listed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOrder {
    /// Queen first, bishop last.
    QueenFirst,
    /// Bishop first, queen last.
    QueenLast,
}

/// The four roles a pawn may promote to, in presentation order
pub fn display_order(order: PromotionOrder) -> [Role; 4] {
    let mut roles = [Role::Queen, Role::Knight, Role::Rook, Role::Bishop];
    if order == PromotionOrder::QueenLast {
        roles.reverse();
    }
    roles
}

/// Chooses the promotion role for a pawn reaching the back rank
pub trait PromotionPicker {
    /// Pick a role for a `color` pawn, or `None` to cancel the move.
    fn choose_promotion(&mut self, color: Color, order: PromotionOrder) -> Option<Role>;
}

impl<F> PromotionPicker for F
where
    F: FnMut(Color, PromotionOrder) -> Option<Role>,
{
    fn choose_promotion(&mut self, color: Color, order: PromotionOrder) -> Option<Role> {
        self(color, order)
    }
}

/// Picker that always promotes to a queen
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoQueen;

impl PromotionPicker for AutoQueen {
    fn choose_promotion(&mut self, _color: Color, _order: PromotionOrder) -> Option<Role> {
        Some(Role::Queen)
    }
}
