//! Shared type definitions for the board interaction core
//!
//! Small domain types used across the selection, execution and history
//! modules: the side-access gate and the UI-level candidate move.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role, Square};

/// Which color's pieces the local interactive agent may select and move
///
/// This is purely an interaction gate; it has no effect on legality.
/// A spectator board uses `None`, a practice board `Both`, and each seat
/// of a multiplayer game `WhiteOnly` or `BlackOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibleSides {
    /// No piece may be selected
    None,
    /// Only white pieces may be selected
    WhiteOnly,
    /// Only black pieces may be selected
    BlackOnly,
    /// Both colors may be selected
    #[default]
    Both,
}

impl AccessibleSides {
    /// Check whether pieces of the given color may be selected
    pub fn allows(self, color: Color) -> bool {
        match self {
            AccessibleSides::None => false,
            AccessibleSides::WhiteOnly => color == Color::White,
            AccessibleSides::BlackOnly => color == Color::Black,
            AccessibleSides::Both => true,
        }
    }
}

/// A candidate move as produced by the interaction layer
///
/// Carries only what a click pair (or a programmatic caller) knows: source,
/// destination, and an optional promotion piece. Legality is decided by the
/// rules adapter when the move is committed. `from == to` is the null move
/// and is always rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl BoardMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: Role) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// A null move never passes legality validation
    pub fn is_null(&self) -> bool {
        self.from == self.to
    }

    /// Long algebraic rendering, e.g. `e2e4` or `a7a8q`
    pub fn uci(&self) -> String {
        match self.promotion {
            Some(role) => format!("{}{}{}", self.from, self.to, role.char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}
