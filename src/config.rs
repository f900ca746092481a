//! Board construction options
//!
//! Everything here has a sensible default so `BoardConfig::default()`
//! produces a standard game from the starting position. Configs are plain
//! serde data so a host application can keep them in its own settings file.

use serde::{Deserialize, Serialize};

use crate::types::AccessibleSides;

/// Options applied when constructing a [`crate::board::BoardCore`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Initial position as a FEN string; `None` means the standard start.
    pub fen: Option<String>,
    /// Render the board from Black's point of view.
    pub flipped: bool,
    /// Which colors may be moved through pointer interaction.
    pub accessible_sides: AccessibleSides,
    /// Refuse pointer moves while the position is rewound behind the
    /// latest committed move.
    pub block_interaction_while_rewound: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fen: None,
            flipped: false,
            accessible_sides: AccessibleSides::Both,
            block_interaction_while_rewound: false,
        }
    }
}
