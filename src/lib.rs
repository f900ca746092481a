//! Interactive chess board core
//!
//! A UI-toolkit-agnostic engine for click-to-move chess boards. The
//! crate owns everything between pointer input and pixels: legality
//! through [shakmaty], a selection state machine, per-cell visual state,
//! a navigable move history with redo, board orientation, and an event
//! channel the host drains to repaint.
//!
//! # Architecture
//!
//! - [`rules`]: the only module that talks to the rules engine.
//! - [`selection`] and [`executor`]: pointer input becomes committed
//!   moves through one validation path.
//! - [`cell`] and [`mapping`]: what each square looks like and where it
//!   is drawn under either orientation.
//! - [`history`]: take-back and replay over the committed move list.
//! - [`board`]: the [`BoardCore`] facade tying it all together.
//!
//! # Integration
//!
//! ```
//! use chessboard_core::{BoardConfig, BoardCore, BoardEvent, Square};
//!
//! let mut board = BoardCore::new(BoardConfig::default())?;
//! let events = board.events();
//!
//! // A click pair plays 1. e4.
//! board.primary_click_square(Square::E2)?;
//! board.primary_click_square(Square::E4)?;
//!
//! for event in events.try_iter() {
//!     if let BoardEvent::MoveMade { notation } = event {
//!         assert_eq!(notation, "e4");
//!     }
//! }
//! # Ok::<(), chessboard_core::BoardError>(())
//! ```

pub mod board;
pub mod cell;
pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod history;
pub mod mapping;
pub mod promotion;
pub mod rules;
pub mod selection;
pub mod types;

pub use board::BoardCore;
pub use cell::{CellGrid, CellState};
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult};
pub use events::{BoardEvent, EventSink};
pub use executor::MoveOutcome;
pub use history::HistoryStack;
pub use mapping::{to_square, to_visual};
pub use promotion::{display_order, AutoQueen, PromotionOrder, PromotionPicker};
pub use rules::RulesAdapter;
pub use selection::{ClickOutcome, SelectionController, SelectionState};
pub use types::{AccessibleSides, BoardMove};

// Engine types that appear throughout the public API.
pub use shakmaty::{Color, Move, Piece, Role, Square};
