//! Outbound event stream
//!
//! The board never calls back into the host. Instead every observable
//! change is pushed onto an unbounded channel and the host drains the
//! receiver whenever it likes (typically once per frame). Send failures
//! mean the host dropped its receiver, which is a normal shutdown path,
//! so they are silently ignored.
//!
//! # Integration
//!
//! ```
//! use chessboard_core::events::{BoardEvent, EventSink};
//!
//! let (sink, rx) = EventSink::unbounded();
//! sink.emit(BoardEvent::GameOver);
//! assert_eq!(rx.try_recv(), Ok(BoardEvent::GameOver));
//! ```

use crossbeam_channel::{unbounded, Receiver, Sender};
use shakmaty::{Color, Square};

/// Notifications emitted by the board core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A move was committed; `notation` is its SAN rendering.
    MoveMade { notation: String },
    /// The side to move has been mated; `winner` delivered the mate.
    Checkmate { winner: Color },
    /// The game is drawn by insufficient material.
    Draw,
    /// The side to move has no legal moves and is not in check.
    Stalemate,
    /// The game ended for any reason. Always follows the specific
    /// terminal event.
    GameOver,
    /// The visual state of one cell changed and should be repainted.
    CellChanged { square: Square },
}

/// Cloneable sending half of the board's event channel
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<BoardEvent>,
}

impl EventSink {
    /// Create a sink together with the receiver the host will drain.
    pub fn unbounded() -> (Self, Receiver<BoardEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    /// Push an event. A disconnected receiver is not an error.
    pub fn emit(&self, event: BoardEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_emission_order() {
        let (sink, rx) = EventSink::unbounded();
        sink.emit(BoardEvent::MoveMade {
            notation: "e4".to_string(),
        });
        sink.emit(BoardEvent::CellChanged { square: Square::E4 });

        assert_eq!(
            rx.try_recv(),
            Ok(BoardEvent::MoveMade {
                notation: "e4".to_string()
            })
        );
        assert_eq!(rx.try_recv(), Ok(BoardEvent::CellChanged { square: Square::E4 }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (sink, rx) = EventSink::unbounded();
        drop(rx);
        sink.emit(BoardEvent::GameOver);
    }
}
