//! Coordinate mapping between board squares and the visual grid
//!
//! The renderer addresses cells by `(row, col)` counted from the top-left
//! corner of the widget; game logic addresses them by `shakmaty::Square`
//! (0 = a1, 63 = h8). The two transforms here are mutual inverses for both
//! orientations:
//!
//! - Default: rank 8 is visual row 0 (the board as seen by White).
//! - Flipped: the board rotated 180 degrees, so row = rank index and
//!   col = 7 - file (the board as seen by Black).
//!
//! The domain is total over all 64 squares; there are no error states.

use shakmaty::{File, Rank, Square};

/// Convert a board square to its visual grid position
///
/// # Returns
///
/// `(row, col)` with row 0 at the top of the rendered board.
#[inline]
pub fn to_visual(square: Square, flipped: bool) -> (u8, u8) {
    let file = u32::from(square.file()) as u8;
    let rank = u32::from(square.rank()) as u8;
    if flipped {
        (rank, 7 - file)
    } else {
        (7 - rank, file)
    }
}

/// Convert a visual grid position to its board square
///
/// Both coordinates must be in `0..8`; anything else is a programming
/// error on the caller's side.
#[inline]
pub fn to_square(row: u8, col: u8, flipped: bool) -> Square {
    assert!(row < 8 && col < 8, "grid position ({row}, {col}) out of range");
    if flipped {
        Square::from_coords(File::new(7 - u32::from(col)), Rank::new(u32::from(row)))
    } else {
        Square::from_coords(File::new(u32::from(col)), Rank::new(7 - u32::from(row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_default_orientation() {
        // White's point of view: a8 is top-left, h1 is bottom-right.
        assert_eq!(to_visual(Square::A8, false), (0, 0));
        assert_eq!(to_visual(Square::H8, false), (0, 7));
        assert_eq!(to_visual(Square::A1, false), (7, 0));
        assert_eq!(to_visual(Square::H1, false), (7, 7));
    }

    #[test]
    fn corners_flipped_orientation() {
        // Black's point of view: h1 is top-left, a8 is bottom-right.
        assert_eq!(to_visual(Square::H1, true), (0, 0));
        assert_eq!(to_visual(Square::A1, true), (0, 7));
        assert_eq!(to_visual(Square::H8, true), (7, 0));
        assert_eq!(to_visual(Square::A8, true), (7, 7));
    }

    #[test]
    fn roundtrip_all_squares_both_orientations() {
        for flipped in [false, true] {
            for index in 0..64 {
                let square = Square::new(index);
                let (row, col) = to_visual(square, flipped);
                assert_eq!(
                    to_square(row, col, flipped),
                    square,
                    "roundtrip failed for {square} flipped={flipped}"
                );
            }
        }
    }

    #[test]
    fn orientations_disagree_everywhere_but_center_symmetry() {
        // Flipping rotates by 180 degrees, so no square keeps its grid slot.
        for index in 0..64 {
            let square = Square::new(index);
            assert_ne!(to_visual(square, false), to_visual(square, true));
        }
    }

    #[test]
    #[should_panic]
    fn out_of_range_row_panics() {
        to_square(8, 0, false);
    }
}
