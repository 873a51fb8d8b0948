//! Cursor — the screen cell the user is pointing at.
//!
//! `CursorState` is a plain `(x, y)` pair in screen coordinates, 0-indexed.
//! It does not know about the document; navigation clamps against the
//! viewport only.
//!
//! # Bounds
//!
//! The lower bound is 0 on both axes. The upper bounds are asymmetric:
//!
//! - `MoveRight` stops at `x == cols` and `MoveDown` at `y == rows`, one
//!   cell past the last visible column/row. The terminal clamps the drawn
//!   cursor to the edge, so this is invisible until you move back, where it
//!   costs one extra keypress.
//! - `End` lands on `x == cols - 1`, the last visible column.

use bankai_term::input::Key;
use bankai_term::terminal::Size;

// ---------------------------------------------------------------------------
// CursorState
// ---------------------------------------------------------------------------

/// Cursor position in screen cells, 0-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    pub x: u16,
    pub y: u16,
}

impl CursorState {
    /// The top-left cell.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a cursor at `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Apply a navigation key, returning the moved cursor.
    ///
    /// Non-navigation keys return the cursor unchanged.
    #[must_use]
    pub fn apply(self, key: Key, size: Size) -> Self {
        let mut next = self;
        match key {
            Key::MoveLeft => next.x = next.x.saturating_sub(1),
            Key::MoveRight => {
                if next.x < size.cols {
                    next.x += 1;
                }
            }
            Key::MoveUp => next.y = next.y.saturating_sub(1),
            Key::MoveDown => {
                if next.y < size.rows {
                    next.y += 1;
                }
            }
            Key::Home => next.x = 0,
            Key::End => next.x = size.cols.saturating_sub(1),
            // One step per row, so each step clamps like a single arrow.
            Key::PageUp => {
                for _ in 0..size.rows {
                    next = next.apply(Key::MoveUp, size);
                }
            }
            Key::PageDown => {
                for _ in 0..size.rows {
                    next = next.apply(Key::MoveDown, size);
                }
            }
            Key::Delete | Key::Literal(_) => {}
        }
        next
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Size = Size::new(24, 80);

    fn at(x: u16, y: u16) -> CursorState {
        CursorState::new(x, y)
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_at_zero_stays() {
        assert_eq!(at(0, 5).apply(Key::MoveLeft, SIZE), at(0, 5));
    }

    #[test]
    fn left_moves_one() {
        assert_eq!(at(10, 0).apply(Key::MoveLeft, SIZE), at(9, 0));
    }

    #[test]
    fn right_moves_one() {
        assert_eq!(at(3, 0).apply(Key::MoveRight, SIZE), at(4, 0));
    }

    #[test]
    fn right_reaches_one_past_last_column() {
        assert_eq!(at(79, 0).apply(Key::MoveRight, SIZE), at(80, 0));
    }

    #[test]
    fn right_at_cols_stays() {
        assert_eq!(at(80, 0).apply(Key::MoveRight, SIZE), at(80, 0));
    }

    #[test]
    fn home_goes_to_column_zero() {
        assert_eq!(at(42, 7).apply(Key::Home, SIZE), at(0, 7));
    }

    #[test]
    fn end_goes_to_last_column() {
        assert_eq!(at(0, 7).apply(Key::End, SIZE), at(79, 7));
    }

    #[test]
    fn end_is_idempotent() {
        assert_eq!(at(79, 0).apply(Key::End, SIZE), at(79, 0));
    }

    #[test]
    fn end_pulls_back_from_cols() {
        assert_eq!(at(80, 0).apply(Key::End, SIZE), at(79, 0));
    }

    #[test]
    fn end_on_zero_width_viewport() {
        assert_eq!(at(0, 0).apply(Key::End, Size::new(24, 0)), at(0, 0));
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn up_at_zero_stays() {
        assert_eq!(at(4, 0).apply(Key::MoveUp, SIZE), at(4, 0));
    }

    #[test]
    fn down_reaches_rows_and_stops() {
        let c = at(0, 23).apply(Key::MoveDown, SIZE);
        assert_eq!(c, at(0, 24));
        assert_eq!(c.apply(Key::MoveDown, SIZE), at(0, 24));
    }

    #[test]
    fn page_down_from_top_lands_on_rows() {
        assert_eq!(at(5, 0).apply(Key::PageDown, SIZE), at(5, 24));
    }

    #[test]
    fn page_up_from_middle_clamps_at_zero() {
        assert_eq!(at(5, 10).apply(Key::PageUp, SIZE), at(5, 0));
    }

    #[test]
    fn page_keys_leave_x_alone() {
        let c = at(33, 12);
        assert_eq!(c.apply(Key::PageDown, SIZE).x, 33);
        assert_eq!(c.apply(Key::PageUp, SIZE).x, 33);
    }

    // -- Ignored keys -------------------------------------------------------

    #[test]
    fn non_navigation_keys_are_ignored() {
        let c = at(12, 6);
        assert_eq!(c.apply(Key::Delete, SIZE), c);
        assert_eq!(c.apply(Key::Literal(b'x'), SIZE), c);
        assert_eq!(c.apply(Key::Literal(0x1B), SIZE), c);
    }

    #[test]
    fn default_is_origin() {
        assert_eq!(CursorState::default(), CursorState::ORIGIN);
    }
}
