//! The debounced-by-scan view of which physical keys are down.

use crate::configuration::{COLS, ROWS};

/// Pressed/released state for every cell of the matrix, indexed by row line and column.
///
/// This is the only record of whether a key is physically down. It changes once per cell per sweep, and only through
/// [`NoteArbiter`][crate::note_arbiter::NoteArbiter].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMatrix {
    pressed: [[bool; COLS]; ROWS],
}

impl KeyMatrix {
    /// Constructs a matrix with every key up.
    pub const fn new() -> Self {
        Self {
            pressed: [[false; COLS]; ROWS],
        }
    }

    /// Whether the key at `row`/`col` is recorded as down. Cells outside the matrix never are.
    pub fn is_pressed(&self, row: usize, col: usize) -> bool {
        self.pressed
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the recorded state of one column, top row first.
    pub fn column(&self, col: usize) -> [bool; ROWS] {
        core::array::from_fn(|row| self.is_pressed(row, col))
    }

    /// Records one column's state. Columns outside the matrix are ignored.
    pub(crate) fn set_column(&mut self, col: usize, keys: [bool; ROWS]) {
        for (cells, pressed) in self.pressed.iter_mut().zip(keys) {
            if let Some(cell) = cells.get_mut(col) {
                *cell = pressed;
            }
        }
    }

    /// Iterates over the `(row, col)` of every key currently down.
    pub fn iter_pressed(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| (row, col)))
            .filter(|&(row, col)| self.pressed[row][col])
    }

    /// Whether no key is down.
    pub(crate) fn is_empty(&self) -> bool {
        self.iter_pressed().next().is_none()
    }
}
