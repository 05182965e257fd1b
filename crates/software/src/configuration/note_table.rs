use super::{COLS, ROWS};

/// Fixed pitches for every cell of the key matrix, in Hz.
///
/// Row 0 holds the C5 octave, each following row drops an octave, and row 4 only carries the top C. The remaining cells
/// of row 4 aren't wired to keys and carry no pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTable {
    frequencies: [[Option<f32>; COLS]; ROWS],
}

/// The instrument's layout, ordered by physical row line and then by column index.
pub const NOTE_TABLE: NoteTable = NoteTable::new([
    populated([
        523.25, 554.37, 587.33, 622.25, 659.25, 698.46, 739.99, 783.99, 830.61, 880.00, 932.33, 987.77,
    ]),
    populated([
        261.63, 277.18, 293.66, 311.13, 329.63, 349.23, 369.99, 392.00, 415.30, 440.00, 466.16, 493.88,
    ]),
    populated([
        130.81, 138.59, 146.83, 155.56, 164.81, 174.61, 185.00, 196.00, 207.65, 220.00, 233.08, 246.94,
    ]),
    populated([
        65.41, 69.30, 73.42, 77.78, 82.41, 87.31, 92.50, 98.00, 103.83, 110.00, 116.54, 123.47,
    ]),
    [
        Some(1046.50),
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
    ],
]);

const fn populated(row: [f32; COLS]) -> [Option<f32>; COLS] {
    let mut out = [None; COLS];
    let mut col = 0;
    while col < COLS {
        out[col] = Some(row[col]);
        col += 1;
    }
    out
}

impl NoteTable {
    /// Constructs a [`NoteTable`] from a row-major grid.
    pub const fn new(frequencies: [[Option<f32>; COLS]; ROWS]) -> Self {
        Self { frequencies }
    }

    /// Returns the pitch of the key at `row`/`col`, or `None` if no key sits there.
    pub fn frequency(&self, row: usize, col: usize) -> Option<f32> {
        self.frequencies
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .flatten()
    }

    /// Returns every row's pitch for one column, top row first.
    pub fn column(&self, col: usize) -> [Option<f32>; ROWS] {
        core::array::from_fn(|row| self.frequency(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners() {
        assert_eq!(Some(523.25), NOTE_TABLE.frequency(0, 0), "Expected left but got right");
        assert_eq!(Some(987.77), NOTE_TABLE.frequency(0, 11), "Expected left but got right");
        assert_eq!(Some(65.41), NOTE_TABLE.frequency(3, 0), "Expected left but got right");
        assert_eq!(Some(1046.50), NOTE_TABLE.frequency(4, 0), "Expected left but got right");
    }

    #[test]
    fn row_four_has_a_single_key() {
        for col in 1..COLS {
            assert_eq!(None, NOTE_TABLE.frequency(4, col), "Expected left but got right");
        }
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(None, NOTE_TABLE.frequency(ROWS, 0));
        assert_eq!(None, NOTE_TABLE.frequency(0, COLS));
    }

    #[test]
    fn column() {
        assert_eq!(
            [Some(659.25), Some(329.63), Some(164.81), Some(82.41), None],
            NOTE_TABLE.column(4),
            "Expected left but got right"
        );
    }
}
