//! Last-note-priority arbitration: turns key edges into the single note the instrument voices and its gate.
//!
//! The decision is driven by *transitions* in the [`KeyMatrix`], never by its steady state:
//! - A newly pressed key always becomes the active note and opens the gate, even when another key is already sounding.
//! - A newly released key closes the gate only when its pitch is exactly the active note. Releasing any other key is
//!   silent.
//!
//! Pitch, not key position, is the arbitration token. Two keys tuned to the same frequency are interchangeable here:
//! releasing either one while that frequency is active closes the gate, even if the other is still held.

use crate::{
    configuration::{COLS, NoteTable, ROWS},
    key_matrix::KeyMatrix,
};
use tinyvec::ArrayVec;

/// The note the instrument is voicing and whether its gate is open.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Voice {
    /// Frequency of the active note in Hz. `0.0` until the first key is pressed.
    pub active_note: f32,
    /// Whether the envelope should be sounding.
    pub gate_open: bool,
}

impl Voice {
    /// No note, gate closed.
    pub const QUIESCENT: Self = Self {
        active_note: 0.0,
        gate_open: false,
    };
}

impl Default for Voice {
    fn default() -> Self {
        Self::QUIESCENT
    }
}

/// Which way a key moved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// The key went down since the last time its column was scanned.
    #[default]
    Pressed,
    /// The key came up since the last time its column was scanned.
    Released,
}

/// A single key transition observed while scanning a column.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEdge {
    /// Row line the key sits on.
    pub row: usize,
    /// Direction of travel.
    pub edge: Edge,
    /// Pitch of the key, if one is assigned.
    pub frequency: Option<f32>,
}

/// Everything that changes when one column's row readings are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnOutcome {
    /// The column's new pressed state, top row first.
    pub keys: [bool; ROWS],
    /// The voice after both passes.
    pub voice: Voice,
    /// Transitions in the order they were applied.
    pub edges: ArrayVec<[KeyEdge; ROWS]>,
}

/// Applies one column's row readings to its previous state.
///
/// All presses in the column are handled first, top row to bottom, followed by all releases. `frequencies` holds the
/// pitch of each row's key in this column; keys without a pitch are tracked but never touch the voice.
pub fn arbitrate_column(
    previous: [bool; ROWS],
    levels: [bool; ROWS],
    frequencies: [Option<f32>; ROWS],
    mut voice: Voice,
) -> ColumnOutcome {
    let mut keys = previous;
    let mut edges = ArrayVec::new();

    for row in 0..ROWS {
        if levels[row] && !keys[row] {
            keys[row] = true;
            if let Some(frequency) = frequencies[row] {
                voice.active_note = frequency;
                voice.gate_open = true;
            }
            edges.push(KeyEdge {
                row,
                edge: Edge::Pressed,
                frequency: frequencies[row],
            });
        }
    }

    for row in 0..ROWS {
        if !levels[row] && keys[row] {
            keys[row] = false;
            if frequencies[row] == Some(voice.active_note) {
                voice.gate_open = false;
            }
            edges.push(KeyEdge {
                row,
                edge: Edge::Released,
                frequency: frequencies[row],
            });
        }
    }

    ColumnOutcome { keys, voice, edges }
}

/// Owns the [`KeyMatrix`] and the current [`Voice`], applying each scanned column in turn.
///
/// Columns are applied one at a time as the sweep reaches them rather than all at once, so when several new presses land
/// in one sweep, the highest column wins.
#[derive(Debug, Clone)]
pub struct NoteArbiter<'a> {
    table: &'a NoteTable,
    matrix: KeyMatrix,
    voice: Voice,
}

impl<'a> NoteArbiter<'a> {
    /// Starts with every key up and a quiescent voice.
    pub fn new(table: &'a NoteTable) -> Self {
        Self {
            table,
            matrix: KeyMatrix::new(),
            voice: Voice::QUIESCENT,
        }
    }

    /// Applies the row readings taken while `col` was selected. Returns the transitions found, which are always none for
    /// a column outside the matrix.
    pub fn apply_column(&mut self, col: usize, levels: [bool; ROWS]) -> ArrayVec<[KeyEdge; ROWS]> {
        if col >= COLS {
            return ArrayVec::new();
        }
        let outcome = arbitrate_column(
            self.matrix.column(col),
            levels,
            self.table.column(col),
            self.voice,
        );
        self.matrix.set_column(col, outcome.keys);
        self.voice = outcome.voice;
        outcome.edges
    }

    /// Getter.
    pub fn voice(&self) -> Voice {
        self.voice
    }

    /// Getter.
    pub fn matrix(&self) -> &KeyMatrix {
        &self.matrix
    }
}
