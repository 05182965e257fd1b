//! This module contains the fixed configuration of the controller (the key layout, the note table, envelope timing and
//! DSP start-up values) along with the enums used to describe user-selectable settings.
//!
//! Nothing here is loaded at runtime. The values describe one particular instrument and live for the lifetime of the
//! process.

mod control_input;
pub use control_input::*;

mod envelope;
pub use envelope::*;

mod note_table;
pub use note_table::*;

mod waveform;
pub use waveform::*;

/// Number of row lines read back from the key matrix.
pub const ROWS: usize = 5;

/// Number of columns energized through the shift register chain.
pub const COLS: usize = 12;

/// Number of stereo frames rendered per audio block.
pub const BLOCK_SIZE: usize = 4;

/// Audio sample rate negotiated with the codec, in Hz.
pub const SAMPLE_RATE: f32 = 48_000.0;

/// Frequency the oscillator is tuned to before any key has been pressed.
pub const OSCILLATOR_DEFAULT_HZ: f32 = 300.0;

/// Centre frequency of the phaser's allpass sweep.
pub const PHASER_CENTRE_HZ: f32 = 500.0;

/// Reverb feedback used until the first block maps the pots.
pub const REVERB_DEFAULT_FEEDBACK: f32 = 0.9;

/// Reverb lowpass cutoff used until the first block maps the pots.
pub const REVERB_DEFAULT_LOWPASS_HZ: f32 = 18_000.0;
