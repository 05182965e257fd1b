//! This crate contains architecture-agnostic logic for a monophonic matrix-keyboard synthesizer: a 5×12 key matrix read
//! through a shift register chain, a last-note-priority voice, eight pots that shape the sound, and the signal chain that
//! turns all of it into stereo audio.
//!
//! Nothing here touches a specific microcontroller. Pins are reached through [`embedded_hal`] traits, the DSP is plain
//! arithmetic, and the only thing shared between execution contexts is [`shared_state::SharedControlState`], which is
//! lock-free.

#![deny(missing_docs)]
#![no_std]

pub mod configuration;

pub mod dsp;

pub mod key_matrix;

pub mod note_arbiter;

pub mod parameters;

pub mod render;

pub mod scanner;

pub mod shared_state;

pub mod shift_register;

#[cfg(test)]
mod mock;
