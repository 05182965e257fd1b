//! The signal-processing primitives driven by the render path, and the interfaces it drives them through.
//!
//! The render path only depends on the traits here. The implementations are deliberately small: enough to make the
//! instrument sound, cheap enough to run per sample on a Cortex-M7, and free of allocation so they can live in a
//! `static`.

mod envelope;
pub use envelope::*;

mod oscillator;
pub use oscillator::*;

mod overdrive;
pub use overdrive::*;

mod phaser;
pub use phaser::*;

mod reverb;
pub use reverb::*;

mod tremolo;
pub use tremolo::*;

use crate::{
    configuration::{EnvelopeConfig, Waveform},
    parameters::Parameters,
};
use enum_dispatch::enum_dispatch;

/// A tone generator.
pub trait Oscillator {
    /// Sets the pitch in Hz.
    fn set_frequency(&mut self, hz: f32);
    /// Sets the shape.
    fn set_waveform(&mut self, waveform: Waveform);
    /// Sets the peak level of the next samples.
    fn set_amplitude(&mut self, amplitude: f32);
    /// Produces the next sample and advances the phase.
    fn produce_sample(&mut self) -> f32;
}

/// An amplitude contour driven by a gate.
///
/// A rising gate restarts the attack from wherever the level is; a falling gate starts the release. Nothing else
/// influences the segment the envelope is in.
pub trait Envelope {
    /// Advances by one sample and returns the new level in [0, 1].
    fn advance(&mut self, gate: bool) -> f32;
    /// Sets the segment times and sustain level.
    fn configure(&mut self, config: &EnvelopeConfig);
}

/// A mono effect in the fixed insert chain.
#[enum_dispatch]
pub trait Insert {
    /// Picks up whichever [`Parameters`] apply to this effect.
    fn configure(&mut self, parameters: &Parameters);
    /// Processes one sample.
    fn process_sample(&mut self, input: f32) -> f32;
}

/// The effects of the insert chain, so the chain can be held in a plain array and run in order.
#[enum_dispatch(Insert)]
pub enum InsertEffect {
    /// See [`Tremolo`].
    Tremolo(Tremolo),
    /// See [`Phaser`].
    Phaser(Phaser),
    /// See [`Overdrive`].
    Overdrive(Overdrive),
}

/// A reverb taking a stereo input and producing a stereo, wet-only output.
pub trait StereoReverb {
    /// Sets how much of the tail is fed back.
    fn set_feedback(&mut self, feedback: f32);
    /// Sets the cutoff of the lowpass in the feedback path, in Hz.
    fn set_lowpass_frequency(&mut self, hz: f32);
    /// Processes one stereo frame.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);
}
