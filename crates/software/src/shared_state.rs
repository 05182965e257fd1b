//! State shared between the scan loop and the render path.
//!
//! The two contexts never lock. Each field is an independent atomic scalar with exactly one writer (the scan loop) and
//! one reader (the render path), so a reader may see a field up to one sweep stale but never a torn value. Fields carry
//! no multi-field atomicity: the note can change a moment before the gate does.

use crate::{
    configuration::{ControlInput, Waveform},
    note_arbiter::Voice,
    parameters::ControlReadings,
};
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use num_traits::FromPrimitive;

/// An `f32` stored as its bit pattern.
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    const fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// Note, gate, waveform and raw control readings, as last published by the scan loop.
pub struct SharedControlState {
    active_note: AtomicF32,
    gate_open: AtomicBool,
    waveform: AtomicU8,
    readings: [AtomicF32; ControlInput::COUNT],
}

/// A copy of everything the render path needs for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSnapshot {
    /// Note and gate.
    pub voice: Voice,
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Raw readings to be mapped by the render path.
    pub readings: ControlReadings,
}

impl Default for ControlSnapshot {
    fn default() -> Self {
        Self {
            voice: Voice::QUIESCENT,
            waveform: Waveform::Sine,
            readings: ControlReadings::RESTING,
        }
    }
}

impl Default for SharedControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedControlState {
    /// The quiescent state: no note, gate closed, Sine, every pot resting.
    ///
    /// `const` so it can back a `static` that exists before the render path starts.
    pub const fn new() -> Self {
        Self {
            active_note: AtomicF32::new(Voice::QUIESCENT.active_note),
            gate_open: AtomicBool::new(Voice::QUIESCENT.gate_open),
            waveform: AtomicU8::new(Waveform::Sine as u8),
            readings: [const { AtomicF32::new(1.0) }; ControlInput::COUNT],
        }
    }

    /// Publishes the note and gate. Scan loop only.
    pub fn publish_voice(&self, voice: Voice) {
        self.active_note.store(voice.active_note);
        self.gate_open.store(voice.gate_open, Ordering::Release);
    }

    /// Publishes the oscillator shape. Scan loop only.
    pub fn publish_waveform(&self, waveform: Waveform) {
        self.waveform.store(waveform as u8, Ordering::Release);
    }

    /// Publishes the latest raw control readings. Scan loop only.
    pub fn publish_readings(&self, readings: &ControlReadings) {
        for control in ControlInput::ALL {
            self.readings[control.channel()].store(readings.raw(control));
        }
    }

    /// Reads the note and gate.
    pub fn voice(&self) -> Voice {
        Voice {
            active_note: self.active_note.load(),
            gate_open: self.gate_open.load(Ordering::Acquire),
        }
    }

    /// Reads the oscillator shape.
    pub fn waveform(&self) -> Waveform {
        Waveform::from_u8(self.waveform.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Reads the raw control readings.
    pub fn readings(&self) -> ControlReadings {
        ControlReadings(core::array::from_fn(|i| self.readings[i].load()))
    }

    /// Reads every field. Render path, once per block.
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            voice: self.voice(),
            waveform: self.waveform(),
            readings: self.readings(),
        }
    }
}
