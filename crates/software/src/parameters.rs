//! Maps the analog controls onto effect parameters.
//!
//! Every pot on this controller reads backwards: turning it up lowers the raw reading. Each reading is therefore clamped
//! to [0, 1] and inverted before it is used for anything.

use crate::configuration::{ControlInput, Waveform};

/// Drive never drops below this, so the drive stage can't mute the signal at the end of the pot's travel.
pub const DRIVE_FLOOR: f32 = 0.009;

/// Width of each waveform band on the inverted pot value.
pub const WAVEFORM_BAND: f32 = 0.2;

/// The reverb lowpass cutoff spans this many Hz above [`REVERB_LOWPASS_OFFSET_HZ`].
pub const REVERB_LOWPASS_SPAN_HZ: f32 = 10_000.0;

/// Lowest reverb lowpass cutoff.
pub const REVERB_LOWPASS_OFFSET_HZ: f32 = 100.0;

/// Smallest stretch of cutoff above [`REVERB_LOWPASS_OFFSET_HZ`] for which the reverb is considered on. With the
/// offset, a cutoff below 200 Hz bypasses the reverb.
pub const REVERB_MIN_LOWPASS_SPAN_HZ: f32 = 100.0;

/// Below this feedback, the reverb is considered off.
pub const REVERB_MIN_FEEDBACK: f32 = 0.1;

/// Raw, normalized readings of every analog control, indexed by [`ControlInput::channel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlReadings(pub [f32; ControlInput::COUNT]);

impl ControlReadings {
    /// Every pot at the top of its raw range, which inverts to zero: silent, dry, Sine.
    pub const RESTING: Self = Self([1.0; ControlInput::COUNT]);

    /// The raw reading of one control.
    pub fn raw(&self, control: ControlInput) -> f32 {
        self.0[control.channel()]
    }

    /// The clamped, inverted reading of one control.
    pub fn inverted(&self, control: ControlInput) -> f32 {
        invert(self.raw(control))
    }
}

impl Default for ControlReadings {
    fn default() -> Self {
        Self::RESTING
    }
}

/// Effect parameters derived from one set of [`ControlReadings`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameters {
    /// Amplitude multiplier applied on top of the envelope.
    pub volume: f32,
    /// Overdrive intensity, never below [`DRIVE_FLOOR`].
    pub drive_amount: f32,
    /// Reverb feedback gain.
    pub reverb_feedback: f32,
    /// Cutoff of the reverb's lowpass, in Hz.
    pub reverb_lowpass_hz: f32,
    /// Depth of the phaser sweep.
    pub phaser_depth: f32,
    /// Tremolo rate.
    pub tremolo_freq: f32,
    /// Tremolo depth.
    pub tremolo_depth: f32,
}

impl Parameters {
    /// Whether the reverb settings are significant enough to be worth processing.
    ///
    /// When this is `false`, the render path skips the reverb and writes the dry signal to both channels.
    pub fn reverb_engaged(&self) -> bool {
        let lowpass_above_offset = self.reverb_lowpass_hz - REVERB_LOWPASS_OFFSET_HZ;
        !(lowpass_above_offset < REVERB_MIN_LOWPASS_SPAN_HZ || self.reverb_feedback < REVERB_MIN_FEEDBACK)
    }
}

/// Stateless mapping from raw control readings to [`Parameters`] and [`Waveform`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ParameterMapper;

impl ParameterMapper {
    /// Derives every effect parameter from one set of readings.
    pub fn map(readings: &ControlReadings) -> Parameters {
        Parameters {
            volume: readings.inverted(ControlInput::Volume),
            drive_amount: readings.inverted(ControlInput::Drive).max(DRIVE_FLOOR),
            reverb_feedback: readings.inverted(ControlInput::ReverbFeedback),
            reverb_lowpass_hz: readings.inverted(ControlInput::ReverbLowpass)
                * REVERB_LOWPASS_SPAN_HZ
                + REVERB_LOWPASS_OFFSET_HZ,
            phaser_depth: readings.inverted(ControlInput::PhaserDepth),
            tremolo_freq: readings.inverted(ControlInput::TremoloFrequency),
            tremolo_depth: readings.inverted(ControlInput::TremoloDepth),
        }
    }

    /// Selects the oscillator shape from the waveform pot's readings.
    pub fn waveform(readings: &ControlReadings) -> Waveform {
        Self::band(readings.inverted(ControlInput::Waveform))
    }

    /// Bands an inverted pot value into five equal-width ranges; the top band includes 1.0.
    pub fn band(level: f32) -> Waveform {
        let bands = [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Sawtooth,
            Waveform::Ramp,
        ];
        bands
            .into_iter()
            .zip(1_u8..)
            .find(|&(_, upper)| level < f32::from(upper) * WAVEFORM_BAND)
            .map_or(Waveform::Square, |(waveform, _)| waveform)
    }
}

fn invert(raw: f32) -> f32 {
    1.0 - raw.clamp(0.0, 1.0)
}
