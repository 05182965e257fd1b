//! The audio render path: turns the shared control state into one block of stereo samples.
//!
//! Runs once per block in the render context, which must never wait on anything. It touches no pins and takes no locks;
//! its only inputs are a [`ControlSnapshot`] and the DSP primitives it owns.

use crate::{
    configuration::{EnvelopeConfig, OSCILLATOR_DEFAULT_HZ},
    dsp::{
        Adsr, Envelope, Insert, InsertEffect, Oscillator, Overdrive, Phaser, Reverb, StereoReverb,
        Tremolo, WaveOscillator,
    },
    parameters::{ParameterMapper, Parameters},
    shared_state::ControlSnapshot,
};

/// Oscillator, envelope, the tremolo → phaser → drive insert chain and a reverb that is skipped when negligible.
pub struct AudioRenderPath<O = WaveOscillator, E = Adsr, R = Reverb> {
    oscillator: O,
    envelope: E,
    inserts: [InsertEffect; 3],
    reverb: R,
}

impl AudioRenderPath {
    /// Builds the full chain with the instrument's start-up settings.
    pub fn with_defaults(sample_rate: f32) -> Self {
        Self::new(
            WaveOscillator::new(sample_rate, OSCILLATOR_DEFAULT_HZ),
            Adsr::new(sample_rate),
            Reverb::new(sample_rate),
            sample_rate,
            &EnvelopeConfig::default(),
        )
    }
}

impl<O: Oscillator, E: Envelope, R: StereoReverb> AudioRenderPath<O, E, R> {
    /// Builds the chain around the given primitives and shapes the envelope with `envelope_config`.
    ///
    /// The insert chain is always tremolo, then phaser, then drive.
    pub fn new(
        oscillator: O,
        mut envelope: E,
        reverb: R,
        sample_rate: f32,
        envelope_config: &EnvelopeConfig,
    ) -> Self {
        envelope.configure(envelope_config);
        Self {
            oscillator,
            envelope,
            inserts: [
                Tremolo::new(sample_rate).into(),
                Phaser::new(sample_rate).into(),
                Overdrive::new().into(),
            ],
            reverb,
        }
    }

    /// Renders one block of interleaved stereo frames.
    ///
    /// The pots are mapped once for the whole block; note, waveform and gate are applied to every sample.
    pub fn render(&mut self, controls: &ControlSnapshot, frames: &mut [[f32; 2]]) {
        let parameters = ParameterMapper::map(&controls.readings);
        self.configure(&parameters);
        let reverb_engaged = parameters.reverb_engaged();

        for frame in frames.iter_mut() {
            self.oscillator.set_frequency(controls.voice.active_note);
            self.oscillator.set_waveform(controls.waveform);

            let level = self.envelope.advance(controls.voice.gate_open);
            self.oscillator.set_amplitude(level * parameters.volume);

            let dry = self
                .inserts
                .iter_mut()
                .fold(self.oscillator.produce_sample(), |signal, insert| {
                    insert.process_sample(signal)
                });

            *frame = if reverb_engaged {
                let (left, right) = self.reverb.process_stereo(dry, dry);
                [left, right]
            } else {
                [dry, dry]
            };
        }
    }

    fn configure(&mut self, parameters: &Parameters) {
        for insert in self.inserts.iter_mut() {
            insert.configure(parameters);
        }
        self.reverb.set_feedback(parameters.reverb_feedback);
        self.reverb.set_lowpass_frequency(parameters.reverb_lowpass_hz);
    }
}
