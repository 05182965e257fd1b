use super::Insert;
use crate::parameters::Parameters;
use core::f32::consts::TAU;
use num_traits::Float;

/// Amplitude modulation by a sine LFO.
///
/// At full depth the gain swings between 0 and 1; at zero depth the signal passes untouched.
#[derive(Debug, Clone)]
pub struct Tremolo {
    sample_rate: f32,
    frequency: f32,
    depth: f32,
    phase: f32,
}

impl Tremolo {
    /// Constructs a tremolo with zero depth.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frequency: 0.0,
            depth: 0.0,
            phase: 0.0,
        }
    }

    /// Sets the LFO rate in Hz.
    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz.max(0.0);
    }

    /// Sets the modulation depth in [0, 1].
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }
}

impl Insert for Tremolo {
    fn configure(&mut self, parameters: &Parameters) {
        self.set_frequency(parameters.tremolo_freq);
        self.set_depth(parameters.tremolo_depth);
    }

    fn process_sample(&mut self, input: f32) -> f32 {
        let half = self.depth * 0.5;
        let gain = 1.0 - half + half * (TAU * self.phase).sin();
        self.phase = (self.phase + self.frequency / self.sample_rate).fract();
        input * gain
    }
}
