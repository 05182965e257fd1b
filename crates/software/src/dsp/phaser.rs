use super::Insert;
use crate::{configuration::PHASER_CENTRE_HZ, parameters::Parameters};
use core::f32::consts::{PI, TAU};
use num_traits::Float;

const STAGES: usize = 4;
const LFO_HZ: f32 = 0.3;
const FEEDBACK: f32 = 0.2;

/// First-order allpass stage.
#[derive(Debug, Default, Clone, Copy)]
struct Allpass {
    a1: f32,
    zm1: f32,
}

impl Allpass {
    fn set_cutoff(&mut self, hz: f32, sample_rate: f32) {
        let w = (PI * hz / sample_rate).tan();
        self.a1 = (1.0 - w) / (1.0 + w);
    }

    fn tick(&mut self, x: f32) -> f32 {
        let y = -self.a1 * x + self.zm1;
        self.zm1 = x + self.a1 * y;
        y
    }
}

/// Four allpass stages swept around a centre frequency by a slow LFO, mixed evenly with the dry signal.
#[derive(Debug, Clone)]
pub struct Phaser {
    sample_rate: f32,
    stages: [Allpass; STAGES],
    centre: f32,
    depth: f32,
    phase: f32,
    last: f32,
}

impl Phaser {
    /// Constructs a phaser centred on [`PHASER_CENTRE_HZ`] with zero depth.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            stages: [Allpass::default(); STAGES],
            centre: PHASER_CENTRE_HZ,
            depth: 0.0,
            phase: 0.0,
            last: 0.0,
        }
    }

    /// Sets how far the LFO sweeps the allpass cutoff, in [0, 1].
    pub fn set_lfo_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }
}

impl Insert for Phaser {
    fn configure(&mut self, parameters: &Parameters) {
        self.set_lfo_depth(parameters.phaser_depth);
    }

    fn process_sample(&mut self, input: f32) -> f32 {
        let lfo = (TAU * self.phase).sin();
        self.phase = (self.phase + LFO_HZ / self.sample_rate).fract();

        let nyquist = self.sample_rate * 0.49;
        let cutoff = (self.centre * (1.0 + 0.9 * self.depth * lfo)).clamp(20.0, nyquist);
        for stage in self.stages.iter_mut() {
            stage.set_cutoff(cutoff, self.sample_rate);
        }

        let wet = self
            .stages
            .iter_mut()
            .fold(input + self.last * FEEDBACK, |x, stage| stage.tick(x));
        self.last = wet;
        0.5 * (input + wet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_in_silence_out() {
        let mut phaser = Phaser::new(48_000.0);
        phaser.set_lfo_depth(1.0);
        for _ in 0..1_000 {
            assert_eq!(0.0, phaser.process_sample(0.0));
        }
    }

    #[test]
    fn output_stays_bounded() {
        let mut phaser = Phaser::new(48_000.0);
        phaser.set_lfo_depth(1.0);
        for n in 0..48_000 {
            let input = (TAU * 440.0 * n as f32 / 48_000.0).sin();
            let out = phaser.process_sample(input);
            assert!(out.is_finite() && out.abs() <= 4.0, "got {out} at sample {n}");
        }
    }
}
