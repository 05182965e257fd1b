use super::StereoReverb;
use crate::configuration::{REVERB_DEFAULT_FEEDBACK, REVERB_DEFAULT_LOWPASS_HZ};
use core::f32::consts::TAU;
use num_traits::Float;

/// Comb delay lengths in samples, tuned for 48 kHz and mutually prime to avoid stacking resonances.
const COMB_LENGTHS: [usize; 4] = [1693, 1759, 1621, 1549];
/// Allpass diffuser lengths in samples.
const ALLPASS_LENGTHS: [usize; 2] = [605, 479];
/// Extra delay applied to the right channel for stereo width.
const STEREO_SPREAD: usize = 23;

const COMB_CAPACITY: usize = 1759 + STEREO_SPREAD;
const ALLPASS_CAPACITY: usize = 605 + STEREO_SPREAD;

/// Feedback is kept just short of unity so the tail always decays.
const MAX_FEEDBACK: f32 = 0.98;
const ALLPASS_GAIN: f32 = 0.5;
/// Keeps the summed comb output in a sensible range.
const INPUT_GAIN: f32 = 0.015;

#[derive(Debug, Clone)]
struct DelayLine<const N: usize> {
    buffer: [f32; N],
    len: usize,
    cursor: usize,
}

impl<const N: usize> DelayLine<N> {
    fn new(len: usize) -> Self {
        Self {
            buffer: [0.0; N],
            len: len.clamp(1, N),
            cursor: 0,
        }
    }

    fn read(&self) -> f32 {
        self.buffer[self.cursor]
    }

    fn write_and_advance(&mut self, value: f32) {
        self.buffer[self.cursor] = value;
        self.cursor += 1;
        if self.cursor >= self.len {
            self.cursor = 0;
        }
    }
}

/// Lowpass-feedback comb filter.
#[derive(Debug, Clone)]
struct Comb {
    line: DelayLine<COMB_CAPACITY>,
    filtered: f32,
}

impl Comb {
    fn new(len: usize) -> Self {
        Self {
            line: DelayLine::new(len),
            filtered: 0.0,
        }
    }

    fn tick(&mut self, input: f32, feedback: f32, damping: f32) -> f32 {
        let out = self.line.read();
        self.filtered = out + damping * (self.filtered - out);
        self.line.write_and_advance(input + self.filtered * feedback);
        out
    }
}

/// Schroeder allpass diffuser.
#[derive(Debug, Clone)]
struct Diffuser {
    line: DelayLine<ALLPASS_CAPACITY>,
}

impl Diffuser {
    fn new(len: usize) -> Self {
        Self {
            line: DelayLine::new(len),
        }
    }

    fn tick(&mut self, input: f32) -> f32 {
        let delayed = self.line.read();
        let out = delayed - ALLPASS_GAIN * input;
        self.line.write_and_advance(input + ALLPASS_GAIN * delayed);
        out
    }
}

#[derive(Debug, Clone)]
struct Channel {
    combs: [Comb; 4],
    diffusers: [Diffuser; 2],
}

impl Channel {
    fn new(spread: usize) -> Self {
        Self {
            combs: COMB_LENGTHS.map(|len| Comb::new(len + spread)),
            diffusers: ALLPASS_LENGTHS.map(|len| Diffuser::new(len + spread)),
        }
    }

    fn tick(&mut self, input: f32, feedback: f32, damping: f32) -> f32 {
        let input = input * INPUT_GAIN;
        let summed: f32 = self
            .combs
            .iter_mut()
            .map(|comb| comb.tick(input, feedback, damping))
            .sum();
        self.diffusers
            .iter_mut()
            .fold(summed, |x, diffuser| diffuser.tick(x))
    }
}

/// A small stereo comb/allpass reverb producing a wet-only output.
///
/// Holds every delay line inline (roughly 64 KiB), so it belongs in a `static` rather than on a task's stack.
#[derive(Debug, Clone)]
pub struct Reverb {
    sample_rate: f32,
    left: Channel,
    right: Channel,
    feedback: f32,
    damping: f32,
}

impl Reverb {
    /// Constructs a reverb with the start-up feedback and lowpass.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            sample_rate,
            left: Channel::new(0),
            right: Channel::new(STEREO_SPREAD),
            feedback: 0.0,
            damping: 0.0,
        };
        reverb.set_feedback(REVERB_DEFAULT_FEEDBACK);
        reverb.set_lowpass_frequency(REVERB_DEFAULT_LOWPASS_HZ);
        reverb
    }
}

impl StereoReverb for Reverb {
    fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    fn set_lowpass_frequency(&mut self, hz: f32) {
        let hz = hz.clamp(1.0, self.sample_rate * 0.5);
        // one-pole lowpass pole position
        self.damping = (-TAU * hz / self.sample_rate).exp();
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (
            self.left.tick(left, self.feedback, self.damping),
            self.right.tick(right, self.feedback, self.damping),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::SAMPLE_RATE;

    #[test]
    fn silence_in_silence_out() {
        let mut reverb = Reverb::new(SAMPLE_RATE);
        for _ in 0..10_000 {
            assert_eq!((0.0, 0.0), reverb.process_stereo(0.0, 0.0));
        }
    }

    #[test]
    fn impulse_produces_a_decaying_tail() {
        let mut reverb = Reverb::new(SAMPLE_RATE);
        reverb.set_feedback(0.5);
        reverb.set_lowpass_frequency(5_000.0);
        reverb.process_stereo(1.0, 1.0);

        let mut early = 0.0_f32;
        for _ in 0..4_800 {
            let (l, r) = reverb.process_stereo(0.0, 0.0);
            early = early.max(l.abs()).max(r.abs());
        }
        assert!(early > 0.0, "the impulse should ring");

        for _ in 0..(SAMPLE_RATE as usize * 4) {
            reverb.process_stereo(0.0, 0.0);
        }
        let (l, r) = reverb.process_stereo(0.0, 0.0);
        assert!(l.abs() < early * 0.01 && r.abs() < early * 0.01);
    }

    #[test]
    fn feedback_is_capped_below_unity() {
        let mut reverb = Reverb::new(SAMPLE_RATE);
        reverb.set_feedback(1.0);
        assert_eq!(MAX_FEEDBACK, reverb.feedback);
    }
}
