use super::Oscillator;
use crate::configuration::Waveform;
use core::f32::consts::TAU;
use num_traits::Float;

/// A naive (non-bandlimited) oscillator covering every [`Waveform`].
#[derive(Debug, Clone)]
pub struct WaveOscillator {
    sample_rate: f32,
    waveform: Waveform,
    amplitude: f32,
    /// Position within the period, in [0, 1).
    phase: f32,
    increment: f32,
}

impl WaveOscillator {
    /// Constructs a silent Sine oscillator at `frequency`.
    pub fn new(sample_rate: f32, frequency: f32) -> Self {
        let mut oscillator = Self {
            sample_rate,
            waveform: Waveform::Sine,
            amplitude: 0.0,
            phase: 0.0,
            increment: 0.0,
        };
        oscillator.set_frequency(frequency);
        oscillator
    }

    fn shape(&self) -> f32 {
        let phase = self.phase;
        match self.waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => {
                let t = 2.0 * phase - 1.0;
                2.0 * (t.abs() - 0.5)
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Ramp => 1.0 - 2.0 * phase,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

impl Oscillator for WaveOscillator {
    fn set_frequency(&mut self, hz: f32) {
        self.increment = (hz / self.sample_rate).clamp(0.0, 0.5);
    }

    fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    fn produce_sample(&mut self) -> f32 {
        let out = self.shape() * self.amplitude;
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oscillator(waveform: Waveform) -> WaveOscillator {
        // a quarter period per sample makes the shapes easy to check
        let mut osc = WaveOscillator::new(4.0, 1.0);
        osc.set_waveform(waveform);
        osc.set_amplitude(1.0);
        osc
    }

    fn period(waveform: Waveform) -> [f32; 4] {
        let mut osc = oscillator(waveform);
        core::array::from_fn(|_| osc.produce_sample())
    }

    #[test]
    fn shapes() {
        assert_eq!([-1.0, -0.5, 0.0, 0.5], period(Waveform::Sawtooth));
        assert_eq!([1.0, 0.5, 0.0, -0.5], period(Waveform::Ramp));
        assert_eq!([1.0, 1.0, -1.0, -1.0], period(Waveform::Square));
        assert_eq!([1.0, 0.0, -1.0, 0.0], period(Waveform::Triangle));

        let sine = period(Waveform::Sine);
        assert!(sine[0].abs() < 1e-6);
        assert!((sine[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn amplitude_scales_output() {
        let mut osc = oscillator(Waveform::Square);
        osc.set_amplitude(0.25);
        assert_eq!(0.25, osc.produce_sample());
    }

    #[test]
    fn silent_until_amplitude_is_set() {
        let mut osc = WaveOscillator::new(48_000.0, 440.0);
        osc.set_waveform(Waveform::Square);
        assert_eq!(0.0, osc.produce_sample());
    }
}
