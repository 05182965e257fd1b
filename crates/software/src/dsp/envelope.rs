use super::Envelope;
use crate::configuration::{EnvelopeConfig, seconds};

/// The segment an [`Adsr`] is in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Segment {
    /// Silent, waiting for the gate.
    #[default]
    Idle,
    /// Climbing toward full scale.
    Attack,
    /// Falling toward the sustain level.
    Decay,
    /// Holding the sustain level.
    Sustain,
    /// Falling toward silence.
    Release,
}

/// A linear-segment attack/decay/sustain/release envelope.
#[derive(Debug, Clone)]
pub struct Adsr {
    sample_rate: f32,
    config: EnvelopeConfig,
    segment: Segment,
    level: f32,
    release_step: f32,
    gate: bool,
}

impl Adsr {
    /// Constructs an idle envelope shaped by [`EnvelopeConfig::default`].
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            config: EnvelopeConfig::default(),
            segment: Segment::Idle,
            level: 0.0,
            release_step: 0.0,
            gate: false,
        }
    }

    /// Getter.
    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// Per-sample change covering `span` over a segment lasting `time` seconds. Zero-length segments jump.
    fn step(&self, span: f32, time: f32) -> f32 {
        let samples = time * self.sample_rate;
        if samples < 1.0 { span } else { span / samples }
    }
}

impl Envelope for Adsr {
    fn advance(&mut self, gate: bool) -> f32 {
        if gate && !self.gate {
            self.segment = Segment::Attack;
        } else if !gate && self.gate {
            self.segment = Segment::Release;
            self.release_step = self.step(self.level, seconds(self.config.release));
        }
        self.gate = gate;

        let sustain = self.config.sustain_level.clamp(0.0, 1.0);
        match self.segment {
            Segment::Idle => self.level = 0.0,
            Segment::Attack => {
                self.level += self.step(1.0, seconds(self.config.attack));
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.segment = Segment::Decay;
                }
            }
            Segment::Decay => {
                self.level -= self.step(1.0 - sustain, seconds(self.config.decay));
                if self.level <= sustain {
                    self.level = sustain;
                    self.segment = Segment::Sustain;
                }
            }
            Segment::Sustain => self.level = sustain,
            Segment::Release => {
                self.level -= self.release_step;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.segment = Segment::Idle;
                }
            }
        }
        self.level
    }

    fn configure(&mut self, config: &EnvelopeConfig) {
        self.config = *config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Duration;

    /// Ten samples per segment, sustain at a quarter.
    fn adsr() -> Adsr {
        let mut env = Adsr::new(1_000.0);
        env.configure(&EnvelopeConfig {
            attack: Duration::from_millis(10),
            decay: Duration::from_millis(10),
            release: Duration::from_millis(10),
            sustain_level: 0.25,
        });
        env
    }

    fn run(env: &mut Adsr, gate: bool, samples: usize) -> f32 {
        let mut level = 0.0;
        for _ in 0..samples {
            level = env.advance(gate);
        }
        level
    }

    #[test]
    fn configure_changes_the_sustain_level() {
        let mut env = adsr();
        let config = EnvelopeConfig {
            sustain_level: 0.5,
            ..env.config
        };
        env.configure(&config);
        run(&mut env, true, 100);
        assert_eq!(0.5, env.advance(true), "Expected left but got right");
    }

    #[test]
    fn idle_without_gate() {
        let mut env = adsr();
        assert_eq!(0.0, run(&mut env, false, 100));
        assert_eq!(Segment::Idle, env.segment());
    }

    #[test]
    fn rising_gate_attacks_then_sustains() {
        let mut env = adsr();
        env.advance(true);
        assert_eq!(Segment::Attack, env.segment());

        run(&mut env, true, 100);
        assert_eq!(Segment::Sustain, env.segment());
        assert_eq!(0.25, env.advance(true));
    }

    #[test]
    fn falling_gate_releases_to_silence() {
        let mut env = adsr();
        run(&mut env, true, 100);

        let first = env.advance(false);
        assert_eq!(Segment::Release, env.segment());
        assert!(first < 0.25);

        assert_eq!(0.0, run(&mut env, false, 20));
        assert_eq!(Segment::Idle, env.segment());
    }

    #[test]
    fn gate_edges_matter_not_block_count() {
        let mut env = adsr();
        run(&mut env, true, 5);
        // the gate staying high must not restart the attack
        let level = env.advance(true);
        assert!(level > 0.5, "attack should continue, got {level}");
    }

    #[test]
    fn rising_gate_during_release_retriggers_attack() {
        let mut env = adsr();
        run(&mut env, true, 100);
        run(&mut env, false, 3);
        let released = env.advance(false);

        let level = env.advance(true);
        assert_eq!(Segment::Attack, env.segment());
        assert!(level > released, "attack should start from the current level");
    }
}
