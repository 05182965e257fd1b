use embassy_time::Duration;

/// Segment times and sustain level for the amplitude envelope.
///
/// The envelope itself only cares about the gate; these values shape what happens between its edges.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvelopeConfig {
    /// Time to climb from the current level to full scale once the gate rises.
    pub attack: Duration,
    /// Time to fall from full scale to the sustain level.
    pub decay: Duration,
    /// Time to fall from the current level to silence once the gate falls.
    pub release: Duration,
    /// Level held for as long as the gate stays open, in [0, 1].
    pub sustain_level: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: Duration::from_millis(100),
            decay: Duration::from_millis(100),
            release: Duration::from_millis(80),
            sustain_level: 0.25,
        }
    }
}

/// Converts a segment time to seconds for per-sample increments.
pub(crate) fn seconds(duration: Duration) -> f32 {
    duration.as_micros() as f32 / 1_000_000.0
}
