use num_derive::{FromPrimitive, ToPrimitive};

/// The shape produced by the oscillator, selected by the second pot.
///
/// Variants are ordered the same way the pot bands them, from the low end of its travel to the high end.
#[derive(Debug, Default, Copy, Clone, ToPrimitive, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    /// A pure tone.
    #[default]
    Sine,
    /// Odd harmonics falling off quickly; mellower than a square.
    Triangle,
    /// Rises from -1 to 1 over a period, then drops.
    Sawtooth,
    /// A reversed sawtooth: falls from 1 to -1 over a period, then jumps back up.
    Ramp,
    /// A 50% duty cycle pulse.
    Square,
}
