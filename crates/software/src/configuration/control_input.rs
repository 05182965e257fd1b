use num_derive::{FromPrimitive, ToPrimitive};

/// The analog controls, in the order their channels are configured on the ADC.
///
/// The discriminant doubles as the channel index used by [`ControlReadings`][crate::parameters::ControlReadings].
#[derive(Debug, Copy, Clone, ToPrimitive, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlInput {
    /// Output level, applied on top of the envelope.
    Volume,
    /// Oscillator shape; see [`Waveform`][super::Waveform].
    Waveform,
    /// Amount of the reverb tail fed back into itself.
    ReverbFeedback,
    /// Cutoff of the lowpass inside the reverb's feedback path.
    ReverbLowpass,
    /// Overdrive intensity.
    Drive,
    /// Depth of the phaser's sweep.
    PhaserDepth,
    /// Rate of the tremolo.
    TremoloFrequency,
    /// Depth of the tremolo.
    TremoloDepth,
}

impl ControlInput {
    /// How many analog controls the instrument has.
    pub const COUNT: usize = 8;

    /// Every control, in channel order.
    pub(crate) const ALL: [ControlInput; Self::COUNT] = [
        Self::Volume,
        Self::Waveform,
        Self::ReverbFeedback,
        Self::ReverbLowpass,
        Self::Drive,
        Self::PhaserDepth,
        Self::TremoloFrequency,
        Self::TremoloDepth,
    ];

    /// The ADC channel index this control is wired to.
    pub const fn channel(self) -> usize {
        self as usize
    }
}
