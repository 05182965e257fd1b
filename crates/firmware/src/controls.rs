//! The eight pots.

use embassy_stm32::{
    adc::{Adc, AnyAdcChannel, Resolution, SampleTime},
    peripherals::ADC1,
};
use mono_matrix_lib::{configuration::ControlInput, parameters::ControlReadings};

/// Full scale at [`Resolution::BITS16`].
const ADC_FULL_SCALE: f32 = u16::MAX as f32;

/// The ADC and one channel per [`ControlInput`], indexed by [`ControlInput::channel`].
pub struct Pots {
    adc: Adc<'static, ADC1>,
    channels: [AnyAdcChannel<ADC1>; ControlInput::COUNT],
}

impl Pots {
    pub fn new(mut adc: Adc<'static, ADC1>, channels: [AnyAdcChannel<ADC1>; ControlInput::COUNT]) -> Self {
        adc.set_resolution(Resolution::BITS16);
        adc.set_sample_time(SampleTime::CYCLES32_5);
        Self { adc, channels }
    }

    /// Samples every pot once, normalizing each reading to [0, 1].
    ///
    /// The values are raw: inverting them is up to [`ParameterMapper`][mono_matrix_lib::parameters::ParameterMapper].
    pub fn read(&mut self) -> ControlReadings {
        let mut readings = ControlReadings::RESTING;
        for (reading, channel) in readings.0.iter_mut().zip(self.channels.iter_mut()) {
            *reading = f32::from(self.adc.blocking_read(channel)) / ADC_FULL_SCALE;
        }
        readings
    }
}
