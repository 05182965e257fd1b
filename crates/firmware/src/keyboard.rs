//! The scan loop: reads the pots and the key matrix and publishes what it finds.

use crate::controls::Pots;
use defmt::{debug, info, unwrap};
use embassy_futures::yield_now;
use embassy_stm32::gpio::{Input, Output};
use embassy_time::Delay;
use mono_matrix_lib::{
    configuration::Waveform, parameters::ParameterMapper, scanner::KeyMatrixScanner,
    shared_state::SharedControlState,
};

/// The scanner as wired on the Seed: GPIO outputs into the shift register chain, GPIO inputs on the rows and the
/// timer-driven delay for settling.
pub type Scanner = KeyMatrixScanner<'static, Output<'static>, Input<'static>, Delay>;

/// Task responsible for everything the player touches.
///
/// Each pass samples the pots, publishes their raw readings along with the waveform they select, then sweeps all twelve
/// columns. The scanner publishes the voice itself as soon as a column changes it. Pin errors are fatal.
#[embassy_executor::task]
pub async fn scan(
    mut scanner: Scanner,
    mut pots: Pots,
    shared: &'static SharedControlState,
) -> ! {
    let mut waveform = Waveform::default();
    let mut voice = scanner.voice();

    loop {
        let readings = pots.read();
        shared.publish_readings(&readings);

        let selected = ParameterMapper::waveform(&readings);
        if selected != waveform {
            info!("Waveform: {}", selected);
            waveform = selected;
        }
        shared.publish_waveform(waveform);

        let swept = unwrap!(scanner.sweep(shared));
        if swept != voice {
            debug!(
                "Voice: {} ({} keys held)",
                swept,
                scanner.matrix().iter_pressed().count()
            );
            voice = swept;
        }

        yield_now().await;
    }
}
