//! Mono Matrix is [Embassy](https://embassy.dev)-based firmware for a monophonic synthesizer played from a 5×12 key
//! matrix. It runs on the [Daisy Seed](https://electro-smith.com/products/daisy-seed), which is powered by an H7-series
//! STM32 microcontroller and carries an AK4556 audio codec.
//!
//! The keyboard's columns are energized one at a time through a pair of daisy-chained shift registers while the five row
//! lines are read back; the most recently pressed key sounds. Eight pots set volume, waveform, drive, phaser, tremolo
//! and reverb. Audio is synthesized on the chip and streamed to the codec over SAI at 48 kHz.
//!
//! Two execution contexts share the work:
//! - the thread-mode executor runs the [scan loop][keyboard::scan], which owns every GPIO and the ADC;
//! - an interrupt executor at elevated priority runs the [render task][audio::render], which never touches a pin.
//!
//! They communicate only through [`CONTROL_STATE`].

#![no_std]
#![no_main]

mod audio;
mod controls;
mod keyboard;

use crate::{controls::Pots, keyboard::Scanner};
use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::{
    Config,
    adc::{Adc, AdcChannel},
    gpio::{Input, Level, Output, Pull, Speed},
    interrupt::{self, InterruptExt, Priority},
    time::Hertz,
};
use embassy_time::Delay;
use mono_matrix_lib::{
    configuration::{NOTE_TABLE, SAMPLE_RATE},
    render::AudioRenderPath,
    shared_state::SharedControlState,
    shift_register::ShiftRegisterBus,
};
use static_cell::StaticCell;

#[cfg(feature = "defmt-rtt")]
use defmt_rtt as _;
#[cfg(feature = "panic-halt")]
use panic_halt as _;
#[cfg(feature = "panic-probe")]
use panic_probe as _;

/// Note, gate, waveform and pot readings, written by the scan loop and read by the render task.
static CONTROL_STATE: SharedControlState = SharedControlState::new();

/// Runs the render task, preempting the scan loop.
static AUDIO_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[embassy_stm32::interrupt]
unsafe fn UART4() {
    unsafe { AUDIO_EXECUTOR.on_interrupt() }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing Mono Matrix");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // the Seed's crystal
        config.rcc.hse = Some(Hse {
            freq: Hertz::mhz(16),
            mode: HseMode::Oscillator,
        });
        config.rcc.pll1 = Some(Pll {
            source: PllSource::HSE,
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL240,
            divp: Some(PllDiv::DIV2), // 16mhz / 4 * 240 / 2 = 480Mhz
            divq: None,
            divr: None,
        });
        config.rcc.pll2 = Some(Pll {
            source: PllSource::HSE,
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL50,
            divp: Some(PllDiv::DIV8), // 16mhz / 4 * 50 / 8 = 25Mhz, within the ADC's limit
            divq: None,
            divr: None,
        });
        // the codec's master clock is derived from this: 49.2Mhz / 4 ≈ 256 * 48khz
        config.rcc.pll3 = Some(Pll {
            source: PllSource::HSE,
            prediv: PllPreDiv::DIV6,
            mul: PllMul::MUL295,
            divp: Some(PllDiv::DIV16),
            divq: None,
            divr: None,
        });
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.mux.sai1sel = mux::Saisel::PLL3_P;
        config.rcc.mux.adcsel = mux::Adcsel::PLL2_P;
        config.rcc.ahb_pre = AHBPrescaler::DIV2;
        config.rcc.apb1_pre = APBPrescaler::DIV2;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.apb3_pre = APBPrescaler::DIV2;
        config.rcc.apb4_pre = APBPrescaler::DIV2;
        config.rcc.voltage_scale = VoltageScale::Scale0;
    }
    let p = embassy_stm32::init(config);

    // the shift register chain idles with every line high
    let data = Output::new(p.PD2, Level::High, Speed::Low); // D5
    let latch = Output::new(p.PC12, Level::High, Speed::Low); // D6
    let clock = Output::new(p.PG10, Level::High, Speed::Low); // D7
    let bus = unwrap!(ShiftRegisterBus::new(data, clock, latch, Delay));

    let rows = [
        Input::new(p.PB12, Pull::Down), // D0
        Input::new(p.PC11, Pull::Down), // D1
        Input::new(p.PC10, Pull::Down), // D2
        Input::new(p.PC9, Pull::Down),  // D3
        Input::new(p.PC8, Pull::Down),  // D4
    ];
    let scanner = Scanner::new(bus, rows, &NOTE_TABLE);

    // wired in `ControlInput` order
    let pots = Pots::new(
        Adc::new(p.ADC1),
        [
            p.PC0.degrade_adc(), // A0
            p.PA3.degrade_adc(), // A1
            p.PB1.degrade_adc(), // A2
            p.PA7.degrade_adc(), // A3
            p.PA6.degrade_adc(), // A4
            p.PC1.degrade_adc(), // A5
            p.PC4.degrade_adc(), // A6
            p.PA5.degrade_adc(), // A7
        ],
    );

    let codec_power = Output::new(p.PB11, Level::Low, Speed::Low);
    let sai = audio::init_sai_tx(p.SAI1, p.PE5, p.PE4, p.PE2, p.PE6, p.DMA1_CH0);

    // the reverb's delay lines are far too large for a task's stack
    static RENDER_PATH: StaticCell<AudioRenderPath> = StaticCell::new();
    let render_path = RENDER_PATH.init_with(|| AudioRenderPath::with_defaults(SAMPLE_RATE));

    interrupt::UART4.set_priority(Priority::P6);
    let audio_spawner = AUDIO_EXECUTOR.start(interrupt::UART4);
    unwrap!(audio_spawner.spawn(audio::render(
        sai,
        codec_power,
        render_path,
        &CONTROL_STATE
    )));

    unwrap!(spawner.spawn(keyboard::scan(scanner, pots, &CONTROL_STATE)));

    info!("Mono Matrix ready");
}
