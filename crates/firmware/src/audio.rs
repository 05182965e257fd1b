//! Streams the render path's output to the AK4556 codec over SAI1.

use defmt::{info, unwrap};
use embassy_stm32::{
    Peri,
    gpio::Output,
    peripherals::{DMA1_CH0, PE2, PE4, PE5, PE6, SAI1},
    sai::{
        self, BitOrder, ClockStrobe, DataSize, FifoThreshold, FrameSyncOffset, FrameSyncPolarity,
        MasterClockDivider, Mode, Sai, StereoMono, TxRx,
    },
};
use embassy_time::Timer;
use mono_matrix_lib::{
    configuration::BLOCK_SIZE, render::AudioRenderPath, shared_state::SharedControlState,
};
use static_cell::StaticCell;

const CHANNELS: usize = 2;
/// One block of interleaved stereo words.
const BLOCK_WORDS: usize = BLOCK_SIZE * CHANNELS;
/// The DMA ring holds two blocks: one playing while the next is written.
const DMA_BUFFER_WORDS: usize = BLOCK_WORDS * 2;

/// Largest magnitude of a 24-bit two's complement sample.
const FULL_SCALE_24: f32 = 8_388_607.0;

pub type AudioOut = Sai<'static, SAI1, u32>;

/// Configures SAI1 block A as the clock master transmitting 24-bit stereo frames, with MCLK at 256 × fs.
pub fn init_sai_tx(
    sai: Peri<'static, SAI1>,
    sck: Peri<'static, PE5>,
    fs: Peri<'static, PE4>,
    mclk: Peri<'static, PE2>,
    sd: Peri<'static, PE6>,
    dma: Peri<'static, DMA1_CH0>,
) -> AudioOut {
    static DMA_BUFFER: StaticCell<[u32; DMA_BUFFER_WORDS]> = StaticCell::new();
    let dma_buffer = DMA_BUFFER.init([0; DMA_BUFFER_WORDS]);

    let (sub_block_tx, _) = sai::split_subblocks(sai);

    let mut config = sai::Config::default();
    config.mode = Mode::Master;
    config.tx_rx = TxRx::Transmitter;
    config.sync_output = true;
    config.clock_strobe = ClockStrobe::Falling;
    config.master_clock_divider = MasterClockDivider::Div4;
    config.stereo_mono = StereoMono::Stereo;
    config.data_size = DataSize::Data24;
    config.bit_order = BitOrder::MsbFirst;
    config.frame_sync_polarity = FrameSyncPolarity::ActiveHigh;
    config.frame_sync_offset = FrameSyncOffset::OnFirstBit;
    config.frame_length = 64;
    config.frame_sync_active_level_length = sai::word::U7(32);
    config.fifo_threshold = FifoThreshold::Quarter;

    Sai::new_asynchronous_with_mclk(sub_block_tx, sck, sd, fs, mclk, dma, dma_buffer, config)
}

/// Helper function to convert a sample in [-1, 1] to the word the codec expects in each 32-bit slot.
///
/// The codec only looks at the low 24 bits, so anything louder than full scale is clipped here rather than allowed to
/// wrap around.
fn sample_to_word(sample: f32) -> u32 {
    ((sample.clamp(-1.0, 1.0) * FULL_SCALE_24) as i32 as u32) & 0x00FF_FFFF
}

/// Task responsible for producing sound.
///
/// Brings the codec out of power-down, then renders one block per iteration from a fresh snapshot of the controls and
/// hands it to the DMA ring. Awaiting the ring is the only point at which this task waits.
#[embassy_executor::task]
pub async fn render(
    mut sai: AudioOut,
    mut codec_power: Output<'static>,
    path: &'static mut AudioRenderPath,
    shared: &'static SharedControlState,
) -> ! {
    Timer::after_millis(1).await;
    codec_power.set_high();
    info!("Codec powered up");

    let mut frames = [[0.0; CHANNELS]; BLOCK_SIZE];
    let mut words = [0; BLOCK_WORDS];
    loop {
        path.render(&shared.snapshot(), &mut frames);
        for (word, &sample) in words.iter_mut().zip(frames.iter().flatten()) {
            *word = sample_to_word(sample);
        }
        unwrap!(sai.write(&words).await);
    }
}
