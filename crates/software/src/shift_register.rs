//! Bit-banged driver for the pair of daisy-chained 8-bit shift registers that energize the keyboard columns.
//!
//! The chain is fed over three wires: serial data, shift clock and output latch. Each frame is 16 bits, shifted MSB
//! first, with exactly one bit set. Columns 0–7 live in the register nearest the microcontroller's end of the chain's
//! output, so their frame is a zero byte followed by the column byte; columns 8–11 are the other way around. Laid out
//! as a `u16` that works out to `1 << column` in both cases.

use crate::configuration::COLS;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

/// Minimum time each clock or latch level is held, in microseconds.
pub const SETTLE_US: u32 = 1;

/// Bits in one frame (two chained 8-bit registers).
pub const FRAME_BITS: u32 = 16;

/// A 16-bit column-select pattern, built for one column scan and then discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftRegisterFrame(u16);

impl ShiftRegisterFrame {
    /// Builds the frame that selects `column`. Returns `None` if the column isn't wired.
    pub fn for_column(column: usize) -> Option<Self> {
        if column >= COLS {
            return None;
        }
        let byte = 1_u8 << (column % 8);
        Some(if column < 8 {
            // the zero byte goes out first and ends up in the far register
            Self::from_bytes(0, byte)
        } else {
            Self::from_bytes(byte, 0)
        })
    }

    /// Assembles a frame from the byte shifted out first and the byte shifted out second.
    pub const fn from_bytes(first: u8, second: u8) -> Self {
        Self(((first as u16) << 8) | second as u16)
    }

    /// The raw pattern, first-shifted bit in the MSB.
    pub(crate) const fn bits(self) -> u16 {
        self.0
    }

    /// Yields the level of each data bit in the order it is shifted out.
    pub fn iter_msb_first(self) -> impl Iterator<Item = bool> {
        (0..FRAME_BITS).rev().map(move |i| self.bits() & (1 << i) != 0)
    }
}

/// Drives the shift register chain over its data, clock and latch lines.
///
/// Only the scan loop may own one of these: a full frame costs 32 clock edges plus a latch pulse, each held for at least
/// [`SETTLE_US`], which is far too slow for an audio block.
pub struct ShiftRegisterBus<P, D> {
    data: P,
    clock: P,
    latch: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> ShiftRegisterBus<P, D> {
    /// Takes ownership of the three output lines and the delay used for settling.
    ///
    /// Data and clock idle high, as does the latch until the first frame is sent.
    pub fn new(mut data: P, mut clock: P, mut latch: P, delay: D) -> Result<Self, P::Error> {
        data.set_high()?;
        clock.set_high()?;
        latch.set_high()?;
        Ok(Self {
            data,
            clock,
            latch,
            delay,
        })
    }

    /// Energizes a single column. Columns outside 0..12 are ignored.
    pub fn select_column(&mut self, column: usize) -> Result<(), P::Error> {
        match ShiftRegisterFrame::for_column(column) {
            Some(frame) => self.send(frame),
            None => Ok(()),
        }
    }

    /// Shifts a whole frame into the chain, then latches it onto the outputs.
    pub fn send(&mut self, frame: ShiftRegisterFrame) -> Result<(), P::Error> {
        self.latch.set_low()?;
        for bit in frame.iter_msb_first() {
            self.shift_bit(bit)?;
        }
        self.pulse_latch()
    }

    fn shift_bit(&mut self, level: bool) -> Result<(), P::Error> {
        self.data.set_state(level.into())?;
        self.clock.set_low()?;
        self.delay.delay_us(SETTLE_US);
        self.clock.set_high()?;
        self.delay.delay_us(SETTLE_US);
        Ok(())
    }

    /// Copies the shifted contents to the register outputs.
    pub fn pulse_latch(&mut self) -> Result<(), P::Error> {
        self.latch.set_high()?;
        self.delay.delay_us(SETTLE_US);
        self.latch.set_low()
    }
}
