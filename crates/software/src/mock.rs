//! Simulated hardware for host tests: output lines that record every write, a delay that records every wait, and a
//! keyboard that decodes the shift register traffic to decide which row lines read high.

extern crate std;

use crate::configuration::{COLS, ROWS};
use core::{cell::RefCell, convert::Infallible};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use std::{rc::Rc, vec::Vec};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Line {
    Data,
    Clock,
    Latch,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Signal {
    Write(Line, bool),
    Wait(u32),
    Read(usize),
}

#[derive(Default)]
struct Bench {
    signals: Vec<Signal>,
    levels: [bool; 3],
    shift: u16,
    outputs: u16,
    pressed: [[bool; COLS]; ROWS],
}

impl Bench {
    fn write(&mut self, line: Line, level: bool) {
        let previous = self.levels[line as usize];
        self.levels[line as usize] = level;
        self.signals.push(Signal::Write(line, level));
        let rising = !previous && level;
        match line {
            Line::Clock if rising => {
                self.shift = (self.shift << 1) | self.levels[Line::Data as usize] as u16;
            }
            Line::Latch if rising => self.outputs = self.shift,
            _ => {}
        }
    }

    fn row(&self, row: usize) -> bool {
        (0..COLS).any(|col| self.outputs & (1 << col) != 0 && self.pressed[row][col])
    }
}

/// Shared handle to the simulated bench. Clones observe the same state.
#[derive(Clone, Default)]
pub struct PinLog(Rc<RefCell<Bench>>);

impl PinLog {
    pub fn pin(&self, line: Line) -> OutPin {
        OutPin {
            line,
            log: self.clone(),
        }
    }

    pub fn row(&self, row: usize) -> InPin {
        InPin {
            row,
            log: self.clone(),
        }
    }

    pub fn rows(&self) -> [InPin; ROWS] {
        core::array::from_fn(|row| self.row(row))
    }

    pub fn delay(&self) -> Delay {
        Delay { log: self.clone() }
    }

    /// Holds or releases the key at `row`/`col`.
    pub fn set_key(&self, row: usize, col: usize, pressed: bool) {
        self.0.borrow_mut().pressed[row][col] = pressed;
    }

    /// Drains the recorded signals.
    pub fn take(&self) -> Vec<Signal> {
        core::mem::take(&mut self.0.borrow_mut().signals)
    }

    /// The pattern currently latched onto the register outputs.
    pub fn outputs(&self) -> u16 {
        self.0.borrow().outputs
    }
}

pub struct OutPin {
    line: Line,
    log: PinLog,
}

impl ErrorType for OutPin {
    type Error = Infallible;
}

impl OutputPin for OutPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.0.borrow_mut().write(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.0.borrow_mut().write(self.line, true);
        Ok(())
    }
}

pub struct InPin {
    row: usize,
    log: PinLog,
}

impl ErrorType for InPin {
    type Error = Infallible;
}

impl InputPin for InPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut bench = self.log.0.borrow_mut();
        bench.signals.push(Signal::Read(self.row));
        Ok(bench.row(self.row))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct Delay {
    log: PinLog,
}

impl DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.0.borrow_mut().signals.push(Signal::Wait(us));
    }
}
