//! Shared mock peripherals for tests.
//!
//! [`SciBus`] is a scripted chip stand-in: the control-SPI mock parses the
//! SCI wire format into a register file and a chronological write log, the
//! data-SPI mock records every frame sent (and can be told to fail), and
//! the DREQ mock is a level flag the test flips while a device owns the pin.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{Operation, SpiDevice};

use crate::codec::registers as reg;

#[derive(Debug, PartialEq, Eq)]
pub struct MockError;

impl embedded_hal::spi::Error for MockError {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        embedded_hal::spi::ErrorKind::Other
    }
}

impl embedded_hal::digital::Error for MockError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[derive(Default)]
struct BusState {
    /// SCI register file: addr -> (msb, lsb).
    regs: HashMap<u8, (u8, u8)>,
    /// Chronological log of SCI writes: (addr, msb, lsb).
    sci_writes: Vec<(u8, u8, u8)>,
    /// Every frame sent on the data channel, in order.
    frames: Vec<Vec<u8>>,
    reset_pulses: usize,
    fail_next_sends: usize,
}

/// Handle to the scripted chip, cloneable into each mock peripheral.
#[derive(Clone, Default)]
pub struct SciBus {
    state: Arc<Mutex<BusState>>,
}

impl SciBus {
    pub fn new() -> Self {
        SciBus::default()
    }

    fn locked(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a register value before the driver touches the chip.
    pub fn preload_register(&self, addr: u8, msb: u8, lsb: u8) {
        self.locked().regs.insert(addr, (msb, lsb));
    }

    pub fn sci_writes(&self) -> Vec<(u8, u8, u8)> {
        self.locked().sci_writes.clone()
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.locked().frames.clone()
    }

    /// All frame payloads concatenated in transfer order.
    pub fn frame_bytes(&self) -> Vec<u8> {
        self.locked().frames.iter().flatten().copied().collect()
    }

    pub fn reset_pulses(&self) -> usize {
        self.locked().reset_pulses
    }

    /// Make the next `n` data-channel sends fail.
    pub fn fail_next_data_sends(&self, n: usize) {
        self.locked().fail_next_sends = n;
    }
}

/// Control-channel SPI mock: parses SCI commands against the register file.
pub struct MockCtrlSpi {
    bus: SciBus,
}

impl MockCtrlSpi {
    pub fn new(bus: &SciBus) -> Self {
        MockCtrlSpi { bus: bus.clone() }
    }
}

impl embedded_hal::spi::ErrorType for MockCtrlSpi {
    type Error = MockError;
}

impl SpiDevice for MockCtrlSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), MockError> {
        let mut state = self.bus.locked();
        let mut cmd: Vec<u8> = Vec::new();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(tx) => cmd.extend_from_slice(tx),
                Operation::Read(rx) => {
                    if cmd.len() == 2 && cmd[0] == reg::SCI_READ && rx.len() == 2 {
                        let (msb, lsb) = state.regs.get(&cmd[1]).copied().unwrap_or((0, 0));
                        rx[0] = msb;
                        rx[1] = lsb;
                    }
                }
                _ => {}
            }
        }
        if cmd.len() == 4 && cmd[0] == reg::SCI_WRITE {
            state.regs.insert(cmd[1], (cmd[2], cmd[3]));
            state.sci_writes.push((cmd[1], cmd[2], cmd[3]));
        }
        Ok(())
    }
}

/// Data-channel SPI mock: records frames, optionally failing on demand.
pub struct MockDataSpi {
    bus: SciBus,
}

impl MockDataSpi {
    pub fn new(bus: &SciBus) -> Self {
        MockDataSpi { bus: bus.clone() }
    }
}

impl embedded_hal::spi::ErrorType for MockDataSpi {
    type Error = MockError;
}

impl SpiDevice for MockDataSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), MockError> {
        let mut state = self.bus.locked();
        if state.fail_next_sends > 0 {
            state.fail_next_sends -= 1;
            return Err(MockError);
        }
        for op in operations.iter_mut() {
            if let Operation::Write(tx) = op {
                state.frames.push(tx.to_vec());
            }
        }
        Ok(())
    }
}

/// DREQ mock: a shared level the test can flip at any time.
#[derive(Clone)]
pub struct MockDreq {
    level: Arc<AtomicBool>,
}

impl MockDreq {
    pub fn new(initially_high: bool) -> Self {
        MockDreq {
            level: Arc::new(AtomicBool::new(initially_high)),
        }
    }

    pub fn set(&self, high: bool) {
        self.level.store(high, Ordering::SeqCst);
    }
}

impl embedded_hal::digital::ErrorType for MockDreq {
    type Error = MockError;
}

impl InputPin for MockDreq {
    fn is_high(&mut self) -> Result<bool, MockError> {
        Ok(self.level.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, MockError> {
        self.is_high().map(|h| !h)
    }
}

/// Reset-line mock: counts low pulses.
pub struct MockReset {
    bus: SciBus,
}

impl MockReset {
    pub fn new(bus: &SciBus) -> Self {
        MockReset { bus: bus.clone() }
    }
}

impl embedded_hal::digital::ErrorType for MockReset {
    type Error = MockError;
}

impl OutputPin for MockReset {
    fn set_low(&mut self) -> Result<(), MockError> {
        self.bus.locked().reset_pulses += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockError> {
        Ok(())
    }
}

/// No-op delay so timeout loops run instantly in tests.
pub struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
