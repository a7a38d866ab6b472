use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use super::registers as reg;
use crate::error::Error;
use crate::io::IoBus;

/// Control-register interface for one chip.
///
/// Wraps the [`IoBus`] and speaks the SCI wire format. Shares the bus and
/// the DREQ line with the streaming path, so the owner must serialize
/// access (see `Device`).
pub struct Codec<CTRL, DATA, RST, DREQ, D> {
    io: IoBus<CTRL, DATA, RST, DREQ, D>,
    ready_timeout_ms: u32,
}

impl<CTRL, DATA, RST, DREQ, D, SpiE, PinE> Codec<CTRL, DATA, RST, DREQ, D>
where
    CTRL: SpiDevice<Error = SpiE>,
    DATA: SpiDevice<Error = SpiE>,
    RST: OutputPin<Error = PinE>,
    DREQ: InputPin<Error = PinE>,
    D: DelayNs,
    SpiE: Debug,
    PinE: Debug,
{
    pub fn new(io: IoBus<CTRL, DATA, RST, DREQ, D>, ready_timeout_ms: u32) -> Self {
        Codec {
            io,
            ready_timeout_ms,
        }
    }

    /// Write a 16-bit value (as two bytes) to an SCI register.
    ///
    /// Waits for DREQ before issuing the command and again after it, so the
    /// chip has finished applying the write when this returns. Either
    /// timeout is a hard [`Error::ReadyTimeout`], not retried.
    pub fn write_register(
        &mut self,
        register: u8,
        msb: u8,
        lsb: u8,
    ) -> Result<(), Error<SpiE, PinE>> {
        if !self.io.wait_ready(self.ready_timeout_ms)? {
            log::warn!("sci: timeout before write (reg={register:#04x})");
            return Err(Error::ReadyTimeout(self.ready_timeout_ms));
        }
        let cmd = [reg::SCI_WRITE, register, msb, lsb];
        self.io.exchange(&cmd, None)?;
        if !self.io.wait_ready(self.ready_timeout_ms)? {
            log::warn!("sci: timeout after write (reg={register:#04x})");
            return Err(Error::ReadyTimeout(self.ready_timeout_ms));
        }
        Ok(())
    }

    /// Read a 16-bit value from an SCI register, returned as `(msb, lsb)`.
    ///
    /// Same readiness bracketing and timeout semantics as
    /// [`write_register`](Self::write_register).
    pub fn read_register(&mut self, register: u8) -> Result<(u8, u8), Error<SpiE, PinE>> {
        if !self.io.wait_ready(self.ready_timeout_ms)? {
            log::warn!("sci: timeout before read (reg={register:#04x})");
            return Err(Error::ReadyTimeout(self.ready_timeout_ms));
        }
        let cmd = [reg::SCI_READ, register];
        let mut response = [0u8; 2];
        self.io.exchange(&cmd, Some(&mut response))?;
        if !self.io.wait_ready(self.ready_timeout_ms)? {
            log::warn!("sci: timeout after read (reg={register:#04x})");
            return Err(Error::ReadyTimeout(self.ready_timeout_ms));
        }
        Ok((response[0], response[1]))
    }

    /// Chip version nibble from the status register.
    pub fn version(&mut self) -> Result<u8, Error<SpiE, PinE>> {
        let (_msb, lsb) = self.read_register(reg::SCI_STATUS)?;
        Ok((lsb >> 4) & 0x0F)
    }

    /// Power-on configuration: hardware reset, then the fixed register
    /// sequence. The version is read only for logging; nothing branches on
    /// values read back.
    pub fn init(&mut self) -> Result<(), Error<SpiE, PinE>> {
        self.io.reset()?;

        let version = self.version()?;
        log::info!("sci: chip version {version}");

        // Clock multiplier XTALI x 4.5
        self.write_register(reg::SCI_CLOCKF, 0xB8, 0x00)?;
        // Start at minimum volume
        self.write_register(reg::SCI_VOL, 0xFE, 0xFE)?;
        // 44100 Hz stereo
        self.write_register(reg::SCI_AUDATA, 0xAC, 0x45)?;

        Ok(())
    }

    /// Set per-channel attenuation: 0x00 is loudest, 0xFE quietest.
    /// Exactly one register write.
    pub fn set_volume(&mut self, left: u8, right: u8) -> Result<(), Error<SpiE, PinE>> {
        self.write_register(reg::SCI_VOL, left, right)
    }

    /// Bounded DREQ poll for the streaming drain path.
    pub(crate) fn wait_data_ready(&mut self) -> Result<bool, Error<SpiE, PinE>> {
        self.io.wait_ready(self.ready_timeout_ms)
    }

    /// Send one frame's bytes over the data channel.
    pub(crate) fn send_frame(&mut self, bytes: &[u8]) -> Result<(), Error<SpiE, PinE>> {
        self.io.send_frame(bytes)
    }

    /// Consume the codec and return the underlying bus.
    pub fn release(self) -> IoBus<CTRL, DATA, RST, DREQ, D> {
        self.io
    }
}
