use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{Operation, SpiDevice};

use crate::error::Error;

/// Bus handles for one chip instance.
///
/// Generic over any [`SpiDevice`] pair, reset/DREQ GPIO pair and
/// [`DelayNs`] implementation. Both SPI devices must share an error type
/// (they sit on the same bus in practice), as must the two pins.
pub struct IoBus<CTRL, DATA, RST, DREQ, D> {
    spi_ctrl: CTRL,
    spi_data: DATA,
    reset: RST,
    dreq: DREQ,
    delay: D,
}

impl<CTRL, DATA, RST, DREQ, D, SpiE, PinE> IoBus<CTRL, DATA, RST, DREQ, D>
where
    CTRL: SpiDevice<Error = SpiE>,
    DATA: SpiDevice<Error = SpiE>,
    RST: OutputPin<Error = PinE>,
    DREQ: InputPin<Error = PinE>,
    D: DelayNs,
{
    pub fn new(spi_ctrl: CTRL, spi_data: DATA, reset: RST, dreq: DREQ, delay: D) -> Self {
        IoBus {
            spi_ctrl,
            spi_data,
            reset,
            dreq,
            delay,
        }
    }

    /// Pulse the active-low reset line: 2 ms low, 2 ms high.
    pub fn reset(&mut self) -> Result<(), Error<SpiE, PinE>> {
        self.reset.set_low().map_err(Error::Gpio)?;
        self.delay.delay_ms(2);
        self.reset.set_high().map_err(Error::Gpio)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Poll DREQ at 1 ms granularity, up to `timeout_ms` attempts.
    ///
    /// Returns `Ok(true)` as soon as the line is observed high, `Ok(false)`
    /// on exhaustion. Sleeps between polls; not cancelable mid-poll. The
    /// caller decides whether `false` is a stall or a hard failure.
    pub fn wait_ready(&mut self, timeout_ms: u32) -> Result<bool, Error<SpiE, PinE>> {
        for _ in 0..timeout_ms {
            if self.dreq.is_high().map_err(Error::Gpio)? {
                return Ok(true);
            }
            self.delay.delay_ms(1);
        }
        Ok(false)
    }

    /// Send one frame's bytes over the data channel (half-duplex write).
    ///
    /// No retry at this layer; retry policy belongs to the caller.
    pub fn send_frame(&mut self, bytes: &[u8]) -> Result<(), Error<SpiE, PinE>> {
        self.spi_data.write(bytes).map_err(Error::Spi)
    }

    /// One command/response exchange on the control channel.
    ///
    /// Sends `tx` and, when a response buffer is supplied, reads it back
    /// under the same chip select. Readiness bracketing is the caller's job.
    pub fn exchange(
        &mut self,
        tx: &[u8],
        rx: Option<&mut [u8]>,
    ) -> Result<(), Error<SpiE, PinE>> {
        match rx {
            Some(rx) => {
                let mut ops = [Operation::Write(tx), Operation::Read(rx)];
                self.spi_ctrl.transaction(&mut ops).map_err(Error::Spi)
            }
            None => self.spi_ctrl.write(tx).map_err(Error::Spi),
        }
    }

    /// Consume the bus and return the peripherals.
    pub fn release(self) -> (CTRL, DATA, RST, DREQ, D) {
        (
            self.spi_ctrl,
            self.spi_data,
            self.reset,
            self.dreq,
            self.delay,
        )
    }
}
