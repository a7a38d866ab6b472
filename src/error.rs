//! Error types for the vs10xx driver.

use thiserror::Error;

/// Main error type for all driver operations.
///
/// Generic over the HAL's SPI and GPIO error types so callers keep full
/// access to the underlying bus failure.
#[derive(Debug, Error)]
pub enum Error<SpiE, PinE> {
    /// SPI transfer failed on the control or data bus.
    #[error("spi transfer failed: {0:?}")]
    Spi(SpiE),

    /// GPIO access (reset or DREQ line) failed.
    #[error("gpio access failed: {0:?}")]
    Gpio(PinE),

    /// DREQ did not assert within the bounded poll window.
    ///
    /// Hard failure for register operations; the streaming drain path treats
    /// the same condition as a graceful stall instead and never raises it.
    #[error("device not ready within {0} ms")]
    ReadyTimeout(u32),

    /// A write blocked on pool exhaustion was interrupted. Retryable; no
    /// bytes beyond those already queued were consumed.
    #[error("write interrupted while waiting for a free frame")]
    Interrupted,

    /// Reading from the caller's byte stream failed mid-fill. The in-flight
    /// frame has been returned to the pool.
    #[error("source stream fault: {0}")]
    Fault(#[from] std::io::Error),

    /// Control command outside the supported command family.
    #[error("unsupported control command {0:#010x}")]
    NotSupported(u32),
}
