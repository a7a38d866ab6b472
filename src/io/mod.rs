//! Hardware-facing transfer channel.
//!
//! The VS10xx exposes two logical SPI endpoints sharing one physical bus:
//! the control channel (xCS, SCI command words) and the data channel (xDCS,
//! raw SDI bytes). A single DREQ input signals readiness for the next
//! command or data burst; an active-low reset line restarts the chip.
//!
//! [`IoBus`] owns all five peripherals and provides the bounded readiness
//! poll, the half-duplex frame send, and the command/response exchange the
//! register layer builds on.

mod bus;

pub use bus::IoBus;
