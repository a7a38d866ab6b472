//! # vs10xx
//!
//! Flow-controlled SPI transport and control driver for the VLSI
//! VS1003/VS1053 audio decoder family, generic over the
//! [`embedded-hal`](https://docs.rs/embedded-hal) 1.0 traits.
//!
//! The chip decodes MP3 on its own; the host's job is plumbing. Audio bytes
//! are chunked into 32-byte frames, buffered in a fixed-capacity pool, and
//! pushed over the data channel whenever the chip's DREQ line says it can
//! take more. Configuration and volume go over a separate control channel
//! as SCI register commands.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Memory | [`frame`] | Fixed-capacity frame pool with FIFO free/pending lists |
//! | Bus | [`io`] | SPI channel pair, DREQ readiness poll, reset line |
//! | Control | [`codec`] | SCI register read/write, init sequence, volume |
//! | Session | [`device`] | Blocking flow-controlled write path, control entry points |
//! | Lifecycle | [`registry`] | Bounded id-to-device mapping |
//!
//! ## Quick start
//!
//! ```ignore
//! use vs10xx::{Device, DeviceConfig, IoBus};
//!
//! let bus = IoBus::new(spi_ctrl, spi_data, reset_pin, dreq_pin, delay);
//! let device = Device::new(0, bus, DeviceConfig::default());
//!
//! device.init()?;
//! device.set_volume(0x20, 0x20)?;
//!
//! // Blocks when the pool fills faster than the chip drains it.
//! device.write(&mp3_bytes)?;
//! ```
//!
//! ## Transfer parameters
//!
//! - **Frame size:** 32 bytes ([`constants::FRAME_SIZE`]) — the SDI burst
//!   the chip accepts per DREQ assertion
//! - **Pool:** 2048 frames by default ([`constants::DEFAULT_POOL_FRAMES`])
//! - **Readiness:** DREQ sampled at 1 ms granularity, 100 polls by default
//! - **Ordering:** bytes reach the chip in write order, per device

pub mod codec;
pub mod constants;
pub mod device;
pub mod error;
pub mod frame;
pub mod io;
pub mod registry;

pub use device::{Device, DeviceConfig, Direction, CMD_SET_VOLUME};
pub use error::Error;
pub use frame::{Frame, FramePool};
pub use io::IoBus;
pub use registry::{Registry, RegistryError};

#[cfg(test)]
pub(crate) mod testing;
