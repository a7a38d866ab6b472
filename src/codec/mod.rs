//! VS10xx serial command interface (SCI).
//!
//! Configuration and volume control go over the control channel as fixed
//! command frames: a register write is `[0x02, addr, msb, lsb]` with no
//! response, a register read is `[0x03, addr]` followed by a two-byte
//! response. Every register operation is bracketed by a bounded DREQ wait
//! on both sides; a timeout on either side is a hard failure for that
//! operation and is never retried here.

pub(crate) mod registers;
mod vs10xx;

pub use vs10xx::Codec;
