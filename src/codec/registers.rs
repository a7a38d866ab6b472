//! VS10xx SCI register addresses and command opcodes.
//!
//! From the VLSI VS1003/VS1053 datasheets. Registers are 16-bit, addressed
//! by a small integer, big-endian on the wire.

// Some registers are defined for completeness (WRAM access, decode status)
// but are not yet used by the driver.
#![allow(dead_code)]

// ── Command opcodes ────────────────────────────────────────────────────────

/// SCI register write: `[SCI_WRITE, addr, msb, lsb]`.
pub const SCI_WRITE: u8 = 0x02;

/// SCI register read: `[SCI_READ, addr]` + 2-byte response `[msb, lsb]`.
pub const SCI_READ: u8 = 0x03;

// ── Register addresses ─────────────────────────────────────────────────────

/// Mode control (reset, test modes, SDI configuration).
pub const SCI_MODE: u8 = 0x00;

/// Status register.
/// - Bits 7:4 — SS_VER (chip version)
pub const SCI_STATUS: u8 = 0x01;

/// Built-in bass/treble enhancer.
pub const SCI_BASS: u8 = 0x02;

/// Clock frequency and multiplier control.
pub const SCI_CLOCKF: u8 = 0x03;

/// Decode time in seconds (read-only while decoding).
pub const SCI_DECODE_TIME: u8 = 0x04;

/// Misc. audio data: sample rate in bits 15:1, channel count in bit 0.
pub const SCI_AUDATA: u8 = 0x05;

/// RAM read/write data.
pub const SCI_WRAM: u8 = 0x06;

/// RAM read/write base address.
pub const SCI_WRAMADDR: u8 = 0x07;

/// Stream header data 0 (format-dependent).
pub const SCI_HDAT0: u8 = 0x08;

/// Stream header data 1 (format-dependent).
pub const SCI_HDAT1: u8 = 0x09;

/// Application start address.
pub const SCI_AIADDR: u8 = 0x0A;

/// Volume control.
/// - Bits 15:8 — left-channel attenuation in -0.5 dB steps
/// - Bits  7:0 — right-channel attenuation in -0.5 dB steps
///
/// 0x00 is loudest, 0xFE quietest; 0xFFFF activates analog powerdown.
pub const SCI_VOL: u8 = 0x0B;
