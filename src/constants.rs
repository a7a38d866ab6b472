/// Bytes per transfer frame. The VS10xx SDI interface accepts up to 32 bytes
/// per DREQ assertion without re-checking the ready line.
pub const FRAME_SIZE: usize = 32;

/// Default number of frames in a device's pool (64 KiB of buffered audio).
pub const DEFAULT_POOL_FRAMES: usize = 2048;

/// Default number of 1 ms readiness polls before a DREQ wait times out.
pub const DEFAULT_READY_TIMEOUT_MS: u32 = 100;

/// Maximum number of chip instances a registry can hold.
pub const MAX_DEVICES: usize = 2;
