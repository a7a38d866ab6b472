//! Fixed-capacity frame pool for the streaming transport.
//!
//! A device owns one [`FramePool`]: a fixed set of 32-byte frames split
//! between a `free` list and a `pending` (filled, awaiting transfer) list,
//! both FIFO. Frames are recycled for the lifetime of the device; the pool
//! never grows or shrinks after construction.

mod pool;

pub use pool::{Frame, FramePool, WaitInterrupted};
