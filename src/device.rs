//! Device/session layer: one chip instance with its frame pool, the
//! flow-controlled write path, and the control entry points.
//!
//! A write call runs in two phases. Phase A chunks the caller's bytes into
//! frames, blocking (interruptibly) whenever the pool is exhausted. Phase B
//! drains the pending list to the chip, stopping gracefully when DREQ stays
//! low. Phase B also runs opportunistically from Phase A on exhaustion, so
//! a single caller can stream more than one pool's worth of bytes.
//!
//! Concurrent callers are supported: the pool mutex serializes list
//! surgery and the codec mutex serializes all bus traffic (Phase B and
//! register operations alike), so two drains can never interleave on the
//! wire.

use core::fmt::Debug;
use std::io::Read;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::codec::Codec;
use crate::constants::{DEFAULT_POOL_FRAMES, DEFAULT_READY_TIMEOUT_MS, FRAME_SIZE};
use crate::error::Error;
use crate::frame::FramePool;
use crate::io::IoBus;

/// Control command family tag (`'v'`).
const CMD_FAMILY: u32 = 0x76;

/// Set volume from a packed value: byte 1 = left attenuation, byte 0 =
/// right attenuation (0x00 loudest, 0xFE quietest), upper bytes ignored.
pub const CMD_SET_VOLUME: u32 = (CMD_FAMILY << 8) | 1;

/// How long a parked writer waits before re-attempting a drain.
const FREE_WAIT_SLICE: Duration = Duration::from_millis(1);

/// Transfer direction metadata. The transport itself is write-only; the
/// tag distinguishes deployments feeding a decoder from ones pulling an
/// encoder's stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Playback,
    Record,
}

/// Per-device deployment constants.
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    /// Frames in the pool. Capacity is a deployment constant, not a
    /// protocol constant.
    pub pool_frames: usize,
    /// DREQ poll budget in 1 ms units for both register and data traffic.
    pub ready_timeout_ms: u32,
    pub direction: Direction,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            pool_frames: DEFAULT_POOL_FRAMES,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            direction: Direction::Playback,
        }
    }
}

/// One chip instance: frame pool plus serialized bus access.
///
/// All methods take `&self`; wrap the device in an `Arc` to share it
/// between writer threads.
pub struct Device<CTRL, DATA, RST, DREQ, D> {
    id: u8,
    direction: Direction,
    pool: FramePool,
    /// Transfer-serialization lock: exactly one drain or register exchange
    /// touches the bus at a time.
    codec: Mutex<Codec<CTRL, DATA, RST, DREQ, D>>,
}

impl<CTRL, DATA, RST, DREQ, D, SpiE, PinE> Device<CTRL, DATA, RST, DREQ, D>
where
    CTRL: SpiDevice<Error = SpiE>,
    DATA: SpiDevice<Error = SpiE>,
    RST: OutputPin<Error = PinE>,
    DREQ: InputPin<Error = PinE>,
    D: DelayNs,
    SpiE: Debug,
    PinE: Debug,
{
    pub fn new(id: u8, bus: IoBus<CTRL, DATA, RST, DREQ, D>, config: DeviceConfig) -> Self {
        log::info!(
            "vs10xx{}: {} frame pool ({} bytes), {:?}",
            id,
            config.pool_frames,
            config.pool_frames * FRAME_SIZE,
            config.direction,
        );
        Device {
            id,
            direction: config.direction,
            pool: FramePool::new(config.pool_frames),
            codec: Mutex::new(Codec::new(bus, config.ready_timeout_ms)),
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Frames currently available for filling.
    pub fn free_frames(&self) -> usize {
        self.pool.free_len()
    }

    /// Run the chip's power-on register sequence.
    pub fn init(&self) -> Result<(), Error<SpiE, PinE>> {
        self.codec().init()
    }

    /// Queue `buf` for transfer in 32-byte frames, then drain.
    ///
    /// Returns the number of bytes accepted into the pool — `buf.len()` on
    /// success. Queued is not audible: transfer completes asynchronously
    /// relative to this contract, on this call's drain or a later one.
    ///
    /// Blocks interruptibly when the pool is exhausted; an interruption
    /// aborts with [`Error::Interrupted`] (retryable) and leaves already
    /// queued frames in place.
    pub fn write(&self, buf: &[u8]) -> Result<usize, Error<SpiE, PinE>> {
        let mut total = 0;
        while total < buf.len() {
            let chunk = (buf.len() - total).min(FRAME_SIZE);
            let mut frame = self.obtain_frame()?;
            frame.fill(&buf[total..total + chunk]);
            self.pool.enqueue_pending(frame);
            total += chunk;
        }
        self.drain()?;
        Ok(total)
    }

    /// Like [`write`](Self::write), fed from a byte stream until EOF.
    ///
    /// A read fault returns the in-flight frame to the pool and aborts with
    /// [`Error::Fault`]; bytes from earlier chunks stay queued.
    pub fn write_from<R: Read>(&self, mut source: R) -> Result<usize, Error<SpiE, PinE>> {
        let mut total = 0;
        loop {
            let mut frame = self.obtain_frame()?;
            let n = match source.read(&mut frame.storage_mut()[..]) {
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                    self.pool.release_to_free(frame);
                    continue;
                }
                Err(e) => {
                    self.pool.release_to_free(frame);
                    return Err(Error::Fault(e));
                }
            };
            if n == 0 {
                self.pool.release_to_free(frame);
                break;
            }
            frame.set_len(n);
            self.pool.enqueue_pending(frame);
            total += n;
        }
        self.drain()?;
        Ok(total)
    }

    /// ioctl-style control entry point.
    ///
    /// Commands outside the driver's family fail with
    /// [`Error::NotSupported`].
    pub fn control(&self, cmd: u32, arg: u32) -> Result<(), Error<SpiE, PinE>> {
        if (cmd >> 8) != CMD_FAMILY {
            return Err(Error::NotSupported(cmd));
        }
        match cmd {
            CMD_SET_VOLUME => {
                let left = ((arg >> 8) & 0xFF) as u8;
                let right = (arg & 0xFF) as u8;
                self.set_volume(left, right)
            }
            _ => Err(Error::NotSupported(cmd)),
        }
    }

    /// Set per-channel attenuation (0x00 loudest, 0xFE quietest).
    pub fn set_volume(&self, left: u8, right: u8) -> Result<(), Error<SpiE, PinE>> {
        self.codec().set_volume(left, right)
    }

    /// Discard queued-but-unsent frames, waking parked writers.
    pub fn flush(&self) {
        self.pool.flush();
    }

    /// Signal-equivalent cancellation of every writer blocked on pool
    /// exhaustion; they return [`Error::Interrupted`]. Blocks new waits
    /// until [`resume_writers`](Self::resume_writers).
    pub fn interrupt_writers(&self) {
        self.pool.interrupt();
    }

    /// Re-arm blocking writes after [`interrupt_writers`](Self::interrupt_writers).
    pub fn resume_writers(&self) {
        self.pool.clear_interrupt();
    }

    /// Phase A acquisition: take a free frame, draining and then parking
    /// when the pool is exhausted.
    fn obtain_frame(&self) -> Result<crate::frame::Frame, Error<SpiE, PinE>> {
        loop {
            if let Some(frame) = self.pool.acquire_free() {
                return Ok(frame);
            }
            // Exhausted: recycle what the chip will take, then park until a
            // drain (ours or another writer's) frees a frame.
            self.drain()?;
            self.pool
                .wait_for_free(FREE_WAIT_SLICE)
                .map_err(|_| Error::Interrupted)?;
        }
    }

    /// Phase B: push pending frames to the chip until the list empties or
    /// DREQ stalls.
    fn drain(&self) -> Result<(), Error<SpiE, PinE>> {
        let mut codec = self.codec();
        while let Some(frame) = self.pool.dequeue_pending() {
            match codec.wait_data_ready() {
                Ok(true) => {}
                Ok(false) => {
                    // Graceful backpressure: keep write order intact and
                    // let a later call pick the frame up.
                    self.pool.requeue_front(frame);
                    log::debug!(
                        "vs10xx{}: dreq stall, {} frames deferred",
                        self.id,
                        self.pool.pending_len()
                    );
                    break;
                }
                Err(e) => {
                    self.pool.requeue_front(frame);
                    return Err(e);
                }
            }
            if let Err(e) = codec.send_frame(frame.bytes()) {
                // Accepted data loss: the frame is recycled unsent rather
                // than blocking the stream forever.
                log::error!("vs10xx{}: frame transfer failed: {}", self.id, e);
            }
            self.pool.release_to_free(frame);
        }
        Ok(())
    }

    fn codec(&self) -> MutexGuard<'_, Codec<CTRL, DATA, RST, DREQ, D>> {
        self.codec.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
