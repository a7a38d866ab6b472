use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;

use crate::constants::FRAME_SIZE;

/// One fixed-size transfer unit: 32 bytes of payload plus the filled length.
///
/// A frame's length is only meaningful between "filled" and "transferred";
/// recycling a frame back to the free list clears it.
#[derive(Debug)]
pub struct Frame {
    data: [u8; FRAME_SIZE],
    len: usize,
}

impl Frame {
    fn empty() -> Self {
        Frame {
            data: [0; FRAME_SIZE],
            len: 0,
        }
    }

    /// Copy `src` into the frame and set its length.
    ///
    /// # Panics
    /// Debug-asserts that `src` fits in one frame.
    pub fn fill(&mut self, src: &[u8]) {
        debug_assert!(src.len() <= FRAME_SIZE, "chunk larger than a frame");
        self.data[..src.len()].copy_from_slice(src);
        self.len = src.len();
    }

    /// The filled portion of the frame.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Filled length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the frame carries no payload.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw storage access for filling straight from a byte stream.
    pub(crate) fn storage_mut(&mut self) -> &mut [u8; FRAME_SIZE] {
        &mut self.data
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= FRAME_SIZE);
        self.len = len;
    }
}

/// A blocked wait for a free frame was interrupted via [`FramePool::interrupt`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("wait for free frame interrupted")]
pub struct WaitInterrupted;

struct PoolState {
    free: VecDeque<Frame>,
    pending: VecDeque<Frame>,
    /// Signal-equivalent cancellation flag; level-triggered until cleared.
    interrupted: bool,
}

/// Fixed-capacity pool with FIFO `free`/`pending` discipline.
///
/// One mutex guards both lists and is held for O(1) list surgery only —
/// never across a bus transfer or a sleep. Writers that find `free` empty
/// park on the condvar and are woken one-at-a-time as frames are recycled.
pub struct FramePool {
    capacity: usize,
    state: Mutex<PoolState>,
    frame_freed: Condvar,
}

impl FramePool {
    /// Create a pool with `capacity` frames, all on the free list.
    pub fn new(capacity: usize) -> Self {
        let free = (0..capacity).map(|_| Frame::empty()).collect();
        log::debug!(
            "pool: allocated {} frames ({} bytes)",
            capacity,
            capacity * FRAME_SIZE
        );
        FramePool {
            capacity,
            state: Mutex::new(PoolState {
                free,
                pending: VecDeque::with_capacity(capacity),
                interrupted: false,
            }),
            frame_freed: Condvar::new(),
        }
    }

    /// Total frame count, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frames currently on the free list.
    pub fn free_len(&self) -> usize {
        self.locked().free.len()
    }

    /// Frames filled and awaiting transfer.
    pub fn pending_len(&self) -> usize {
        self.locked().pending.len()
    }

    /// Remove and return the head of the free list, non-blocking.
    ///
    /// `None` means exhaustion, not an error — callers decide whether to
    /// drain, block, or give up.
    pub fn acquire_free(&self) -> Option<Frame> {
        self.locked().free.pop_front()
    }

    /// Clear the frame's length and append it to the tail of the free list,
    /// waking one writer parked in [`wait_for_free`](Self::wait_for_free).
    ///
    /// Used by both the transfer-complete path and the fill-failure path.
    pub fn release_to_free(&self, mut frame: Frame) {
        frame.len = 0;
        self.locked().free.push_back(frame);
        self.frame_freed.notify_one();
    }

    /// Append a filled frame to the tail of the pending list.
    ///
    /// A zero-length frame carries nothing to send and is recycled to the
    /// free list instead.
    pub fn enqueue_pending(&self, frame: Frame) {
        if frame.is_empty() {
            self.release_to_free(frame);
        } else {
            self.locked().pending.push_back(frame);
        }
    }

    /// Remove and return the head of the pending list, non-blocking.
    pub fn dequeue_pending(&self) -> Option<Frame> {
        self.locked().pending.pop_front()
    }

    /// Re-insert a dequeued-but-unsent frame at the *head* of the pending
    /// list, preserving write order after a device-not-ready stall.
    pub fn requeue_front(&self, frame: Frame) {
        self.locked().pending.push_front(frame);
    }

    /// Park until a frame is recycled, `timeout` elapses, or the pool is
    /// interrupted. Returns immediately when the free list is non-empty.
    ///
    /// A timeout is not an error: the caller re-checks the free list and may
    /// retry a drain before parking again.
    pub fn wait_for_free(&self, timeout: Duration) -> Result<(), WaitInterrupted> {
        let state = self.locked();
        if state.interrupted {
            return Err(WaitInterrupted);
        }
        if !state.free.is_empty() {
            return Ok(());
        }
        let (state, _timed_out) = self
            .frame_freed
            .wait_timeout(state, timeout)
            .unwrap_or_else(PoisonError::into_inner);
        if state.interrupted {
            return Err(WaitInterrupted);
        }
        Ok(())
    }

    /// Interrupt every writer parked on pool exhaustion. The flag is
    /// level-triggered: further waits fail until [`clear_interrupt`]
    /// (Self::clear_interrupt) is called.
    pub fn interrupt(&self) {
        self.locked().interrupted = true;
        self.frame_freed.notify_all();
    }

    /// Re-arm the pool for blocking waits after an interruption.
    pub fn clear_interrupt(&self) {
        self.locked().interrupted = false;
    }

    /// Move every pending frame back to the free list, lengths cleared.
    /// Queued-but-unsent data is discarded.
    pub fn flush(&self) {
        let mut state = self.locked();
        if !state.pending.is_empty() {
            log::debug!("pool: flushing {} pending frames", state.pending.len());
            while let Some(mut frame) = state.pending.pop_front() {
                frame.len = 0;
                state.free.push_back(frame);
            }
            self.frame_freed.notify_all();
        }
    }

    /// Lock the pool state, recovering from poisoning: list surgery is
    /// completed before any unlock, so the state is always consistent.
    fn locked(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
