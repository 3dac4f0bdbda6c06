//! Frame hand-off from the capture callback to the detection worker.
//!
//! The capture session pushes every frame into a [`FrameSink`]. A single
//! worker drains the shared [`FrameQueue`] one frame at a time, so only one
//! frame is ever in detection. What happens to frames that arrive while the
//! worker is busy is governed by [`BackpressurePolicy`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::config::BackpressurePolicy;
use crate::frame::Frame;
use crate::metrics;

#[derive(Debug, Default)]
struct QueueState {
    frames: VecDeque<Frame>,
    closed: bool,
    dropped: u64,
}

/// Single-consumer frame queue.
#[derive(Debug)]
pub struct FrameQueue {
    policy: BackpressurePolicy,
    state: Mutex<QueueState>,
    notify: Notify,
}

impl FrameQueue {
    pub fn new(policy: BackpressurePolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(QueueState::default()),
            notify: Notify::new(),
        }
    }

    pub fn policy(&self) -> BackpressurePolicy {
        self.policy
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a frame. Returns `false` if the queue is closed.
    pub fn push(&self, frame: Frame) -> bool {
        metrics::record_frame_received();
        {
            let mut state = self.state();
            if state.closed {
                trace!(frame_id = frame.id, "Frame arrived after close");
                metrics::record_frame_dropped("closed");
                return false;
            }
            if self.policy == BackpressurePolicy::Latest {
                let superseded = state.frames.len() as u64;
                if superseded > 0 {
                    state.frames.clear();
                    state.dropped += superseded;
                    for _ in 0..superseded {
                        metrics::record_frame_dropped("superseded");
                    }
                    debug!(frame_id = frame.id, superseded, "Dropped stale frames");
                }
            }
            state.frames.push_back(frame);
        }
        self.notify.notify_one();
        true
    }

    /// Wait for the next frame. Returns `None` once closed and drained.
    pub async fn recv(&self) -> Option<Frame> {
        loop {
            {
                let mut state = self.state();
                if let Some(frame) = state.frames.pop_front() {
                    return Some(frame);
                }
                if state.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Stop accepting frames and wake the worker.
    pub fn close(&self) {
        self.state().closed = true;
        self.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Frames waiting for the worker.
    pub fn len(&self) -> usize {
        self.state().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames discarded by the `Latest` policy so far.
    pub fn dropped(&self) -> u64 {
        self.state().dropped
    }
}

/// Capture-side handle to the frame queue.
#[derive(Debug, Clone)]
pub struct FrameSink {
    queue: Arc<FrameQueue>,
}

impl FrameSink {
    pub fn new(queue: Arc<FrameQueue>) -> Self {
        Self { queue }
    }

    /// Deliver one captured frame.
    ///
    /// Called from the capture callback; never blocks on detection.
    pub fn on_frame(&self, frame: Frame) -> bool {
        self.queue.push(frame)
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}
