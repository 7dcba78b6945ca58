//! Throttled frame loop: `Idle -> Running -> Idle`.
//!
//! While running, every callback reschedules itself. A callback arriving
//! sooner than the target interval after the last worked frame is skipped;
//! the interval is fixed when the scheduler is built and only changes through
//! a full remount.

use log::{debug, warn};

use crate::scheduler::host::{FrameHandle, FrameHost, ListenerHandle};

/// Tolerance for callbacks arriving early through vsync jitter or f64 rounding
pub const FRAME_SLACK_MS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    Idle,
    Running {
        pending: Option<FrameHandle>,
        listener: ListenerHandle,
        last_frame_ms: Option<f64>, // None until the first worked frame
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Too soon after the last worked frame; rescheduled, nothing done
    Skipped,
    /// Caller must step and render
    Rendered,
    /// Stale callback after unmount
    Inactive,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval_ms: f64,
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms, state: SchedulerState::Idle }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    pub fn mount(&mut self, host: &mut dyn FrameHost) {
        if self.is_running() {
            warn!("frame scheduler already running, mount ignored");
            return;
        }
        let listener = host.subscribe_viewport();
        let pending = Some(host.request_frame());
        self.state = SchedulerState::Running { pending, listener, last_frame_ms: None };
        debug!("frame scheduler running at {:.1} ms", self.interval_ms);
    }

    pub fn on_frame(&mut self, host: &mut dyn FrameHost, now_ms: f64) -> FrameOutcome {
        let SchedulerState::Running { pending, last_frame_ms, .. } = &mut self.state else {
            return FrameOutcome::Inactive;
        };

        if let Some(last) = *last_frame_ms {
            if now_ms - last < self.interval_ms - FRAME_SLACK_MS {
                *pending = Some(host.request_frame());
                return FrameOutcome::Skipped;
            }
        }
        *last_frame_ms = Some(now_ms);
        *pending = Some(host.request_frame());
        FrameOutcome::Rendered
    }

    /// Cancel the pending callback and drop the viewport listener
    pub fn unmount(&mut self, host: &mut dyn FrameHost) {
        if let SchedulerState::Running { pending, listener, .. } = self.state {
            if let Some(handle) = pending {
                host.cancel_frame(handle);
            }
            host.unsubscribe_viewport(listener);
            debug!("frame scheduler stopped");
        }
        self.state = SchedulerState::Idle;
    }
}
