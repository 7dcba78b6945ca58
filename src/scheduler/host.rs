//! Seam between the frame scheduler and whatever delivers frames.
//!
//! A host hands out opaque handles for scheduled frame callbacks and for
//! viewport listeners. `ManualHost` keeps both in plain vectors and is driven
//! explicitly: by the headless CLI, by the bevy viewer's update systems, and
//! by tests.

use log::trace;

use crate::device::profile::Viewport;

pub type FrameHandle = u64;
pub type ListenerHandle = u64;

pub trait FrameHost {
    /// Schedule one callback for the next paint opportunity
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Register for resize / orientation-change notifications
    fn subscribe_viewport(&mut self) -> ListenerHandle;
    fn unsubscribe_viewport(&mut self, handle: ListenerHandle);
}

#[derive(Debug, Default)]
pub struct ManualHost {
    next_handle: u64,
    pending: Vec<FrameHandle>,
    listeners: Vec<ListenerHandle>,
    delivered: usize, // frame callbacks handed out by take_due
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn delivered_frames(&self) -> usize {
        self.delivered
    }

    /// Fire every pending callback once; callbacks requested while handling
    /// these are due on the next call
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        let due = std::mem::take(&mut self.pending);
        self.delivered += due.len();
        due
    }

    /// Resize notifications for the currently registered listeners
    pub fn dispatch_resize(&self, viewport: Viewport) -> Vec<(ListenerHandle, Viewport)> {
        trace!("resize to {}x{} for {} listeners", viewport.width, viewport.height, self.listeners.len());
        self.listeners.iter().map(|l| (*l, viewport)).collect()
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.next();
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }

    fn subscribe_viewport(&mut self) -> ListenerHandle {
        let handle = self.next();
        self.listeners.push(handle);
        handle
    }

    fn unsubscribe_viewport(&mut self, handle: ListenerHandle) {
        self.listeners.retain(|l| *l != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_frames_never_fire() {
        let mut host = ManualHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        host.cancel_frame(a);
        assert_eq!(host.take_due(), vec![b]);
        assert!(host.take_due().is_empty());
        assert_eq!(host.delivered_frames(), 1);
    }

    #[test]
    fn resize_reaches_only_registered_listeners() {
        let mut host = ManualHost::new();
        let l = host.subscribe_viewport();
        assert_eq!(host.dispatch_resize(Viewport::new(10.0, 10.0)).len(), 1);
        host.unsubscribe_viewport(l);
        assert!(host.dispatch_resize(Viewport::new(10.0, 10.0)).is_empty());
    }
}
