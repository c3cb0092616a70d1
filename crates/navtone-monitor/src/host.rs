// SPDX-License-Identifier: MIT
//
// The environment the Monitor runs in: a clock, a "call me before the
// next repaint" queue, and scroll/resize subscriptions.
//
// The Monitor never blocks or spawns. It asks the host for a frame and
// reacts when the host delivers one through `Monitor::on_frame`. A
// browser binding maps these onto requestAnimationFrame and
// addEventListener; `VirtualHost` is a deterministic in-memory host
// driven by the simulator and the tests.

use std::fmt;
use std::time::Duration;

/// Handle for a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Handle for a registered viewport listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Viewport changes that can move the page under the navbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    Scroll,
    Resize,
}

impl fmt::Display for ViewportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
        })
    }
}

/// Scheduling and event services provided to the Monitor.
pub trait FrameHost {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    /// Schedule one callback before the next repaint.
    fn request_frame(&mut self) -> FrameId;

    /// Cancel a frame; unknown or already-delivered ids are ignored.
    fn cancel_frame(&mut self, id: FrameId);

    /// Subscribe to `event`. Events arrive through
    /// `Monitor::on_viewport_event`.
    fn add_listener(&mut self, event: ViewportEvent) -> ListenerId;

    /// Unsubscribe; unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);
}

// ─── VirtualHost ─────────────────────────────────────────────────────────────

/// A deterministic host with a manually advanced clock.
///
/// Requested frames queue up until [`take_frames`](Self::take_frames)
/// hands them to the driver, which then calls `Monitor::on_frame` for
/// each.
#[derive(Debug, Default)]
pub struct VirtualHost {
    now: Duration,
    next_id: u64,
    frames: Vec<FrameId>,
    listeners: Vec<(ListenerId, ViewportEvent)>,
    requested: u64,
    cancelled: u64,
}

impl VirtualHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// Remove and return every pending frame, oldest first.
    pub fn take_frames(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.frames)
    }

    #[must_use]
    pub fn pending_frames(&self) -> &[FrameId] {
        &self.frames
    }

    #[must_use]
    pub fn has_listener(&self, event: ViewportEvent) -> bool {
        self.listeners.iter().any(|&(_, e)| e == event)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Frames requested over the host's lifetime.
    #[must_use]
    pub const fn frames_requested(&self) -> u64 {
        self.requested
    }

    /// Pending frames removed by [`FrameHost::cancel_frame`].
    #[must_use]
    pub const fn frames_cancelled(&self) -> u64 {
        self.cancelled
    }

    const fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameHost for VirtualHost {
    fn now(&self) -> Duration {
        self.now
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_id());
        self.frames.push(id);
        self.requested += 1;
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let before = self.frames.len();
        self.frames.retain(|&f| f != id);
        if self.frames.len() < before {
            self.cancelled += 1;
        }
    }

    fn add_listener(&mut self, event: ViewportEvent) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.push((id, event));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|&(l, _)| l != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clock_advances() {
        let mut host = VirtualHost::new();
        assert_eq!(host.now(), Duration::ZERO);
        host.advance(Duration::from_millis(16));
        host.advance(Duration::from_millis(16));
        assert_eq!(host.now(), Duration::from_millis(32));
    }

    #[test]
    fn frames_queue_and_drain() {
        let mut host = VirtualHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.take_frames(), vec![a, b]);
        assert!(host.pending_frames().is_empty());
        assert_eq!(host.frames_requested(), 2);
    }

    #[test]
    fn cancel_removes_pending_frame() {
        let mut host = VirtualHost::new();
        let a = host.request_frame();
        host.cancel_frame(a);
        host.cancel_frame(a);
        assert!(host.pending_frames().is_empty());
        assert_eq!(host.frames_cancelled(), 1);
    }

    #[test]
    fn listeners_register_and_remove() {
        let mut host = VirtualHost::new();
        let scroll = host.add_listener(ViewportEvent::Scroll);
        let resize = host.add_listener(ViewportEvent::Resize);
        assert!(host.has_listener(ViewportEvent::Scroll));
        assert_eq!(host.listener_count(), 2);

        host.remove_listener(scroll);
        assert!(!host.has_listener(ViewportEvent::Scroll));
        host.remove_listener(resize);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn event_display() {
        assert_eq!(ViewportEvent::Scroll.to_string(), "scroll");
        assert_eq!(ViewportEvent::Resize.to_string(), "resize");
    }
}
