//! Rate-limited, coalescing redraw requests.
//!
//! Drag input arrives far more often than the map can be redrawn. Requests
//! closer together than `min_interval` are throttled outright; an accepted
//! request either schedules the single pending redraw or, if one is already
//! waiting for the next frame, folds into it. The pending redraw reads the
//! newest state when it runs, so nothing is queued beyond one slot.

use std::time::{Duration, Instant};

/// Outcome of [`RedrawScheduler::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Accepted; a redraw is now pending.
    Scheduled,
    /// Accepted; a redraw was already pending and will pick this up.
    Coalesced,
    /// Rejected by the rate gate.
    Throttled,
}

impl Admission {
    pub fn is_accepted(self) -> bool {
        !matches!(self, Admission::Throttled)
    }
}

#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    min_interval: Duration,
    last_accepted: Option<Instant>,
    pending: bool,
}

impl RedrawScheduler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
            pending: false,
        }
    }

    pub fn request(&mut self, now: Instant) -> Admission {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.min_interval {
                tracing::trace!("Redraw throttled");
                return Admission::Throttled;
            }
        }
        self.last_accepted = Some(now);

        if self.pending {
            tracing::trace!("Redraw coalesced");
            Admission::Coalesced
        } else {
            self.pending = true;
            tracing::trace!("Redraw scheduled");
            Admission::Scheduled
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Claims the pending redraw, if any. Called once per frame.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Drops the pending redraw without running it.
    pub fn cancel_pending(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATE: Duration = Duration::from_millis(32);

    #[test]
    fn test_first_request_is_scheduled() {
        let mut scheduler = RedrawScheduler::new(GATE);
        assert_eq!(scheduler.request(Instant::now()), Admission::Scheduled);
        assert!(scheduler.is_pending());
    }

    #[test]
    fn test_requests_inside_gate_are_throttled() {
        let mut scheduler = RedrawScheduler::new(GATE);
        let t0 = Instant::now();
        scheduler.request(t0);
        assert_eq!(scheduler.request(t0 + Duration::from_millis(10)), Admission::Throttled);
        assert_eq!(scheduler.request(t0 + Duration::from_millis(31)), Admission::Throttled);
    }

    #[test]
    fn test_accepted_request_with_pending_is_coalesced() {
        let mut scheduler = RedrawScheduler::new(GATE);
        let t0 = Instant::now();
        scheduler.request(t0);
        assert_eq!(scheduler.request(t0 + GATE), Admission::Coalesced);
        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
    }

    #[test]
    fn test_gate_measures_from_last_accepted() {
        let mut scheduler = RedrawScheduler::new(GATE);
        let t0 = Instant::now();
        scheduler.request(t0);
        scheduler.take_pending();
        // Throttled requests do not move the gate.
        scheduler.request(t0 + Duration::from_millis(20));
        assert_eq!(scheduler.request(t0 + Duration::from_millis(33)), Admission::Scheduled);
    }

    #[test]
    fn test_cancel_pending() {
        let mut scheduler = RedrawScheduler::new(GATE);
        scheduler.request(Instant::now());
        scheduler.cancel_pending();
        assert!(!scheduler.take_pending());
    }
}
