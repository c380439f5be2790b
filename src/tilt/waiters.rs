// Ordered angle waiters and the latest observed angle
//
// Readings are applied one at a time; only the head of the queue may
// resolve, so waits complete strictly in registration order.

use std::collections::VecDeque;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::ANGLE_TOLERANCE_DEG;

/// A pending "wait until the angle is reached" request
#[derive(Debug)]
pub struct AngleWaitRequest {
    desired: f32,
    done: oneshot::Sender<f32>,
}

impl AngleWaitRequest {
    /// Create a request and the receiver that yields the satisfying angle
    pub fn new(desired: f32) -> (Self, oneshot::Receiver<f32>) {
        let (done, rx) = oneshot::channel();
        (Self { desired, done }, rx)
    }

    pub fn desired(&self) -> f32 {
        self.desired
    }
}

/// Map an angle into [-180, 180)
pub fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// FIFO of angle waits plus the continuous (unwrapped) current angle
#[derive(Debug)]
pub struct AngleWaiters {
    pending: VecDeque<AngleWaitRequest>,
    current: Option<f32>,
    tolerance: f32,
}

impl Default for AngleWaiters {
    fn default() -> Self {
        Self::new()
    }
}

impl AngleWaiters {
    pub fn new() -> Self {
        Self::with_tolerance(ANGLE_TOLERANCE_DEG)
    }

    pub(crate) fn with_tolerance(tolerance: f32) -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            tolerance,
        }
    }

    /// Latest angle, unwrapped; `None` until the first reading
    pub fn current_angle(&self) -> Option<f32> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue a request. Never resolves it here, even if the current angle
    /// already matches: only the next reading can.
    pub fn push(&mut self, request: AngleWaitRequest) {
        debug!(
            "Waiting for angle {} (queue depth {})",
            request.desired,
            self.pending.len() + 1
        );
        self.pending.push_back(request);
    }

    /// Apply one raw reading and resolve every satisfied request at the head
    ///
    /// Returns the targets resolved, in resolution order. Non-finite
    /// readings are dropped and leave the current angle untouched.
    pub fn on_reading(&mut self, raw: f32) -> Vec<f32> {
        if !raw.is_finite() {
            warn!("Ignoring non-finite tilt reading {}", raw);
            return Vec::new();
        }

        // Raw readings may wrap at ±180; follow the shortest path from the
        // previous angle so turns accumulate continuously.
        let angle = match self.current {
            Some(prev) => prev + wrap_degrees(raw - prev),
            None => raw,
        };
        self.current = Some(angle);

        let mut resolved = Vec::new();
        while self
            .pending
            .front()
            .is_some_and(|head| (angle - head.desired).abs() <= self.tolerance)
        {
            if let Some(head) = self.pending.pop_front() {
                debug!("Angle {} reached target {}", angle, head.desired);
                // The turn may have given up on the result; nothing to do then
                let _ = head.done.send(angle);
                resolved.push(head.desired);
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot::error::TryRecvError;

    fn request(waiters: &mut AngleWaiters, desired: f32) -> oneshot::Receiver<f32> {
        let (req, rx) = AngleWaitRequest::new(desired);
        waiters.push(req);
        rx
    }

    #[test]
    fn test_resolves_on_first_reading_within_tolerance() {
        let mut waiters = AngleWaiters::new();
        let mut rx = request(&mut waiters, 90.0);

        // Nothing resolves before any reading has arrived
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        for angle in [0.0, 30.0, 60.0, 87.5] {
            assert_eq!(waiters.on_reading(angle).len(), 0);
        }
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(waiters.on_reading(88.5).len(), 1);
        assert_eq!(rx.try_recv(), Ok(88.5));
        assert!(waiters.is_empty());
    }

    #[test]
    fn test_tolerance_band_is_inclusive() {
        let mut waiters = AngleWaiters::new();
        let mut rx = request(&mut waiters, 10.0);
        assert_eq!(waiters.on_reading(12.0).len(), 1);
        assert_eq!(rx.try_recv(), Ok(12.0));
    }

    #[test]
    fn test_one_reading_resolves_all_satisfied() {
        let mut waiters = AngleWaiters::new();
        let mut rxs: Vec<_> = [45.0, 44.0, 46.0, 45.5]
            .into_iter()
            .map(|d| request(&mut waiters, d))
            .collect();

        // Every satisfied wait resolves, oldest first
        assert_eq!(waiters.on_reading(45.0), vec![45.0, 44.0, 46.0, 45.5]);
        for rx in &mut rxs {
            assert_eq!(rx.try_recv(), Ok(45.0));
        }
        assert!(waiters.is_empty());
    }

    #[test]
    fn test_later_request_never_overtakes_head() {
        let mut waiters = AngleWaiters::new();
        let mut first = request(&mut waiters, 100.0);
        let mut second = request(&mut waiters, 10.0);

        // Second target is met, but the head is not
        assert_eq!(waiters.on_reading(10.0).len(), 0);
        assert_eq!(second.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(waiters.len(), 2);

        assert_eq!(waiters.on_reading(99.0).len(), 1);
        assert_eq!(first.try_recv(), Ok(99.0));
        assert_eq!(second.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(waiters.on_reading(11.0).len(), 1);
        assert_eq!(second.try_recv(), Ok(11.0));
    }

    #[test]
    fn test_reading_with_empty_queue_updates_angle() {
        let mut waiters = AngleWaiters::new();
        assert_eq!(waiters.current_angle(), None);
        assert_eq!(waiters.on_reading(-12.0).len(), 0);
        assert_eq!(waiters.current_angle(), Some(-12.0));
    }

    #[test]
    fn test_wait_for_current_angle_needs_another_reading() {
        let mut waiters = AngleWaiters::new();
        waiters.on_reading(30.0);

        let mut rx = request(&mut waiters, 30.0);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(waiters.on_reading(30.0).len(), 1);
        assert_eq!(rx.try_recv(), Ok(30.0));
    }

    #[test]
    fn test_dropped_receiver_still_dequeued() {
        let mut waiters = AngleWaiters::new();
        drop(request(&mut waiters, 5.0));
        let mut next = request(&mut waiters, 5.0);

        assert_eq!(waiters.on_reading(5.0).len(), 2);
        assert_eq!(next.try_recv(), Ok(5.0));
    }

    #[test]
    fn test_readings_unwrap_across_180() {
        let mut waiters = AngleWaiters::new();
        waiters.on_reading(170.0);
        let mut rx = request(&mut waiters, 200.0);

        // Sensor wraps to -170, which is 190 continuous
        assert_eq!(waiters.on_reading(-170.0).len(), 0);
        assert_eq!(waiters.current_angle(), Some(190.0));

        assert_eq!(waiters.on_reading(-161.0).len(), 1);
        assert_eq!(rx.try_recv(), Ok(199.0));
    }

    #[test]
    fn test_non_finite_reading_ignored() {
        let mut waiters = AngleWaiters::new();
        waiters.on_reading(10.0);
        let mut rx = request(&mut waiters, 12.0);

        // 1e39 overflows f32 when parsed from JSON
        let reading: crate::messages::TiltReading =
            serde_json::from_str(r#"{"x": 0, "y": 0, "z": 1e39}"#).unwrap();
        assert!(waiters.on_reading(reading.z).is_empty());
        assert!(waiters.on_reading(f32::NAN).is_empty());
        assert_eq!(waiters.current_angle(), Some(10.0));

        assert!(waiters.on_reading(11.0).is_empty());
        assert_eq!(waiters.on_reading(12.0), vec![12.0]);
        assert_eq!(rx.try_recv(), Ok(12.0));
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(180.0), -180.0);
    }
}
