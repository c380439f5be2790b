// Tilt queue task: owns the angle waiters and reacts to readings and wait
// registrations one message at a time, so no locking is needed.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::interval;
use tracing::{debug, info, warn};

use super::waiters::{AngleWaitRequest, AngleWaiters};
use crate::config::{STALL_WARN_INTERVAL, WAIT_REQUEST_BUFFER};
use crate::error::{Result, TankError};
use crate::messages::{Axis, TiltReading};

/// Handle to the running tilt queue task
#[derive(Debug, Clone)]
pub struct TiltQueue {
    requests: mpsc::Sender<AngleWaitRequest>,
    angle: watch::Receiver<Option<f32>>,
}

impl TiltQueue {
    /// Spawn the queue task consuming `readings` on the given steering axis
    ///
    /// The task ends when the reading stream closes; pending and later waits
    /// then fail with `SensorClosed`.
    pub fn spawn(axis: Axis, readings: mpsc::Receiver<TiltReading>) -> Self {
        let waiters = AngleWaiters::new();
        let (req_tx, req_rx) = mpsc::channel(WAIT_REQUEST_BUFFER);
        let (angle_tx, angle_rx) = watch::channel(waiters.current_angle());
        tokio::spawn(process(waiters, axis, readings, req_rx, angle_tx));
        Self {
            requests: req_tx,
            angle: angle_rx,
        }
    }

    /// Latest (unwrapped) steering angle, `None` before the first reading
    pub fn current_angle(&self) -> Option<f32> {
        *self.angle.borrow()
    }

    /// Wait until the first reading has arrived
    pub async fn first_reading(&self) -> Result<f32> {
        let mut angle = self.angle.clone();
        let value = angle
            .wait_for(|a| a.is_some())
            .await
            .map_err(|_| TankError::SensorClosed)?;
        Ok((*value).unwrap_or_default())
    }

    /// Register a wait for `desired`; resolved by a later reading
    pub async fn register(&self, desired: f32) -> Result<oneshot::Receiver<f32>> {
        let (req, rx) = AngleWaitRequest::new(desired);
        self.requests
            .send(req)
            .await
            .map_err(|_| TankError::SensorClosed)?;
        Ok(rx)
    }

    /// Wait until a reading lands within tolerance of `desired`
    ///
    /// There is no timeout. If the sensor never reports a matching angle this
    /// never returns and the vehicle stalls; a warning is logged periodically
    /// so the stall is visible.
    pub async fn wait_for_angle(&self, desired: f32) -> Result<f32> {
        let mut done = self.register(desired).await?;
        let mut stall = interval(STALL_WARN_INTERVAL);
        stall.tick().await; // first tick is immediate

        loop {
            tokio::select! {
                reached = &mut done => return reached.map_err(|_| TankError::SensorClosed),
                _ = stall.tick() => warn!(
                    "Still waiting for angle {} (current {:?}), no timeout applies",
                    desired,
                    self.current_angle()
                ),
            }
        }
    }
}

async fn process(
    mut waiters: AngleWaiters,
    axis: Axis,
    mut readings: mpsc::Receiver<TiltReading>,
    mut requests: mpsc::Receiver<AngleWaitRequest>,
    angle_tx: watch::Sender<Option<f32>>,
) {
    info!("Tilt queue started on axis {:?}", axis);
    loop {
        tokio::select! {
            Some(req) = requests.recv() => waiters.push(req),
            reading = readings.recv() => {
                let Some(reading) = reading else { break };
                let resolved = waiters.on_reading(reading.axis(axis));
                if !resolved.is_empty() {
                    debug!("Resolved targets {:?}, {} pending", resolved, waiters.len());
                }
                angle_tx.send_replace(waiters.current_angle());
            }
        }
    }
    warn!("Tilt reading stream closed, dropping {} pending wait(s)", waiters.len());
}
