// In-place turns closed by tilt feedback

use tracing::info;

use crate::config::TURN_POWER;
use crate::error::{Result, TankError};
use crate::motor::{rotation_powers, Actuator, ChannelPowers};
use crate::tilt::TiltQueue;

/// Turns the tank relative to its present heading
pub struct RotationController {
    tilt: TiltQueue,
    power: i8,
}

impl RotationController {
    pub fn new(tilt: TiltQueue) -> Self {
        Self {
            tilt,
            power: TURN_POWER,
        }
    }

    /// Spin in place by `degrees` (positive = right) and stop once the
    /// sensor reports the target heading
    ///
    /// Targets are relative to the current angle, so consecutive turns
    /// accumulate. Fails fast, before any actuation, on a non-finite
    /// `degrees` or if no reading has arrived yet. Returns the angle at
    /// which the turn completed.
    pub async fn turn<A: Actuator>(&self, actuator: &mut A, degrees: f32) -> Result<f32> {
        if !degrees.is_finite() {
            return Err(TankError::InvalidArgument {
                action: "turn",
                argument: degrees,
            });
        }
        let current = self.tilt.current_angle().ok_or(TankError::AngleUnknown)?;
        if degrees == 0.0 {
            return Ok(current);
        }

        let target = current + degrees;
        info!("Turning {} deg: {} -> {}", degrees, current, target);

        rotation_powers(degrees, self.power).apply(actuator).await?;
        let reached = self.tilt.wait_for_angle(target).await?;
        ChannelPowers::STOP.apply(actuator).await?;

        info!("Turn complete at {}", reached);
        Ok(reached)
    }
}
