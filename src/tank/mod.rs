// Driving plan execution for the two-motor tank
//
// Commands run strictly one after another. Power commands do not stop on
// their own; a WT command bounds how long they act. Turns block until the
// tilt sensor reports the target heading.

mod ctrl;
mod rotation;
pub mod setup;

use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::messages::{Action, Command, DrivingPlan};
use crate::motor::{clamp_power, translation_powers, Actuator, ChannelPowers};
use crate::tilt::TiltQueue;

pub use ctrl::TankCtrl;
pub use rotation::RotationController;
pub use setup::{resolve_devices, Hub, HubDevices, HubLayout, StaticHub, ZenohHub};

pub struct Tank<A> {
    actuator: A,
    rotation: RotationController,
}

impl<A: Actuator> Tank<A> {
    pub fn new(actuator: A, tilt: TiltQueue) -> Self {
        Self {
            actuator,
            rotation: RotationController::new(tilt),
        }
    }

    /// Drive straight at `power` percent (negative = backward)
    pub async fn set_power(&mut self, power: i8) -> Result<()> {
        translation_powers(power).apply(&mut self.actuator).await
    }

    pub async fn stop(&mut self) -> Result<()> {
        ChannelPowers::STOP.apply(&mut self.actuator).await
    }

    pub async fn turn(&mut self, degrees: f32) -> Result<f32> {
        self.rotation.turn(&mut self.actuator, degrees).await
    }

    /// Execute a single command to completion
    pub async fn execute(&mut self, cmd: &Command) -> Result<()> {
        info!("{:?} {}", cmd.action, cmd.argument);
        match cmd.action {
            Action::Forward => self.set_power(clamp_power(cmd.argument)).await,
            Action::Backward => self.set_power(clamp_power(-cmd.argument)).await,
            Action::TurnRight => self.turn(cmd.argument).await.map(|_| ()),
            Action::TurnLeft => self.turn(-cmd.argument).await.map(|_| ()),
            Action::Wait => {
                tokio::time::sleep(wait_duration(cmd.argument)).await;
                Ok(())
            }
        }
    }

    /// Run every command of `plan` in order, then stop both channels
    ///
    /// The final stop is also sent when a command fails; the first error is
    /// returned.
    pub async fn run(&mut self, plan: &DrivingPlan) -> Result<()> {
        info!(
            "Running plan '{}' ({} commands)",
            plan.plan_name,
            plan.commands.len()
        );

        let mut result = Ok(());
        for (i, cmd) in plan.commands.iter().enumerate() {
            if let Err(e) = self.execute(cmd).await {
                warn!("Plan '{}' failed at command {}: {}", plan.plan_name, i, e);
                result = Err(e);
                break;
            }
        }

        let stopped = self.stop().await;
        if result.is_ok() {
            info!("Plan '{}' finished", plan.plan_name);
        }
        result.and(stopped)
    }
}

/// Plan wait argument (ms) as a duration; negative or NaN waits are zero
fn wait_duration(ms: f32) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_millis(ms.round() as u64)
}
