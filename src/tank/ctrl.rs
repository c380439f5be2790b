use tracing::info;

use super::Tank;
use crate::error::{Result, TankError};
use crate::messages::DrivingPlan;
use crate::motor::Actuator;

/// Owns the tank once setup has succeeded; plans before that are refused
pub struct TankCtrl<A> {
    tank: Option<Tank<A>>,
}

impl<A: Actuator> Default for TankCtrl<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Actuator> TankCtrl<A> {
    pub fn new() -> Self {
        Self { tank: None }
    }

    pub fn attach(&mut self, tank: Tank<A>) {
        info!("Tank connected");
        self.tank = Some(tank);
    }

    pub fn is_connected(&self) -> bool {
        self.tank.is_some()
    }

    /// Execute `plan`; callers must not run plans concurrently
    pub async fn run(&mut self, plan: &DrivingPlan) -> Result<()> {
        let tank = self.tank.as_mut().ok_or(TankError::NotConnected)?;
        tank.run(plan).await
    }
}
