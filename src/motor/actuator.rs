// Actuation interface for the two drive channels
//
// The tank only ever sets a signed power per channel; how that reaches the
// motors (zenoh bridge to the hub, or nowhere in a dry run) is up to the
// implementation.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::config::motor_topic;
use crate::error::{Result, TankError};
use crate::messages::MotorActuation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// Sink for channel power commands
pub trait Actuator: Send {
    /// Set `channel` to `power` percent in [-100, 100]
    fn set_power(&mut self, channel: Channel, power: i8) -> impl Future<Output = Result<()>> + Send;
}

/// Publishes power commands to the hub bridge over zenoh
pub struct ZenohActuator {
    session: zenoh::Session,
    ports: [String; 2], // [left, right]
}

impl ZenohActuator {
    pub fn new(session: zenoh::Session, left_port: &str, right_port: &str) -> Self {
        info!("Motor channels: left={}, right={}", left_port, right_port);
        Self {
            session,
            ports: [left_port.to_string(), right_port.to_string()],
        }
    }

    fn port(&self, channel: Channel) -> &str {
        match channel {
            Channel::Left => &self.ports[0],
            Channel::Right => &self.ports[1],
        }
    }
}

impl Actuator for ZenohActuator {
    async fn set_power(&mut self, channel: Channel, power: i8) -> Result<()> {
        let msg = MotorActuation {
            port: self.port(channel).to_string(),
            power,
        };
        debug!("Setting {:?} ({}) power {}", channel, msg.port, power);
        let payload = serde_json::to_string(&msg)?;
        self.session
            .put(motor_topic(&msg.port), payload)
            .await
            .map_err(TankError::transport)
    }
}

/// Logs and records every power command instead of driving motors
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    log: Arc<Mutex<Vec<(Channel, i8)>>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command sent so far, oldest first
    pub fn commands(&self) -> Vec<(Channel, i8)> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Actuator for RecordingActuator {
    async fn set_power(&mut self, channel: Channel, power: i8) -> Result<()> {
        info!("[dry run] {:?} power {}", channel, power);
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((channel, power));
        Ok(())
    }
}
