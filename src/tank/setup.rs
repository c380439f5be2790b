// Hub discovery checks run before the first plan
//
// The hub must expose a motor on each configured port and exactly one
// sensor of the expected kind. Failures are fatal; nothing is retried and
// nothing already found is released.

use std::future::Future;

use tracing::{info, warn};

use crate::config::TOPIC_HUB_DEVICES;
use crate::error::{Result, TankError};
use crate::messages::{DeviceInfo, DeviceKind};

/// Source of the devices attached to the hub
pub trait Hub {
    fn devices(&self) -> impl Future<Output = Result<Vec<DeviceInfo>>>;
}

/// Where the tank expects its devices
#[derive(Debug, Clone, PartialEq)]
pub struct HubLayout {
    pub left_port: String,
    pub right_port: String,
    pub sensor_kind: DeviceKind,
}

/// Devices resolved for one tank
#[derive(Debug, Clone, PartialEq)]
pub struct HubDevices {
    pub left: DeviceInfo,
    pub right: DeviceInfo,
    pub sensor: DeviceInfo,
}

/// Match the hub's devices against `layout`
pub async fn resolve_devices<H: Hub>(hub: &H, layout: &HubLayout) -> Result<HubDevices> {
    let devices = hub.devices().await?;
    info!("Hub reports {} device(s)", devices.len());

    let left = find_motor(&devices, &layout.left_port)?;
    let right = find_motor(&devices, &layout.right_port)?;

    let sensors: Vec<&DeviceInfo> = devices
        .iter()
        .filter(|d| d.kind == layout.sensor_kind)
        .collect();
    let sensor = match sensors.as_slice() {
        [] => return Err(TankError::NoSensor),
        [sensor] => (*sensor).clone(),
        many => {
            warn!("Expected one {:?}, found {}", layout.sensor_kind, many.len());
            return Err(TankError::MultipleSensors { count: many.len() });
        }
    };

    info!(
        "Resolved motors at {} / {}, sensor at {}",
        left.port, right.port, sensor.port
    );
    Ok(HubDevices {
        left,
        right,
        sensor,
    })
}

fn find_motor(devices: &[DeviceInfo], port: &str) -> Result<DeviceInfo> {
    devices
        .iter()
        .find(|d| d.port == port && d.kind == DeviceKind::Motor)
        .cloned()
        .ok_or_else(|| TankError::MissingDevice {
            port: port.to_string(),
        })
}

/// Fixed device list
#[derive(Debug, Clone, Default)]
pub struct StaticHub {
    devices: Vec<DeviceInfo>,
}

impl StaticHub {
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        Self { devices }
    }
}

impl Hub for StaticHub {
    async fn devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }
}

/// Asks the hub bridge for its device list over a zenoh query
pub struct ZenohHub {
    session: zenoh::Session,
}

impl ZenohHub {
    pub fn new(session: zenoh::Session) -> Self {
        Self { session }
    }
}

impl Hub for ZenohHub {
    async fn devices(&self) -> Result<Vec<DeviceInfo>> {
        info!("Querying {} for hub devices...", TOPIC_HUB_DEVICES);
        let replies = self
            .session
            .get(TOPIC_HUB_DEVICES)
            .await
            .map_err(TankError::transport)?;

        while let Ok(reply) = replies.recv_async().await {
            match reply.result() {
                Ok(sample) => {
                    let payload = sample.payload().to_bytes();
                    return Ok(serde_json::from_slice(&payload)?);
                }
                Err(err) => warn!("Hub answered discovery with an error: {:?}", err),
            }
        }
        Err(TankError::Transport(format!(
            "no hub answered on {}",
            TOPIC_HUB_DEVICES
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> HubLayout {
        HubLayout {
            left_port: "A".into(),
            right_port: "B".into(),
            sensor_kind: DeviceKind::TiltSensor,
        }
    }

    fn motors() -> Vec<DeviceInfo> {
        vec![
            DeviceInfo::new("A", DeviceKind::Motor),
            DeviceInfo::new("B", DeviceKind::Motor),
        ]
    }

    #[tokio::test]
    async fn test_single_sensor_resolves() {
        let mut devices = motors();
        devices.push(DeviceInfo::new("C", DeviceKind::Unknown));
        devices.push(DeviceInfo::new("internal", DeviceKind::TiltSensor));

        let found = resolve_devices(&StaticHub::new(devices), &layout())
            .await
            .unwrap();
        assert_eq!(found.left.port, "A");
        assert_eq!(found.right.port, "B");
        assert_eq!(found.sensor.port, "internal");
    }

    #[tokio::test]
    async fn test_no_sensor() {
        let res = resolve_devices(&StaticHub::new(motors()), &layout()).await;
        assert!(matches!(res, Err(TankError::NoSensor)));
    }

    #[tokio::test]
    async fn test_multiple_sensors() {
        let mut devices = motors();
        devices.push(DeviceInfo::new("C", DeviceKind::TiltSensor));
        devices.push(DeviceInfo::new("D", DeviceKind::TiltSensor));

        let res = resolve_devices(&StaticHub::new(devices), &layout()).await;
        assert!(matches!(res, Err(TankError::MultipleSensors { count: 2 })));
    }

    #[tokio::test]
    async fn test_missing_motor_port() {
        let devices = vec![
            DeviceInfo::new("A", DeviceKind::Motor),
            DeviceInfo::new("B", DeviceKind::TiltSensor),
        ];
        let res = resolve_devices(&StaticHub::new(devices), &layout()).await;
        assert!(matches!(res, Err(TankError::MissingDevice { port }) if port == "B"));
    }
}
