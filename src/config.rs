// Topics, control constants, runtime settings
use std::time::Duration;

use clap::Parser;

use crate::messages::{Axis, DeviceKind};
use crate::tank::HubLayout;

// Zenoh topics
pub const TOPIC_CMD_PLAN: &str = "tank/cmd/plan"; // driving plans in
pub const TOPIC_PLAN_ACK: &str = "tank/state/plan_ack"; // one ack per plan
pub const TOPIC_STATUS: &str = "tank/state/status"; // idle / executing
pub const TOPIC_HUB_DEVICES: &str = "tank/hub/devices"; // discovery query

/// Readings published by the sensor at `port`
pub fn sensor_topic(port: &str) -> String {
    format!("tank/sensor/{}/tilt", port)
}

/// Actuation for the motor at `port`
pub fn motor_topic(port: &str) -> String {
    format!("tank/rt/motor/{}", port)
}

// Hub wiring
pub const DEFAULT_LEFT_PORT: &str = "A";
pub const DEFAULT_RIGHT_PORT: &str = "B";

// Rotation control
pub const ANGLE_TOLERANCE_DEG: f32 = 2.0; // a target counts as reached within this band
pub const TURN_POWER: i8 = 50; // both channels during an in-place turn

// A pending angle wait never times out; it only complains at this interval
pub const STALL_WARN_INTERVAL: Duration = Duration::from_secs(5);

// Channel capacities between the sensor forwarder, the tilt queue and the turns
pub const READING_BUFFER: usize = 64;
pub const WAIT_REQUEST_BUFFER: usize = 16;

/// Command line settings for the runtime
#[derive(Debug, Clone, Parser)]
#[command(name = "tilt-tank-runtime", version, about = "Drive a tilt-sensing tank from driving plans")]
pub struct Settings {
    /// Hub port of the left motor
    #[arg(long, default_value = DEFAULT_LEFT_PORT)]
    pub left_port: String,

    /// Hub port of the right motor
    #[arg(long, default_value = DEFAULT_RIGHT_PORT)]
    pub right_port: String,

    /// Tilt axis that follows the vehicle's heading
    #[arg(long, value_enum, default_value_t = Axis::Z)]
    pub steering_axis: Axis,

    /// Log actuation instead of publishing it (simulation/testing)
    #[arg(long)]
    pub no_motors: bool,
}

impl Settings {
    pub fn layout(&self) -> HubLayout {
        HubLayout {
            left_port: self.left_port.clone(),
            right_port: self.right_port.clone(),
            sensor_kind: DeviceKind::TiltSensor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hub_wiring() {
        let settings = Settings::parse_from(["tilt-tank-runtime"]);
        assert_eq!(settings.left_port, "A");
        assert_eq!(settings.right_port, "B");
        assert_eq!(settings.steering_axis, Axis::Z);
        assert!(!settings.no_motors);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::parse_from([
            "tilt-tank-runtime",
            "--left-port",
            "C",
            "--steering-axis",
            "x",
            "--no-motors",
        ]);
        let layout = settings.layout();
        assert_eq!(layout.left_port, "C");
        assert_eq!(layout.right_port, "B");
        assert_eq!(layout.sensor_kind, DeviceKind::TiltSensor);
        assert_eq!(settings.steering_axis, Axis::X);
        assert!(settings.no_motors);
    }

    #[test]
    fn test_topics_include_port() {
        assert_eq!(sensor_topic("C"), "tank/sensor/C/tilt");
        assert_eq!(motor_topic("A"), "tank/rt/motor/A");
    }
}
