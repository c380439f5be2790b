// Define message types for the runtime

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive motion actions, with the short codes planners send
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    /// Set forward power (argument: percent)
    #[serde(rename = "FD")]
    Forward,
    /// Set backward power (argument: percent)
    #[serde(rename = "BK")]
    Backward,
    /// Turn left in place (argument: degrees)
    #[serde(rename = "LT")]
    TurnLeft,
    /// Turn right in place (argument: degrees)
    #[serde(rename = "RT")]
    TurnRight,
    /// Hold the current actuation (argument: milliseconds)
    #[serde(rename = "WT")]
    Wait,
}

impl Action {
    pub fn code(self) -> &'static str {
        match self {
            Action::Forward => "FD",
            Action::Backward => "BK",
            Action::TurnLeft => "LT",
            Action::TurnRight => "RT",
            Action::Wait => "WT",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Command {
    pub action: Action,
    pub argument: f32,
}

impl Command {
    pub fn new(action: Action, argument: f32) -> Self {
        Self { action, argument }
    }
}

/// Named, ordered list of commands; order is execution order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrivingPlan {
    #[serde(alias = "name")]
    pub plan_name: String,
    pub commands: Vec<Command>,
}

impl DrivingPlan {
    pub fn new(plan_name: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            plan_name: plan_name.into(),
            commands,
        }
    }
}

impl fmt::Display for DrivingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Driving Plan: {}", self.plan_name)?;
        for cmd in &self.commands {
            write!(f, "\n  {} {}", cmd.action.code(), cmd.argument)?;
        }
        Ok(())
    }
}

/// Tilt axis selectable as the steering axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One reading from the hub's tilt sensor (degrees per axis)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct TiltReading {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TiltReading {
    pub fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Actuation output from runtime -> hub bridge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotorActuation {
    pub port: String,
    pub power: i8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Motor,
    TiltSensor,
    #[serde(other)]
    Unknown,
}

/// A device attached to the hub, as reported by discovery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceInfo {
    pub port: String,
    pub kind: DeviceKind,
}

impl DeviceInfo {
    pub fn new(port: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            port: port.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    Completed,
    Failed,
}

/// Acknowledgment published once a submitted plan has finished
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanAck {
    pub plan_name: String,
    pub commands: usize,
    pub outcome: PlanOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DriveStatus {
    Idle,
    Executing,
}
