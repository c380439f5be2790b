// Motor control module for the tank's two drive channels
//
// Provides:
// - Channel sign mappings (translation / in-place rotation)
// - The actuation interface and its zenoh and recording implementations

mod actuator;
pub mod mixing;

pub use actuator::{Actuator, Channel, RecordingActuator, ZenohActuator};
pub use mixing::{clamp_power, rotation_powers, translation_powers, ChannelPowers};
