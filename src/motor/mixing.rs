// Channel sign mappings for the differential drivetrain
//
// Both physical wiring assumptions live here:
// - the right motor is mounted mirrored, so straight travel needs opposite signs
// - the tilt axis grows against the steering sense, so a right turn (positive
//   degrees) drives both channels negative

use super::{Actuator, Channel};
use crate::error::Result;

/// Largest magnitude accepted by the hub for a channel
pub const MAX_POWER: i8 = 100;

/// Signed power for the left and right channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelPowers {
    pub left: i8,
    pub right: i8,
}

impl ChannelPowers {
    pub const STOP: ChannelPowers = ChannelPowers { left: 0, right: 0 };

    pub fn new(left: i8, right: i8) -> Self {
        Self { left, right }
    }

    /// Send both channel powers, left first
    pub async fn apply<A: Actuator>(&self, actuator: &mut A) -> Result<()> {
        actuator.set_power(Channel::Left, self.left).await?;
        actuator.set_power(Channel::Right, self.right).await
    }
}

/// Convert a plan argument to a channel power in [-100, 100]
pub fn clamp_power(power: f32) -> i8 {
    if power.is_nan() {
        return 0;
    }
    power.round().clamp(-(MAX_POWER as f32), MAX_POWER as f32) as i8
}

/// Powers for straight travel; negative power drives backward
pub fn translation_powers(power: i8) -> ChannelPowers {
    let power = power.clamp(-MAX_POWER, MAX_POWER);
    ChannelPowers::new(power, -power)
}

/// Powers for an in-place turn of `degrees` (positive = right)
///
/// Both channels always carry the same signed value, so the tank spins
/// on the spot instead of driving an arc.
pub fn rotation_powers(degrees: f32, magnitude: i8) -> ChannelPowers {
    let magnitude = magnitude.clamp(0, MAX_POWER);
    let power = if degrees > 0.0 { -magnitude } else { magnitude };
    ChannelPowers::new(power, power)
}
