// Runtime for a two-motor tank driven by ordered driving plans,
// with in-place turns closed by tilt sensor feedback.

pub mod config;
pub mod error;
pub mod messages;
pub mod motor;
pub mod runtime;
pub mod tank;
pub mod tilt;

pub use error::TankError;
