// Angle waiter queue fed by the tilt sensor
//
// Bridges the asynchronous reading stream to ordered "wait until the
// steering angle reaches X" requests issued by turns.

mod queue;
pub mod waiters;

pub use queue::TiltQueue;
pub use waiters::{AngleWaitRequest, AngleWaiters};
