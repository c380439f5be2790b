/// Error types for setup and plan execution
#[derive(Debug, thiserror::Error)]
pub enum TankError {
    #[error("No sensor found")]
    NoSensor,

    #[error("Multiple sensors found ({count})")]
    MultipleSensors { count: usize },

    #[error("No motor found at port {port}")]
    MissingDevice { port: String },

    #[error("Tank not connected")]
    NotConnected,

    #[error("Current angle unknown, no tilt reading received yet")]
    AngleUnknown,

    #[error("Invalid {action} argument: {argument}")]
    InvalidArgument { action: &'static str, argument: f32 },

    #[error("Tilt sensor stream closed")]
    SensorClosed,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TankError {
    /// Wrap a zenoh (or any displayable) transport failure
    pub fn transport(err: impl std::fmt::Display) -> Self {
        TankError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TankError>;
