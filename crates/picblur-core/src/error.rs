use thiserror::Error;

/// Errors raised by the picture model, the worker pool and the transforms.
#[derive(Debug, Error)]
pub enum BlurError {
    #[error("invalid picture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("failed to spawn worker thread")]
    Spawn(#[source] std::io::Error),

    #[error("worker pool no longer accepts tasks")]
    PoolClosed,

    #[error("rotate is undefined for angle {0} (must be 90, 180 or 270)")]
    InvalidAngle(String),

    #[error("flip is undefined for plane {0} (must be V or H)")]
    InvalidPlane(String),

    #[error("invalid process requested: {0} is not defined")]
    UnknownOperation(String),

    #[error("invalid blur strategy '{0}', expected sequential|column|row|parallel|sector_<N>")]
    InvalidStrategy(String),

    #[error("{0} requires an extra argument")]
    MissingArgument(&'static str),
}
