use std::io;
use std::path::PathBuf;

/// Failures of an open or opening device session.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Failed to open joystick at {}: {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read joystick input: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("Device session is closed")]
    NotConnected,
}

/// Invalid command line input, detected before any device is touched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Axis code {0} is outside the tracked range 0..{max}", max = crate::input::MAX_AXES)]
    InvalidAxis(usize),

    #[error("Tracked axes must differ, got {0} twice")]
    DuplicateAxis(usize),

    #[error("Failed to parse rumble magnitudes {0:?}, expected <weak>,<strong>")]
    InvalidRumble(String),
}

/// Why a measuring run stopped early.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("Failed to write report: {0}")]
    Output(#[from] io::Error),
}
