//! Joystick polling-rate measurement on top of evdev.
//!
//! [`input::DeviceSession`] owns an open device and decodes its events into button and
//! axis state, [`rate::RateTracker`] turns samples into rates, and [`app::run`] drives
//! the two and hands reports to a [`app::ReportSink`].

pub mod app;
pub mod config;
pub mod error;
pub mod force_feedback;
pub mod input;
pub mod rate;

pub use error::{ConfigError, DeviceError, RunError};
pub use input::{DecodedEvent, DeviceSession, InputBackend};
pub use rate::{RateReport, RateTracker};
