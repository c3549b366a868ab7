mod decoder;
mod session;
#[cfg(target_os = "linux")]
pub mod evdev_backend;
#[cfg(test)]
pub(crate) mod mock;

pub use decoder::*;
pub use session::*;

use crate::force_feedback::RumbleEffect;
use serde::Serialize;
use std::io;

pub const MAX_BUTTONS: usize = 32;
pub const MAX_AXES: usize = 32;

// Linux input event types
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
pub const EV_FF: u16 = 0x15;

/// First joystick button code, maps to button index 0
pub const BTN_JOYSTICK: u16 = 0x120;
/// Axis codes at or above this one are not simple absolute axes
pub const ABS_TOOL_WIDTH: u16 = 0x1c;

const BUTTON_NAMES: [&str; MAX_BUTTONS] = [
    "TRIGGER", "THUMB", "THUMB2", "TOP", "TOP2", "PINKIE", "BASE", "BASE2",
    "BASE3", "BASE4", "BASE5", "BASE6", "", "", "", "DEAD",
    "SOUTH", "EAST", "C", "NORTH", "WEST", "Z", "TL", "TR",
    "TL2", "TR2", "SELECT", "START", "MODE", "THUMBL", "THUMBR", "",
];

const AXIS_NAMES: [&str; MAX_AXES] = [
    "X", "Y", "Z", "RX", "RY", "RZ", "THROTTLE", "RUDDER",
    "WHEEL", "GAS", "BRAKE", "", "", "", "", "",
    "HAT0X", "HAT0Y", "HAT1X", "HAT1Y", "HAT2X", "HAT2Y", "HAT3X", "HAT3Y",
    "PRESSURE", "DISTANCE", "TILT_X", "TILT_Y", "TOOL_WIDTH", "", "", "",
];

/// Symbolic name of a button index.
///
/// Slots without a name give `Some("")`, indices past the table give `None`.
pub fn button_name(index: usize) -> Option<&'static str> {
    BUTTON_NAMES.get(index).copied()
}

/// Symbolic name of an absolute axis code.
///
/// Codes without a name give `Some("")`, codes past the table give `None`.
pub fn axis_name(code: usize) -> Option<&'static str> {
    AXIS_NAMES.get(code).copied()
}

/// Calibration bounds and last normalized value of one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisState {
    pub min: i32,
    pub max: i32,
    /// -1.0 to 1.0 once an event for this axis has been decoded
    pub value: f32,
}

impl AxisState {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max, value: 0.0 }
    }

    /// Axes without a usable range are inert: their events are never normalized.
    pub fn is_calibrated(&self) -> bool {
        self.min != self.max
    }
}

/// One fixed-size record off the device: type, code and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self { event_type, code, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodedEvent {
    ButtonUpdate { index: usize, pressed: bool },
    AxisUpdate { index: usize, value: f32 },
    Ignored,
}

/// An axis that reported calibration bounds when the device was opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisDiscovery {
    pub index: usize,
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
}

/// Platform HID layer underneath a [`DeviceSession`].
///
/// Implementations own the OS handle; the session owns everything decoded from it.
pub trait InputBackend {
    /// Human readable device name, if the driver reports one.
    fn name(&self) -> Option<String>;

    /// Calibration bounds for an absolute axis code, `None` if the axis is not reported.
    fn query_axis_range(&self, code: u16) -> Option<(i32, i32)>;

    /// Register an empty rumble effect slot with the driver.
    fn register_rumble_effect(&mut self) -> Option<i16>;

    /// Block until the next raw event is available.
    fn read_event(&mut self) -> io::Result<RawEvent>;

    fn update_rumble_effect(&mut self, effect_id: i16, effect: &RumbleEffect) -> io::Result<()>;

    fn play_effect(&mut self, effect_id: i16) -> io::Result<()>;

    /// Release the handle. Called at most once per backend.
    fn close(&mut self);
}
