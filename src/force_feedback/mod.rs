#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::RumbleSlot;

/// Playback length of every rumble we trigger
pub const RUMBLE_LENGTH_MS: u16 = 5000;

/// A force feedback slot the driver accepted at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RumbleCapability {
    pub effect_id: i16,
}

/// Parameters of a rumble effect upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RumbleEffect {
    pub weak_magnitude: i16,
    pub strong_magnitude: i16,
    pub length_ms: u16,
    pub delay_ms: u16,
}

impl RumbleEffect {
    /// The empty effect used to reserve a slot.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// A single fixed-length rumble, starting immediately.
    pub fn timed(weak_magnitude: i16, strong_magnitude: i16) -> Self {
        Self {
            weak_magnitude,
            strong_magnitude,
            length_ms: RUMBLE_LENGTH_MS,
            delay_ms: 0,
        }
    }

    /// Magnitudes as the driver sees them (the kernel fields are unsigned).
    pub fn driver_magnitudes(&self) -> (u16, u16) {
        (self.weak_magnitude as u16, self.strong_magnitude as u16)
    }
}
