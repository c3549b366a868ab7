use super::{
    axis_name, button_name, decode, AxisDiscovery, AxisState, DecodedEvent, InputBackend, MAX_AXES, MAX_BUTTONS,
};
use crate::error::DeviceError;
use crate::force_feedback::{RumbleCapability, RumbleEffect};

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "device"
    } else {
        name
    }
}

/// An open joystick and the last known state of its buttons and axes.
///
/// The session exclusively owns the backend handle. It is released by [`close`](Self::close)
/// or, failing that, when the session is dropped.
pub struct DeviceSession<B: InputBackend> {
    backend: B,
    connected: bool,
    name: String,
    buttons: [bool; MAX_BUTTONS],
    axes: [AxisState; MAX_AXES],
    rumble: Option<RumbleCapability>,
}

#[cfg(target_os = "linux")]
impl DeviceSession<super::evdev_backend::EvdevBackend> {
    /// Open an evdev device, calling `on_axis` for every axis that reports bounds.
    pub fn open(
        path: &std::path::Path,
        read_timeout: Option<std::time::Duration>,
        on_axis: impl FnMut(&AxisDiscovery),
    ) -> Result<Self, DeviceError> {
        let backend = super::evdev_backend::EvdevBackend::open(path)
            .map_err(|source| DeviceError::OpenFailed {
                path: path.to_path_buf(),
                source,
            })?
            .with_read_timeout(read_timeout);

        let session = Self::attach(backend, on_axis);
        log::info!("Opened {} ({})", path.display(), session.name());
        Ok(session)
    }
}

impl<B: InputBackend> DeviceSession<B> {
    /// Build a session on an already opened backend: read the name, discover axis
    /// calibration and try to reserve a rumble slot.
    pub fn attach(mut backend: B, mut on_axis: impl FnMut(&AxisDiscovery)) -> Self {
        let name = backend.name().unwrap_or_default();

        let mut axes = [AxisState::default(); MAX_AXES];
        for (index, axis) in axes.iter_mut().enumerate() {
            let Some((min, max)) = backend.query_axis_range(index as u16) else {
                continue;
            };
            *axis = AxisState::new(min, max);

            let discovery = AxisDiscovery {
                index,
                name: axis_name(index).unwrap_or_default(),
                min,
                max,
            };
            log::debug!("Axis {} ({}) range {}..={}", index, discovery.name, min, max);
            if !axis.is_calibrated() {
                log::warn!("Axis {} reports an empty range and will be ignored", index);
            }
            on_axis(&discovery);
        }

        let rumble = backend
            .register_rumble_effect()
            .map(|effect_id| RumbleCapability { effect_id });
        match rumble {
            Some(capability) => log::info!("Rumble supported, effect ID {}", capability.effect_id),
            None => log::info!("Rumble not supported by {}", display_name(&name)),
        }

        Self {
            backend,
            connected: true,
            name,
            buttons: [false; MAX_BUTTONS],
            axes,
            rumble,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn rumble(&self) -> Option<RumbleCapability> {
        self.rumble
    }

    pub fn button(&self, index: usize) -> Option<bool> {
        self.buttons.get(index).copied()
    }

    pub fn axis(&self, index: usize) -> Option<&AxisState> {
        self.axes.get(index)
    }

    /// Last normalized value of an axis, 0.0 for unknown codes.
    pub fn axis_value(&self, index: usize) -> f32 {
        self.axis(index).map(|axis| axis.value).unwrap_or_default()
    }

    /// Block for the next event, decode it and apply it to the state snapshot.
    pub fn read(&mut self) -> Result<DecodedEvent, DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }

        let raw = self.backend.read_event().map_err(|e| {
            log::error!("Read from {} failed: {}", self.name, e);
            DeviceError::ReadFailed(e)
        })?;

        let decoded = decode(&raw, &self.axes);
        match decoded {
            DecodedEvent::ButtonUpdate { index, pressed } => {
                if let Some(button) = self.buttons.get_mut(index) {
                    *button = pressed;
                    log::trace!(
                        "Button {} ({}) {}",
                        index,
                        button_name(index).unwrap_or_default(),
                        if pressed { "pressed" } else { "released" }
                    );
                }
            }
            DecodedEvent::AxisUpdate { index, value } => {
                if let Some(axis) = self.axes.get_mut(index) {
                    axis.value = value;
                }
            }
            DecodedEvent::Ignored => {}
        }
        Ok(decoded)
    }

    /// Play a 5 second rumble. Does nothing without rumble support; driver errors are
    /// logged and dropped.
    pub fn set_rumble(&mut self, weak_magnitude: i16, strong_magnitude: i16) {
        if !self.connected {
            return;
        }
        let Some(RumbleCapability { effect_id }) = self.rumble else {
            return;
        };

        let effect = RumbleEffect::timed(weak_magnitude, strong_magnitude);
        if let Err(e) = self.backend.update_rumble_effect(effect_id, &effect) {
            log::warn!("Failed to update rumble effect {}: {}", effect_id, e);
        }
        if let Err(e) = self.backend.play_effect(effect_id) {
            log::warn!("Failed to play rumble effect {}: {}", effect_id, e);
        }
    }

    /// Release the device. Safe to call more than once.
    pub fn close(&mut self) {
        if !self.connected {
            return;
        }
        self.backend.close();
        self.rumble = None;
        self.connected = false;
        log::debug!("Closed {}", display_name(&self.name));
    }
}

impl<B: InputBackend> Drop for DeviceSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}
