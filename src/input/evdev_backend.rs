use super::{InputBackend, RawEvent, MAX_AXES};
use crate::force_feedback::{RumbleEffect, RumbleSlot};
use evdev::raw_stream::RawDevice;
use evdev::{AbsInfo, InputEvent};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::os::fd::AsFd;
use std::path::Path;
use std::time::Duration;

fn raw_event(event: &InputEvent) -> RawEvent {
    RawEvent::new(event.event_type().0, event.code(), event.value())
}

/// Queue every record of one `read(2)`, in order, dropped-frame markers included.
///
/// An empty batch means the read returned zero bytes, i.e. the device went away.
fn queue_batch(
    pending: &mut VecDeque<RawEvent>,
    batch: impl IntoIterator<Item = RawEvent>,
) -> io::Result<()> {
    let before = pending.len();
    pending.extend(batch);
    if pending.len() == before {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "device returned no events",
        ));
    }
    Ok(())
}

/// evdev character device, e.g. `/dev/input/event7`.
///
/// Reads go through the raw stream so every kernel record counts as one sample.
pub struct EvdevBackend {
    device: Option<RawDevice>,
    abs_axes: HashMap<u16, AbsInfo>,
    rumble: Option<RumbleSlot>,
    pending: VecDeque<RawEvent>,
    read_timeout: Option<Duration>,
}

impl EvdevBackend {
    pub fn open(path: &Path) -> io::Result<Self> {
        let device = RawDevice::open(path)?;

        let abs_axes: HashMap<u16, AbsInfo> = match device.get_absinfo() {
            Ok(info) => info
                .filter(|(axis, _)| usize::from(axis.0) < MAX_AXES)
                .map(|(axis, info)| (axis.0, info))
                .collect(),
            Err(e) => {
                log::debug!("No absolute axis info for {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        Ok(Self {
            device: Some(device),
            abs_axes,
            rumble: None,
            pending: VecDeque::new(),
            read_timeout: None,
        })
    }

    /// Fail reads that see no event within `timeout` instead of blocking forever.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    fn device_mut(&mut self) -> io::Result<&mut RawDevice> {
        self.device
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "device is closed"))
    }

    fn rumble_mut(&mut self, effect_id: i16) -> io::Result<&mut RumbleSlot> {
        match self.rumble.as_mut() {
            Some(slot) if slot.id() == effect_id => Ok(slot),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no rumble effect with ID {effect_id}"),
            )),
        }
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<()> {
        let Some(device) = self.device.as_ref() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "device is closed"));
        };
        let mut fds = [PollFd::new(device.as_fd(), PollFlags::POLLIN)];
        let poll_timeout = PollTimeout::try_from(timeout).unwrap_or(PollTimeout::MAX);
        match poll(&mut fds, poll_timeout)? {
            0 => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no input within {} ms", timeout.as_millis()),
            )),
            _ => Ok(()),
        }
    }
}

impl InputBackend for EvdevBackend {
    fn name(&self) -> Option<String> {
        self.device.as_ref()?.name().map(str::to_string)
    }

    fn query_axis_range(&self, code: u16) -> Option<(i32, i32)> {
        self.abs_axes
            .get(&code)
            .map(|info| (info.minimum(), info.maximum()))
    }

    fn register_rumble_effect(&mut self) -> Option<i16> {
        let device = self.device.as_mut()?;
        match RumbleSlot::register(device) {
            Ok(slot) => {
                let id = slot.id();
                self.rumble = Some(slot);
                Some(id)
            }
            Err(e) => {
                log::debug!("Rumble registration rejected: {}", e);
                None
            }
        }
    }

    fn read_event(&mut self) -> io::Result<RawEvent> {
        while self.pending.is_empty() {
            if let Some(timeout) = self.read_timeout {
                self.wait_readable(timeout)?;
            }

            let device = self.device_mut()?;
            let batch: Vec<RawEvent> = device
                .fetch_events()?
                .map(|event| raw_event(&event))
                .collect();
            queue_batch(&mut self.pending, batch)?;
        }

        self.pending
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "device returned no events"))
    }

    fn update_rumble_effect(&mut self, effect_id: i16, effect: &RumbleEffect) -> io::Result<()> {
        self.rumble_mut(effect_id)?.update(effect)
    }

    fn play_effect(&mut self, effect_id: i16) -> io::Result<()> {
        self.rumble_mut(effect_id)?.play()
    }

    fn close(&mut self) {
        // Erase the effect while the device is still open
        self.rumble = None;
        self.pending.clear();
        if let Some(device) = self.device.take() {
            log::debug!("Closing {}", device.name().unwrap_or("device"));
        }
    }
}
