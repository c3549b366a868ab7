use super::{AxisState, DecodedEvent, RawEvent, ABS_TOOL_WIDTH, BTN_JOYSTICK, EV_ABS, EV_KEY, MAX_BUTTONS};

/// Map a raw sample from `[min, max]` onto `[-1, 1]`.
///
/// Callers must make sure `min != max`.
pub fn normalize(raw_value: i32, min: i32, max: i32) -> f32 {
    let range = max as f64 - min as f64;
    ((raw_value as f64 - min as f64) / range * 2.0 - 1.0) as f32
}

/// Classify a raw event against the calibration table. Pure, no I/O.
pub fn decode(event: &RawEvent, axes: &[AxisState]) -> DecodedEvent {
    match event.event_type {
        EV_KEY => {
            let Some(index) = event.code.checked_sub(BTN_JOYSTICK).map(usize::from) else {
                return DecodedEvent::Ignored;
            };
            if index >= MAX_BUTTONS {
                return DecodedEvent::Ignored;
            }
            DecodedEvent::ButtonUpdate {
                index,
                pressed: event.value != 0,
            }
        }
        EV_ABS if event.code < ABS_TOOL_WIDTH => {
            let index = usize::from(event.code);
            match axes.get(index) {
                Some(axis) if axis.is_calibrated() => DecodedEvent::AxisUpdate {
                    index,
                    value: normalize(event.value, axis.min, axis.max),
                },
                // Never calibrated at open, stays inert
                _ => DecodedEvent::Ignored,
            }
        }
        _ => DecodedEvent::Ignored,
    }
}
