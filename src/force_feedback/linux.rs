use super::RumbleEffect;
use evdev::raw_stream::RawDevice;
use evdev::{FFEffect, FFEffectData, FFEffectKind, FFReplay, FFTrigger};
use std::io;

fn effect_data(effect: &RumbleEffect) -> FFEffectData {
    let (weak_magnitude, strong_magnitude) = effect.driver_magnitudes();
    FFEffectData {
        direction: 0,
        trigger: FFTrigger::default(),
        replay: FFReplay {
            length: effect.length_ms,
            delay: effect.delay_ms,
        },
        kind: FFEffectKind::Rumble {
            strong_magnitude,
            weak_magnitude,
        },
    }
}

/// A rumble effect uploaded to an evdev device.
///
/// The driver erases the slot when this is dropped, so it has to go before the device does.
pub struct RumbleSlot {
    effect: FFEffect,
}

impl RumbleSlot {
    pub fn register(device: &mut RawDevice) -> io::Result<Self> {
        let effect = device.upload_ff_effect(effect_data(&RumbleEffect::placeholder()))?;
        log::info!("Registered rumble effect with ID: {}", effect.id());
        Ok(Self { effect })
    }

    pub fn id(&self) -> i16 {
        self.effect.id() as i16
    }

    pub fn update(&mut self, effect: &RumbleEffect) -> io::Result<()> {
        self.effect.update(effect_data(effect))
    }

    /// Start playback once without waiting for it to finish.
    pub fn play(&mut self) -> io::Result<()> {
        self.effect.play(1)
    }
}
