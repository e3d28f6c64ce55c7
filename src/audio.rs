//! Sound effects
//!
//! The simulation only emits `GameEvent`s. This module maps them to sound
//! effects of the active theme and forwards them to a platform mixer behind
//! the `AudioSink` trait.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Looping background track
    Music,
    /// Salmon hit by a turtle
    SalmonDead,
    /// Salmon ate a fish
    SalmonEat,
    /// Pebble shot in shooting mode
    PebbleShot,
}

/// Sound bank selection; shooting mode swaps to the alternate bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundTheme {
    #[default]
    Default,
    Alternate,
}

impl SoundTheme {
    /// Audio file backing an effect in this theme
    pub fn file(&self, effect: SoundEffect) -> &'static str {
        match (self, effect) {
            (SoundTheme::Default, SoundEffect::Music) => "music.wav",
            (SoundTheme::Default, SoundEffect::SalmonDead) => "salmon_dead.wav",
            (SoundTheme::Default, SoundEffect::SalmonEat) => "salmon_eat.wav",
            (SoundTheme::Alternate, SoundEffect::Music) => "music2.wav",
            (SoundTheme::Alternate, SoundEffect::SalmonDead) => "dead.wav",
            (SoundTheme::Alternate, SoundEffect::SalmonEat) => "eat.wav",
            (_, SoundEffect::PebbleShot) => "pebble.wav",
        }
    }
}

/// Platform mixer
pub trait AudioSink {
    fn play(&mut self, file: &str, volume: f32, looping: bool);
}

/// Sink that only logs what would be played
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: Vec<String>,
}

impl AudioSink for LogAudio {
    fn play(&mut self, file: &str, volume: f32, looping: bool) {
        log::debug!("play {} (volume {:.2}, looping {})", file, volume, looping);
        self.played.push(file.to_string());
    }
}

/// Sound effect for a simulation event, if it has one
pub fn sound_for_event(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::SalmonDied => Some(SoundEffect::SalmonDead),
        GameEvent::FishEaten => Some(SoundEffect::SalmonEat),
        GameEvent::PebbleShot => Some(SoundEffect::PebbleShot),
        GameEvent::ThemeChanged | GameEvent::WorldReset => Some(SoundEffect::Music),
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect from the given theme
    pub fn play(&mut self, effect: SoundEffect, theme: SoundTheme) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let looping = effect == SoundEffect::Music;
        self.sink.play(theme.file(effect), vol, looping);
    }

    /// Play the sounds for a batch of tick events
    pub fn dispatch(&mut self, events: &[GameEvent], theme: SoundTheme) {
        for effect in events.iter().filter_map(sound_for_event) {
            self.play(effect, theme);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
