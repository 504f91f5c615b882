//! Audio system
//!
//! The game never talks to a sound device directly. It asks an [`AudioSink`]
//! to play named effects and music tracks; the [`AudioManager`] in front of
//! it applies volume and mute settings and keeps track of the current song.

use crate::settings::AudioSettings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Menu confirm
    ButtonClick,
    /// Alien destroyed
    Explosion,
    /// Ship fired
    Shoot,
    /// Level or wave banner
    LevelUp,
    /// Pickup collected
    PowerUp,
    GameOver,
}

impl SoundEffect {
    /// Asset name of the effect
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::ButtonClick => "button_click",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Shoot => "shoot",
            SoundEffect::LevelUp => "level_up",
            SoundEffect::PowerUp => "power_up",
            SoundEffect::GameOver => "game_over",
        }
    }

    /// Effect to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot { .. } => Some(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
            GameEvent::BannerStarted { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Title,
    Gameplay,
}

impl MusicTrack {
    pub fn name(&self) -> &'static str {
        match self {
            MusicTrack::Title => "title",
            MusicTrack::Gameplay => "gameplay",
        }
    }
}

/// Backend that actually makes noise. Best effort: failures are the
/// backend's business and never reach the game.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn stop_music(&mut self);
}

/// Silent backend
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn play_music(&mut self, _track: MusicTrack, _volume: f32) {}
    fn stop_music(&mut self) {}
}

/// Backend that only logs what it would play (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {} @ {volume:.2}", effect.name());
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::info!("music {} @ {volume:.2}", track.name());
    }

    fn stop_music(&mut self) {
        log::info!("music stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_music: Option<MusicTrack>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio), &AudioSettings::default())
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>, settings: &AudioSettings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            current_music: None,
        }
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Start a music track unless it is already the one playing
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.current_music == Some(track) {
            return;
        }
        self.current_music = Some(track);
        let vol = self.effective_volume(self.music_volume);
        self.sink.play_music(track, vol);
    }

    pub fn stop_music(&mut self) {
        if self.current_music.take().is_some() {
            self.sink.stop_music();
        }
    }

    pub fn current_music(&self) -> Option<MusicTrack> {
        self.current_music
    }

    /// Play whatever the simulation events call for
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("music_volume", &self.music_volume)
            .field("muted", &self.muted)
            .field("current_music", &self.current_music)
            .finish_non_exhaustive()
    }
}
