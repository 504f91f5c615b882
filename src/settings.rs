//! Game settings and tuning
//!
//! Every gameplay constant lives here so the simulation stays data-driven.
//! Settings are plain serde structs; any section or field missing from a
//! JSON file falls back to the defaults below.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors raised while loading settings from disk
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Window geometry and frame rate (injected, never computed by the sim)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fps: 60,
        }
    }
}

impl ScreenSettings {
    /// Fixed simulation timestep in seconds
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Player progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Spare lives at the start of a run
    pub lives: u32,
    /// Lives the HUD reserves slots for
    pub max_lives: u32,
    pub start_level: u32,
    /// Clearing this level wins the run (None = endless)
    pub final_level: Option<u32>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            lives: 3,
            max_lives: 5,
            start_level: 1,
            final_level: None,
        }
    }
}

/// Player ship movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipSettings {
    pub size: Vec2,
    /// Gap between the ship's bottom edge and the screen bottom
    pub bottom_margin: f32,
    /// Pixels per tick
    pub base_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// Acceleration while the speed buff is active
    pub boost_acceleration: f32,
    /// Instant speed bump applied when the speed buff starts
    pub boost_impulse: f32,
    /// Seconds between speed-trail ghosts
    pub trail_interval: f32,
}

impl Default for ShipSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(56.0, 48.0),
            bottom_margin: 20.0,
            base_speed: 5.0,
            max_speed: 12.0,
            acceleration: 0.2,
            boost_acceleration: 0.5,
            boost_impulse: 3.0,
            trail_interval: 0.05,
        }
    }
}

/// Player projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletSettings {
    pub size: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// In-flight cap for the single-shot variant
    pub single_cap: usize,
    /// In-flight cap for the double-shot variant
    pub double_cap: usize,
    /// Horizontal offset of each double-shot barrel from the ship centre
    pub double_offset: f32,
}

impl Default for BulletSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(5.0, 15.0),
            speed: 7.0,
            single_cap: 3,
            double_cap: 10,
            double_offset: 18.0,
        }
    }
}

/// Alien fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlienSettings {
    pub size: Vec2,
    pub rows: u32,
    pub cols: u32,
    /// Top-left of the first grid cell
    pub origin: Vec2,
    /// Gap added to the sprite size between grid cells
    pub gap: f32,
    /// Horizontal pixels per tick at level 1
    pub base_speed_x: f32,
    /// Extra horizontal speed per level above 1
    pub speedup_scale: f32,
    /// Fleet drop on edge contact
    pub drop_speed: f32,
    pub points: u64,
    /// Seconds an alien stays pinned and untouchable after spawning
    pub spawn_duration: f32,
}

impl Default for AlienSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(48.0, 36.0),
            rows: 4,
            cols: 6,
            origin: Vec2::new(100.0, 50.0),
            gap: 20.0,
            base_speed_x: 1.0,
            speedup_scale: 0.2,
            drop_speed: 20.0,
            points: 50,
            spawn_duration: 0.7,
        }
    }
}

impl AlienSettings {
    /// Widest grid whose spawn position stays clear of both screen edges
    pub fn max_cols(&self, screen_width: f32) -> u32 {
        let room = screen_width - self.origin.x - self.size.x;
        if self.origin.x <= 0.0 || room <= 0.0 {
            return 0;
        }
        let spacing = (self.size.x + self.gap).max(1.0);
        (room / spacing).ceil() as u32
    }

    /// Bottom edge of the lowest row at spawn
    pub fn fleet_bottom(&self) -> f32 {
        let rows = self.rows.max(1) as f32;
        self.origin.y + rows * self.size.y + (rows - 1.0) * self.gap
    }
}

/// Power-up drops and buffs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpSettings {
    pub size: Vec2,
    /// Falling pixels per tick
    pub fall_speed: f32,
    /// Drop chance in percent per destroyed alien
    pub drop_chance: u32,
    /// Buff duration in seconds
    pub duration: f32,
    /// Gameplay freeze after a pickup, in seconds
    pub freeze_duration: f32,
    /// Length of the ship's pickup flash, in seconds
    pub pickup_animation: f32,
}

impl Default for PowerUpSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(40.0, 40.0),
            fall_speed: 2.0,
            drop_chance: 5,
            duration: 10.0,
            freeze_duration: 0.5,
            pickup_animation: 0.7,
        }
    }
}

/// Audio mix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

/// All game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen: ScreenSettings,
    pub player: PlayerSettings,
    pub ship: ShipSettings,
    pub bullet: BulletSettings,
    pub alien: AlienSettings,
    pub powerup: PowerUpSettings,
    pub audio: AudioSettings,
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject layouts the simulation cannot play: the fleet must spawn
    /// clear of both side edges and above the ship
    pub fn validate(&self) -> Result<(), SettingsError> {
        let alien = &self.alien;
        if alien.size.x <= 0.0 || alien.size.y <= 0.0 {
            return Err(SettingsError::Invalid("alien size must be positive".into()));
        }
        if alien.rows == 0 || alien.cols == 0 {
            return Err(SettingsError::Invalid("alien grid is empty".into()));
        }
        let max_cols = alien.max_cols(self.screen.width);
        if alien.cols > max_cols {
            return Err(SettingsError::Invalid(format!(
                "{} alien columns do not fit a {}px screen (max {max_cols})",
                alien.cols, self.screen.width
            )));
        }
        let ship_top = self.screen.height - self.ship.bottom_margin - self.ship.size.y;
        if alien.fleet_bottom() >= ship_top {
            return Err(SettingsError::Invalid(format!(
                "alien fleet reaches y={} at spawn, ship top is {ship_top}",
                alien.fleet_bottom()
            )));
        }
        Ok(())
    }

    /// Serialize settings as pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_arcade_constants() {
        let s = Settings::default();
        assert_eq!(s.screen.width, 800.0);
        assert_eq!(s.screen.height, 600.0);
        assert_eq!(s.screen.fps, 60);
        assert_eq!(s.bullet.single_cap, 3);
        assert_eq!(s.bullet.double_cap, 10);
        assert_eq!(s.alien.points, 50);
        assert_eq!(s.alien.rows * s.alien.cols, 24);
        assert_eq!(s.powerup.drop_chance, 5);
        assert_eq!(s.powerup.duration, 10.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "player": { "lives": 1 }, "alien": { "points": 75 } }"#)
            .unwrap();
        assert_eq!(s.player.lives, 1);
        assert_eq!(s.player.start_level, 1);
        assert_eq!(s.alien.points, 75);
        assert_eq!(s.alien.drop_speed, 20.0);
        assert_eq!(s.ship.base_speed, 5.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::default();
        s.player.final_level = Some(5);
        let json = s.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.player.final_level, Some(5));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let s = Settings::load_or_default(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(s.player.lives, 3);
        assert!(matches!(
            Settings::load("/definitely/not/here.json"),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_grid_wider_than_screen_is_rejected() {
        assert_eq!(AlienSettings::default().max_cols(800.0), 10);
        assert!(Settings::from_json(r#"{ "alien": { "cols": 10 } }"#).is_ok());

        let err = Settings::from_json(r#"{ "alien": { "cols": 11 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let err = Settings::from_json(r#"{ "alien": { "origin": [0.0, 50.0] } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_grid_reaching_ship_is_rejected() {
        assert!(Settings::default().validate().is_ok());
        let err = Settings::from_json(r#"{ "alien": { "rows": 9 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_tick_dt() {
        let s = ScreenSettings::default();
        assert!((s.tick_dt() - 1.0 / 60.0).abs() < 1e-6);
    }
}
