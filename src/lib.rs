//! Mars Invaders - a fixed-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, power-ups, waves)
//! - `game`: Top-level screen state machine (menu, playing, game over)
//! - `renderer`: Draw-call sink and scene/HUD composition
//! - `audio`: Sound effect and music sink
//! - `platform`: Key decoding and frame timing
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Settings, SettingsError};

/// Game loop constants
pub mod consts {
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame time fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
