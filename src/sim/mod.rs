//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod powerups;
pub mod rect;
pub mod state;
pub mod tick;
pub mod wave;

pub use autopilot::Autopilot;
pub use collision::{Hit, check_pickup_collisions, check_projectile_hits, roll_drop};
pub use powerups::{ActiveBuff, Freeze, PowerUpManager};
pub use rect::Rect;
pub use state::{
    BACKGROUND_LAYER_SPEEDS, Background, EffectKind, Enemy, FiringVariant, Fleet,
    FleetDirection, GameEvent, Outcome, Pickup, PlayingSession, PowerUpKind, Projectile, Ship,
    VisualEffect,
};
pub use tick::{TickInput, TickPhase, tick};
pub use wave::{Banner, BannerPhase};
