//! Game state and core simulation types
//!
//! Everything a play session needs lives in [`PlayingSession`]. The Playing
//! screen owns exactly one session and hands it by reference to every
//! subsystem; nothing here is global.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::powerups::{Freeze, PowerUpManager};
use super::rect::Rect;
use super::tick::TickInput;
use super::wave::{self, Banner};
use crate::settings::{BulletSettings, Settings};

/// Power-up kinds (both the falling pickup and the active buff)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Speed,
    Shield,
    DoubleShoot,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Speed,
        PowerUpKind::Shield,
        PowerUpKind::DoubleShoot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "speed",
            PowerUpKind::Shield => "shield",
            PowerUpKind::DoubleShoot => "double_shoot",
        }
    }
}

/// How the ship fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FiringVariant {
    /// One projectile from the nose
    #[default]
    Single,
    /// Two projectiles from the wing barrels
    Double,
}

impl FiringVariant {
    /// Maximum player projectiles in flight for this variant
    pub fn cap(&self, bullets: &BulletSettings) -> usize {
        match self {
            FiringVariant::Single => bullets.single_cap,
            FiringVariant::Double => bullets.double_cap,
        }
    }

    /// Projectiles spawned per shot
    pub fn volley_size(&self) -> usize {
        match self {
            FiringVariant::Single => 1,
            FiringVariant::Double => 2,
        }
    }
}

/// Side a projectile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fleet {
    Player,
    Enemy,
}

/// Shared horizontal heading of the alien fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FleetDirection {
    #[default]
    Right,
    Left,
}

impl FleetDirection {
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            FleetDirection::Right => 1.0,
            FleetDirection::Left => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            FleetDirection::Right => FleetDirection::Left,
            FleetDirection::Left => FleetDirection::Right,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub rect: Rect,
    /// Pixels moved per tick while a direction is held
    pub speed: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub base_acceleration: f32,
    pub speed_boost_active: bool,
    pub shield_active: bool,
    pub firing_variant: FiringVariant,
    /// Seconds left on the pickup flash animation
    pub pickup_flash: f32,
    /// Seconds since the shield was raised (drives the pulse rings)
    pub shield_phase: f32,
    /// Seconds until the next speed-trail ghost
    trail_timer: f32,
    trail_interval: f32,
}

impl Ship {
    pub fn new(settings: &Settings) -> Self {
        let ship = &settings.ship;
        let midbottom = Vec2::new(
            settings.screen.width / 2.0,
            settings.screen.height - ship.bottom_margin,
        );
        Self {
            rect: Rect::from_midbottom(midbottom, ship.size),
            speed: ship.base_speed,
            base_speed: ship.base_speed,
            max_speed: ship.max_speed,
            acceleration: ship.acceleration,
            base_acceleration: ship.acceleration,
            speed_boost_active: false,
            shield_active: false,
            firing_variant: FiringVariant::Single,
            pickup_flash: 0.0,
            shield_phase: 0.0,
            trail_timer: 0.0,
            trail_interval: ship.trail_interval,
        }
    }

    /// Advance one tick: speed ramp, movement, effect timers.
    ///
    /// Returns the position for a speed-trail ghost when one is due.
    pub fn update(&mut self, input: &TickInput, screen_width: f32, dt: f32) -> Option<Vec2> {
        if self.speed_boost_active && self.speed < self.max_speed {
            self.speed = (self.speed + self.acceleration).min(self.max_speed);
        }

        if input.move_left_held && !input.move_right_held {
            self.rect.pos.x -= self.speed;
        } else if input.move_right_held && !input.move_left_held {
            self.rect.pos.x += self.speed;
        }
        self.rect.clamp_x(0.0, screen_width);

        if self.shield_active {
            self.shield_phase += dt;
        }
        self.update_pickup_flash(dt);

        if !self.speed_boost_active {
            return None;
        }
        self.trail_timer -= dt;
        if self.trail_timer <= 0.0 {
            self.trail_timer = self.trail_interval;
            Some(self.rect.center())
        } else {
            None
        }
    }

    /// Advance only the pickup flash (the one thing that runs during a freeze)
    pub fn update_pickup_flash(&mut self, dt: f32) {
        self.pickup_flash = (self.pickup_flash - dt).max(0.0);
    }

    /// Spawn points (projectile midbottoms) for one volley
    pub fn muzzles(&self, bullets: &BulletSettings) -> Vec<Vec2> {
        let center = self.rect.center();
        match self.firing_variant {
            FiringVariant::Single => vec![Vec2::new(center.x, self.rect.top())],
            FiringVariant::Double => vec![
                Vec2::new(center.x - bullets.double_offset, center.y),
                Vec2::new(center.x + bullets.double_offset, center.y),
            ],
        }
    }

    pub fn start_speed_boost(&mut self, boost_acceleration: f32, impulse: f32) {
        self.speed_boost_active = true;
        self.acceleration = boost_acceleration;
        self.speed = (self.speed + impulse).min(self.max_speed);
        self.trail_timer = 0.0;
    }

    /// Restore base speed and acceleration exactly
    pub fn end_speed_boost(&mut self) {
        self.speed_boost_active = false;
        self.acceleration = self.base_acceleration;
        self.speed = self.base_speed;
    }

    pub fn set_shield(&mut self, active: bool) {
        self.shield_active = active;
        self.shield_phase = 0.0;
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub rect: Rect,
    /// Pixels per tick (negative = up)
    pub vel_y: f32,
    pub owner: Fleet,
}

impl Projectile {
    pub fn new(id: u32, midbottom: Vec2, size: Vec2, speed: f32, owner: Fleet) -> Self {
        let vel_y = match owner {
            Fleet::Player => -speed,
            Fleet::Enemy => speed,
        };
        Self {
            id,
            rect: Rect::from_midbottom(midbottom, size),
            vel_y,
            owner,
        }
    }

    /// Move one tick; false once it has left the screen
    pub fn update(&mut self, screen_height: f32) -> bool {
        self.rect.pos.y += self.vel_y;
        self.rect.bottom() >= 0.0 && self.rect.top() <= screen_height
    }
}

/// An alien in the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub rect: Rect,
    pub spawn_pos: Vec2,
    /// Horizontal pixels per tick
    pub speed_x: f32,
    /// Seconds left in the spawn animation
    pub spawn_timer: f32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, size: Vec2, speed_x: f32, spawn_duration: f32) -> Self {
        Self {
            id,
            rect: Rect::new(pos, size),
            spawn_pos: pos,
            speed_x,
            spawn_timer: spawn_duration,
        }
    }

    /// Still materialising: pinned in place and cannot be hit
    #[inline]
    pub fn is_spawning(&self) -> bool {
        self.spawn_timer > 0.0
    }

    pub fn update(&mut self, direction: FleetDirection, dt: f32) {
        if self.is_spawning() {
            self.spawn_timer = (self.spawn_timer - dt).max(0.0);
            self.rect.pos = self.spawn_pos;
            return;
        }
        self.rect.pos.x += self.speed_x * direction.sign();
    }

    /// Shift down (fleet drop); the spawn anchor moves too so a pinned
    /// alien does not snap back up
    pub fn drop_by(&mut self, dy: f32) {
        self.rect.pos.y += dy;
        self.spawn_pos.y += dy;
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PowerUpKind,
    pub rect: Rect,
    pub fall_speed: f32,
}

impl Pickup {
    pub fn new(id: u32, kind: PowerUpKind, center: Vec2, size: Vec2, fall_speed: f32) -> Self {
        Self {
            id,
            kind,
            rect: Rect::from_center(center, size),
            fall_speed,
        }
    }

    /// Fall one tick; false once the top edge passes the screen bottom
    pub fn update(&mut self, screen_height: f32) -> bool {
        self.rect.pos.y += self.fall_speed;
        self.rect.top() <= screen_height
    }
}

/// Transient effect kinds. They carry timing only, the look is the renderer's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Explosion,
    ScoreUp { points: u64 },
    SpeedTrail,
}

impl EffectKind {
    fn initial_alpha(&self) -> i32 {
        match self {
            EffectKind::SpeedTrail => 200,
            _ => 255,
        }
    }

    fn fade_per_tick(&self) -> i32 {
        match self {
            EffectKind::Explosion => 60,
            EffectKind::ScoreUp { .. } => 15,
            EffectKind::SpeedTrail => 10,
        }
    }
}

/// Score popups drift upward this many pixels per tick
const SCORE_UP_RISE: f32 = 2.0;

/// A fading placeholder (explosion, score popup, speed trail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub alpha: i32,
}

impl VisualEffect {
    pub fn new(kind: EffectKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            alpha: kind.initial_alpha(),
        }
    }

    /// Fade one tick; false once fully transparent
    pub fn update(&mut self) -> bool {
        if let EffectKind::ScoreUp { .. } = self.kind {
            self.pos.y -= SCORE_UP_RISE;
        }
        self.alpha = (self.alpha - self.kind.fade_per_tick()).max(0);
        self.alpha > 0
    }
}

/// Parallax scroll speeds of the star layers (pixels per tick)
pub const BACKGROUND_LAYER_SPEEDS: [f32; 4] = [0.5, 0.3, 0.6, 1.2];

/// Scrolling starfield. Each layer is drawn twice, `height` apart, so it tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub offsets: [f32; 4],
    height: f32,
}

impl Background {
    pub fn new(height: f32) -> Self {
        Self {
            offsets: [0.0; 4],
            height,
        }
    }

    pub fn update(&mut self) {
        for (offset, speed) in self.offsets.iter_mut().zip(BACKGROUND_LAYER_SPEEDS) {
            *offset = (*offset + speed) % self.height;
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Shot { projectiles: usize },
    EnemyDestroyed { pos: Vec2, points: u64 },
    PowerUpDropped { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpActivated { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    LevelCleared { level: u32 },
    WaveFailed { lives_left: u32 },
    BannerStarted { text: String },
    GameOver { win: bool },
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub win: bool,
    pub score: u64,
    pub level: u32,
}

/// All state for one play session
pub struct PlayingSession {
    pub settings: Settings,
    pub ship: Ship,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<Pickup>,
    pub effects: Vec<VisualEffect>,
    pub fleet_direction: FleetDirection,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Blocking level/wave announcement
    pub banner: Option<Banner>,
    /// Post-pickup freeze
    pub freeze: Option<Freeze>,
    pub paused: bool,
    pub powerups: PowerUpManager,
    pub background: Background,
    /// Fully-ticked frames (drives the buff clock)
    pub time_ticks: u64,
    /// Set once the session has ended
    pub outcome: Option<Outcome>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Box<dyn RngCore>,
    next_id: u32,
}

impl PlayingSession {
    /// New session with a seeded PCG generator
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_rng(settings, Pcg32::seed_from_u64(seed))
    }

    /// New session drawing randomness from `rng`
    pub fn with_rng(settings: Settings, rng: impl RngCore + 'static) -> Self {
        let mut session = Self {
            ship: Ship::new(&settings),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            pickups: Vec::new(),
            effects: Vec::new(),
            fleet_direction: FleetDirection::Right,
            score: 0,
            lives: settings.player.lives,
            level: settings.player.start_level.max(1),
            banner: None,
            freeze: None,
            paused: false,
            powerups: PowerUpManager::default(),
            background: Background::new(settings.screen.height),
            time_ticks: 0,
            outcome: None,
            events: Vec::new(),
            rng: Box::new(rng),
            next_id: 1,
            settings,
        };
        wave::create_fleet(&mut session);
        log::info!(
            "Session started: level {}, {} lives, {} aliens",
            session.level,
            session.lives,
            session.enemies.len()
        );
        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        log::trace!("event: {event:?}");
        self.events.push(event);
    }

    /// Take all events raised so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Buff clock: simulation seconds over fully-ticked frames
    pub fn clock(&self) -> f32 {
        (self.time_ticks as f64 * f64::from(self.settings.screen.tick_dt())) as f32
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// True while gameplay ticking is suspended (pause, freeze or banner)
    pub fn is_suspended(&self) -> bool {
        self.paused || self.freeze.is_some() || self.banner.is_some()
    }

    pub fn player_projectile_count(&self) -> usize {
        self.projectiles
            .iter()
            .filter(|p| p.owner == Fleet::Player)
            .count()
    }

    /// Fire a volley if the in-flight cap allows it. Returns projectiles spawned
    pub fn fire(&mut self) -> usize {
        let variant = self.ship.firing_variant;
        let cap = variant.cap(&self.settings.bullet);
        let in_flight = self.player_projectile_count();
        if in_flight + variant.volley_size() > cap {
            log::debug!("Shot refused: {in_flight}/{cap} in flight");
            return 0;
        }

        let muzzles = self.ship.muzzles(&self.settings.bullet);
        let (size, speed) = (self.settings.bullet.size, self.settings.bullet.speed);
        for midbottom in &muzzles {
            let id = self.next_entity_id();
            self.projectiles
                .push(Projectile::new(id, *midbottom, size, speed, Fleet::Player));
        }
        self.push_event(GameEvent::Shot {
            projectiles: muzzles.len(),
        });
        muzzles.len()
    }

    /// Keep collections sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.enemies.sort_by_key(|e| e.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}

impl std::fmt::Debug for PlayingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayingSession")
            .field("level", &self.level)
            .field("lives", &self.lives)
            .field("score", &self.score)
            .field("enemies", &self.enemies.len())
            .field("projectiles", &self.projectiles.len())
            .field("pickups", &self.pickups.len())
            .field("paused", &self.paused)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
