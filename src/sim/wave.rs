//! Wave and level control
//!
//! Fleet formation, the fleet-wide edge drop, level clears, failed waves and
//! the blocking banner that announces each new formation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, FleetDirection, GameEvent, Outcome, PlayingSession};
use crate::settings::AlienSettings;

/// Banner text size when it slams in
const BANNER_SIZE_START: f32 = 300.0;
/// Size at which the impact phase ends
const BANNER_SIZE_IMPACT: f32 = 90.0;
/// Resting size before the fade
const BANNER_SIZE_END: f32 = 60.0;
const BANNER_IMPACT_RATE: f32 = 0.3;
const BANNER_SHRINK_RATE: f32 = 0.01;
const BANNER_FADE_PER_TICK: i32 = 5;

/// Animation phase of a banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerPhase {
    /// Fast shrink from the start size
    Impact,
    /// Slow settle to the resting size
    Settle,
    /// Fading out at resting size
    Fade,
    Finished,
}

/// A blocking "Level N" / "Wave N" announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    /// Current text size in points
    pub size: f32,
    /// 0-255
    pub opacity: i32,
    pub phase: BannerPhase,
}

impl Banner {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: BANNER_SIZE_START,
            opacity: 255,
            phase: BannerPhase::Impact,
        }
    }

    /// Advance the animation one tick
    pub fn update(&mut self) {
        match self.phase {
            BannerPhase::Impact => {
                if self.size > BANNER_SIZE_IMPACT {
                    self.size -= ((self.size - BANNER_SIZE_IMPACT) * BANNER_IMPACT_RATE).max(1.0);
                } else {
                    self.phase = BannerPhase::Settle;
                }
            }
            BannerPhase::Settle => {
                if self.size > BANNER_SIZE_END {
                    self.size -= ((self.size - BANNER_SIZE_END) * BANNER_SHRINK_RATE).max(0.5);
                } else {
                    self.phase = BannerPhase::Fade;
                }
            }
            BannerPhase::Fade => {
                self.opacity -= BANNER_FADE_PER_TICK;
                if self.opacity <= 0 {
                    self.opacity = 0;
                    self.phase = BannerPhase::Finished;
                }
            }
            BannerPhase::Finished => {}
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BannerPhase::Finished
    }
}

/// Top-left corners of every cell in the fleet grid, row by row.
///
/// Columns past the right screen edge are dropped; at least one is kept.
pub fn fleet_layout(alien: &AlienSettings, screen_width: f32) -> Vec<Vec2> {
    let spacing = alien.size + Vec2::splat(alien.gap);
    let cols = alien.cols.min(alien.max_cols(screen_width)).max(1);
    if cols < alien.cols {
        log::warn!(
            "Fleet clamped to {cols} of {} columns for a {screen_width}px screen",
            alien.cols
        );
    }
    (0..alien.rows)
        .flat_map(|row| {
            (0..cols).map(move |col| {
                alien.origin + Vec2::new(col as f32 * spacing.x, row as f32 * spacing.y)
            })
        })
        .collect()
}

/// Horizontal alien speed for a level
pub fn alien_speed_for_level(alien: &AlienSettings, level: u32) -> f32 {
    alien.base_speed_x + level.saturating_sub(1) as f32 * alien.speedup_scale
}

/// Replace the fleet with a fresh grid for the current level
pub fn create_fleet(session: &mut PlayingSession) {
    let alien = session.settings.alien.clone();
    let speed_x = alien_speed_for_level(&alien, session.level);

    session.enemies.clear();
    session.fleet_direction = FleetDirection::Right;
    for pos in fleet_layout(&alien, session.settings.screen.width) {
        let id = session.next_entity_id();
        session.enemies.push(Enemy::new(
            id,
            pos,
            alien.size,
            speed_x,
            alien.spawn_duration,
        ));
    }
    log::debug!(
        "Fleet of {} spawned at level {} (speed {speed_x:.2})",
        session.enemies.len(),
        session.level
    );
}

/// Drop and reverse the fleet if any alien touches a screen edge.
///
/// All aliens share one heading, so the first offender is enough.
pub fn check_fleet_edges(session: &mut PlayingSession) -> bool {
    let width = session.settings.screen.width;
    let hit_edge = session
        .enemies
        .iter()
        .any(|e| e.rect.right() >= width || e.rect.left() <= 0.0);
    if hit_edge {
        drop_fleet(session);
    }
    hit_edge
}

/// Move the whole fleet down one step and flip its direction
pub fn drop_fleet(session: &mut PlayingSession) {
    let dy = session.settings.alien.drop_speed;
    for enemy in &mut session.enemies {
        enemy.drop_by(dy);
    }
    session.fleet_direction = session.fleet_direction.flipped();
    log::trace!("Fleet dropped, heading {:?}", session.fleet_direction);
}

/// Show a blocking banner
pub fn start_banner(session: &mut PlayingSession, text: String) {
    session.banner = Some(Banner::new(text.clone()));
    session.push_event(GameEvent::BannerStarted { text });
}

/// Advance the banner. Returns true while it still blocks gameplay
pub fn tick_banner(session: &mut PlayingSession) -> bool {
    let Some(banner) = session.banner.as_mut() else {
        return false;
    };
    banner.update();
    if banner.is_finished() {
        log::debug!("Banner '{}' finished", banner.text);
        session.banner = None;
    }
    true
}

/// Advance to the next level once the fleet is gone.
///
/// Returns true if the level was cleared this tick.
pub fn check_next_level(session: &mut PlayingSession) -> bool {
    if !session.enemies.is_empty() {
        return false;
    }

    let cleared = session.level;
    session.projectiles.clear();
    session.pickups.clear();
    session.push_event(GameEvent::LevelCleared { level: cleared });

    if session.settings.player.final_level == Some(cleared) {
        log::info!("Final level {cleared} cleared with score {}", session.score);
        end_session(session, true);
        return true;
    }

    session.level += 1;
    log::info!("Level {} reached (score {})", session.level, session.score);
    start_banner(session, format!("Level {}", session.level));
    create_fleet(session);
    true
}

/// Handle an alien reaching the ship's line.
///
/// Out of lives ends the session; otherwise a life is spent and the current
/// level's fleet respawns. Only the first offending alien counts.
pub fn check_wave_failure(session: &mut PlayingSession) -> bool {
    let ship_top = session.ship.rect.top();
    if !session.enemies.iter().any(|e| e.rect.bottom() >= ship_top) {
        return false;
    }

    if session.lives == 0 {
        log::info!("Out of lives at level {} with score {}", session.level, session.score);
        end_session(session, false);
        return true;
    }

    session.lives -= 1;
    log::info!("Wave failed, {} lives left", session.lives);
    session.push_event(GameEvent::WaveFailed {
        lives_left: session.lives,
    });
    create_fleet(session);
    start_banner(session, format!("Wave {}", session.level));
    true
}

fn end_session(session: &mut PlayingSession, win: bool) {
    session.outcome = Some(Outcome {
        win,
        score: session.score,
        level: session.level,
    });
    session.push_event(GameEvent::GameOver { win });
}
