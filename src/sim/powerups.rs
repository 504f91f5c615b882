//! Power-up lifecycle: timed buffs and the post-pickup freeze
//!
//! A collected pickup does not take effect right away. The session first
//! enters a short [`Freeze`] while the ship's pickup flash plays; when it
//! runs out, every queued kind is handed to [`PowerUpManager::activate`].
//! Buff expiry is compared against the session's simulation clock, so no
//! wall-clock time is involved anywhere.

use serde::{Deserialize, Serialize};

use super::state::{FiringVariant, GameEvent, PlayingSession, PowerUpKind, Ship};
use crate::settings::ShipSettings;

/// One active buff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub kind: PowerUpKind,
    /// Simulation time (seconds) at which the buff ends
    pub expires_at: f32,
}

/// Active buffs, at most one per kind, in activation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpManager {
    active: Vec<ActiveBuff>,
}

impl PowerUpManager {
    /// Start (or refresh) a buff and apply its effect to the ship.
    ///
    /// Re-activating a kind that is already running only moves its expiry.
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        duration: f32,
        now: f32,
        ship: &mut Ship,
        tuning: &ShipSettings,
    ) {
        let expires_at = now + duration;
        if let Some(buff) = self.active.iter_mut().find(|b| b.kind == kind) {
            buff.expires_at = expires_at;
            log::debug!("{} buff refreshed until {expires_at:.2}s", kind.as_str());
            return;
        }

        self.active.push(ActiveBuff { kind, expires_at });
        match kind {
            PowerUpKind::Speed => {
                ship.start_speed_boost(tuning.boost_acceleration, tuning.boost_impulse)
            }
            PowerUpKind::Shield => ship.set_shield(true),
            PowerUpKind::DoubleShoot => ship.firing_variant = FiringVariant::Double,
        }
        log::info!("{} buff active until {expires_at:.2}s", kind.as_str());
    }

    /// Expire buffs whose time is up, reverting their effects.
    ///
    /// Returns the kinds that expired this call.
    pub fn update(&mut self, now: f32, ship: &mut Ship) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.active.retain(|buff| {
            if now >= buff.expires_at {
                expired.push(buff.kind);
                false
            } else {
                true
            }
        });

        for kind in &expired {
            revert(*kind, ship);
            log::info!("{} buff expired", kind.as_str());
        }
        expired
    }

    /// Whole seconds left on a buff, 0 if it is not active
    pub fn remaining_time(&self, kind: PowerUpKind, now: f32) -> u32 {
        self.active
            .iter()
            .find(|b| b.kind == kind)
            .map(|b| (b.expires_at - now).max(0.0) as u32)
            .unwrap_or(0)
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|b| b.kind == kind)
    }

    /// Active kinds in the order they were activated
    pub fn active_kinds(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        self.active.iter().map(|b| b.kind)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

fn revert(kind: PowerUpKind, ship: &mut Ship) {
    match kind {
        PowerUpKind::Speed => ship.end_speed_boost(),
        PowerUpKind::Shield => ship.set_shield(false),
        PowerUpKind::DoubleShoot => ship.firing_variant = FiringVariant::Single,
    }
}

/// Gameplay freeze after collecting a pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freeze {
    /// Seconds until gameplay resumes
    pub remaining: f32,
    /// Kinds to activate when the freeze ends
    pub pending: Vec<PowerUpKind>,
}

/// Queue a collected kind, starting a freeze if none is running
pub fn begin_freeze(session: &mut PlayingSession, kind: PowerUpKind) {
    let duration = session.settings.powerup.freeze_duration;
    match &mut session.freeze {
        Some(freeze) => freeze.pending.push(kind),
        None => {
            session.freeze = Some(Freeze {
                remaining: duration,
                pending: vec![kind],
            })
        }
    }
    session.ship.pickup_flash = session.settings.powerup.pickup_animation;
}

/// Advance a running freeze by `dt`.
///
/// Only the pickup flash moves. When the freeze runs out its pending buffs
/// are activated and the freeze clears itself. Returns true while still
/// frozen.
pub fn tick_freeze(session: &mut PlayingSession, dt: f32) -> bool {
    let Some(freeze) = session.freeze.as_mut() else {
        return false;
    };
    session.ship.update_pickup_flash(dt);
    freeze.remaining -= dt;
    if freeze.remaining > 0.0 {
        return true;
    }

    let pending = std::mem::take(&mut freeze.pending);
    session.freeze = None;
    let duration = session.settings.powerup.duration;
    let now = session.clock();
    for kind in pending {
        session.powerups.activate(
            kind,
            duration,
            now,
            &mut session.ship,
            &session.settings.ship,
        );
        session.push_event(GameEvent::PowerUpActivated { kind });
    }
    false
}
