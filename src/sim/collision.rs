//! Collision detection and scoring
//!
//! Plain AABB overlap tests, O(projectiles x aliens) per tick. Removals are
//! collected during the scan and swept afterwards so no collection is ever
//! mutated while it is being walked.

use glam::Vec2;
use rand::RngCore;

use super::powerups::begin_freeze;
use super::state::{
    EffectKind, Fleet, GameEvent, Pickup, PlayingSession, PowerUpKind, VisualEffect,
};

/// A projectile/alien pair resolved this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub projectile_id: u32,
    pub enemy_id: u32,
    /// Centre of the destroyed alien
    pub at: Vec2,
}

/// Roll the power-up drop for a destroyed alien.
///
/// `chance` is in percent; the roll is 1..=100 and drops when `roll <= chance`.
pub fn roll_drop(rng: &mut dyn RngCore, chance: u32) -> Option<PowerUpKind> {
    let roll = rng.next_u32() % 100 + 1;
    if roll > chance {
        return None;
    }
    let index = (rng.next_u32() % PowerUpKind::ALL.len() as u32) as usize;
    Some(PowerUpKind::ALL[index])
}

/// Pair player projectiles with the first live alien each one overlaps.
///
/// An alien can be claimed once, and a projectile stops at its first hit.
/// Aliens still in their spawn animation cannot be hit.
pub fn find_projectile_hits(session: &PlayingSession) -> Vec<Hit> {
    let mut hits: Vec<Hit> = Vec::new();
    for projectile in session
        .projectiles
        .iter()
        .filter(|p| p.owner == Fleet::Player)
    {
        let target = session.enemies.iter().find(|e| {
            !e.is_spawning()
                && !hits.iter().any(|h| h.enemy_id == e.id)
                && projectile.rect.intersects(&e.rect)
        });
        if let Some(enemy) = target {
            hits.push(Hit {
                projectile_id: projectile.id,
                enemy_id: enemy.id,
                at: enemy.rect.center(),
            });
        }
    }
    hits
}

/// Resolve projectile/alien collisions: remove both, score, spawn effects
/// and roll drops. Returns the hits resolved.
pub fn check_projectile_hits(session: &mut PlayingSession) -> Vec<Hit> {
    let hits = find_projectile_hits(session);
    if hits.is_empty() {
        return hits;
    }

    session
        .projectiles
        .retain(|p| !hits.iter().any(|h| h.projectile_id == p.id));
    session
        .enemies
        .retain(|e| !hits.iter().any(|h| h.enemy_id == e.id));

    let points = session.settings.alien.points;
    let chance = session.settings.powerup.drop_chance;
    let (size, fall_speed) = (
        session.settings.powerup.size,
        session.settings.powerup.fall_speed,
    );

    for hit in &hits {
        session
            .effects
            .push(VisualEffect::new(EffectKind::Explosion, hit.at));
        session
            .effects
            .push(VisualEffect::new(EffectKind::ScoreUp { points }, hit.at));
        session.add_score(points);
        session.push_event(GameEvent::EnemyDestroyed {
            pos: hit.at,
            points,
        });

        if let Some(kind) = roll_drop(session.rng.as_mut(), chance) {
            let id = session.next_entity_id();
            session
                .pickups
                .push(Pickup::new(id, kind, hit.at, size, fall_speed));
            log::debug!("{} pickup dropped at {:?}", kind.as_str(), hit.at);
            session.push_event(GameEvent::PowerUpDropped { kind });
        }
    }
    hits
}

/// Collect pickups touching the ship.
///
/// Each pickup is removed at once; its buff waits for the freeze to end.
pub fn check_pickup_collisions(session: &mut PlayingSession) -> Vec<PowerUpKind> {
    let ship_rect = session.ship.rect;
    let mut collected = Vec::new();
    session.pickups.retain(|p| {
        if p.rect.intersects(&ship_rect) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in &collected {
        log::info!("{} pickup collected", kind.as_str());
        begin_freeze(session, *kind);
        session.push_event(GameEvent::PowerUpCollected { kind: *kind });
    }
    collected
}
