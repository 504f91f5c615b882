//! Fixed timestep simulation tick
//!
//! Advances a [`PlayingSession`] by one frame. The phase order is fixed:
//! pause → freeze → banner → entity updates → buff expiry → fleet edges →
//! projectile hits → pickups → level clear → wave failure.

use super::collision::{check_pickup_collisions, check_projectile_hits};
use super::powerups::tick_freeze;
use super::state::{EffectKind, GameEvent, PlayingSession, VisualEffect};
use super::wave::{check_fleet_edges, check_next_level, check_wave_failure, tick_banner};

/// Decoded player intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left_held: bool,
    pub move_right_held: bool,
    /// Fire (edge-triggered: true only on the tick the key went down)
    pub fire_pressed: bool,
    /// Pause toggle (edge-triggered)
    pub pause_toggled: bool,
    /// Menu / game-over confirm (edge-triggered)
    pub confirm_pressed: bool,
    /// Window close / quit
    pub quit_requested: bool,
}

impl TickInput {
    /// Same input with the one-shot intents cleared, for substeps after the
    /// first within a frame
    pub fn held_only(&self) -> Self {
        Self {
            fire_pressed: false,
            pause_toggled: false,
            confirm_pressed: false,
            ..*self
        }
    }
}

/// What a tick did, for callers that care
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// Session already ended
    Over,
    Paused,
    Frozen,
    /// Banner animating, gameplay blocked
    Banner,
    /// Full gameplay tick
    Played,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut PlayingSession, input: &TickInput, dt: f32) -> TickPhase {
    if session.outcome.is_some() {
        return TickPhase::Over;
    }

    if input.pause_toggled {
        session.paused = !session.paused;
        log::info!("{}", if session.paused { "Paused" } else { "Resumed" });
    }
    if session.paused {
        return TickPhase::Paused;
    }

    if session.freeze.is_some() {
        tick_freeze(session, dt);
        return TickPhase::Frozen;
    }

    if session.banner.is_some() {
        tick_banner(session);
        return TickPhase::Banner;
    }

    session.time_ticks += 1;

    update_entities(session, input, dt);

    let now = session.clock();
    let expired = session.powerups.update(now, &mut session.ship);
    for kind in expired {
        session.push_event(GameEvent::PowerUpExpired { kind });
    }

    check_fleet_edges(session);
    check_projectile_hits(session);
    check_pickup_collisions(session);
    // A clear respawns the fleet at the top, so the failure scan would only
    // see the fresh formation
    if !check_next_level(session) {
        check_wave_failure(session);
    }

    session.normalize_order();
    TickPhase::Played
}

/// Fire, then move everything one tick and sweep what expired
fn update_entities(session: &mut PlayingSession, input: &TickInput, dt: f32) {
    if input.fire_pressed {
        session.fire();
    }

    session.background.update();

    let height = session.settings.screen.height;
    session.pickups.retain_mut(|p| p.update(height));

    let width = session.settings.screen.width;
    if let Some(trail_at) = session.ship.update(input, width, dt) {
        session
            .effects
            .push(VisualEffect::new(EffectKind::SpeedTrail, trail_at));
    }

    session.effects.retain_mut(|e| e.update());
    session.projectiles.retain_mut(|p| p.update(height));

    let direction = session.fleet_direction;
    for enemy in &mut session.enemies {
        enemy.update(direction, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::collision::tests::session_with_word;
    use crate::sim::powerups::begin_freeze;
    use crate::sim::state::{FiringVariant, Pickup, PowerUpKind};
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn fire() -> TickInput {
        TickInput {
            fire_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut s = PlayingSession::new(Settings::default(), 12345);
        assert_eq!(tick(&mut s, &TickInput::default(), DT), TickPhase::Played);
        assert_eq!(s.time_ticks, 1);
        assert!((s.clock() - DT).abs() < 1e-6);
    }

    #[test]
    fn test_clock_follows_tick_count() {
        let mut s = PlayingSession::new(Settings::default(), 12345);
        // An hour of play at 60 fps
        s.time_ticks = 60 * 60 * 60;
        assert!((s.clock() - 3600.0).abs() < 1e-2);
        tick(&mut s, &TickInput::default(), DT);
        assert!((s.clock() - (3600.0 + DT)).abs() < 1e-2);
    }

    #[test]
    fn test_entities_kept_in_id_order() {
        let mut s = session_with_word(99);
        s.enemies.reverse();
        tick(&mut s, &fire(), DT);
        tick(&mut s, &fire(), DT);
        assert!(s.enemies.windows(2).all(|w| w[0].id < w[1].id));
        assert!(s.projectiles.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_pause_holds_freeze() {
        let mut s = session_with_word(99);
        begin_freeze(&mut s, PowerUpKind::DoubleShoot);
        let pause = TickInput {
            pause_toggled: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut s, &pause, DT), TickPhase::Paused);
        for _ in 0..200 {
            assert_eq!(tick(&mut s, &TickInput::default(), DT), TickPhase::Paused);
        }
        assert_eq!(s.freeze.as_ref().map(|f| f.remaining), Some(0.5));
        assert!(!s.powerups.is_active(PowerUpKind::DoubleShoot));

        // Un-pausing resumes the freeze where it stopped
        assert_eq!(tick(&mut s, &pause, DT), TickPhase::Frozen);
        while s.freeze.is_some() {
            assert!(!s.powerups.is_active(PowerUpKind::DoubleShoot));
            tick(&mut s, &TickInput::default(), DT);
        }
        assert!(s.powerups.is_active(PowerUpKind::DoubleShoot));
        assert_eq!(s.ship.firing_variant, FiringVariant::Double);
    }

    #[test]
    fn test_tick_pause() {
        let mut s = PlayingSession::new(Settings::default(), 12345);
        let pause = TickInput {
            pause_toggled: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut s, &pause, DT), TickPhase::Paused);
        let positions: Vec<Vec2> = s.enemies.iter().map(|e| e.rect.pos).collect();
        let bg = s.background.offsets;

        for _ in 0..100 {
            assert_eq!(tick(&mut s, &TickInput::default(), DT), TickPhase::Paused);
        }
        assert_eq!(s.time_ticks, 0);
        assert_eq!(s.background.offsets, bg);
        assert!(s.enemies.iter().map(|e| e.rect.pos).eq(positions));

        // Unpause goes through even though everything else is frozen
        assert_eq!(tick(&mut s, &pause, DT), TickPhase::Played);
        assert!(!s.paused);
    }

    #[test]
    fn test_fire_is_edge_triggered_by_caller() {
        let mut s = PlayingSession::new(Settings::default(), 1);
        tick(&mut s, &fire(), DT);
        assert_eq!(s.projectiles.len(), 1);
        // Holding without a new press does not fire again
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.projectiles.len(), 1);
        assert!(s.events.contains(&GameEvent::Shot { projectiles: 1 }));
    }

    #[test]
    fn test_projectile_destroys_enemy_via_tick() {
        let mut s = session_with_word(99);
        for e in &mut s.enemies {
            e.speed_x = 0.0;
        }
        // Line the ship up under the bottom-left alien
        let target = s.enemies[18].rect.center().x;
        let half = s.ship.rect.size.x / 2.0;
        s.ship.rect.pos.x = target - half;

        tick(&mut s, &fire(), DT);
        let mut ticks = 0;
        while s.score == 0 && ticks < 200 {
            tick(&mut s, &TickInput::default(), DT);
            ticks += 1;
        }
        assert_eq!(s.score, 50);
        assert_eq!(s.enemies.len(), 23);
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn test_level_clear_banner_blocks_ticking() {
        let mut s = session_with_word(99);
        s.enemies.clear();
        assert_eq!(tick(&mut s, &TickInput::default(), DT), TickPhase::Played);
        assert_eq!(s.level, 2);
        assert_eq!(s.enemies.len(), 24);
        assert!(s.enemies.iter().all(|e| (e.speed_x - 1.2).abs() < 1e-6));
        assert!(s.banner.is_some());

        let ship_x = s.ship.rect.pos.x;
        let ticks_before = s.time_ticks;
        let hold_left = TickInput {
            move_left_held: true,
            ..Default::default()
        };
        let mut banner_ticks = 0;
        while s.banner.is_some() {
            assert_eq!(tick(&mut s, &hold_left, DT), TickPhase::Banner);
            banner_ticks += 1;
        }
        assert!(banner_ticks > 50);
        assert_eq!(s.time_ticks, ticks_before);
        assert_eq!(s.ship.rect.pos.x, ship_x);

        assert_eq!(tick(&mut s, &hold_left, DT), TickPhase::Played);
        assert!(s.ship.rect.pos.x < ship_x);
    }

    #[test]
    fn test_breach_respawns_fleet_with_wave_banner() {
        let mut settings = Settings::default();
        settings.player.start_level = 2;
        let mut s = PlayingSession::new(settings, 5);
        s.lives = 2;
        let ship_top = s.ship.rect.top();
        s.enemies[0].rect.pos.y = ship_top;
        s.enemies[0].spawn_pos.y = ship_top;

        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.lives, 1);
        assert!(s.outcome.is_none());
        assert_eq!(s.enemies.len(), 24);
        assert_eq!(s.banner.as_ref().map(|b| b.text.as_str()), Some("Wave 2"));
    }

    #[test]
    fn test_breach_without_lives_ends_game() {
        let mut s = PlayingSession::new(Settings::default(), 5);
        s.lives = 0;
        let ship_top = s.ship.rect.top();
        s.enemies[0].rect.pos.y = ship_top;
        s.enemies[0].spawn_pos.y = ship_top;

        tick(&mut s, &TickInput::default(), DT);
        let outcome = s.outcome.expect("game should be over");
        assert!(!outcome.win);
        assert_eq!(s.lives, 0);
        assert_eq!(tick(&mut s, &TickInput::default(), DT), TickPhase::Over);
    }

    #[test]
    fn test_double_shoot_pickup_lifecycle() {
        let mut s = session_with_word(99);
        let center = s.ship.rect.center();
        let id = s.next_entity_id();
        s.pickups.push(Pickup::new(
            id,
            PowerUpKind::DoubleShoot,
            center - Vec2::new(0.0, 2.0),
            Vec2::splat(40.0),
            2.0,
        ));

        assert_eq!(tick(&mut s, &TickInput::default(), DT), TickPhase::Played);
        assert!(s.pickups.is_empty());
        assert!(s.freeze.is_some());
        assert!(!s.powerups.is_active(PowerUpKind::DoubleShoot));
        assert_eq!(s.ship.firing_variant, FiringVariant::Single);

        // Fire is ignored while frozen
        assert_eq!(tick(&mut s, &fire(), DT), TickPhase::Frozen);
        assert!(s.projectiles.is_empty());

        let mut frozen = 1;
        while s.freeze.is_some() {
            tick(&mut s, &TickInput::default(), DT);
            frozen += 1;
            assert!(frozen < 60);
        }
        assert!(frozen >= 29);
        assert_eq!(s.ship.firing_variant, FiringVariant::Double);
        assert_eq!(s.ship.firing_variant.cap(&s.settings.bullet), 10);

        tick(&mut s, &fire(), DT);
        assert_eq!(s.player_projectile_count(), 2);

        // Run out the buff (10 s of gameplay ticks)
        for _ in 0..610 {
            tick(&mut s, &TickInput::default(), DT);
        }
        assert!(!s.powerups.is_active(PowerUpKind::DoubleShoot));
        assert_eq!(s.ship.firing_variant, FiringVariant::Single);
        assert_eq!(s.ship.firing_variant.cap(&s.settings.bullet), 3);
        assert!(
            s.events
                .contains(&GameEvent::PowerUpExpired { kind: PowerUpKind::DoubleShoot })
        );
    }

    #[test]
    fn test_determinism() {
        let mut a = PlayingSession::new(Settings::default(), 99999);
        let mut b = PlayingSession::new(Settings::default(), 99999);
        for i in 0..600 {
            let input = TickInput {
                move_left_held: i % 90 < 45,
                move_right_held: i % 90 >= 45,
                fire_pressed: i % 7 == 0,
                ..Default::default()
            };
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.pickups.len(), b.pickups.len());
        assert_eq!(a.ship.rect, b.ship.rect);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), prop::bool::weighted(0.02)).prop_map(
            |(left, right, fire, pause)| TickInput {
                move_left_held: left,
                move_right_held: right,
                fire_pressed: fire,
                pause_toggled: pause,
                ..Default::default()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_session_invariants(
            seed in any::<u64>(),
            lives in 0u32..3,
            inputs in prop::collection::vec(arb_input(), 1..600),
        ) {
            let mut s = PlayingSession::new(Settings::default(), seed);
            s.lives = lives;
            let mut last_score = 0;
            let mut last_lives = lives;

            for input in &inputs {
                tick(&mut s, input, DT);

                prop_assert!(s.score >= last_score);
                prop_assert!(s.lives <= last_lives);
                last_score = s.score;
                last_lives = s.lives;

                prop_assert!(s.ship.speed >= s.ship.base_speed);
                prop_assert!(s.ship.speed <= s.ship.max_speed);
                prop_assert!(s.ship.rect.left() >= 0.0);
                prop_assert!(s.ship.rect.right() <= s.settings.screen.width);

                let kinds: Vec<_> = s.powerups.active_kinds().collect();
                for kind in PowerUpKind::ALL {
                    prop_assert!(kinds.iter().filter(|k| **k == kind).count() <= 1);
                }

                let cap = s.ship.firing_variant.cap(&s.settings.bullet);
                prop_assert!(s.player_projectile_count() <= s.settings.bullet.double_cap.max(cap));
            }
        }

        #[test]
        fn prop_edge_drop_is_uniform(offset in 0.0f32..5.0, seed in any::<u64>()) {
            let mut s = PlayingSession::new(Settings::default(), seed);
            for e in &mut s.enemies {
                e.spawn_timer = 0.0;
            }
            let shift = 800.0 - s.enemies[5].rect.right() + offset;
            for e in &mut s.enemies {
                e.rect.pos.x += shift;
            }
            let ys: Vec<f32> = s.enemies.iter().map(|e| e.rect.pos.y).collect();
            let dir = s.fleet_direction;

            prop_assert!(check_fleet_edges(&mut s));
            prop_assert_eq!(s.fleet_direction, dir.flipped());
            for (e, y) in s.enemies.iter().zip(ys) {
                prop_assert_eq!(e.rect.pos.y, y + 20.0);
            }
        }
    }
}
