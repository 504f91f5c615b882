//! Playing-screen composition
//!
//! Draw order, back to front: star layers, speed trails, ship, projectiles,
//! aliens, explosions, pickups, score popups, banner, HUD, pause overlay.

use glam::Vec2;

use super::hud::draw_hud;
use super::{ImageId, RenderSink, draw_text_centered, to_alpha};
use crate::sim::{
    BACKGROUND_LAYER_SPEEDS, EffectKind, Fleet, PlayingSession, Ship, VisualEffect,
};

const SCORE_POPUP_SIZE: f32 = 20.0;
const PAUSE_TEXT_SIZE: f32 = 60.0;
/// Shield pulse frequency (radians per second)
const SHIELD_PULSE_RATE: f32 = 6.0;

/// Draw a full Playing frame
pub fn draw_playing(session: &PlayingSession, sink: &mut dyn RenderSink) {
    draw_background(session, sink);

    draw_effects(&session.effects, sink, |k| matches!(k, EffectKind::SpeedTrail));
    draw_ship(&session.ship, sink);

    for projectile in &session.projectiles {
        let image = match projectile.owner {
            Fleet::Player => ImageId::Projectile,
            Fleet::Enemy => ImageId::EnemyProjectile,
        };
        sink.draw(image, projectile.rect.pos, 255);
    }
    for enemy in &session.enemies {
        sink.draw(ImageId::Alien, enemy.rect.pos, spawn_alpha(enemy.spawn_timer, session));
    }

    draw_effects(&session.effects, sink, |k| matches!(k, EffectKind::Explosion));
    for pickup in &session.pickups {
        sink.draw(ImageId::Pickup(pickup.kind), pickup.rect.pos, 255);
    }
    draw_effects(&session.effects, sink, |k| matches!(k, EffectKind::ScoreUp { .. }));

    let center = Vec2::new(
        session.settings.screen.width,
        session.settings.screen.height,
    ) / 2.0;
    if let Some(banner) = &session.banner {
        draw_text_centered(sink, &banner.text, center, banner.size, to_alpha(banner.opacity));
    }

    draw_hud(session, sink);

    if session.paused {
        sink.draw(ImageId::PauseOverlay, Vec2::ZERO, 128);
        draw_text_centered(sink, "PAUSED", center, PAUSE_TEXT_SIZE, 255);
    }
}

/// Each star layer twice, one screen height apart, so it tiles while
/// scrolling
fn draw_background(session: &PlayingSession, sink: &mut dyn RenderSink) {
    let height = session.background.height();
    for layer in 0..BACKGROUND_LAYER_SPEEDS.len() {
        let offset = session.background.offsets[layer];
        let image = ImageId::BackgroundLayer(layer as u8);
        sink.draw(image, Vec2::new(0.0, offset), 255);
        sink.draw(image, Vec2::new(0.0, offset - height), 255);
    }
}

fn draw_ship(ship: &Ship, sink: &mut dyn RenderSink) {
    sink.draw(ImageId::Ship, ship.rect.pos, 255);
    if ship.pickup_flash > 0.0 {
        // Blink on alternate tenths of a second
        let on = (ship.pickup_flash * 10.0) as u32 % 2 == 0;
        if on {
            sink.draw(ImageId::PickupFlash, ship.rect.pos, 200);
        }
    }
    if ship.shield_active {
        let pulse = (ship.shield_phase * SHIELD_PULSE_RATE).sin() * 0.5 + 0.5;
        let alpha = 128.0 + pulse * 100.0;
        sink.draw(ImageId::Shield, ship.rect.pos, alpha as u8);
    }
}

fn draw_effects(
    effects: &[VisualEffect],
    sink: &mut dyn RenderSink,
    filter: impl Fn(&EffectKind) -> bool,
) {
    for effect in effects.iter().filter(|e| filter(&e.kind)) {
        let alpha = to_alpha(effect.alpha);
        match effect.kind {
            EffectKind::Explosion => sink.draw(ImageId::Explosion, effect.pos, alpha),
            EffectKind::SpeedTrail => sink.draw(ImageId::SpeedTrail, effect.pos, alpha),
            EffectKind::ScoreUp { points } => draw_text_centered(
                sink,
                &format!("+{points}"),
                effect.pos,
                SCORE_POPUP_SIZE,
                alpha,
            ),
        }
    }
}

/// Aliens fade in over their spawn animation
fn spawn_alpha(spawn_timer: f32, session: &PlayingSession) -> u8 {
    let duration = session.settings.alien.spawn_duration;
    if duration <= 0.0 || spawn_timer <= 0.0 {
        return 255;
    }
    let progress = 1.0 - (spawn_timer / duration).clamp(0.0, 1.0);
    (progress * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCall, DrawList};
    use crate::settings::Settings;
    use crate::sim::wave::start_banner;

    fn session() -> PlayingSession {
        PlayingSession::new(Settings::default(), 8)
    }

    #[test]
    fn test_draws_every_entity() {
        let mut s = session();
        s.fire();
        let mut list = DrawList::new();
        draw_playing(&s, &mut list);
        assert_eq!(list.count(ImageId::Ship), 1);
        assert_eq!(list.count(ImageId::Alien), 24);
        assert_eq!(list.count(ImageId::Projectile), 1);
        assert_eq!(list.count(ImageId::BackgroundLayer(0)), 2);
        assert_eq!(list.count(ImageId::PauseOverlay), 0);
        assert!(list.has_text("0000000000"));
    }

    #[test]
    fn test_background_comes_first() {
        let mut list = DrawList::new();
        draw_playing(&session(), &mut list);
        assert!(matches!(
            list.calls[0],
            DrawCall::Image {
                image: ImageId::BackgroundLayer(0),
                ..
            }
        ));
    }

    #[test]
    fn test_pause_overlay() {
        let mut s = session();
        s.paused = true;
        let mut list = DrawList::new();
        draw_playing(&s, &mut list);
        assert_eq!(list.count(ImageId::PauseOverlay), 1);
        assert!(list.has_text("PAUSED"));
    }

    #[test]
    fn test_banner_drawn_with_opacity() {
        let mut s = session();
        start_banner(&mut s, "Level 2".to_string());
        let mut list = DrawList::new();
        draw_playing(&s, &mut list);
        let banner = list.calls.iter().find_map(|c| match c {
            DrawCall::Text {
                text, size, alpha, ..
            } if text == "Level 2" => Some((*size, *alpha)),
            _ => None,
        });
        assert_eq!(banner, Some((300.0, 255)));
    }

    #[test]
    fn test_spawning_aliens_fade_in() {
        let s = session();
        assert_eq!(spawn_alpha(0.7, &s), 0);
        assert_eq!(spawn_alpha(0.0, &s), 255);
        assert!(spawn_alpha(0.35, &s) > 100);
    }

    #[test]
    fn test_score_popup_text() {
        let mut s = session();
        s.effects
            .push(VisualEffect::new(EffectKind::ScoreUp { points: 50 }, Vec2::new(200.0, 200.0)));
        let mut list = DrawList::new();
        draw_playing(&s, &mut list);
        assert!(list.has_text("+50"));
    }
}
