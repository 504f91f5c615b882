//! Heads-up display: score, lives, level and buff timers

use glam::Vec2;

use super::{ImageId, RenderSink};
use crate::sim::PlayingSession;

const HUD_TEXT_SIZE: f32 = 24.0;
const SCORE_POS: Vec2 = Vec2::new(10.0, 10.0);
/// Life icons start one icon width right of this
const LIVES_ORIGIN: Vec2 = Vec2::new(215.0, 10.0);
const LIFE_ICON_WIDTH: f32 = 28.0;
/// First buff timer slot
const TIMER_ORIGIN: Vec2 = Vec2::new(425.0, 5.0);
const TIMER_SPACING: f32 = 80.0;
const TIMER_ICON_WIDTH: f32 = 32.0;
/// Number of buff slots drawn behind the timers
const TIMER_SLOTS: usize = 3;
const LEVEL_RIGHT_MARGIN: f32 = 80.0;

/// Score as shown on the HUD: rounded to the nearest ten, zero-padded to
/// ten digits
pub fn format_score(score: u64) -> String {
    let rounded = score.saturating_add(5) / 10 * 10;
    format!("{rounded:010}")
}

pub fn draw_hud(session: &PlayingSession, sink: &mut dyn RenderSink) {
    sink.draw(ImageId::HudBackground, Vec2::ZERO, 255);
    sink.draw_text(&format_score(session.score), SCORE_POS, HUD_TEXT_SIZE, 255);

    draw_lives(session, sink);
    draw_timers(session, sink);

    let width = session.settings.screen.width;
    sink.draw_text(
        &format!("LV {}", session.level),
        Vec2::new(width - LEVEL_RIGHT_MARGIN, SCORE_POS.y),
        HUD_TEXT_SIZE,
        255,
    );
}

fn draw_lives(session: &PlayingSession, sink: &mut dyn RenderSink) {
    let slot = |i: u32| LIVES_ORIGIN + Vec2::new((i + 1) as f32 * LIFE_ICON_WIDTH, 0.0);
    for i in 0..session.settings.player.max_lives {
        sink.draw(ImageId::LifeSlot, slot(i), 120);
    }
    for i in 0..session.lives.min(session.settings.player.max_lives) {
        sink.draw(ImageId::LifeIcon, slot(i), 255);
    }
}

fn draw_timers(session: &PlayingSession, sink: &mut dyn RenderSink) {
    for i in 0..TIMER_SLOTS {
        let pos = TIMER_ORIGIN + Vec2::new(i as f32 * TIMER_SPACING, 0.0);
        sink.draw(ImageId::PowerUpSlot, pos, 100);
    }

    // Hidden while the buff clock is held
    if session.freeze.is_some() || session.paused {
        return;
    }

    for (i, kind) in session.powerups.active_kinds().enumerate() {
        let pos = TIMER_ORIGIN + Vec2::new(i as f32 * TIMER_SPACING, 0.0);
        let remaining = session.powerups.remaining_time(kind, session.clock());
        sink.draw(ImageId::Pickup(kind), pos, 255);
        sink.draw_text(
            &format!("{remaining}s"),
            Vec2::new(pos.x + TIMER_ICON_WIDTH + 5.0, SCORE_POS.y),
            HUD_TEXT_SIZE,
            255,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;
    use crate::settings::Settings;
    use crate::sim::PowerUpKind;
    use crate::sim::powerups::begin_freeze;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0000000000");
        assert_eq!(format_score(50), "0000000050");
        assert_eq!(format_score(1234), "0000001230");
        assert_eq!(format_score(1235), "0000001240");
        assert_eq!(format_score(12_345_678_901), "12345678900");
    }

    #[test]
    fn test_hud_shows_score_lives_level() {
        let mut s = PlayingSession::new(Settings::default(), 1);
        s.score = 150;
        s.lives = 2;
        let mut list = DrawList::new();
        draw_hud(&s, &mut list);
        assert!(list.has_text("0000000150"));
        assert!(list.has_text("LV 1"));
        assert_eq!(list.count(ImageId::LifeSlot), 5);
        assert_eq!(list.count(ImageId::LifeIcon), 2);
        assert_eq!(list.count(ImageId::PowerUpSlot), 3);
    }

    #[test]
    fn test_timers_hidden_while_frozen_or_paused() {
        let mut s = PlayingSession::new(Settings::default(), 1);
        let settings = s.settings.ship.clone();
        s.powerups
            .activate(PowerUpKind::Shield, 10.0, 0.0, &mut s.ship, &settings);

        let mut list = DrawList::new();
        draw_hud(&s, &mut list);
        assert!(list.has_text("10s"));
        assert_eq!(list.count(ImageId::Pickup(PowerUpKind::Shield)), 1);

        s.paused = true;
        let mut list = DrawList::new();
        draw_hud(&s, &mut list);
        assert!(!list.has_text("10s"));

        s.paused = false;
        begin_freeze(&mut s, PowerUpKind::Speed);
        let mut list = DrawList::new();
        draw_hud(&s, &mut list);
        assert!(!list.has_text("10s"));
    }
}
