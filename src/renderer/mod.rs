//! Rendering module
//!
//! The game describes each frame as a flat sequence of image and text draws
//! against a [`RenderSink`]. Backends own textures and fonts; the core never
//! reads anything back.

pub mod hud;
pub mod scene;
pub mod screens;

use glam::Vec2;

use crate::sim::PowerUpKind;

pub use hud::{draw_hud, format_score};
pub use scene::draw_playing;
pub use screens::{draw_game_over, draw_menu};

/// Every image the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    /// Parallax star layer (0 = farthest)
    BackgroundLayer(u8),
    MenuBackground,
    Logo,
    Ship,
    /// Bright overlay on the ship right after a pickup
    PickupFlash,
    Shield,
    Projectile,
    EnemyProjectile,
    Alien,
    Pickup(PowerUpKind),
    Explosion,
    SpeedTrail,
    HudBackground,
    LifeIcon,
    LifeSlot,
    PowerUpSlot,
    PauseOverlay,
}

impl ImageId {
    /// Asset path relative to the graphics root
    pub fn asset(&self) -> &'static str {
        match self {
            ImageId::BackgroundLayer(0) => "backgrounds/layer_0.png",
            ImageId::BackgroundLayer(1) => "backgrounds/layer_1.png",
            ImageId::BackgroundLayer(2) => "backgrounds/layer_2.png",
            ImageId::BackgroundLayer(_) => "backgrounds/layer_3.png",
            ImageId::MenuBackground => "backgrounds/title_menu_bg.jpg",
            ImageId::Logo => "images/logo.png",
            ImageId::Ship => "sprites/ships/ship_1.png",
            ImageId::PickupFlash => "sprites/ships/pickup_flash.png",
            ImageId::Shield => "sprites/ships/shield.png",
            ImageId::Projectile => "sprites/bullets/bullet_1.png",
            ImageId::EnemyProjectile => "sprites/bullets/bullet_2.png",
            ImageId::Alien => "sprites/aliens/alien_1.png",
            ImageId::Pickup(PowerUpKind::DoubleShoot) => "sprites/powerups/powerup_1.png",
            ImageId::Pickup(PowerUpKind::Shield) => "sprites/powerups/powerup_2.png",
            ImageId::Pickup(PowerUpKind::Speed) => "sprites/powerups/powerup_7.png",
            ImageId::Explosion => "sprites/effects/explosion.png",
            ImageId::SpeedTrail => "sprites/effects/speed_trail.png",
            ImageId::HudBackground => "images/hud_bg.png",
            ImageId::LifeIcon => "images/life.png",
            ImageId::LifeSlot => "images/life_slot.png",
            ImageId::PowerUpSlot => "sprites/powerups/powerup_bg.png",
            ImageId::PauseOverlay => "images/pause_overlay.png",
        }
    }
}

/// Output side of the renderer.
///
/// Positions are the top-left corner of the image or text box, alpha is
/// 0-255.
pub trait RenderSink {
    fn draw(&mut self, image: ImageId, pos: Vec2, alpha: u8);
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, alpha: u8);
}

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Image {
        image: ImageId,
        pos: Vec2,
        alpha: u8,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        alpha: u8,
    },
}

/// Sink that records calls in order (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// All text strings drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            DrawCall::Image { .. } => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// How many times `image` was drawn
    pub fn count(&self, image: ImageId) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Image { image: i, .. } if *i == image))
            .count()
    }
}

impl RenderSink for DrawList {
    fn draw(&mut self, image: ImageId, pos: Vec2, alpha: u8) {
        self.calls.push(DrawCall::Image { image, pos, alpha });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, alpha: u8) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            pos,
            size,
            alpha,
        });
    }
}

/// Approximate glyph advance as a fraction of the text size
const GLYPH_ASPECT: f32 = 0.6;

/// Draw text centred on `center`, using an estimated box size
pub fn draw_text_centered(
    sink: &mut dyn RenderSink,
    text: &str,
    center: Vec2,
    size: f32,
    alpha: u8,
) {
    let width = text.chars().count() as f32 * size * GLYPH_ASPECT;
    let top_left = center - Vec2::new(width, size) / 2.0;
    sink.draw_text(text, top_left, size, alpha);
}

/// Clamp a simulation alpha into the sink's range
#[inline]
pub(crate) fn to_alpha(alpha: i32) -> u8 {
    alpha.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.draw(ImageId::Ship, Vec2::new(1.0, 2.0), 255);
        list.draw_text("hi", Vec2::ZERO, 12.0, 128);
        list.draw(ImageId::Ship, Vec2::ZERO, 255);
        assert_eq!(list.len(), 3);
        assert_eq!(list.count(ImageId::Ship), 2);
        assert!(list.has_text("hi"));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_centered_text() {
        let mut list = DrawList::new();
        draw_text_centered(&mut list, "ab", Vec2::new(100.0, 100.0), 10.0, 255);
        match &list.calls[0] {
            DrawCall::Text { pos, .. } => assert_eq!(*pos, Vec2::new(94.0, 95.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_to_alpha() {
        assert_eq!(to_alpha(-5), 0);
        assert_eq!(to_alpha(300), 255);
        assert_eq!(to_alpha(200), 200);
    }
}
