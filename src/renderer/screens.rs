//! Menu and game-over screens

use glam::Vec2;

use super::hud::format_score;
use super::{ImageId, RenderSink, draw_text_centered};
use crate::settings::ScreenSettings;

const TITLE_SIZE: f32 = 72.0;
const PROMPT_SIZE: f32 = 28.0;
const FOOTER_SIZE: f32 = 16.0;
const FOOTER_TEXT: &str = "Left/Right move  Space fire  P pause";

fn screen_center(screen: &ScreenSettings) -> Vec2 {
    Vec2::new(screen.width, screen.height) / 2.0
}

pub fn draw_menu(screen: &ScreenSettings, sink: &mut dyn RenderSink) {
    let center = screen_center(screen);
    sink.draw(ImageId::MenuBackground, Vec2::ZERO, 255);
    sink.draw(ImageId::Logo, Vec2::new(center.x, screen.height / 4.0), 255);
    draw_text_centered(sink, "Press ENTER to play", Vec2::new(center.x, 300.0), PROMPT_SIZE, 255);
    draw_text_centered(
        sink,
        FOOTER_TEXT,
        Vec2::new(center.x, screen.height - 20.0 - FOOTER_SIZE / 2.0),
        FOOTER_SIZE,
        255,
    );
}

pub fn draw_game_over(
    screen: &ScreenSettings,
    win: bool,
    score: u64,
    level: u32,
    sink: &mut dyn RenderSink,
) {
    let center = screen_center(screen);
    let title = if win { "YOU WIN!" } else { "GAME OVER" };
    draw_text_centered(sink, title, center - Vec2::new(0.0, 80.0), TITLE_SIZE, 255);
    draw_text_centered(
        sink,
        &format!("{}  LV {level}", format_score(score)),
        center,
        PROMPT_SIZE,
        255,
    );
    draw_text_centered(
        sink,
        "Press ENTER to return to the menu",
        center + Vec2::new(0.0, 80.0),
        PROMPT_SIZE,
        255,
    );
}
