//! Mars Invaders entry point
//!
//! Runs the game headless: the demo autopilot plays, frames are recorded
//! into a draw list and audio calls are logged.
//!
//! Usage: `mars-invaders [settings.json] [frames]`

use std::path::PathBuf;

use mars_invaders::Settings;
use mars_invaders::audio::{AudioManager, LogAudio};
use mars_invaders::game::{ActiveScreen, Game};
use mars_invaders::platform::{FrameClock, Key, KeyDecoder, KeySnapshot};
use mars_invaders::renderer::DrawList;
use mars_invaders::sim::Autopilot;

/// Default run length: five minutes at 60 fps
const DEFAULT_FRAMES: u64 = 60 * 60 * 5;
const DEFAULT_SEED: u64 = 0x4d41_5253;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Mars Invaders (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let frames = match args.next().map(|a| a.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::warn!("Bad frame count ({e}), using {DEFAULT_FRAMES}");
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };

    let settings = Settings::load_or_default(settings_path.as_deref());
    let frame_dt = settings.screen.tick_dt();
    let audio = AudioManager::new(Box::new(LogAudio), &settings.audio);
    let mut game = Game::new(settings, audio, DEFAULT_SEED);

    let mut clock = FrameClock::new(frame_dt);
    let mut decoder = KeyDecoder::new();
    let mut pilot = Autopilot::new();
    let mut draw_list = DrawList::new();
    let mut final_outcome = None;

    for frame in 0..frames {
        if !game.is_running() {
            break;
        }

        // Menu: press Enter. Game over: note the result and quit.
        let mut keys = KeySnapshot::new();
        match game.screen() {
            ActiveScreen::Menu(_) if frame % 2 == 0 => keys.press(Key::Confirm),
            ActiveScreen::GameOver(over) => {
                final_outcome = Some(over.outcome);
                keys.press(Key::Quit);
            }
            _ => {}
        }
        let host_input = decoder.decode(&keys);

        for step in 0..clock.advance(frame_dt) {
            let mut input = if step == 0 {
                host_input
            } else {
                host_input.held_only()
            };
            if let Some(session) = game.session() {
                let auto = pilot.drive(session);
                input.move_left_held = auto.move_left_held;
                input.move_right_held = auto.move_right_held;
                input.fire_pressed |= auto.fire_pressed;
            }
            game.tick(&input);
        }

        draw_list.clear();
        game.render(&mut draw_list);
        log::trace!("frame {frame}: {} draw calls", draw_list.len());
    }

    match (final_outcome, game.session()) {
        (Some(outcome), _) => log::info!(
            "Finished: {} with score {} at level {}",
            if outcome.win { "won" } else { "lost" },
            outcome.score,
            outcome.level
        ),
        (None, Some(session)) => log::info!(
            "Stopped after {frames} frames: score {}, level {}, {} lives left",
            session.score,
            session.level,
            session.lives
        ),
        (None, None) => log::info!("Stopped after {frames} frames"),
    }
}
