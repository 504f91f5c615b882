//! Demo autopilot
//!
//! Drives the ship from the session state alone, for attract mode and the
//! headless binary. It only ever produces a [`TickInput`], so it goes through
//! exactly the same rules as a human player.

use super::state::PlayingSession;
use super::tick::TickInput;

/// Pickups lower than this fraction of the screen are worth chasing
const PICKUP_CHASE_LINE: f32 = 0.5;
/// Close enough to the target to stop steering (pixels)
const DEAD_ZONE: f32 = 4.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Fire is edge-triggered, so alternate press/release ticks
    fire_held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this tick's input
    pub fn drive(&mut self, session: &PlayingSession) -> TickInput {
        let mut input = TickInput::default();
        if session.outcome.is_some() || session.is_suspended() {
            self.fire_held = false;
            return input;
        }

        if let Some(target_x) = target_x(session) {
            let ship_x = session.ship.rect.center().x;
            let dx = target_x - ship_x;
            if dx > DEAD_ZONE {
                input.move_right_held = true;
            } else if dx < -DEAD_ZONE {
                input.move_left_held = true;
            }
        }

        input.fire_pressed = !self.fire_held;
        self.fire_held = !self.fire_held;
        input
    }
}

/// Horizontal target: a low pickup if there is one, else the lowest alien
fn target_x(session: &PlayingSession) -> Option<f32> {
    let chase_line = session.settings.screen.height * PICKUP_CHASE_LINE;
    let pickup = session
        .pickups
        .iter()
        .filter(|p| p.rect.center().y > chase_line)
        .max_by(|a, b| {
            a.rect
                .bottom()
                .partial_cmp(&b.rect.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(pickup) = pickup {
        return Some(pickup.rect.center().x);
    }

    session
        .enemies
        .iter()
        .filter(|e| !e.is_spawning())
        .max_by(|a, b| {
            a.rect
                .bottom()
                .partial_cmp(&b.rect.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
                // Prefer the alien the fleet is sliding toward
                .then_with(|| {
                    let heading = session.fleet_direction.sign();
                    (a.rect.center().x * heading)
                        .partial_cmp(&(b.rect.center().x * heading))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        })
        .map(|e| e.rect.center().x + e.speed_x * session.fleet_direction.sign() * 30.0)
}
