//! Platform abstraction layer
//!
//! Turns whatever the host delivers into what the game understands:
//! - Held-key snapshots into edge-triggered [`TickInput`] intents
//! - Real frame time into a whole number of fixed simulation ticks

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::sim::TickInput;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    Confirm,
    Quit,
}

impl Key {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

/// Which keys are down right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    held: [bool; Key::COUNT],
}

impl KeySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with exactly these keys down
    pub fn with(keys: &[Key]) -> Self {
        let mut snapshot = Self::default();
        for key in keys {
            snapshot.press(*key);
        }
        snapshot
    }

    pub fn press(&mut self, key: Key) {
        self.held[key.index()] = true;
    }

    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        self.held[key.index()]
    }
}

/// Edge detector from key snapshots to tick intents
#[derive(Debug, Clone, Default)]
pub struct KeyDecoder {
    previous: KeySnapshot,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one frame's snapshot.
    ///
    /// Movement and quit follow the held state; fire, pause and confirm are
    /// reported only on the frame their key goes down.
    pub fn decode(&mut self, keys: &KeySnapshot) -> TickInput {
        let pressed = |key: Key| keys.is_down(key) && !self.previous.is_down(key);
        let input = TickInput {
            move_left_held: keys.is_down(Key::Left),
            move_right_held: keys.is_down(Key::Right),
            fire_pressed: pressed(Key::Fire),
            pause_toggled: pressed(Key::Pause),
            confirm_pressed: pressed(Key::Confirm),
            quit_requested: keys.is_down(Key::Quit),
        };
        self.previous = *keys;
        input
    }
}

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick_dt: f32,
    accumulator: f32,
}

impl FrameClock {
    pub fn new(tick_dt: f32) -> Self {
        Self {
            tick_dt,
            accumulator: 0.0,
        }
    }

    /// Feed one frame of real time; returns how many ticks to run.
    ///
    /// Long frames are clamped and at most `MAX_SUBSTEPS` ticks are
    /// returned, so a stall cannot snowball.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.tick_dt && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.tick_dt;
            substeps += 1;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut decoder = KeyDecoder::new();
        let held = KeySnapshot::with(&[Key::Fire, Key::Left]);

        let first = decoder.decode(&held);
        assert!(first.fire_pressed);
        assert!(first.move_left_held);

        let second = decoder.decode(&held);
        assert!(!second.fire_pressed);
        assert!(second.move_left_held);

        decoder.decode(&KeySnapshot::new());
        assert!(decoder.decode(&held).fire_pressed);
    }

    #[test]
    fn test_pause_and_confirm_edges() {
        let mut decoder = KeyDecoder::new();
        let keys = KeySnapshot::with(&[Key::Pause, Key::Confirm]);
        let input = decoder.decode(&keys);
        assert!(input.pause_toggled && input.confirm_pressed);
        let input = decoder.decode(&keys);
        assert!(!input.pause_toggled && !input.confirm_pressed);
    }

    #[test]
    fn test_quit_is_level() {
        let mut decoder = KeyDecoder::new();
        let keys = KeySnapshot::with(&[Key::Quit]);
        assert!(decoder.decode(&keys).quit_requested);
        assert!(decoder.decode(&keys).quit_requested);
    }

    #[test]
    fn test_frame_clock_steps() {
        let mut clock = FrameClock::new(0.25);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 1);
        // 0.05 carried over
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.15), 1);
    }

    #[test]
    fn test_frame_clock_caps_substeps() {
        let mut clock = FrameClock::new(0.001);
        // 0.1s clamp would be 100 ticks, capped at MAX_SUBSTEPS
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        assert_eq!(clock.advance(-1.0), MAX_SUBSTEPS);
    }
}
