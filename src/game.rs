//! Top-level game loop state machine
//!
//! Exactly one screen is active at a time:
//! Menu --confirm--> Playing --session over--> GameOver --confirm--> Menu.
//! A quit request from any screen stops the loop.

use crate::audio::{AudioManager, MusicTrack, SoundEffect};
use crate::renderer::{RenderSink, draw_game_over, draw_menu, draw_playing};
use crate::settings::Settings;
use crate::sim::{Outcome, PlayingSession, TickInput, tick};

/// Screen change requested by the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ToPlaying,
    ToGameOver(Outcome),
    ToMenu,
}

/// One screen of the game
pub trait Screen {
    /// Take this tick's decoded input
    fn handle_input(&mut self, input: &TickInput);
    /// Advance one fixed tick
    fn update(&mut self, dt: f32, audio: &mut AudioManager) -> Option<Transition>;
    fn render(&self, sink: &mut dyn RenderSink);
}

/// Title screen
#[derive(Debug, Clone)]
pub struct MenuState {
    settings: Settings,
    confirmed: bool,
}

impl MenuState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            confirmed: false,
        }
    }
}

impl Screen for MenuState {
    fn handle_input(&mut self, input: &TickInput) {
        self.confirmed |= input.confirm_pressed;
    }

    fn update(&mut self, _dt: f32, _audio: &mut AudioManager) -> Option<Transition> {
        std::mem::take(&mut self.confirmed).then_some(Transition::ToPlaying)
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        draw_menu(&self.settings.screen, sink);
    }
}

/// In-game screen; owns the play session
#[derive(Debug)]
pub struct PlayingState {
    session: PlayingSession,
    input: TickInput,
}

impl PlayingState {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            session: PlayingSession::new(settings, seed),
            input: TickInput::default(),
        }
    }

    pub fn session(&self) -> &PlayingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PlayingSession {
        &mut self.session
    }
}

impl Screen for PlayingState {
    fn handle_input(&mut self, input: &TickInput) {
        self.input = *input;
    }

    fn update(&mut self, dt: f32, audio: &mut AudioManager) -> Option<Transition> {
        tick(&mut self.session, &self.input, dt);
        // One-shots are consumed by the tick that saw them
        self.input = self.input.held_only();

        let events = self.session.drain_events();
        audio.handle_events(&events);

        self.session.outcome.map(Transition::ToGameOver)
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        draw_playing(&self.session, sink);
    }
}

/// Win or loss summary
#[derive(Debug, Clone)]
pub struct GameOverState {
    settings: Settings,
    pub outcome: Outcome,
    confirmed: bool,
}

impl GameOverState {
    pub fn new(settings: Settings, outcome: Outcome) -> Self {
        Self {
            settings,
            outcome,
            confirmed: false,
        }
    }
}

impl Screen for GameOverState {
    fn handle_input(&mut self, input: &TickInput) {
        self.confirmed |= input.confirm_pressed;
    }

    fn update(&mut self, _dt: f32, _audio: &mut AudioManager) -> Option<Transition> {
        std::mem::take(&mut self.confirmed).then_some(Transition::ToMenu)
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        let o = &self.outcome;
        draw_game_over(&self.settings.screen, o.win, o.score, o.level, sink);
    }
}

/// The active screen
#[derive(Debug)]
pub enum ActiveScreen {
    Menu(MenuState),
    Playing(PlayingState),
    GameOver(GameOverState),
}

impl ActiveScreen {
    fn as_screen(&self) -> &dyn Screen {
        match self {
            ActiveScreen::Menu(s) => s,
            ActiveScreen::Playing(s) => s,
            ActiveScreen::GameOver(s) => s,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ActiveScreen::Menu(s) => s,
            ActiveScreen::Playing(s) => s,
            ActiveScreen::GameOver(s) => s,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActiveScreen::Menu(_) => "menu",
            ActiveScreen::Playing(_) => "playing",
            ActiveScreen::GameOver(_) => "game_over",
        }
    }
}

/// Whole game: settings, active screen and audio
#[derive(Debug)]
pub struct Game {
    settings: Settings,
    screen: ActiveScreen,
    audio: AudioManager,
    running: bool,
    seed: u64,
    sessions_started: u64,
}

impl Game {
    /// Start at the title screen
    pub fn new(settings: Settings, mut audio: AudioManager, seed: u64) -> Self {
        audio.play_music(MusicTrack::Title);
        log::info!("Game started (seed {seed})");
        Self {
            screen: ActiveScreen::Menu(MenuState::new(settings.clone())),
            settings,
            audio,
            running: true,
            seed,
            sessions_started: 0,
        }
    }

    /// Run one fixed tick of the active screen
    pub fn tick(&mut self, input: &TickInput) {
        if !self.running {
            return;
        }
        if input.quit_requested {
            log::info!("Quit requested from {}", self.screen.name());
            self.running = false;
            return;
        }

        let dt = self.settings.screen.tick_dt();
        let screen = self.screen.as_screen_mut();
        screen.handle_input(input);
        if let Some(transition) = screen.update(dt, &mut self.audio) {
            self.apply(transition);
        }
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        self.screen.as_screen().render(sink);
    }

    fn apply(&mut self, transition: Transition) {
        log::debug!("{} -> {transition:?}", self.screen.name());
        self.screen = match transition {
            Transition::ToPlaying => {
                // Each session gets its own stream, reproducible from the game seed
                let seed = self.seed.wrapping_add(self.sessions_started);
                self.sessions_started += 1;
                self.audio.play(SoundEffect::ButtonClick);
                self.audio.play_music(MusicTrack::Gameplay);
                ActiveScreen::Playing(PlayingState::new(self.settings.clone(), seed))
            }
            Transition::ToGameOver(outcome) => {
                log::info!(
                    "Game over ({}): score {}, level {}",
                    if outcome.win { "win" } else { "loss" },
                    outcome.score,
                    outcome.level
                );
                self.audio.stop_music();
                ActiveScreen::GameOver(GameOverState::new(self.settings.clone(), outcome))
            }
            Transition::ToMenu => {
                self.audio.play_music(MusicTrack::Title);
                ActiveScreen::Menu(MenuState::new(self.settings.clone()))
            }
        };
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn screen(&self) -> &ActiveScreen {
        &self.screen
    }

    /// The live session, if a game is in progress
    pub fn session(&self) -> Option<&PlayingSession> {
        match &self.screen {
            ActiveScreen::Playing(p) => Some(p.session()),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut PlayingSession> {
        match &mut self.screen {
            ActiveScreen::Playing(p) => Some(p.session_mut()),
            _ => None,
        }
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }
}
