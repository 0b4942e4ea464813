//! The screen state machine.
//!
//! ```text
//! Title ──▶ Menu ──▶ Playing ──▶ GameOver ──▶ Menu
//!   ▲                  │ │
//!   └── pause: quit ───┘ └──▶ Ending (process exits)
//! ```
//!
//! `Game` owns the session, the RNG and the menu/pause selections. Each frame
//! the caller feeds the frame's input events and held keys to [`Game::frame`]
//! and draws with [`Game::render`].

use rand::Rng;

use crate::compute::{self, Outcome};
use crate::config::{GameConfig, LevelExit};
use crate::entities::Session;
use crate::input::{HeldKeys, InputEvent, Key};
use crate::powers::{BossBehavior, Dormant, Inert, TimePowerEffect};
use crate::render::{self, Assets, HudView, Surface, C_BACKGROUND};

pub const MENU_OPTIONS: [&str; 2] = ["Play", "Quit"];
pub const PAUSE_OPTIONS: [&str; 2] = ["Resume", "Quit to Main Menu"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Title,
    Menu,
    Playing,
    GameOver,
    Ending,
}

impl Screen {
    /// Edges of the state machine; anything else is a programming error.
    pub fn can_enter(self, next: Screen) -> bool {
        use Screen::*;
        matches!(
            (self, next),
            (Title, Menu)
                | (Title, Playing)
                | (Menu, Playing)
                | (Playing, Title)
                | (Playing, GameOver)
                | (Playing, Ending)
                | (GameOver, Menu)
                | (GameOver, Title)
        )
    }
}

/// Final tally handed back when the last level is completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub artifacts: usize,
    pub lore_items: usize,
    pub levels_completed: u32,
}

/// What the caller should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Quit requested: exit immediately with status 0.
    Quit,
    /// The final level was completed: show the summary and exit with status 0.
    Finished(Summary),
}

/// Cyclic selection over a fixed number of options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selector {
    index: usize,
    len: usize,
}

impl Selector {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn up(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
    }

    pub fn down(&mut self) {
        self.index = (self.index + 1) % self.len;
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

pub struct Game<R: Rng> {
    config: GameConfig,
    rng: R,
    screen: Screen,
    /// Frames spent on the current screen.
    screen_frames: u32,
    menu: Selector,
    pause_menu: Selector,
    paused: bool,
    session: Session,
    time_effect: Box<dyn TimePowerEffect>,
    boss: Box<dyn BossBehavior>,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, mut rng: R) -> Self {
        let session = compute::new_session(&config, &mut rng);
        Self {
            config,
            rng,
            screen: Screen::Title,
            screen_frames: 0,
            menu: Selector::new(MENU_OPTIONS.len()),
            pause_menu: Selector::new(PAUSE_OPTIONS.len()),
            paused: false,
            session,
            time_effect: Box::new(Inert),
            boss: Box::new(Dormant),
        }
    }

    /// Replace the no-op time power and boss hooks.
    pub fn with_hooks(
        mut self,
        time_effect: Box<dyn TimePowerEffect>,
        boss: Box<dyn BossBehavior>,
    ) -> Self {
        self.time_effect = time_effect;
        self.boss = boss;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn menu_selection(&self) -> usize {
        self.menu.index()
    }

    pub fn pause_selection(&self) -> usize {
        self.pause_menu.index()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn summary(&self) -> Summary {
        Summary {
            artifacts: self.session.artifacts.len(),
            lore_items: self.session.lore_items.len(),
            levels_completed: self.session.current_level,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    fn enter(&mut self, next: Screen) {
        assert!(
            self.screen.can_enter(next),
            "invalid screen transition {:?} -> {:?}",
            self.screen,
            next
        );
        tracing::info!(target: "game", from = ?self.screen, to = ?next, "screen transition");
        self.screen = next;
        self.screen_frames = 0;
    }

    /// Fresh session at level 1, straight into play.
    fn start_session(&mut self) {
        self.session = compute::new_session(&self.config, &mut self.rng);
        self.paused = false;
        self.pause_menu.reset();
        self.enter(Screen::Playing);
    }

    fn apply(&mut self, outcome: Outcome) -> Flow {
        match outcome {
            Outcome::Continue | Outcome::LevelAdvanced(_) => Flow::Continue,
            Outcome::TimeUp => {
                self.enter(Screen::GameOver);
                Flow::Continue
            }
            Outcome::Finished => {
                self.enter(Screen::Ending);
                Flow::Finished(self.summary())
            }
        }
    }

    // ── Frame ────────────────────────────────────────────────────────────────

    /// Run one frame: drain `events`, then update. A quit stops processing
    /// immediately.
    pub fn frame(&mut self, events: &[InputEvent], held: HeldKeys) -> Flow {
        for event in events {
            let flow = self.handle_event(*event);
            if flow != Flow::Continue {
                return flow;
            }
        }
        self.update(held)
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Flow {
        if event == InputEvent::Quit {
            tracing::info!(target: "game", "quit requested");
            return Flow::Quit;
        }
        match self.screen {
            Screen::Title | Screen::GameOver => Flow::Continue,
            Screen::Ending => Flow::Finished(self.summary()),
            Screen::Menu => self.handle_menu(event),
            Screen::Playing if self.paused => self.handle_pause(event),
            Screen::Playing => self.handle_play(event),
        }
    }

    fn handle_menu(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::KeyDown(Key::Up) => self.menu.up(),
            InputEvent::KeyDown(Key::Down) => self.menu.down(),
            InputEvent::KeyDown(Key::Enter) => match self.menu.index() {
                0 => self.start_session(),
                _ => {
                    tracing::info!(target: "game", "quit from main menu");
                    return Flow::Quit;
                }
            },
            _ => {}
        }
        Flow::Continue
    }

    fn handle_pause(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::KeyDown(Key::Escape) => self.paused = false,
            InputEvent::KeyDown(Key::Up) => self.pause_menu.up(),
            InputEvent::KeyDown(Key::Down) => self.pause_menu.down(),
            InputEvent::KeyDown(Key::Enter) => {
                self.paused = false;
                if self.pause_menu.index() == 1 {
                    self.enter(Screen::Title);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_play(&mut self, event: InputEvent) -> Flow {
        let outcome = match event {
            InputEvent::KeyDown(Key::Escape) if self.config.features.menu => {
                self.paused = true;
                self.pause_menu.reset();
                Outcome::Continue
            }
            InputEvent::KeyDown(Key::Enter) => {
                compute::interact_at_player(&mut self.session, &self.config, &mut self.rng)
            }
            InputEvent::MouseDown(at) => {
                compute::interact_at_point(&mut self.session, at, &self.config, &mut self.rng)
            }
            InputEvent::KeyDown(Key::Space) => {
                compute::use_time_power(&self.session, self.time_effect.as_mut());
                Outcome::Continue
            }
            _ => Outcome::Continue,
        };
        self.apply(outcome)
    }

    pub fn update(&mut self, held: HeldKeys) -> Flow {
        match self.screen {
            Screen::Title => {
                self.screen_frames += 1;
                if self.screen_frames >= self.config.frames_for(self.config.title_secs) {
                    if self.config.features.menu {
                        self.menu.reset();
                        self.enter(Screen::Menu);
                    } else {
                        self.start_session();
                    }
                }
                Flow::Continue
            }
            Screen::Menu => Flow::Continue,
            Screen::Playing if self.paused => Flow::Continue,
            Screen::Playing => {
                let outcome = compute::tick(
                    &mut self.session,
                    held,
                    &self.config,
                    self.boss.as_mut(),
                    &mut self.rng,
                );
                self.apply(outcome)
            }
            Screen::GameOver => {
                self.screen_frames += 1;
                if self.screen_frames >= self.config.frames_for(self.config.game_over_secs) {
                    // The session is kept as is; choosing Play starts a fresh one.
                    if self.config.features.menu {
                        self.menu.reset();
                        self.enter(Screen::Menu);
                    } else {
                        self.enter(Screen::Title);
                    }
                }
                Flow::Continue
            }
            Screen::Ending => Flow::Finished(self.summary()),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    pub fn render(&self, surface: &mut dyn Surface, assets: &Assets) {
        let (w, h) = (self.config.screen_width, self.config.screen_height);
        let canvas_h = h + self.config.ui_height;
        match self.screen {
            Screen::Title => render::draw_title(surface, w, canvas_h),
            Screen::Menu => render::draw_menu(surface, &MENU_OPTIONS, self.menu.index(), w, canvas_h),
            Screen::GameOver => render::draw_game_over(surface, &self.session, w, canvas_h),
            Screen::Ending => render::draw_ending(surface, &self.session, w, canvas_h),
            Screen::Playing => self.render_play(surface, assets),
        }
    }

    fn render_play(&self, surface: &mut dyn Surface, assets: &Assets) {
        let s = &self.session;
        let cfg = &self.config;
        surface.clear(C_BACKGROUND);
        for tile in &s.tiles {
            render::draw_tile(surface, tile, assets.tile_image(s.theme, tile.image));
        }
        if cfg.features.scrolling {
            render::draw_background(surface, s.background_offset, cfg.screen_width);
        }
        if cfg.features.level_exit == LevelExit::Door {
            render::draw_door(surface, &s.door, s.door_open, assets);
        }
        for enemy in &s.enemies {
            render::draw_enemy(surface, enemy);
        }
        render::draw_player(surface, &s.player, assets.player.as_ref());
        if s.boss_present {
            self.boss.draw(surface, s);
        }
        render::draw_hud(
            surface,
            &HudView {
                session: s,
                time_remaining: s.time_remaining(cfg.target_fps),
                screen_width: cfg.screen_width,
                screen_height: cfg.screen_height,
                ui_height: cfg.ui_height,
            },
        );
        if self.paused {
            render::draw_pause(
                surface,
                &PAUSE_OPTIONS,
                self.pause_menu.index(),
                cfg.screen_width,
                cfg.screen_height,
            );
        }
    }
}
