use rand::rngs::StdRng;
use rand::SeedableRng;

use temporal_labyrinth::assets::{load_assets, BuiltinAssets};
use temporal_labyrinth::config::GameConfig;
use temporal_labyrinth::entities::TileContent;
use temporal_labyrinth::game::*;
use temporal_labyrinth::geometry::{Point, Rect};
use temporal_labyrinth::input::{HeldKeys, InputEvent, Key};
use temporal_labyrinth::render::{Image, Rgb, Surface, C_ARTIFACT, C_ENEMY, C_LORE, C_REVEALED};

fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.features.enemies = false;
    config
}

fn new_game(config: GameConfig) -> Game<StdRng> {
    Game::new(config, StdRng::seed_from_u64(7))
}

fn key(k: Key) -> InputEvent {
    InputEvent::KeyDown(k)
}

fn idle(game: &mut Game<StdRng>, frames: usize) -> Flow {
    let mut flow = Flow::Continue;
    for _ in 0..frames {
        flow = game.frame(&[], HeldKeys::default());
    }
    flow
}

/// Title → menu → Play.
fn playing_game(config: GameConfig) -> Game<StdRng> {
    let mut game = new_game(config);
    idle(&mut game, 120);
    game.handle_event(key(Key::Enter));
    assert_eq!(game.screen(), Screen::Playing);
    game
}

// ── Title & menu ──────────────────────────────────────────────────────────────

#[test]
fn title_lasts_two_seconds() {
    let mut game = new_game(quiet_config());
    idle(&mut game, 119);
    assert_eq!(game.screen(), Screen::Title);
    idle(&mut game, 1);
    assert_eq!(game.screen(), Screen::Menu);
}

#[test]
fn title_ignores_keys() {
    let mut game = new_game(quiet_config());
    game.frame(&[key(Key::Enter), key(Key::Down)], HeldKeys::default());
    assert_eq!(game.screen(), Screen::Title);
}

#[test]
fn menu_selection_cycles() {
    let mut game = new_game(quiet_config());
    idle(&mut game, 120);
    assert_eq!(game.menu_selection(), 0);
    game.handle_event(key(Key::Down));
    assert_eq!(game.menu_selection(), 1);
    game.handle_event(key(Key::Down));
    assert_eq!(game.menu_selection(), 0);
    game.handle_event(key(Key::Up));
    assert_eq!(game.menu_selection(), 1);
}

#[test]
fn menu_quit_exits() {
    let mut game = new_game(quiet_config());
    idle(&mut game, 120);
    let flow = game.frame(&[key(Key::Down), key(Key::Enter)], HeldKeys::default());
    assert_eq!(flow, Flow::Quit);
}

#[test]
fn quit_event_wins_everywhere() {
    let mut game = new_game(quiet_config());
    assert_eq!(game.frame(&[InputEvent::Quit], HeldKeys::default()), Flow::Quit);
    let mut game = playing_game(quiet_config());
    // Events after the quit are never processed.
    let flow = game.frame(&[InputEvent::Quit, key(Key::Escape)], HeldKeys::default());
    assert_eq!(flow, Flow::Quit);
    assert!(!game.is_paused());
}

#[test]
fn play_starts_a_fresh_session() {
    let mut game = playing_game(quiet_config());
    let s = game.session();
    assert_eq!(s.current_level, 1);
    assert!(s.artifacts.is_empty());
    assert_eq!(s.frames_remaining, game.config().level_frames());
}

#[test]
fn without_menu_title_goes_straight_to_play() {
    let mut config = quiet_config();
    config.features.menu = false;
    let mut game = new_game(config);
    idle(&mut game, 120);
    assert_eq!(game.screen(), Screen::Playing);
    game.handle_event(key(Key::Escape));
    assert!(!game.is_paused());
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn escape_toggles_pause_and_freezes_time() {
    let mut game = playing_game(quiet_config());
    let before = game.session().frames_remaining;
    game.frame(&[key(Key::Escape)], HeldKeys::default());
    assert!(game.is_paused());
    idle(&mut game, 10);
    assert_eq!(game.session().frames_remaining, before);
    game.frame(&[key(Key::Escape)], HeldKeys::default());
    assert!(!game.is_paused());
    assert_eq!(game.session().frames_remaining, before - 1);
}

#[test]
fn paused_input_goes_to_pause_menu() {
    let mut game = playing_game(quiet_config());
    game.handle_event(key(Key::Escape));
    game.handle_event(key(Key::Down));
    assert_eq!(game.pause_selection(), 1);
    game.handle_event(key(Key::Down));
    assert_eq!(game.pause_selection(), 0);
    // Clicks do not reach the tiles while paused.
    game.handle_event(InputEvent::MouseDown(Point::new(5, 5)));
    assert!(!game.session().tiles[0].revealed);
}

#[test]
fn resume_clears_pause() {
    let mut game = playing_game(quiet_config());
    game.handle_event(key(Key::Escape));
    game.handle_event(key(Key::Enter));
    assert!(!game.is_paused());
    assert_eq!(game.screen(), Screen::Playing);
}

#[test]
fn quit_to_main_menu_goes_through_title() {
    let mut game = playing_game(quiet_config());
    game.handle_event(key(Key::Escape));
    game.handle_event(key(Key::Down));
    game.handle_event(key(Key::Enter));
    assert_eq!(game.screen(), Screen::Title);
    assert!(!game.is_paused());
    idle(&mut game, 120);
    assert_eq!(game.screen(), Screen::Menu);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn timer_expiry_leads_to_game_over_then_menu() {
    let mut config = quiet_config();
    config.level_time_secs = 1.0;
    let mut game = playing_game(config);
    idle(&mut game, 59);
    assert_eq!(game.screen(), Screen::Playing);
    idle(&mut game, 1);
    assert_eq!(game.screen(), Screen::GameOver);
    idle(&mut game, 119);
    assert_eq!(game.screen(), Screen::GameOver);
    idle(&mut game, 1);
    assert_eq!(game.screen(), Screen::Menu);
}

#[test]
fn game_over_keeps_session_until_play_is_chosen() {
    let mut config = quiet_config();
    config.level_time_secs = 1.0;
    let mut game = playing_game(config);
    game.session_mut().current_level = 4;
    idle(&mut game, 60 + 120);
    assert_eq!(game.screen(), Screen::Menu);
    assert_eq!(game.session().current_level, 4);
    game.frame(&[key(Key::Enter)], HeldKeys::default());
    assert_eq!(game.session().current_level, 1);
}

// ── Play ──────────────────────────────────────────────────────────────────────

#[test]
fn click_collects_through_the_state_machine() {
    let mut game = playing_game(quiet_config());
    let idx = game
        .session()
        .tiles
        .iter()
        .position(|t| t.content == Some(TileContent::Artifact))
        .expect("artifact placed");
    let r = game.session().tiles[idx].rect;
    game.handle_event(InputEvent::MouseDown(Point::new(r.x + 1, r.y + 1)));
    assert_eq!(game.session().artifacts.len(), 1);
    assert!(game.session().tiles[idx].revealed);
}

#[test]
fn finishing_the_last_level_reports_summary() {
    let mut config = quiet_config();
    config.max_levels = 1;
    let mut game = playing_game(config);
    let door = game.config().door;
    let s = game.session_mut();
    for t in s.tiles.iter_mut() {
        t.content = None;
    }
    s.door_open = true;
    s.player.teleport(Point::new(door.x, door.y));
    let flow = game.frame(&[], HeldKeys::default());
    assert_eq!(
        flow,
        Flow::Finished(Summary {
            artifacts: 0,
            lore_items: 0,
            levels_completed: 1,
        })
    );
    assert_eq!(game.screen(), Screen::Ending);
}

#[test]
fn screen_edges() {
    assert!(Screen::Title.can_enter(Screen::Menu));
    assert!(Screen::Playing.can_enter(Screen::GameOver));
    assert!(!Screen::Menu.can_enter(Screen::GameOver));
    assert!(!Screen::Ending.can_enter(Screen::Menu));
    assert!(!Screen::GameOver.can_enter(Screen::Playing));
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Clear(Rgb),
    Fill(Rect, Rgb),
    Blit(Point, char),
    Text(String),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Surface for Recorder {
    fn clear(&mut self, color: Rgb) {
        self.calls.push(Call::Clear(color));
    }
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.calls.push(Call::Fill(rect, color));
    }
    fn blit(&mut self, image: &Image, at: Point) {
        self.calls.push(Call::Blit(at, image.glyph));
    }
    fn draw_text(&mut self, text: &str, _at: Point, _color: Rgb) {
        self.calls.push(Call::Text(text.to_string()));
    }
}

impl Recorder {
    fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn menu_render_marks_selection() {
    let config = quiet_config();
    let assets = load_assets(&BuiltinAssets, &config).unwrap();
    let mut game = new_game(config);
    idle(&mut game, 120);
    game.handle_event(key(Key::Down));
    let mut rec = Recorder::default();
    game.render(&mut rec, &assets);
    let texts = rec.texts();
    assert!(texts.contains(&"Play"));
    assert!(texts.contains(&"> Quit <"));
}

#[test]
fn revealed_tiles_render_by_content() {
    let config = GameConfig::default();
    let assets = load_assets(&BuiltinAssets, &config).unwrap();
    let mut game = playing_game(config);
    {
        let s = game.session_mut();
        s.tiles[0].content = Some(TileContent::Artifact);
        s.tiles[0].revealed = true;
        s.tiles[1].content = Some(TileContent::Lore);
        s.tiles[1].revealed = true;
        s.tiles[2].content = None;
        s.tiles[2].revealed = true;
    }
    let mut rec = Recorder::default();
    game.render(&mut rec, &assets);

    let tiles = &game.session().tiles;
    assert!(rec.calls.contains(&Call::Fill(tiles[0].rect, C_ARTIFACT)));
    assert!(rec.calls.contains(&Call::Fill(tiles[1].rect, C_LORE)));
    assert!(rec.calls.contains(&Call::Fill(tiles[2].rect, C_REVEALED)));
    // Hidden tiles are blitted from their image pool.
    assert!(rec
        .calls
        .iter()
        .any(|c| matches!(c, Call::Blit(p, _) if *p == tiles[3].rect.top_left())));
    // Enemies are red rectangles.
    for e in &game.session().enemies {
        assert!(rec.calls.contains(&Call::Fill(e.rect, C_ENEMY)));
    }
    // Player sprite faces down initially.
    let p = game.session().player.rect.top_left();
    assert!(rec.calls.contains(&Call::Blit(p, '▼')));
    assert!(rec.texts().iter().any(|t| t.starts_with("Level: 1 - Ancient Egypt")));
}

#[test]
fn pause_overlay_rendered_while_paused() {
    let config = quiet_config();
    let assets = load_assets(&BuiltinAssets, &config).unwrap();
    let mut game = playing_game(config);
    game.handle_event(key(Key::Escape));
    let mut rec = Recorder::default();
    game.render(&mut rec, &assets);
    let texts = rec.texts();
    assert!(texts.contains(&"PAUSED"));
    assert!(texts.contains(&"> Resume <"));
}
