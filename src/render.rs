//! Drawing through an abstract surface.
//!
//! All coordinates are logical canvas pixels: the play area is
//! `screen_width x screen_height` with the HUD strip directly below it. The
//! functions here only translate game state into surface calls; they perform
//! no game logic.

use crate::entities::{Door, Enemy, Player, Session, Tile, TileContent};
use crate::geometry::{Point, Rect};
use crate::level::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale each channel by `factor` percent, saturating at 255.
    pub fn shade(self, factor: u16) -> Self {
        let s = |c: u8| ((c as u16 * factor) / 100).min(255) as u8;
        Self::new(s(self.r), s(self.g), s(self.b))
    }
}

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Rgb = Rgb::new(0, 0, 0);
pub const C_ARTIFACT: Rgb = Rgb::new(255, 215, 0);
pub const C_LORE: Rgb = Rgb::new(0, 191, 255);
pub const C_KEY: Rgb = Rgb::new(255, 255, 255);
pub const C_REVEALED: Rgb = Rgb::new(100, 100, 100);
pub const C_ENEMY: Rgb = Rgb::new(255, 0, 0);
pub const C_DOOR: Rgb = Rgb::new(0, 255, 0);
pub const C_PLAYER: Rgb = Rgb::new(0, 128, 255);
pub const C_HUD_BG: Rgb = Rgb::new(50, 50, 50);
pub const C_TEXT: Rgb = Rgb::new(255, 255, 255);
pub const C_HIGHLIGHT: Rgb = Rgb::new(255, 215, 0);
pub const C_DIM: Rgb = Rgb::new(128, 128, 128);
pub const C_BAD: Rgb = Rgb::new(220, 40, 40);

/// A fixed-size picture. Backends that cannot show pixels render it as a
/// filled block carrying a glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: i32,
    pub height: i32,
    pub fill: Rgb,
    pub glyph: char,
    pub glyph_color: Rgb,
}

impl Image {
    pub fn solid(width: i32, height: i32, fill: Rgb) -> Self {
        Self {
            width,
            height,
            fill,
            glyph: ' ',
            glyph_color: fill,
        }
    }
}

pub trait Surface {
    fn clear(&mut self, color: Rgb);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn blit(&mut self, image: &Image, at: Point);

    /// Draw a single line of text with its top-left corner at `at`.
    fn draw_text(&mut self, text: &str, at: Point, color: Rgb);

    /// Width `text` occupies when drawn, in canvas pixels.
    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * 10
    }
}

/// Images the renderer draws with. Built by `assets::load_assets`.
#[derive(Clone, Debug)]
pub struct Assets {
    /// Tile pools per theme, in `Theme::ALL` order.
    pub tiles: Vec<Vec<Image>>,
    /// Directional player sprites: left, right, up, down.
    pub player: Option<[Image; 4]>,
    pub door_closed: Image,
    pub door_open: Image,
}

impl Assets {
    pub fn tile_image(&self, theme: Theme, index: usize) -> Option<&Image> {
        let pool = Theme::ALL.iter().position(|t| *t == theme)?;
        self.tiles.get(pool)?.get(index)
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

pub fn content_color(content: Option<TileContent>) -> Rgb {
    match content {
        Some(TileContent::Artifact) => C_ARTIFACT,
        Some(TileContent::Lore) => C_LORE,
        Some(TileContent::Key) => C_KEY,
        None => C_REVEALED,
    }
}

/// Unrevealed tiles show their image; revealed ones a colour keyed by content.
pub fn draw_tile<S: Surface + ?Sized>(surface: &mut S, tile: &Tile, image: Option<&Image>) {
    if tile.revealed {
        surface.fill_rect(tile.rect, content_color(tile.content));
        return;
    }
    match image {
        Some(img) => surface.blit(img, tile.rect.top_left()),
        None => surface.fill_rect(tile.rect, C_DIM),
    }
}

pub fn draw_player<S: Surface + ?Sized>(surface: &mut S, player: &Player, sprites: Option<&[Image; 4]>) {
    use crate::entities::Facing;
    match sprites {
        Some(set) => {
            let idx = match player.facing {
                Facing::Left => 0,
                Facing::Right => 1,
                Facing::Up => 2,
                Facing::Down => 3,
            };
            surface.blit(&set[idx], player.rect.top_left());
        }
        None => surface.fill_rect(player.rect, C_PLAYER),
    }
}

pub fn draw_enemy<S: Surface + ?Sized>(surface: &mut S, enemy: &Enemy) {
    surface.fill_rect(enemy.rect, C_ENEMY);
}

pub fn draw_door<S: Surface + ?Sized>(surface: &mut S, door: &Door, open: bool, assets: &Assets) {
    let image = if open { &assets.door_open } else { &assets.door_closed };
    surface.blit(image, door.rect.top_left());
}

/// Thin parallax band along the top of the play area, driven by the
/// background offset.
pub fn draw_background<S: Surface + ?Sized>(surface: &mut S, offset: i32, screen_width: i32) {
    const STRIPE: i32 = 80;
    let phase = offset.rem_euclid(STRIPE);
    let mut x = phase - STRIPE;
    while x < screen_width {
        surface.fill_rect(Rect::new(x, 0, STRIPE / 2, 4), C_DIM.shade(40));
        x += STRIPE;
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

pub struct HudView<'a> {
    pub session: &'a Session,
    pub time_remaining: f64,
    pub screen_width: i32,
    pub screen_height: i32,
    pub ui_height: i32,
}

pub fn draw_hud<S: Surface + ?Sized>(surface: &mut S, hud: &HudView<'_>) {
    let s = hud.session;
    let top = hud.screen_height;
    surface.fill_rect(
        Rect::new(0, top, hud.screen_width, hud.ui_height.max(1)),
        C_HUD_BG,
    );

    let row1 = top + 10;
    let row2 = top + hud.ui_height / 2;
    let col = |frac: i32| hud.screen_width * frac / 4 + 10;

    surface.draw_text(
        &format!("Level: {} - {}", s.current_level, s.theme.name()),
        Point::new(col(0), row1),
        C_TEXT,
    );
    surface.draw_text(
        &format!("Time: {}", hud.time_remaining.ceil() as i64),
        Point::new(col(2), row1),
        C_TEXT,
    );
    if let Some(power) = s.time_power {
        surface.draw_text(
            &format!("Power: {}", power.label()),
            Point::new(col(3), row1),
            C_HIGHLIGHT,
        );
    }
    surface.draw_text(
        &format!("Tiles Left: {}", s.tiles_left()),
        Point::new(col(0), row2),
        C_TEXT,
    );
    surface.draw_text(
        &format!("Artifacts: {}", s.artifacts.len()),
        Point::new(col(2), row2),
        C_ARTIFACT,
    );
    surface.draw_text(
        &format!("Lore Items: {}", s.lore_items.len()),
        Point::new(col(3), row2),
        C_LORE,
    );
    if s.boss_present {
        let banner = "A guardian stirs in this era";
        let x = (hud.screen_width - surface.text_width(banner)) / 2;
        surface.draw_text(banner, Point::new(x.max(0), top - 30), C_BAD);
    }
}

// ── Full screens ──────────────────────────────────────────────────────────────

fn draw_centered<S: Surface + ?Sized>(surface: &mut S, text: &str, y: i32, width: i32, color: Rgb) {
    let x = (width - surface.text_width(text)) / 2;
    surface.draw_text(text, Point::new(x.max(0), y), color);
}

/// Vertical list of options, the selected one marked and highlighted.
pub fn draw_options<S: Surface + ?Sized>(
    surface: &mut S,
    options: &[&str],
    selected: usize,
    top: i32,
    width: i32,
) {
    for (i, label) in options.iter().enumerate() {
        let (text, color) = if i == selected {
            (format!("> {label} <"), C_HIGHLIGHT)
        } else {
            (label.to_string(), C_TEXT)
        };
        draw_centered(surface, &text, top + i as i32 * 50, width, color);
    }
}

pub fn draw_title<S: Surface + ?Sized>(surface: &mut S, width: i32, height: i32) {
    surface.clear(C_BACKGROUND);
    draw_centered(surface, "TEMPORAL LABYRINTH", height / 2 - 40, width, C_HIGHLIGHT);
    draw_centered(surface, "Uncover the past, one tile at a time", height / 2 + 10, width, C_DIM);
}

pub fn draw_menu<S: Surface + ?Sized>(
    surface: &mut S,
    options: &[&str],
    selected: usize,
    width: i32,
    height: i32,
) {
    surface.clear(C_BACKGROUND);
    draw_centered(surface, "TEMPORAL LABYRINTH", height / 4, width, C_HIGHLIGHT);
    draw_options(surface, options, selected, height / 2 - 25, width);
    draw_centered(
        surface,
        "Up/Down: select   Enter: confirm",
        height - 40,
        width,
        C_DIM,
    );
}

pub fn draw_pause<S: Surface + ?Sized>(
    surface: &mut S,
    options: &[&str],
    selected: usize,
    width: i32,
    height: i32,
) {
    let panel = Rect::new(width / 4, height / 4, width / 2, height / 2);
    surface.fill_rect(panel, C_HUD_BG);
    draw_centered(surface, "PAUSED", panel.y + 30, width, C_TEXT);
    draw_options(surface, options, selected, panel.y + 100, width);
}

pub fn draw_game_over<S: Surface + ?Sized>(surface: &mut S, session: &Session, width: i32, height: i32) {
    surface.clear(C_BACKGROUND);
    draw_centered(surface, "GAME OVER", height / 2 - 60, width, C_BAD);
    draw_centered(
        surface,
        &format!("Time ran out on level {}", session.current_level),
        height / 2,
        width,
        C_TEXT,
    );
    draw_centered(
        surface,
        &format!(
            "Artifacts: {}   Lore Items: {}",
            session.artifacts.len(),
            session.lore_items.len()
        ),
        height / 2 + 40,
        width,
        C_DIM,
    );
}

pub fn draw_ending<S: Surface + ?Sized>(surface: &mut S, session: &Session, width: i32, height: i32) {
    surface.clear(C_BACKGROUND);
    draw_centered(
        surface,
        "You've completed the Temporal Labyrinth!",
        height / 2 - 40,
        width,
        C_HIGHLIGHT,
    );
    draw_centered(
        surface,
        &format!(
            "Artifacts: {}   Lore Items: {}",
            session.artifacts.len(),
            session.lore_items.len()
        ),
        height / 2 + 10,
        width,
        C_TEXT,
    );
}
