//! Game entity types: plain data with only bounding-box behaviour.
//!
//! Entities never touch session state; the session is mutated exclusively by
//! the functions in `compute`.

use std::fmt;

use crate::geometry::{Point, Rect};
use crate::input::HeldKeys;
use crate::level::{Theme, TimePower};

// ── Tiles ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileContent {
    Artifact,
    Lore,
    Key,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub rect: Rect,
    pub revealed: bool,
    /// At most one collectible per tile.
    pub content: Option<TileContent>,
    /// Index into the level's tile image pool, shown while unrevealed.
    pub image: usize,
}

impl Tile {
    pub fn new(x: i32, y: i32, size: i32, image: usize) -> Self {
        Self {
            rect: Rect::new(x, y, size, size),
            revealed: false,
            content: None,
            image,
        }
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn has_artifact(&self) -> bool {
        self.content == Some(TileContent::Artifact)
    }

    pub fn has_lore(&self) -> bool {
        self.content == Some(TileContent::Lore)
    }

    /// True while the tile still holds something the door is waiting on.
    pub fn blocks_door(&self) -> bool {
        self.has_artifact() || self.has_lore()
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub facing: Facing,
    pub speed: i32,
}

impl Player {
    pub fn new(start: Point, size: i32, speed: i32) -> Self {
        Self {
            rect: Rect::new(start.x, start.y, size, size),
            facing: Facing::Down,
            speed,
        }
    }

    /// Apply one frame of held-key movement, then clamp to the screen.
    ///
    /// Each axis is handled independently so diagonals combine; facing ends up
    /// as the last direction processed (left, right, up, down order).
    /// Returns whether any key moved the player.
    pub fn step(&mut self, held: HeldKeys, screen_width: i32, screen_height: i32) -> bool {
        let mut moved = false;
        if held.left {
            self.rect.x -= self.speed;
            self.facing = Facing::Left;
            moved = true;
        }
        if held.right {
            self.rect.x += self.speed;
            self.facing = Facing::Right;
            moved = true;
        }
        if held.up {
            self.rect.y -= self.speed;
            self.facing = Facing::Up;
            moved = true;
        }
        if held.down {
            self.rect.y += self.speed;
            self.facing = Facing::Down;
            moved = true;
        }
        self.rect.clamp_within(screen_width, screen_height);
        moved
    }

    pub fn teleport(&mut self, at: Point) {
        self.rect.move_to(at);
    }
}

// ── Enemies & door ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub rect: Rect,
    /// Signed horizontal speed in pixels per frame.
    pub speed: i32,
}

impl Enemy {
    pub fn new(x: i32, y: i32, size: i32, speed: i32) -> Self {
        Self {
            rect: Rect::new(x, y, size, size),
            speed,
        }
    }

    /// Advance horizontally, bouncing off `[0, bound_width]`.
    ///
    /// On contact the enemy is put back on the edge it crossed and its speed
    /// is negated; returns whether it bounced this frame.
    pub fn advance(&mut self, bound_width: i32) -> bool {
        self.rect.x += self.speed;
        if self.rect.x < 0 {
            self.rect.x = 0;
            self.speed = -self.speed;
            true
        } else if self.rect.right() > bound_width {
            self.rect.x = (bound_width - self.rect.width()).max(0);
            self.speed = -self.speed;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Door {
    pub rect: Rect,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One ledger entry: what was collected, on which level, in which era.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collected {
    pub level: u32,
    pub theme: Theme,
}

impl fmt::Display for Collected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {})", self.theme.name(), self.level)
    }
}

/// Everything scoped to a play session, spanning all of its levels.
#[derive(Clone, Debug)]
pub struct Session {
    pub current_level: u32,
    pub theme: Theme,
    pub tiles: Vec<Tile>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub door: Door,
    pub door_open: bool,
    /// Countdown in frames; the displayed time is derived from it.
    pub frames_remaining: u32,
    pub background_offset: i32,
    /// Append-only across the whole session.
    pub artifacts: Vec<Collected>,
    /// Append-only across the whole session.
    pub lore_items: Vec<Collected>,
    pub time_power: Option<TimePower>,
    pub boss_present: bool,
    /// Frames simulated in the current level.
    pub frame: u64,
}

impl Session {
    pub fn tiles_left(&self) -> usize {
        self.tiles.iter().filter(|t| !t.revealed).count()
    }

    pub fn content_remaining(&self) -> bool {
        self.tiles.iter().any(Tile::blocks_door)
    }

    pub fn time_remaining(&self, fps: u32) -> f64 {
        self.frames_remaining as f64 / fps.max(1) as f64
    }
}
