//! Level generation and the per-level derived labels (theme, time power, boss).

use rand::seq::index;
use rand::Rng;

use crate::entities::{Tile, TileContent};

// ── Per-level labels ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    AncientEgypt,
    RomanEmpire,
    MedievalEurope,
    PresentDay,
    DistantFuture,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::AncientEgypt,
        Theme::RomanEmpire,
        Theme::MedievalEurope,
        Theme::PresentDay,
        Theme::DistantFuture,
    ];

    /// Themes cycle through the time periods, level 1 being Ancient Egypt.
    pub fn for_level(level: u32) -> Theme {
        let idx = (level.max(1) - 1) as usize % Self::ALL.len();
        Self::ALL[idx]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::AncientEgypt => "Ancient Egypt",
            Theme::RomanEmpire => "Roman Empire",
            Theme::MedievalEurope => "Medieval Europe",
            Theme::PresentDay => "Present Day",
            Theme::DistantFuture => "Distant Future",
        }
    }

    /// Directory name used for themed asset pools.
    pub fn slug(&self) -> &'static str {
        match self {
            Theme::AncientEgypt => "egypt",
            Theme::RomanEmpire => "roman",
            Theme::MedievalEurope => "medieval",
            Theme::PresentDay => "present",
            Theme::DistantFuture => "future",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePower {
    SlowTime,
    Rewind,
    TimeStop,
}

impl TimePower {
    /// A new power unlocks every three levels; levels past the last tier keep
    /// the strongest one.
    pub fn for_level(level: u32) -> Option<TimePower> {
        match level / 3 {
            0 => None,
            1 => Some(TimePower::SlowTime),
            2 => Some(TimePower::Rewind),
            _ => Some(TimePower::TimeStop),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimePower::SlowTime => "Slow Time",
            TimePower::Rewind => "Rewind",
            TimePower::TimeStop => "Time Stop",
        }
    }
}

pub fn is_boss_level(level: u32) -> bool {
    matches!(level, 5 | 10)
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Dimensions that drive tile generation, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    pub screen_width: i32,
    pub screen_height: i32,
    pub level_width: i32,
    pub tile_size: i32,
}

/// What a freshly generated level hides under its tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentMode {
    /// One artifact plus 1–3 lore items.
    ArtifactAndLore,
    /// One artifact only.
    ArtifactOnly,
    /// One key; finding it ends the level.
    Key,
}

/// Cover `[0, level_width) x [0, screen_height)` with tiles, row-major, each
/// showing an image drawn uniformly (with replacement) from a pool of
/// `image_count` images.
pub fn create_tiles(layout: &LevelLayout, image_count: usize, rng: &mut impl Rng) -> Vec<Tile> {
    let step = layout.tile_size.max(1) as usize;
    let mut tiles = Vec::new();
    for y in (0..layout.screen_height).step_by(step) {
        for x in (0..layout.level_width).step_by(step) {
            let image = if image_count > 0 {
                rng.gen_range(0..image_count)
            } else {
                0
            };
            tiles.push(Tile::new(x, y, layout.tile_size, image));
        }
    }
    tiles
}

/// Hide the level's content among tiles that start on screen (`x < screen_width`).
///
/// With no eligible tile nothing is placed, which leaves a door-gated level
/// impossible to finish.
pub fn place_content(
    tiles: &mut [Tile],
    screen_width: i32,
    mode: ContentMode,
    rng: &mut impl Rng,
) {
    let mut eligible: Vec<usize> = tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.rect.x < screen_width)
        .map(|(i, _)| i)
        .collect();
    if eligible.is_empty() {
        return;
    }

    let pick = eligible.swap_remove(rng.gen_range(0..eligible.len()));
    tiles[pick].content = Some(match mode {
        ContentMode::Key => TileContent::Key,
        ContentMode::ArtifactAndLore | ContentMode::ArtifactOnly => TileContent::Artifact,
    });

    if mode != ContentMode::ArtifactAndLore {
        return;
    }
    let wanted: usize = rng.gen_range(1..=3);
    let count = wanted.min(eligible.len());
    for i in index::sample(rng, eligible.len(), count) {
        tiles[eligible[i]].content = Some(TileContent::Lore);
    }
}

pub fn generate_level(
    layout: &LevelLayout,
    mode: ContentMode,
    image_count: usize,
    rng: &mut impl Rng,
) -> Vec<Tile> {
    let mut tiles = create_tiles(layout, image_count, rng);
    place_content(&mut tiles, layout.screen_width, mode, rng);
    tiles
}

// ── Background ────────────────────────────────────────────────────────────────

/// One frame of background scroll. The offset only ever moves left and is kept
/// within `[-(level_width - screen_width), 0]`.
pub fn scroll_background(offset: i32, level_width: i32, screen_width: i32, speed: i32) -> i32 {
    let mut offset = offset - speed;
    if offset < -level_width {
        offset = 0;
    }
    let min = -(level_width - screen_width).max(0);
    offset.clamp(min, 0)
}
