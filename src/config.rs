//! Game configuration, loaded from an optional RON file.
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes:
//!
//! ```ron
//! (
//!     max_levels: 5,
//!     level_time_secs: 90.0,
//!     features: (enemies: false, level_exit: Key),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, GameResult};
use crate::geometry::{Point, Rect};
use crate::level::{ContentMode, LevelLayout};

/// How a level is left once its content is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum LevelExit {
    /// Collect everything, then walk through the opened door.
    Door,
    /// Finding the key advances immediately; there is no door.
    Key,
}

/// Switches that select between the game's variants.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Title → menu flow and the pause overlay. Without it the game starts
    /// straight into play and Escape does nothing.
    pub menu: bool,
    pub enemies: bool,
    pub level_exit: LevelExit,
    /// Hide lore items next to the artifact (door exit only).
    pub lore: bool,
    /// Scroll the background; enemies then patrol the full level width.
    pub scrolling: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            menu: true,
            enemies: true,
            level_exit: LevelExit::Door,
            lore: true,
            scrolling: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding `tile_image{i}.png` and `player-*.png`. Built-in
    /// images are used when unset.
    pub dir: Option<PathBuf>,
    /// Look for tile images under one sub-directory per theme.
    pub themed: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// HUD strip below the play area.
    pub ui_height: i32,
    pub level_width: i32,
    pub tile_size: i32,
    pub tile_images: usize,

    pub player_size: i32,
    pub player_speed: i32,
    pub player_start: Point,

    pub enemy_count: usize,
    pub enemy_size: i32,
    pub enemy_speed_min: i32,
    pub enemy_speed_max: i32,

    pub door: Rect,
    pub scroll_speed: i32,
    pub max_levels: u32,
    pub level_time_secs: f64,
    pub target_fps: u32,
    pub title_secs: f64,
    pub game_over_secs: f64,

    pub features: Features,
    pub assets: AssetConfig,
    /// Fixed RNG seed; a random one is drawn when unset.
    pub seed: Option<u64>,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            ui_height: 100,
            level_width: 1600,
            tile_size: 50,
            tile_images: 5,
            player_size: 40,
            player_speed: 5,
            player_start: Point::new(400, 300),
            enemy_count: 3,
            enemy_size: 40,
            enemy_speed_min: 1,
            enemy_speed_max: 3,
            door: Rect::new(740, 520, 50, 70),
            scroll_speed: 1,
            max_levels: 10,
            level_time_secs: 60.0,
            target_fps: 60,
            title_secs: 2.0,
            game_over_secs: 2.0,
            features: Features::default(),
            assets: AssetConfig::default(),
            seed: None,
            log_file: PathBuf::from("temporal_labyrinth.log"),
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> GameResult<Self> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> GameResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> GameResult<()> {
        let fail = |msg: String| Err(GameError::InvalidConfig(msg));

        if self.screen_width <= 0 || self.screen_height <= 0 {
            return fail(format!(
                "screen must be positive, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        if self.ui_height < 0 {
            return fail(format!("ui_height must not be negative, got {}", self.ui_height));
        }
        if self.level_width < self.screen_width {
            return fail(format!(
                "level_width {} is narrower than the screen ({})",
                self.level_width, self.screen_width
            ));
        }
        if self.tile_size <= 0 {
            return fail(format!("tile_size must be positive, got {}", self.tile_size));
        }
        if self.tile_images == 0 {
            return fail("tile_images must be at least 1".to_string());
        }
        if self.player_size <= 0
            || self.player_size > self.screen_width
            || self.player_size > self.screen_height
        {
            return fail(format!("player_size {} does not fit the screen", self.player_size));
        }
        if self.player_speed < 0 {
            return fail(format!("player_speed must not be negative, got {}", self.player_speed));
        }
        if self.enemy_size <= 0
            || self.enemy_size > self.screen_width
            || self.enemy_size > self.screen_height
        {
            return fail(format!("enemy_size {} does not fit the screen", self.enemy_size));
        }
        if self.enemy_speed_min < 1 || self.enemy_speed_max < self.enemy_speed_min {
            return fail(format!(
                "enemy speed range {}..={} is empty or not positive",
                self.enemy_speed_min, self.enemy_speed_max
            ));
        }
        if self.max_levels == 0 {
            return fail("max_levels must be at least 1".to_string());
        }
        if !(self.level_time_secs > 0.0) {
            return fail(format!(
                "level_time_secs must be positive, got {}",
                self.level_time_secs
            ));
        }
        if self.target_fps == 0 {
            return fail("target_fps must be at least 1".to_string());
        }
        if self.title_secs < 0.0 || self.game_over_secs < 0.0 {
            return fail("screen durations must not be negative".to_string());
        }
        Ok(())
    }

    pub fn layout(&self) -> LevelLayout {
        LevelLayout {
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            level_width: self.level_width,
            tile_size: self.tile_size,
        }
    }

    pub fn content_mode(&self) -> ContentMode {
        match (self.features.level_exit, self.features.lore) {
            (LevelExit::Key, _) => ContentMode::Key,
            (LevelExit::Door, true) => ContentMode::ArtifactAndLore,
            (LevelExit::Door, false) => ContentMode::ArtifactOnly,
        }
    }

    /// Horizontal extent enemies patrol.
    pub fn enemy_bound(&self) -> i32 {
        if self.features.scrolling {
            self.level_width
        } else {
            self.screen_width
        }
    }

    /// Frames needed for `secs` seconds to elapse at `target_fps`, rounded up.
    pub fn frames_for(&self, secs: f64) -> u32 {
        // Tolerance keeps values like 0.1 * 60 = 6.000000000000001 at 6.
        let frames = secs * self.target_fps as f64 - 1e-9;
        frames.ceil().max(0.0) as u32
    }

    pub fn level_frames(&self) -> u32 {
        self.frames_for(self.level_time_secs)
    }

    pub fn canvas_size(&self) -> (i32, i32) {
        (self.screen_width, self.screen_height + self.ui_height)
    }
}
