//! Image loading.
//!
//! An [`AssetSource`] turns an [`AssetId`] into an [`Image`]. Two sources
//! exist: [`BuiltinAssets`], which synthesizes every image, and
//! [`FileAssets`], which decodes PNG files from a directory. A file that is
//! missing or cannot be decoded is an error; callers treat it as fatal.

use std::path::{Path, PathBuf};

use crate::config::GameConfig;
use crate::entities::Facing;
use crate::error::{GameError, GameResult};
use crate::level::Theme;
use crate::render::{Assets, Image, Rgb, C_DOOR};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetId {
    /// Tile image `index`, from a theme's pool or from the shared pool.
    Tile { theme: Option<Theme>, index: usize },
    Player(Facing),
}

pub trait AssetSource {
    /// Load `id` at `width x height` canvas pixels.
    fn load(&self, id: AssetId, width: i32, height: i32) -> GameResult<Image>;

    /// Whether the source has directional player sprites at all.
    fn has_player_sprites(&self) -> bool {
        true
    }
}

const FACINGS: [Facing; 4] = [Facing::Left, Facing::Right, Facing::Up, Facing::Down];

/// Load every image the game needs up front.
pub fn load_assets(source: &dyn AssetSource, config: &GameConfig) -> GameResult<Assets> {
    let size = config.tile_size;
    let mut tiles = Vec::with_capacity(Theme::ALL.len());
    if config.assets.themed {
        for theme in Theme::ALL {
            let pool = (0..config.tile_images)
                .map(|index| {
                    source.load(
                        AssetId::Tile {
                            theme: Some(theme),
                            index,
                        },
                        size,
                        size,
                    )
                })
                .collect::<GameResult<Vec<_>>>()?;
            tiles.push(pool);
        }
    } else {
        let shared = (0..config.tile_images)
            .map(|index| source.load(AssetId::Tile { theme: None, index }, size, size))
            .collect::<GameResult<Vec<_>>>()?;
        tiles = vec![shared; Theme::ALL.len()];
    }

    let player = if source.has_player_sprites() {
        let p = config.player_size;
        Some([
            source.load(AssetId::Player(FACINGS[0]), p, p)?,
            source.load(AssetId::Player(FACINGS[1]), p, p)?,
            source.load(AssetId::Player(FACINGS[2]), p, p)?,
            source.load(AssetId::Player(FACINGS[3]), p, p)?,
        ])
    } else {
        None
    };

    let (dw, dh) = (config.door.width(), config.door.height());
    let door_closed = Image {
        glyph: '▮',
        glyph_color: C_DOOR.shade(50),
        ..Image::solid(dw, dh, C_DOOR)
    };
    let door_open = Image {
        glyph: '▯',
        glyph_color: C_DOOR,
        ..Image::solid(dw, dh, C_DOOR.shade(30))
    };

    tracing::info!(
        target: "assets",
        pools = tiles.len(),
        per_pool = config.tile_images,
        sprites = player.is_some(),
        "assets loaded"
    );
    Ok(Assets {
        tiles,
        player,
        door_closed,
        door_open,
    })
}

fn player_glyph(facing: Facing) -> char {
    match facing {
        Facing::Left => '◄',
        Facing::Right => '►',
        Facing::Up => '▲',
        Facing::Down => '▼',
    }
}

// ── Built-in images ───────────────────────────────────────────────────────────

fn theme_base(theme: Option<Theme>) -> Rgb {
    match theme {
        Some(Theme::AncientEgypt) => Rgb::new(194, 160, 92),
        Some(Theme::RomanEmpire) => Rgb::new(170, 90, 70),
        Some(Theme::MedievalEurope) => Rgb::new(96, 110, 80),
        Some(Theme::PresentDay) => Rgb::new(110, 110, 130),
        Some(Theme::DistantFuture) => Rgb::new(70, 90, 160),
        None => Rgb::new(120, 100, 80),
    }
}

/// Synthesized images so the game runs without any files on disk.
#[derive(Debug, Default)]
pub struct BuiltinAssets;

impl AssetSource for BuiltinAssets {
    fn load(&self, id: AssetId, width: i32, height: i32) -> GameResult<Image> {
        const GLYPHS: [char; 5] = ['░', '▒', '·', '∙', '▓'];
        Ok(match id {
            AssetId::Tile { theme, index } => {
                let fill = theme_base(theme).shade(70 + (index % 5) as u16 * 12);
                Image {
                    width,
                    height,
                    fill,
                    glyph: GLYPHS[index % GLYPHS.len()],
                    glyph_color: fill.shade(60),
                }
            }
            AssetId::Player(facing) => Image {
                width,
                height,
                fill: Rgb::new(0, 128, 255),
                glyph: player_glyph(facing),
                glyph_color: Rgb::new(255, 255, 255),
            },
        })
    }
}

// ── Files on disk ─────────────────────────────────────────────────────────────

/// PNG images from a directory:
///
/// * `tile_image{i}.png`, or `<theme>/tile_image{i}.png` for themed pools
/// * `player-{left,right,up,down}.png`
///
/// Each image is reduced to its average colour.
#[derive(Debug)]
pub struct FileAssets {
    dir: PathBuf,
}

impl FileAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: AssetId) -> PathBuf {
        match id {
            AssetId::Tile {
                theme: Some(theme),
                index,
            } => self
                .dir
                .join(theme.slug())
                .join(format!("tile_image{index}.png")),
            AssetId::Tile { theme: None, index } => self.dir.join(format!("tile_image{index}.png")),
            AssetId::Player(facing) => {
                let name = match facing {
                    Facing::Left => "left",
                    Facing::Right => "right",
                    Facing::Up => "up",
                    Facing::Down => "down",
                };
                self.dir.join(format!("player-{name}.png"))
            }
        }
    }
}

pub fn average_color(path: &Path) -> GameResult<Rgb> {
    let decoded = image::open(path).map_err(|source| GameError::Asset {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = decoded.to_rgb8();
    let count = (rgb.width() as u64 * rgb.height() as u64).max(1);
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for px in rgb.pixels() {
        r += px[0] as u64;
        g += px[1] as u64;
        b += px[2] as u64;
    }
    Ok(Rgb::new(
        (r / count) as u8,
        (g / count) as u8,
        (b / count) as u8,
    ))
}

impl AssetSource for FileAssets {
    fn load(&self, id: AssetId, width: i32, height: i32) -> GameResult<Image> {
        let path = self.path_for(id);
        tracing::debug!(target: "assets", path = %path.display(), "loading image");
        let fill = average_color(&path)?;
        let (glyph, glyph_color) = match id {
            AssetId::Tile { .. } => ('░', fill.shade(60)),
            AssetId::Player(facing) => (player_glyph(facing), Rgb::new(255, 255, 255)),
        };
        Ok(Image {
            width,
            height,
            fill,
            glyph,
            glyph_color,
        })
    }
}
