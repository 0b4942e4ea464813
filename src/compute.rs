//! Session logic: level setup, tile interaction, level progression and the
//! per-frame tick.
//!
//! Every function takes the session mutably together with the config and, where
//! needed, an injected RNG, so tests can drive them with a seeded generator.

use rand::Rng;

use crate::config::{GameConfig, LevelExit};
use crate::entities::{Collected, Door, Enemy, Player, Session, TileContent};
use crate::geometry::Point;
use crate::input::HeldKeys;
use crate::level::{self, Theme, TimePower};
use crate::powers::{BossBehavior, TimePowerEffect};

/// What a state change meant for level progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The session moved on to this level.
    LevelAdvanced(u32),
    /// The last level was completed.
    Finished,
    /// The level's countdown reached zero.
    TimeUp,
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build a fresh session positioned at the start of level 1.
pub fn new_session(config: &GameConfig, rng: &mut impl Rng) -> Session {
    let mut session = Session {
        current_level: 1,
        theme: Theme::for_level(1),
        tiles: Vec::new(),
        player: Player::new(config.player_start, config.player_size, config.player_speed),
        enemies: Vec::new(),
        door: Door { rect: config.door },
        door_open: false,
        frames_remaining: config.level_frames(),
        background_offset: 0,
        artifacts: Vec::new(),
        lore_items: Vec::new(),
        time_power: None,
        boss_present: false,
        frame: 0,
    };
    initialize_level(&mut session, config, rng);
    session
}

pub fn spawn_enemies(config: &GameConfig, rng: &mut impl Rng) -> Vec<Enemy> {
    if !config.features.enemies {
        return Vec::new();
    }
    let max_x = config.enemy_bound() - config.enemy_size;
    let max_y = config.screen_height - config.enemy_size;
    (0..config.enemy_count)
        .map(|_| {
            let x = rng.gen_range(0..=max_x);
            let y = rng.gen_range(0..=max_y);
            let speed = rng.gen_range(config.enemy_speed_min..=config.enemy_speed_max);
            Enemy::new(x, y, config.enemy_size, speed)
        })
        .collect()
}

/// (Re)build everything scoped to `session.current_level`: tiles and their
/// content, enemies, door, timer, player position and the derived labels.
/// Ledgers are left untouched.
pub fn initialize_level(session: &mut Session, config: &GameConfig, rng: &mut impl Rng) {
    let lvl = session.current_level;
    session.theme = Theme::for_level(lvl);
    session.tiles = level::generate_level(
        &config.layout(),
        config.content_mode(),
        config.tile_images,
        rng,
    );
    session.enemies = spawn_enemies(config, rng);
    session.door = Door { rect: config.door };
    session.door_open = false;
    session.frames_remaining = config.level_frames();
    session.background_offset = 0;
    session.player.teleport(config.player_start);
    session.time_power = TimePower::for_level(lvl);
    session.boss_present = level::is_boss_level(lvl);
    session.frame = 0;

    tracing::info!(
        target: "level",
        level = lvl,
        theme = session.theme.name(),
        tiles = session.tiles.len(),
        enemies = session.enemies.len(),
        boss = session.boss_present,
        "level initialized"
    );
}

// ── Progression ───────────────────────────────────────────────────────────────

/// Move to the next level, or report that the last one is done.
pub fn advance_level(session: &mut Session, config: &GameConfig, rng: &mut impl Rng) -> Outcome {
    if session.current_level < config.max_levels {
        session.current_level += 1;
        initialize_level(session, config, rng);
        tracing::info!(target: "level", level = session.current_level, "advanced to next level");
        Outcome::LevelAdvanced(session.current_level)
    } else {
        tracing::info!(
            target: "level",
            artifacts = session.artifacts.len(),
            lore = session.lore_items.len(),
            "final level completed"
        );
        Outcome::Finished
    }
}

/// Open the door once no tile holds an artifact or lore item. The door stays
/// open until the next level is initialized.
pub fn check_level_complete(session: &mut Session) -> bool {
    if !session.door_open && !session.content_remaining() {
        session.door_open = true;
        tracing::info!(target: "level", level = session.current_level, "door opened");
    }
    session.door_open
}

// ── Tile interaction ──────────────────────────────────────────────────────────

fn interact_with_tile(
    session: &mut Session,
    idx: usize,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Outcome {
    let found = Collected {
        level: session.current_level,
        theme: session.theme,
    };
    match session.tiles[idx].content {
        Some(TileContent::Artifact) => {
            tracing::info!(target: "collect", level = found.level, theme = found.theme.name(), "collected artifact");
            session.artifacts.push(found);
            session.tiles[idx].content = None;
            check_level_complete(session);
        }
        Some(TileContent::Lore) => {
            tracing::info!(target: "collect", level = found.level, theme = found.theme.name(), "collected lore item");
            session.lore_items.push(found);
            session.tiles[idx].content = None;
            check_level_complete(session);
        }
        Some(TileContent::Key) => {
            tracing::info!(target: "collect", level = found.level, "found the key");
            session.tiles[idx].content = None;
            session.tiles[idx].reveal();
            return advance_level(session, config, rng);
        }
        None => {}
    }
    session.tiles[idx].reveal();
    Outcome::Continue
}

fn interact_with_tiles(
    session: &mut Session,
    hits: Vec<usize>,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Outcome {
    for idx in hits {
        let outcome = interact_with_tile(session, idx, config, rng);
        // A new level replaced the tile list; the remaining indices are stale.
        if outcome != Outcome::Continue {
            return outcome;
        }
    }
    Outcome::Continue
}

/// Interact with the tile under a click position.
pub fn interact_at_point(
    session: &mut Session,
    at: Point,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Outcome {
    let hits: Vec<usize> = session
        .tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.rect.contains(at))
        .map(|(i, _)| i)
        .collect();
    interact_with_tiles(session, hits, config, rng)
}

/// Interact with every tile the player is standing on.
pub fn interact_at_player(session: &mut Session, config: &GameConfig, rng: &mut impl Rng) -> Outcome {
    let player = session.player.rect;
    let hits: Vec<usize> = session
        .tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.rect.overlaps(&player))
        .map(|(i, _)| i)
        .collect();
    interact_with_tiles(session, hits, config, rng)
}

pub fn use_time_power(session: &Session, effect: &mut dyn TimePowerEffect) {
    if let Some(power) = session.time_power {
        tracing::info!(target: "powers", power = power.label(), "using time power");
        effect.activate(power, session);
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the level by one frame.
///
/// Order: player movement, background scroll, boss hook, enemies (with
/// collision), door exit, countdown. A level change ends the frame early.
pub fn tick(
    session: &mut Session,
    held: HeldKeys,
    config: &GameConfig,
    boss: &mut dyn BossBehavior,
    rng: &mut impl Rng,
) -> Outcome {
    session.frame += 1;

    // ── 1. Player ────────────────────────────────────────────────────────────
    session
        .player
        .step(held, config.screen_width, config.screen_height);

    // ── 2. Background ────────────────────────────────────────────────────────
    if config.features.scrolling {
        session.background_offset = level::scroll_background(
            session.background_offset,
            config.level_width,
            config.screen_width,
            config.scroll_speed,
        );
    }

    // ── 3. Boss ──────────────────────────────────────────────────────────────
    if session.boss_present {
        boss.update(session);
    }

    // ── 4. Enemies ───────────────────────────────────────────────────────────
    let bound = config.enemy_bound();
    let mut caught = false;
    for enemy in &mut session.enemies {
        enemy.advance(bound);
        if enemy.rect.overlaps(&session.player.rect) {
            caught = true;
        }
    }
    if caught {
        tracing::debug!(target: "level", level = session.current_level, "caught by enemy, back to start");
        session.player.teleport(config.player_start);
    }

    // ── 5. Door ──────────────────────────────────────────────────────────────
    if config.features.level_exit == LevelExit::Door
        && session.door_open
        && session.player.rect.overlaps(&session.door.rect)
    {
        return advance_level(session, config, rng);
    }

    // ── 6. Countdown ─────────────────────────────────────────────────────────
    session.frames_remaining = session.frames_remaining.saturating_sub(1);
    if session.frames_remaining == 0 {
        tracing::info!(target: "level", level = session.current_level, "time ran out");
        return Outcome::TimeUp;
    }
    Outcome::Continue
}
