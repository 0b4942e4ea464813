use rand::rngs::StdRng;
use rand::SeedableRng;

use temporal_labyrinth::entities::{Tile, TileContent};
use temporal_labyrinth::level::*;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn layout() -> LevelLayout {
    LevelLayout {
        screen_width: 800,
        screen_height: 600,
        level_width: 1600,
        tile_size: 50,
    }
}

fn count(tiles: &[Tile], c: TileContent) -> usize {
    tiles.iter().filter(|t| t.content == Some(c)).count()
}

// ── create_tiles ──────────────────────────────────────────────────────────────

#[test]
fn tiles_cover_the_whole_level_row_major() {
    let tiles = create_tiles(&layout(), 5, &mut seeded_rng());
    assert_eq!(tiles.len(), 32 * 12);
    assert_eq!((tiles[0].rect.x, tiles[0].rect.y), (0, 0));
    assert_eq!((tiles[1].rect.x, tiles[1].rect.y), (50, 0));
    assert_eq!((tiles[32].rect.x, tiles[32].rect.y), (0, 50));
    let last = tiles.last().unwrap();
    assert_eq!((last.rect.x, last.rect.y), (1550, 550));
    assert!(tiles.iter().all(|t| t.rect.width() == 50 && t.rect.height() == 50));
}

#[test]
fn tiles_start_hidden_and_empty_with_images_in_pool() {
    let tiles = create_tiles(&layout(), 3, &mut seeded_rng());
    assert!(tiles.iter().all(|t| !t.revealed && t.content.is_none()));
    assert!(tiles.iter().all(|t| t.image < 3));
}

#[test]
fn partial_tiles_at_edges_are_still_created() {
    let l = LevelLayout {
        screen_width: 120,
        screen_height: 70,
        level_width: 120,
        tile_size: 50,
    };
    let tiles = create_tiles(&l, 1, &mut seeded_rng());
    assert_eq!(tiles.len(), 3 * 2);
}

// ── place_content ─────────────────────────────────────────────────────────────

#[test]
fn artifact_and_lore_are_placed_on_visible_tiles_only() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let tiles = generate_level(&layout(), ContentMode::ArtifactAndLore, 5, &mut rng);
        assert_eq!(count(&tiles, TileContent::Artifact), 1);
        let lore = count(&tiles, TileContent::Lore);
        assert!((1..=3).contains(&lore), "lore count {lore} for seed {seed}");
        assert_eq!(count(&tiles, TileContent::Key), 0);
        assert!(tiles
            .iter()
            .filter(|t| t.content.is_some())
            .all(|t| t.rect.x < 800));
    }
}

#[test]
fn artifact_only_mode_places_no_lore() {
    let tiles = generate_level(&layout(), ContentMode::ArtifactOnly, 5, &mut seeded_rng());
    assert_eq!(count(&tiles, TileContent::Artifact), 1);
    assert_eq!(count(&tiles, TileContent::Lore), 0);
}

#[test]
fn key_mode_places_exactly_one_key() {
    let tiles = generate_level(&layout(), ContentMode::Key, 5, &mut seeded_rng());
    assert_eq!(count(&tiles, TileContent::Key), 1);
    assert_eq!(count(&tiles, TileContent::Artifact), 0);
    assert_eq!(count(&tiles, TileContent::Lore), 0);
}

#[test]
fn lore_is_capped_by_remaining_eligible_tiles() {
    // Two visible tiles: one artifact leaves room for one lore at most.
    let mut tiles = vec![
        Tile::new(0, 0, 50, 0),
        Tile::new(50, 0, 50, 0),
        Tile::new(900, 0, 50, 0),
    ];
    for seed in 0..20 {
        for t in tiles.iter_mut() {
            t.content = None;
        }
        place_content(
            &mut tiles,
            800,
            ContentMode::ArtifactAndLore,
            &mut StdRng::seed_from_u64(seed),
        );
        assert_eq!(count(&tiles, TileContent::Artifact), 1);
        assert_eq!(count(&tiles, TileContent::Lore), 1);
        assert!(tiles[2].content.is_none());
    }
}

#[test]
fn no_eligible_tiles_places_nothing() {
    let mut tiles = vec![Tile::new(900, 0, 50, 0), Tile::new(950, 0, 50, 0)];
    place_content(&mut tiles, 800, ContentMode::ArtifactAndLore, &mut seeded_rng());
    assert!(tiles.iter().all(|t| t.content.is_none()));
}

#[test]
fn generation_is_deterministic_for_a_seed() {
    let a = generate_level(&layout(), ContentMode::ArtifactAndLore, 5, &mut seeded_rng());
    let b = generate_level(&layout(), ContentMode::ArtifactAndLore, 5, &mut seeded_rng());
    assert_eq!(a, b);
}

// ── Labels ────────────────────────────────────────────────────────────────────

#[test]
fn themes_cycle_from_ancient_egypt() {
    assert_eq!(Theme::for_level(1), Theme::AncientEgypt);
    assert_eq!(Theme::for_level(2), Theme::RomanEmpire);
    assert_eq!(Theme::for_level(5), Theme::DistantFuture);
    assert_eq!(Theme::for_level(6), Theme::AncientEgypt);
    assert_eq!(Theme::for_level(10), Theme::DistantFuture);
    assert_eq!(Theme::AncientEgypt.name(), "Ancient Egypt");
}

#[test]
fn time_power_unlocks_every_three_levels() {
    assert_eq!(TimePower::for_level(1), None);
    assert_eq!(TimePower::for_level(2), None);
    assert_eq!(TimePower::for_level(3), Some(TimePower::SlowTime));
    assert_eq!(TimePower::for_level(6), Some(TimePower::Rewind));
    assert_eq!(TimePower::for_level(9), Some(TimePower::TimeStop));
    assert_eq!(TimePower::for_level(10), Some(TimePower::TimeStop));
    assert_eq!(TimePower::for_level(40), Some(TimePower::TimeStop));
}

#[test]
fn boss_only_on_levels_five_and_ten() {
    let bosses: Vec<u32> = (1..=12).filter(|l| is_boss_level(*l)).collect();
    assert_eq!(bosses, vec![5, 10]);
}

// ── Background scroll ─────────────────────────────────────────────────────────

#[test]
fn scroll_moves_left_by_speed() {
    assert_eq!(scroll_background(0, 1600, 800, 1), -1);
    assert_eq!(scroll_background(-100, 1600, 800, 3), -103);
}

#[test]
fn scroll_stops_at_level_end() {
    assert_eq!(scroll_background(-800, 1600, 800, 1), -800);
    assert_eq!(scroll_background(-799, 1600, 800, 5), -800);
}

#[test]
fn scroll_wraps_past_full_level_width() {
    assert_eq!(scroll_background(-1600, 1600, 800, 1), 0);
}

#[test]
fn scroll_never_goes_positive() {
    assert_eq!(scroll_background(0, 1600, 800, -4), 0);
}
