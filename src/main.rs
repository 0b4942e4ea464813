use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use temporal_labyrinth::assets::{load_assets, AssetSource, BuiltinAssets, FileAssets};
use temporal_labyrinth::config::GameConfig;
use temporal_labyrinth::display::TerminalSurface;
use temporal_labyrinth::game::{Flow, Game, Summary};
use temporal_labyrinth::input::{translate_event, KeyTracker};
use temporal_labyrinth::render::Assets;

// ── Startup ───────────────────────────────────────────────────────────────────

fn load_config() -> Result<GameConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Logs go to a file: stdout belongs to the raw-mode terminal.
fn init_tracing(log_file: &Path) {
    let file = match File::create(log_file) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cannot open log file {}: {err}", log_file.display());
            return;
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}

fn load_images(config: &GameConfig) -> Result<Assets> {
    let source: Box<dyn AssetSource> = match &config.assets.dir {
        Some(dir) => Box::new(FileAssets::new(dir)),
        None => Box::new(BuiltinAssets),
    };
    load_assets(source.as_ref(), config).context("failed to load game images")
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Returns the summary when the final level was completed, `None` on quit.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game<StdRng>,
    assets: &Assets,
    rx: &mpsc::Receiver<Event>,
) -> Result<Option<Summary>> {
    let frame_budget = Duration::from_secs_f64(1.0 / game.config().target_fps as f64);
    let (canvas_w, canvas_h) = game.config().canvas_size();
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let mut surface = TerminalSurface::new(cols, rows, canvas_w, canvas_h);
    surface.reset_screen(out)?;

    let mut tracker = KeyTracker::new();
    let mut events = Vec::new();

    loop {
        let frame_start = Instant::now();
        tracker.begin_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        events.clear();
        while let Ok(raw) = rx.try_recv() {
            if let Event::Resize(c, r) = raw {
                surface.resize(c, r);
                surface.reset_screen(out)?;
                continue;
            }
            if let Some(ev) = translate_event(raw, &mut tracker, |c, r| surface.cell_to_canvas(c, r)) {
                events.push(ev);
            }
        }

        match game.frame(&events, tracker.held()) {
            Flow::Continue => {}
            Flow::Quit => return Ok(None),
            Flow::Finished(summary) => return Ok(Some(summary)),
        }

        game.render(&mut surface, assets);
        surface.present(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = load_config()?;
    init_tracing(&config.log_file);
    let assets = load_images(&config)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(target: "game", seed = ?config.seed, levels = config.max_levels, "starting");
    let mut game = Game::new(config, rng);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Ask for key-release events; terminals without support fall back to the
    // hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut game, &assets, &rx);

    // Always restore the terminal.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Some(summary) = result? {
        println!("Game Over - You've completed the Temporal Labyrinth!");
        println!("Collected Artifacts: {}", summary.artifacts);
        println!("Lore Items Found: {}", summary.lore_items);
        println!("Levels Completed: {}", summary.levels_completed);
        tracing::info!(target: "game", ?summary, "ending");
    } else {
        tracing::info!(target: "game", "quit");
    }
    Ok(())
}
