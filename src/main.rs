mod audio;
mod display;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use bismuth_strike::autopilot;
use bismuth_strike::compute::{init_world, tick};
use bismuth_strike::config::Config;
use bismuth_strike::entities::{GameEvent, GameState};
use bismuth_strike::input::{Action, Controls, InputState, TouchLayout};
use bismuth_strike::leaderboard::{LeaderboardClient, SqliteTable};
use bismuth_strike::ports::{play_events, AudioSink, Silent};
use bismuth_strike::ranking::{PanelOutcome, RankingPanel, RankingView, MSG_EMPTY};
use bismuth_strike::scene;

use audio::TerminalBell;
use display::TermCanvas;

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// OS key repeat is ≥ 15 Hz, so 8 frames (≈133 ms at 60 FPS) is always
/// refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bismuth_strike")]
#[command(about = "Nh113: The Bismuth Strike - a terminal arcade shooter with a leaderboard")]
struct Cli {
    /// Leaderboard database (overrides BISMUTH_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// RNG seed for a reproducible run (overrides BISMUTH_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Write logs to this file (overrides BISMUTH_LOG_FILE)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Longest accepted leaderboard name (overrides BISMUTH_MAX_NAME_LEN)
    #[arg(long, global = true)]
    max_name_len: Option<usize>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play in the terminal (default)
    Play {
        /// Do not ring the terminal bell on explosions
        #[arg(long)]
        mute: bool,
    },
    /// Print the leaderboard
    Top {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Append a score to the leaderboard
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        score: u32,
    },
    /// Run the autopilot headless and print a JSON summary
    Simulate {
        #[arg(long, default_value_t = 36_000)]
        frames: u64,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if let Some(max) = self.max_name_len.filter(|m| *m > 0) {
            config.max_name_len = max;
        }
        config
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The interactive screen owns the terminal, so `play` only logs when a log
/// file is configured. Other commands fall back to stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter =
        EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

fn open_leaderboard(config: &Config) -> Result<LeaderboardClient, String> {
    let table = SqliteTable::open(&config.db_path)?;
    tracing::info!(path = %config.db_path.display(), "leaderboard ready");
    Ok(LeaderboardClient::new(Box::new(table), config.max_name_len))
}

fn print_top(config: &Config, limit: Option<usize>, json: bool) -> Result<()> {
    let client = open_leaderboard(config).map_err(|e| anyhow!(e))?;
    let entries = client
        .fetch_top(limit.unwrap_or(config.ranking_limit))
        .context("failed to fetch ranking")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    match RankingView::from_entries(&entries) {
        RankingView::Rows(rows) => {
            for row in rows {
                println!("{:>4} {:<16}{:>10}", row.badge, row.username, row.score);
            }
        }
        _ => println!("{MSG_EMPTY}"),
    }
    Ok(())
}

fn submit(config: &Config, name: &str, score: u32) -> Result<()> {
    let mut client = open_leaderboard(config).map_err(|e| anyhow!(e))?;
    let entry = client.submit(name, score).context("submit rejected")?;
    println!("{}", serde_json::to_string(&entry)?);
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we keep a
/// `key_frame` map that records the frame number of the last press/repeat
/// event for every key. Each frame the keys that are still "fresh" become the
/// held controls. One-shot keys (Enter, Z, X) become [`Action`]s. Mouse
/// presses stand in for touches on the bottom button strip.
///
/// While the game is over the loop keeps running but keys go to the ranking
/// panel and the playfield surface is dropped.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
    mute: bool,
) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let layout = TouchLayout::default();
    let mut audio: Box<dyn AudioSink> = if mute {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell)
    };

    // A missing leaderboard disables the panel, never the game.
    let mut client = match open_leaderboard(config) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("leaderboard unavailable, ranking disabled: {e}");
            None
        }
    };
    let mut panel = match &client {
        Some(_) => RankingPanel::new(config.max_name_len, config.ranking_limit),
        None => RankingPanel::disabled(),
    };

    let (cols, rows) = terminal::size()?;
    let mut surface = Some(TermCanvas::new(cols, rows));
    let mut world = init_world(&mut rng);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut input = InputState::default();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut actions = Vec::new();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => {
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }
                    if world.state == GameState::GameOver {
                        if kind == KeyEventKind::Release {
                            continue;
                        }
                        match code {
                            KeyCode::Esc => return Ok(()),
                            KeyCode::Tab | KeyCode::BackTab => panel.toggle_focus(),
                            KeyCode::Enter => {
                                if panel.activate(client.as_mut()) == PanelOutcome::Restart {
                                    actions.push(Action::Start);
                                }
                            }
                            KeyCode::Backspace => panel.backspace(),
                            KeyCode::Char(c) => panel.type_char(c),
                            _ => {}
                        }
                        continue;
                    }
                    match kind {
                        KeyEventKind::Press => {
                            key_frame.insert(code, frame);
                            match code {
                                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                    return Ok(());
                                }
                                KeyCode::Enter => actions.push(Action::Start),
                                KeyCode::Char('z') | KeyCode::Char('Z') => {
                                    actions.push(Action::Shoot)
                                }
                                KeyCode::Char('x') | KeyCode::Char('X') => {
                                    actions.push(Action::DebugClear)
                                }
                                _ => {}
                            }
                        }
                        KeyEventKind::Repeat => {
                            key_frame.insert(code, frame);
                        }
                        KeyEventKind::Release => {
                            key_frame.remove(&code);
                        }
                    }
                }
                Event::Mouse(mouse) if world.state != GameState::GameOver => {
                    let Some(canvas) = surface.as_ref() else {
                        continue;
                    };
                    let point = canvas.to_logical(mouse.column, mouse.row);
                    match mouse.kind {
                        MouseEventKind::Down(_) if world.state == GameState::Start => {
                            actions.push(Action::Start);
                        }
                        MouseEventKind::Down(_) => input.set_touch_points(&layout, &[point]),
                        // Sliding keeps a spent shoot spent.
                        MouseEventKind::Drag(_) => {
                            let shoot = input.touch.shoot;
                            input.set_touch_points(&layout, &[point]);
                            input.touch.shoot &= shoot;
                        }
                        MouseEventKind::Up(_) => input.release_touch(),
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    if surface.is_some() {
                        surface = Some(TermCanvas::new(cols, rows));
                    }
                }
                _ => {}
            }
        }

        // ── Sample held keys ──────────────────────────────────────────────────
        input.keys = Controls {
            left: any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ),
            right: any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ),
            shoot: is_held(&key_frame, &KeyCode::Char(' '), frame),
        };
        let held = input.held();

        world = tick(&world, &held, &actions, &mut rng);
        input.after_frame(&world.events);
        play_events(&world.events, audio.as_mut());

        for event in &world.events {
            match event {
                GameEvent::PlayerDestroyed { final_score } => {
                    surface = None;
                    key_frame.clear();
                    input = InputState::default();
                    panel.open(*final_score);
                    if let Some(client) = client.as_ref() {
                        panel.refresh(client);
                    }
                }
                GameEvent::Started if surface.is_none() => {
                    let (cols, rows) = terminal::size()?;
                    surface = Some(TermCanvas::new(cols, rows));
                }
                _ => {}
            }
        }

        match surface.as_mut() {
            Some(canvas) => {
                canvas.clear();
                scene::draw(canvas, &world, &layout, &held);
                canvas.flush(out)?;
            }
            None => display::render_ranking(out, &panel, terminal::size()?)?,
        }

        let elapsed = frame_start.elapsed();
        let budget = config.frame_duration();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
}

fn play(config: &Config, mute: bool) -> Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &rx, config, mute);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!("game loop failed: {e:#}");
    }
    result
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();
    let command = cli.command.unwrap_or(Commands::Play { mute: false });
    let interactive = matches!(command, Commands::Play { .. });
    init_tracing(config.log_file.as_deref(), interactive)?;
    tracing::debug!(?config, "configuration loaded");

    match command {
        Commands::Play { mute } => play(&config, mute),
        Commands::Top { limit, json } => print_top(&config, limit, json),
        Commands::Submit { name, score } => submit(&config, &name, score),
        Commands::Simulate { frames } => {
            let summary = autopilot::run(config.seed.unwrap_or(1), frames);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}
