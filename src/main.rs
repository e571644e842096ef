mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cubanoid::audio::SoundBoard;
use cubanoid::compute::{init_state, restart, tick_with_audio, toggle_pause};
use cubanoid::config::GameConfig;
use cubanoid::entities::{GameState, GameStatus, Loadout};
use cubanoid::input::InputFrame;
use cubanoid::world::{World, DEFAULT_LEVEL};

use display::Viewport;

/// Nominal frame time at 60 Hz.
const FRAME: Duration = Duration::from_micros(16_667);

/// Longest step fed to the simulation after a stall, in nominal frames.
const MAX_DT: f32 = 3.0;

/// A key counts as held if its last press/repeat arrived within this many
/// frames. Terminals without key-release events only send repeats, and the
/// OS repeat rate refreshes the key well inside 8 frames at 60 Hz.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser, Debug)]
#[command(author, version, about = "Side-scrolling platform shooter for the terminal", long_about = None)]
struct Args {
    /// RON config file; defaults are used if it does not exist
    #[arg(short, long, default_value = "cubanoid.ron")]
    config: PathBuf,

    /// ASCII level file, overriding the one named in the config
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal itself is busy with the game
    #[arg(long, default_value = "cubanoid.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: KeyCode, frame: u64) -> bool {
    key_frame
        .get(&key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|&k| is_held(key_frame, k, frame))
}

// ── Title screen ──────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Loadout),
    Quit,
}

fn show_title<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut selected: Loadout,
) -> Result<MenuResult> {
    display::draw_title(out, selected)?;
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        match ev {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            }) => match code {
                KeyCode::Char('1') => selected = Loadout::ShotgunFirst,
                KeyCode::Char('2') => selected = Loadout::RifleFirst,
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start(selected)),
                KeyCode::Esc => return Ok(MenuResult::Quit),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit);
                }
                _ => continue,
            },
            Event::Resize(..) => {}
            _ => continue,
        }
        display::draw_title(out, selected)?;
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RoundEnd {
    Quit,
    Title,
}

/// Input model: held keys (movement, boost) are tracked in `key_frame` as
/// the frame they were last seen; everything else (jump, dash, fire,
/// loadout) is an edge collected while draining the channel, and lasts
/// exactly one tick.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    sound: &mut SoundBoard,
) -> Result<RoundEnd> {
    let (w, h) = terminal::size()?;
    let mut viewport = Viewport::new(w, h, state.config.view.width, state.config.view.height);
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pointer = None;
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut input = InputFrame::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Esc if state.status == GameStatus::Playing => {
                                toggle_pause(state);
                            }
                            KeyCode::Esc => return Ok(RoundEnd::Quit),
                            KeyCode::Char('i' | 'I' | 'p' | 'P')
                                if state.status == GameStatus::Paused =>
                            {
                                toggle_pause(state);
                                key_frame.clear();
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(RoundEnd::Quit);
                            }
                            KeyCode::Char(' ') => input.jump = true,
                            KeyCode::Char('q') | KeyCode::Char('Q') => input.dash = true,
                            KeyCode::Char('j') | KeyCode::Char('J') => input.fire_left = true,
                            KeyCode::Char('k') | KeyCode::Char('K') => input.fire_right = true,
                            KeyCode::Char('1') => input.switch_loadout = Some(Loadout::ShotgunFirst),
                            KeyCode::Char('2') => input.switch_loadout = Some(Loadout::RifleFirst),
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if state.status != GameStatus::Playing =>
                            {
                                restart(state);
                                key_frame.clear();
                            }
                            KeyCode::Char('m') | KeyCode::Char('M')
                                if state.status != GameStatus::Playing =>
                            {
                                return Ok(RoundEnd::Title);
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
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    if let Some(p) = viewport.cell_to_view(column, row) {
                        pointer = Some(p);
                    }
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => input.fire_left = true,
                        MouseEventKind::Down(MouseButton::Right) => input.fire_right = true,
                        _ => {}
                    }
                }
                Event::Resize(w, h) => {
                    viewport = Viewport::new(w, h, state.config.view.width, state.config.view.height);
                    out.execute(terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }

        // ── Held keys ─────────────────────────────────────────────────────────
        // Shift+A / Shift+D arrive as uppercase letters: boost.
        let boost = any_held(&key_frame, &[KeyCode::Char('A'), KeyCode::Char('D')], frame);
        input.left = (boost && is_held(&key_frame, KeyCode::Char('A'), frame))
            || any_held(&key_frame, &[KeyCode::Char('a'), KeyCode::Left], frame);
        input.right = (boost && is_held(&key_frame, KeyCode::Char('D'), frame))
            || any_held(&key_frame, &[KeyCode::Char('d'), KeyCode::Right], frame);
        input.boost = boost;
        input.pointer = pointer;

        let dt = (last_tick.elapsed().as_secs_f32() / FRAME.as_secs_f32()).min(MAX_DT);
        last_tick = Instant::now();
        tick_with_audio(state, &input, dt, rng, sound);

        display::render(out, state, viewport)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn load_world(args: &Args, config: &GameConfig) -> Result<World> {
    match args.level.as_ref().or(config.level.as_ref()) {
        Some(path) => World::load(path).with_context(|| format!("cannot load level {:?}", path)),
        None => World::parse(DEFAULT_LEVEL).context("built-in level is invalid"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = GameConfig::load(&args.config)?;
    let world = load_world(&args, &config)?;
    let mut sound = SoundBoard::load(&config.sounds);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key-release events, where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the game loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, config, world, &mut rng, &mut sound);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut config: GameConfig,
    world: World,
    rng: &mut StdRng,
    sound: &mut SoundBoard,
) -> Result<()> {
    loop {
        match show_title(out, rx, config.weapons.loadout)? {
            MenuResult::Quit => break,
            MenuResult::Start(loadout) => {
                config.weapons.loadout = loadout;
                let mut state = init_state(config.clone(), world.clone());
                match game_loop(out, &mut state, rx, rng, sound)? {
                    RoundEnd::Quit => break,
                    RoundEnd::Title => {}
                }
            }
        }
    }
    info!("quit");
    Ok(())
}
