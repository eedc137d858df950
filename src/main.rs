mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::thread_rng;

use space_invaders::compute::{init_state, tick};
use space_invaders::config::GameConfig;
use space_invaders::entities::{FrameInput, MenuInput, PlayerInput};
use space_invaders::level::Campaign;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Longest frame the simulation will integrate in one step.
const MAX_DT: f32 = 0.1;

const LOG_FILE: &str = "space_invaders.log";

/// Frames a key stays down after its last press or repeat event. Terminals
/// without release events only ever send repeats (15 Hz or faster), which
/// refresh the key well inside ≈130 ms.
const HOLD_WINDOW: u64 = 8;

fn is_held(last_seen: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    last_seen
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(last_seen: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(last_seen, k, frame))
}

fn init_logging() -> anyhow::Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("creating {}", LOG_FILE))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Frame loop ───────────────────────────────────────────────────────────────

/// Runs frames until the state stops running or the user hits `q`.
///
/// Ship controls are level-triggered: `last_seen` keeps the frame of each
/// key's latest press or repeat, and a key within `HOLD_WINDOW` of the
/// current frame counts as held. On terminals with the kitty keyboard
/// protocol a release event clears the key at once. Menu keys are
/// edge-triggered and only act on the press itself.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    campaign: &Campaign,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let mut state = init_state(config, &mut rng);

    let mut last_seen: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    while state.running {
        let started = Instant::now();
        frame += 1;
        let mut menu = MenuInput::default();

        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                KeyEventKind::Press => {
                    last_seen.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => menu.up = true,
                        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                            menu.down = true
                        }
                        KeyCode::Enter => menu.select = true,
                        KeyCode::Esc => menu.back = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    last_seen.insert(code, frame);
                }
                KeyEventKind::Release => {
                    last_seen.remove(&code);
                }
            }
        }

        let player = PlayerInput {
            left: any_held(&last_seen, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: any_held(&last_seen, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
            up: any_held(&last_seen, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
            down: any_held(&last_seen, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
            fire: any_held(&last_seen, &[KeyCode::Char(' ')], frame),
        };

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32().min(MAX_DT);
        last_frame = now;

        let input = FrameInput { dt, player, menu };
        state = tick(&state, &input, config, campaign, &mut rng);

        display::render(out, &state, campaign.level(state.level_index))?;

        if let Some(rest) = FRAME.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    Ok(())
}

// ── Startup ──────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging()?;

    // Assets load before the terminal switches screens so a bad level file
    // is reported on the normal console.
    let config = GameConfig::load().context("loading configuration")?;
    let campaign = Campaign::load(&config.levels).context("loading levels")?;
    info!("campaign ready: {} level(s)", campaign.len());

    let mut out = BufWriter::new(stdout());
    let enhanced = enter_terminal(&mut out)?;
    let rx = spawn_input_reader();

    let result = game_loop(&mut out, &config, &campaign, &rx);

    restore_terminal(&mut out, enhanced);
    if let Err(err) = &result {
        error!("game loop failed: {:#}", err);
    }
    info!("shutting down");
    result
}

/// Switches to raw mode on the alternate screen. Returns whether the terminal
/// accepted the request for release/repeat events.
fn enter_terminal<W: Write>(out: &mut W) -> anyhow::Result<bool> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    let enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    info!("keyboard release events: {}", enhanced);
    Ok(enhanced)
}

/// Best effort: every step runs even if an earlier one fails.
fn restore_terminal<W: Write>(out: &mut W, enhanced: bool) {
    if enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Blocking `event::read` lives on its own thread; the frame loop polls the
/// channel with `try_recv`.
fn spawn_input_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });
    rx
}
