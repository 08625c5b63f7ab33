//! Entry point and game loop.

mod app;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::Rng;

use app::{App, CursorMove, Screen};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;
use wordbits::config::GameConfig;
use wordbits::logging::init_logger;
use wordbits::sim::event::SessionEvent;
use wordbits::sim::library::LevelLibrary;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
/// Animation and message timers advance once per tick.
const TICK_RATE: Duration = Duration::from_millis(60);

fn main() {
    let config = GameConfig::load();
    init_logger(&config.log);
    for warning in &config.warnings {
        log::warn!("config: {warning}");
    }

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("shuffle seed {seed}");

    let library = LevelLibrary::discover(&config.levels_dir);
    log::info!("levels from {}", library.source_name());

    let (mut app, events) = App::new(&config, library, seed);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    process_sound_events(sound.as_ref(), &events);

    let result = game_loop(&mut app, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Wordbits!");
    println!("Final Score: {}  (level {}, seed {})", app.session.score(), app.session.level(), app.seed);
}

fn game_loop(
    app: &mut App,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    if gp.connected {
        log::info!("gamepad detected");
    }
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_input(app, sound, &kb, &gp) {
            break;
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }

        renderer.render(app, kb.resized)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[SessionEvent]) {
    let Some(sfx) = sound else { return };
    // The level-up fanfare covers the solve that triggered it.
    let leveled_up = events.contains(&SessionEvent::LevelUpAvailable);
    for event in events {
        match event {
            SessionEvent::Correct { .. } if !leveled_up => sfx.play_correct(),
            SessionEvent::Correct { .. } => {}
            SessionEvent::Incorrect { .. } | SessionEvent::LoadFailed { .. } => sfx.play_incorrect(),
            SessionEvent::LevelUpAvailable => sfx.play_level_up(),
            SessionEvent::LevelLoaded { .. } => sfx.play_level_start(),
        }
    }
}

// ── Key bindings ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_PICK: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_SUBMIT: &[KeyCode] = &[KeyCode::Enter];
const KEYS_CLEAR: &[KeyCode] = &[KeyCode::Backspace, KeyCode::Delete];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];

fn detect_cursor_move(kb: &InputState, gp: &GamepadState) -> Option<CursorMove> {
    let from_keys = [
        (KEYS_LEFT, CursorMove::Left),
        (KEYS_RIGHT, CursorMove::Right),
        (KEYS_UP, CursorMove::Up),
        (KEYS_DOWN, CursorMove::Down),
    ]
    .into_iter()
    .find(|(keys, _)| kb.any_pressed(keys))
    .map(|(_, dir)| dir);

    from_keys.or_else(|| gp.cursor_move())
}

/// Handle this frame's input for the current screen.
/// Returns true when the player quits.
fn handle_input(app: &mut App, sound: Option<&SoundEngine>, kb: &InputState, gp: &GamepadState) -> bool {
    let quit = kb.letter_pressed('q') || gp.quit_pressed();

    match app.screen {
        Screen::Playing => {
            if quit || kb.was_pressed(KeyCode::Esc) {
                return true;
            }
            if let Some(dir) = detect_cursor_move(kb, gp) {
                app.move_cursor(dir);
            }
            if kb.any_pressed(KEYS_PICK) || gp.pick_pressed() {
                if app.pick() {
                    if let Some(sfx) = sound {
                        sfx.play_pick();
                    }
                }
            }
            if kb.any_pressed(KEYS_CLEAR) || gp.clear_pressed() {
                app.clear();
            }
            if kb.any_pressed(KEYS_SUBMIT) || gp.submit_pressed() {
                let events = app.submit_or_advance();
                process_sound_events(sound, &events);
            } else if gp.confirm_pressed() && app.can_advance() {
                let events = app.confirm_level_up();
                process_sound_events(sound, &events);
            }
        }

        Screen::LevelUpPrompt => {
            if quit {
                return true;
            }
            if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() || gp.pick_pressed() {
                let events = app.confirm_level_up();
                process_sound_events(sound, &events);
            } else if kb.was_pressed(KeyCode::Esc) || gp.clear_pressed() {
                app.dismiss_level_up();
            }
        }

        Screen::LoadFailed | Screen::GameComplete => {
            if quit
                || kb.was_pressed(KeyCode::Esc)
                || kb.was_pressed(KeyCode::Enter)
                || gp.confirm_pressed()
            {
                return true;
            }
        }
    }

    false
}
