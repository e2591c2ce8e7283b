/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use log::{error, info, warn};

use config::GameConfig;
use sim::event::GameEvent;
use sim::save::{self, DataPaths};
use sim::step::{self, Control};
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE: &str = "pong.log";

fn main() {
    init_logging(&save::default_data_dir());
    info!("starting paddle-survival {}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load();
    let data_dir = config.data_dir.clone().unwrap_or_else(save::default_data_dir);
    info!("data directory: {}", data_dir.display());
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        warn!("cannot create {}: {e}", data_dir.display());
    }

    let mut world = WorldState::new(DataPaths::in_dir(&data_dir), config.speed.clone());

    let mut renderer = Renderer::new();
    let honor_release = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            // Leave the terminal usable even if init failed halfway.
            let _ = renderer.cleanup();
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, honor_release);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!("Best: {:.2} by {}", world.best.time, world.best.holder);
    info!("exit");
}

/// Route `log` output to a file; the terminal is busy with the game.
/// `RUST_LOG` overrides the default `info` filter.
fn init_logging(dir: &Path) {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(dir.join(LOG_FILE)) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    honor_release: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new(honor_release);
    let mut gp = GamepadState::new(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    let mut held: Option<Control> = None;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || should_quit(world, &kb, &gp) {
            break;
        }

        // ── Pointer ──
        let projection = renderer.projection();
        for &(col, row) in kb.clicks() {
            let (x, y) = projection.cell_center(col, row);
            let events = step::click(world, x, y);
            process_sound_events(sound, &events);
        }

        // ── Movement: press while held, release on let-go ──
        let direction = detect_movement(&kb, &gp);
        if direction.is_none() {
            if let Some(prev) = held {
                step::release(world, prev);
            }
        }
        if let Some(dir) = direction {
            step::press(world, dir);
        }
        held = direction;

        if kb.any_pressed(KEYS_RESTART) || gp.confirm_pressed() {
            let events = step::press(world, Control::Restart);
            process_sound_events(sound, &events);
        }

        let since = last_tick.elapsed();
        if since >= tick_rate {
            let events = step::tick(world, since.as_secs_f64());
            log_run_end(world, &events);
            process_sound_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::ButtonPressed => sfx.play_click(),
            GameEvent::CountdownTick { shown } => sfx.play_countdown(*shown),
            GameEvent::RunStarted => sfx.play_go(),
            GameEvent::WallBounce => sfx.play_wall(),
            GameEvent::PaddleHit => sfx.play_paddle(),
            GameEvent::RunEnded { new_best: true, .. } => sfx.play_new_best(),
            GameEvent::RunEnded { new_best: false, .. } => sfx.play_game_over(),
        }
    }
}

fn log_run_end(world: &WorldState, events: &[GameEvent]) {
    for event in events {
        if let GameEvent::RunEnded { time, new_best } = event {
            let suffix = if *new_best { " (new best)" } else { "" };
            info!("{} survived {time:.2}s{suffix}", world.player_name);
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc];

fn detect_movement(kb: &InputState, gp: &GamepadState) -> Option<Control> {
    if kb.any_held(KEYS_LEFT) || kb.any_pressed(KEYS_LEFT) || gp.left_held() {
        Some(Control::Left)
    } else if kb.any_held(KEYS_RIGHT) || kb.any_pressed(KEYS_RIGHT) || gp.right_held() {
        Some(Control::Right)
    } else {
        None
    }
}

/// Esc quits from anywhere; the gamepad's cancel only on the name screens.
fn should_quit(world: &WorldState, kb: &InputState, gp: &GamepadState) -> bool {
    let on_name_screen = matches!(world.phase(), Phase::SelectName | Phase::EnterName);
    kb.any_pressed(KEYS_QUIT) || (on_name_screen && gp.cancel_pressed())
}
