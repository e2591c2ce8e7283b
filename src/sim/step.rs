//! State machine transitions and the per-tick step.
//!
//! Three entry points, all called from the game loop:
//!   - `click`: pointer press at a playfield position
//!   - `press` / `release`: movement and restart controls
//!   - `tick`: advance timers and bodies by `dt` seconds
//!
//! Each returns the events it produced (for sound).
//!
//! Playing tick order:
//!   1. Elapsed time
//!   2. Ball, then paddle
//!   3. Paddle catch (reflect the ball upward)
//!   4. Loss check (ball fully below the field)

use log::{debug, info, warn};

use crate::domain::physics::{self, FIELD_H, FIELD_W};
use super::event::GameEvent;
use super::layout;
use super::save;
use super::world::{GameState, Session, WorldState, MAX_NAME_LEN};

/// Discrete commands from keyboard or gamepad.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Control {
    Left,
    Right,
    Restart,
}

// ══════════════════════════════════════════════════════════════
// Transitions
// ══════════════════════════════════════════════════════════════

fn enter(world: &mut WorldState, next: GameState) {
    debug!("{:?} -> {:?}", world.state.phase(), next.phase());
    world.state = next;
}

/// Move to the next state via a by-value transition (keeps the session).
fn advance(world: &mut WorldState, transition: fn(GameState) -> GameState) {
    let current = std::mem::replace(&mut world.state, GameState::SelectName);
    let next = transition(current);
    enter(world, next);
}

/// Fresh ball, paddle and timers; always lands in Countdown.
pub fn setup_session(world: &mut WorldState) -> Vec<GameEvent> {
    debug!("session setup for {:?}", world.player_name);
    let session = Session::new(world.speed.ball_speed);
    let shown = session.countdown_shown();
    enter(world, GameState::Countdown(session));
    vec![GameEvent::CountdownTick { shown }]
}

fn persist_players(world: &mut WorldState) {
    if let Err(e) = save::save_player_list(&world.paths.players, &world.players) {
        warn!("{e}");
    }
    world.players.truncate_to_saved();
}

// ══════════════════════════════════════════════════════════════
// Pointer input
// ══════════════════════════════════════════════════════════════

pub fn click(world: &mut WorldState, x: f32, y: f32) -> Vec<GameEvent> {
    match world.state {
        GameState::SelectName => click_select_name(world, x, y),
        GameState::EnterName => click_enter_name(world, x, y),
        _ => vec![],
    }
}

enum NameHit {
    Select(usize),
    Delete(usize),
}

fn click_select_name(world: &mut WorldState, x: f32, y: f32) -> Vec<GameEvent> {
    // Rows are tested top to bottom, name before its "X"; first hit wins.
    let hit = world.players.names().iter().enumerate().find_map(|(index, name)| {
        if layout::name_button(index, name).is_clicked(x, y) {
            Some(NameHit::Select(index))
        } else if layout::delete_button(index).is_clicked(x, y) {
            Some(NameHit::Delete(index))
        } else {
            None
        }
    });

    match hit {
        Some(NameHit::Select(index)) => {
            world.player_name = world.players.names()[index].clone();
            let mut events = vec![GameEvent::ButtonPressed];
            events.extend(setup_session(world));
            return events;
        }
        Some(NameHit::Delete(index)) => {
            if let Some(removed) = world.players.remove(index) {
                debug!("removed player {removed:?}");
            }
            persist_players(world);
            return vec![GameEvent::ButtonPressed];
        }
        None => {}
    }

    if layout::new_name_button().is_clicked(x, y) {
        world.player_name.clear();
        enter(world, GameState::EnterName);
        return vec![GameEvent::ButtonPressed];
    }

    vec![]
}

fn click_enter_name(world: &mut WorldState, x: f32, y: f32) -> Vec<GameEvent> {
    let mut events = vec![];
    let kb = &world.keyboard;

    for key in &kb.letters {
        if key.is_clicked(x, y) && world.player_name.chars().count() < MAX_NAME_LEN {
            world.player_name.push_str(&key.label);
            events.push(GameEvent::ButtonPressed);
        }
    }
    // Space is not length-capped.
    if kb.space.is_clicked(x, y) {
        world.player_name.push(' ');
        events.push(GameEvent::ButtonPressed);
    }
    if kb.backspace.is_clicked(x, y) {
        world.player_name.pop();
        events.push(GameEvent::ButtonPressed);
    }
    if kb.done.is_clicked(x, y) && !world.player_name.is_empty() {
        let name = world.player_name.clone();
        if world.players.add_if_absent(&name) {
            info!("new player {name:?}");
            persist_players(world);
        }
        events.push(GameEvent::ButtonPressed);
        events.extend(setup_session(world));
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Controls
// ══════════════════════════════════════════════════════════════

pub fn press(world: &mut WorldState, control: Control) -> Vec<GameEvent> {
    let speed = world.speed.paddle_speed;
    match control {
        Control::Left => {
            if let Some(session) = world.state.session_mut() {
                session.paddle.vx = -speed;
            }
            vec![]
        }
        Control::Right => {
            if let Some(session) = world.state.session_mut() {
                session.paddle.vx = speed;
            }
            vec![]
        }
        Control::Restart => match world.state {
            GameState::GameOver(_) => setup_session(world),
            _ => vec![],
        },
    }
}

/// Releasing either direction stops the paddle.
pub fn release(world: &mut WorldState, control: Control) {
    if matches!(control, Control::Left | Control::Right) {
        if let Some(session) = world.state.session_mut() {
            session.paddle.vx = 0.0;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Tick
// ══════════════════════════════════════════════════════════════

pub fn tick(world: &mut WorldState, dt: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match world.state {
        GameState::Countdown(_) => tick_countdown(world, dt, &mut events),
        GameState::Playing(_) => tick_playing(world, dt, &mut events),
        _ => {}
    }
    events
}

fn tick_countdown(world: &mut WorldState, dt: f64, events: &mut Vec<GameEvent>) {
    let GameState::Countdown(session) = &mut world.state else { return };

    let before = session.countdown_shown();
    session.countdown -= dt;
    if session.countdown <= 0.0 {
        advance(world, GameState::into_playing);
        events.push(GameEvent::RunStarted);
    } else if session.countdown_shown() != before {
        events.push(GameEvent::CountdownTick { shown: session.countdown_shown() });
    }
}

fn tick_playing(world: &mut WorldState, dt: f64, events: &mut Vec<GameEvent>) {
    let GameState::Playing(session) = &mut world.state else { return };

    session.elapsed += dt;

    if session.ball.update(FIELD_W, FIELD_H) {
        events.push(GameEvent::WallBounce);
    }
    session.paddle.update(FIELD_W);

    if physics::paddle_catches(&session.ball, &session.paddle) {
        session.ball.vy = -session.ball.vy;
        events.push(GameEvent::PaddleHit);
    }

    if physics::ball_lost(&session.ball) {
        let elapsed = session.elapsed;
        end_run(world, elapsed, events);
    }
}

fn end_run(world: &mut WorldState, elapsed: f64, events: &mut Vec<GameEvent>) {
    let new_best = world.best.try_beat(elapsed, &world.player_name);
    if new_best {
        info!("new best time {:.2} by {}", world.best.time, world.best.holder);
        if let Err(e) = save::save_best_time(&world.paths.best_time, &world.best) {
            warn!("{e}");
        }
    }
    advance(world, GameState::into_game_over);
    events.push(GameEvent::RunEnded { time: elapsed, new_best });
}
