//! WorldState: everything the game loop owns.
//!
//! ## State machine
//!
//!   SelectName ──name──▶ Countdown ──3s──▶ Playing ──ball lost──▶ GameOver
//!       │                    ▲                                      │
//!       └─New Name─▶ EnterName ─Done─┘                  ◀──restart──┘
//!
//! The in-run states carry their `Session`, so a session exists exactly when
//! a state needs one. Transitions live in `sim::step`.

use crate::config::SpeedConfig;
use crate::domain::entity::{Ball, Paddle};
use crate::domain::physics::{FIELD_H, FIELD_W};
use super::layout::Keyboard;
use super::save::{self, BestTimeRecord, DataPaths, PlayerList};

/// Pre-play delay in seconds.
pub const COUNTDOWN_SECS: f64 = 3.0;
/// Letter keys stop appending at this length.
pub const MAX_NAME_LEN: usize = 15;

/// State tag without payload (for rendering and logging).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    SelectName,
    EnterName,
    Countdown,
    Playing,
    GameOver,
}

/// One play-through: bodies and timers.
#[derive(Clone, PartialEq, Debug)]
pub struct Session {
    pub ball: Ball,
    pub paddle: Paddle,
    /// Seconds survived so far.
    pub elapsed: f64,
    /// Seconds left before play starts.
    pub countdown: f64,
}

impl Session {
    pub fn new(ball_speed: f32) -> Self {
        Session {
            ball: Ball::new(FIELD_W / 2.0, FIELD_H / 2.0, ball_speed),
            paddle: Paddle::new(FIELD_W / 2.0, FIELD_H / 5.0),
            elapsed: 0.0,
            countdown: COUNTDOWN_SECS,
        }
    }

    /// Digit shown during the countdown: 3, 2, 1.
    pub fn countdown_shown(&self) -> u32 {
        let shown = self.countdown.max(0.0).floor() as u32 + 1;
        shown.min(COUNTDOWN_SECS as u32)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum GameState {
    SelectName,
    EnterName,
    Countdown(Session),
    Playing(Session),
    GameOver(Session),
}

impl GameState {
    pub fn phase(&self) -> Phase {
        match self {
            GameState::SelectName => Phase::SelectName,
            GameState::EnterName => Phase::EnterName,
            GameState::Countdown(_) => Phase::Countdown,
            GameState::Playing(_) => Phase::Playing,
            GameState::GameOver(_) => Phase::GameOver,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            GameState::Countdown(s) | GameState::Playing(s) | GameState::GameOver(s) => Some(s),
            GameState::SelectName | GameState::EnterName => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            GameState::Countdown(s) | GameState::Playing(s) | GameState::GameOver(s) => Some(s),
            GameState::SelectName | GameState::EnterName => None,
        }
    }

    /// Countdown → Playing, keeping the session. Other states are unchanged.
    pub fn into_playing(self) -> Self {
        match self {
            GameState::Countdown(s) => GameState::Playing(s),
            other => other,
        }
    }

    /// Playing → GameOver, keeping the session for the results screen.
    pub fn into_game_over(self) -> Self {
        match self {
            GameState::Playing(s) => GameState::GameOver(s),
            other => other,
        }
    }
}

pub struct WorldState {
    pub state: GameState,
    /// Current player; also the in-progress buffer while entering a name.
    pub player_name: String,
    pub best: BestTimeRecord,
    pub players: PlayerList,
    pub keyboard: Keyboard,
    pub speed: SpeedConfig,
    pub paths: DataPaths,
}

impl WorldState {
    /// Fresh world on the name-selection screen, with records loaded from disk.
    pub fn new(paths: DataPaths, speed: SpeedConfig) -> Self {
        let best = save::load_best_time(&paths.best_time);
        let players = save::load_player_list(&paths.players);
        WorldState {
            state: GameState::SelectName,
            player_name: String::new(),
            best,
            players,
            keyboard: Keyboard::new(),
            speed,
            paths,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }
}
