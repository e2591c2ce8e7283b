//! Events emitted by the state machine.
//! The presentation layer consumes these for sound.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// An on-screen key or button was pressed.
    ButtonPressed,
    /// Displayed countdown digit changed (or a countdown began).
    CountdownTick { shown: u32 },
    RunStarted,
    WallBounce,
    PaddleHit,
    RunEnded { time: f64, new_best: bool },
}
