//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Inputs batched per tick
//! - No rendering or platform dependencies

pub mod slice;
pub mod state;
pub mod tick;
pub mod timer;
pub mod wave;

pub use slice::GestureEvent;
pub use state::{
    BombPolicy, DifficultyRamp, GameEvent, GameState, SliceTrail, Target, TargetKind, TargetPhase,
    WavePattern,
};
pub use tick::{TickInput, tick};
pub use timer::{TimerAction, TimerQueue};
pub use wave::{advance_wave, build_sequence, launch_target};
