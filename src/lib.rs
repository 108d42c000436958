//! Ninja Slice - a slice-the-targets arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, slicing, session state)
//! - `audio`: Sound cue mapping over a host-provided sink
//! - `settings`: User preferences

pub mod audio;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz, matches the host frame driver)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Play field extent in scene points
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Horizontal band targets launch from
    pub const SPAWN_X_MIN: i32 = 64;
    pub const SPAWN_X_MAX: i32 = 960;
    /// Launch height, below the visible field
    pub const SPAWN_Y: f32 = -128.0;
    /// Targets falling past this line have exited unseen
    pub const OFFSCREEN_Y: f32 = -140.0;

    /// Hit-test radius of a spawned target
    pub const TARGET_RADIUS: f32 = 64.0;

    /// Gravity in points/s^2, scaled by the ramp's time scale
    pub const GRAVITY_Y: f32 = -900.0;
    /// Integer velocity rolls are scaled by this many points/s
    pub const VELOCITY_STEP: f32 = 40.0;

    /// Horizontal zones picking the launch velocity band
    pub const ZONE_LEFT_EDGE: f32 = 256.0;
    pub const ZONE_CENTER: f32 = 512.0;
    pub const ZONE_RIGHT_EDGE: f32 = 765.0;

    /// Seconds between wave dispatches at session start
    pub const INITIAL_SPAWN_INTERVAL: f32 = 0.9;
    /// Seconds spanned by a chain wave at session start
    pub const INITIAL_CHAIN_STAGGER: f32 = 3.0;
    /// Physics time scale at session start
    pub const INITIAL_TIME_SCALE: f32 = 0.85;
    /// Time scale once the session has ended (slow-motion wind-down)
    pub const ENDED_TIME_SCALE: f32 = 0.2;

    /// Ramp multipliers, applied exactly once per wave dispatch.
    /// Intentionally unclamped: the ramp runs away long before the numbers
    /// degenerate.
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.991;
    pub const CHAIN_STAGGER_DECAY: f32 = 0.99;
    pub const TIME_SCALE_GROWTH: f32 = 1.02;

    /// Delay before the first wave of a session
    pub const FIRST_WAVE_DELAY: f64 = 2.0;
    /// Random patterns appended after the warm-up prefix
    pub const RANDOM_TAIL_LEN: usize = 1000;

    /// Maximum points retained in the slice trail
    pub const TRAIL_MAX_POINTS: usize = 12;
    /// Seconds the trail takes to fade after a gesture ends
    pub const TRAIL_FADE_SECS: f32 = 0.25;
    /// Seconds a sliced target takes to shrink and fade out
    pub const VANISH_SECS: f32 = 0.2;

    pub const STARTING_LIVES: u8 = 3;
    pub const NORMAL_SCORE: u32 = 1;
    pub const BONUS_SCORE: u32 = 5;
}
