//! Session state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::timer::{TimerAction, TimerQueue};
use crate::consts::*;

/// What slicing a target is worth - or whether it ends the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Normal,
    Bonus,
    Bomb,
}

/// Whether the trajectory generator may pick a bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombPolicy {
    Never,
    Always,
    Random,
}

/// One entry of the spawn program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePattern {
    SingleSafe,
    Single,
    PairWithBomb,
    Pair,
    Triple,
    Quad,
    Chain,
    FastChain,
}

impl WavePattern {
    pub const ALL: [WavePattern; 8] = [
        WavePattern::SingleSafe,
        WavePattern::Single,
        WavePattern::PairWithBomb,
        WavePattern::Pair,
        WavePattern::Triple,
        WavePattern::Quad,
        WavePattern::Chain,
        WavePattern::FastChain,
    ];
}

/// Flight phase of a spawned target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetPhase {
    /// In flight: hit-testable and counted by the active registry
    Airborne,
    /// Sliced: shrinking and fading, inert
    Vanishing { timer: f32 },
}

/// A spawned target
#[derive(Debug, Clone)]
pub struct Target {
    pub id: u32,
    pub kind: TargetKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    pub phase: TargetPhase,
    /// Render scale and alpha, animated while vanishing
    pub scale: f32,
    pub alpha: f32,
}

impl Target {
    pub fn is_airborne(&self) -> bool {
        matches!(self.phase, TargetPhase::Airborne)
    }

    /// Screen-space bounds check against the target's hit circle
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= TARGET_RADIUS * TARGET_RADIUS
    }
}

/// Pacing parameters, tightened once per wave dispatch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyRamp {
    /// Seconds between wave dispatches
    pub spawn_interval: f32,
    /// Seconds spanned by a chain wave
    pub chain_stagger: f32,
    /// Scalar on the simulated physics time
    pub time_scale: f32,
}

impl Default for DifficultyRamp {
    fn default() -> Self {
        Self {
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            chain_stagger: INITIAL_CHAIN_STAGGER,
            time_scale: INITIAL_TIME_SCALE,
        }
    }
}

impl DifficultyRamp {
    /// One dispatch worth of tightening. No floor or ceiling.
    pub fn tighten(&mut self) {
        self.spawn_interval *= SPAWN_INTERVAL_DECAY;
        self.chain_stagger *= CHAIN_STAGGER_DECAY;
        self.time_scale *= TIME_SCALE_GROWTH;
    }
}

/// Recent gesture points, kept for trail rendering
#[derive(Debug, Clone, Default)]
pub struct SliceTrail {
    /// Oldest first, at most `TRAIL_MAX_POINTS`
    pub points: Vec<Vec2>,
    pub alpha: f32,
    pub fading: bool,
}

impl SliceTrail {
    /// Start a fresh gesture at `point`
    pub fn begin(&mut self, point: Vec2) {
        self.points.clear();
        self.points.push(point);
        self.alpha = 1.0;
        self.fading = false;
    }

    /// Append a point, discarding the oldest beyond the cap
    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
        if self.points.len() > TRAIL_MAX_POINTS {
            let excess = self.points.len() - TRAIL_MAX_POINTS;
            self.points.drain(..excess);
        }
    }

    pub fn fade_out(&mut self) {
        self.fading = true;
    }
}

/// Side effects for the host to play back, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A non-bomb target left the launcher
    Launched,
    Sliced { kind: TargetKind, pos: Vec2 },
    BombDetonated { pos: Vec2 },
    /// A target fell through unsliced
    LifeLost,
    /// The slice moved; the audio layer decides whether a swoosh plays
    SliceMoved,
    FuseLit,
    FuseOut,
    SessionEnded { by_bomb: bool },
}

/// Complete session state, deterministic for a given seed and input stream
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u32,
    pub lives: u8,
    /// One-way flag; nothing resets it within a session
    pub ended: bool,
    /// Only meaningful once `ended` is set
    pub ended_by_bomb: bool,
    /// Render-facing life indicators, left to right
    pub life_markers_gone: [bool; 3],
    pub ramp: DifficultyRamp,
    /// Spawn program: fixed warm-up prefix plus a random tail
    pub sequence: Vec<WavePattern>,
    pub cursor: usize,
    /// Re-entrancy guard for the re-arm scheduler
    pub next_wave_queued: bool,
    /// Unscaled session seconds; timer delays run on this clock
    pub clock: f64,
    /// Bumped by `restart`; timers from older generations are ignored
    pub generation: u32,
    /// Active object registry (plus sliced targets finishing their fade)
    pub targets: Vec<Target>,
    pub trail: SliceTrail,
    pub fuse_active: bool,
    pub timers: TimerQueue,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session. The first wave fires `FIRST_WAVE_DELAY`
    /// seconds in.
    pub fn new(seed: u64) -> Self {
        Self::with_generation(seed, 0)
    }

    fn with_generation(seed: u64, generation: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let sequence = super::wave::build_sequence(&mut rng);
        let mut state = Self {
            seed,
            rng,
            score: 0,
            lives: STARTING_LIVES,
            ended: false,
            ended_by_bomb: false,
            life_markers_gone: [false; 3],
            ramp: DifficultyRamp::default(),
            sequence,
            cursor: 0,
            next_wave_queued: true,
            clock: 0.0,
            generation,
            targets: Vec::new(),
            trail: SliceTrail::default(),
            fuse_active: false,
            timers: TimerQueue::default(),
            events: Vec::new(),
            next_id: 1,
        };
        state
            .timers
            .schedule(0.0, FIRST_WAVE_DELAY, generation, TimerAction::NextWave);
        state
    }

    /// Begin a fresh session. Deferred work scheduled by the previous
    /// session stays queued but fires into a stale generation and is
    /// discarded.
    pub fn restart(&mut self, seed: u64) {
        let mut fresh = Self::with_generation(seed, self.generation + 1);
        fresh.timers.adopt(std::mem::take(&mut self.timers));
        *self = fresh;
    }

    /// Allocate a new target ID; never reused within a session
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// True while at least one target is still in flight
    pub fn any_airborne(&self) -> bool {
        self.targets.iter().any(Target::is_airborne)
    }

    pub fn any_airborne_bomb(&self) -> bool {
        self.targets
            .iter()
            .any(|t| t.is_airborne() && t.kind == TargetKind::Bomb)
    }

    /// Burn one life for a missed target. No-op once the session is over.
    pub fn lose_life(&mut self) {
        if self.ended {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.life_markers_gone = [true; 3];
            self.end_session(false);
        } else {
            self.life_markers_gone[(STARTING_LIVES - 1 - self.lives) as usize] = true;
            self.events.push(GameEvent::LifeLost);
        }
    }

    /// Terminal transition. Idempotent: a second call changes nothing.
    pub fn end_session(&mut self, by_bomb: bool) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.ended_by_bomb = by_bomb;
        self.ramp.time_scale = ENDED_TIME_SCALE;
        if by_bomb {
            self.life_markers_gone = [true; 3];
        }
        if self.fuse_active {
            self.fuse_active = false;
            self.events.push(GameEvent::FuseOut);
        }
        self.events.push(GameEvent::SessionEnded { by_bomb });
        log::info!("session over: score {}, by_bomb {}", self.score, by_bomb);
    }

    /// Hand the frame's accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
