//! Ninja Slice entry point
//!
//! Headless demo driver: runs a seeded session with a simple auto-slicer
//! standing in for the player and logs the cues a host engine would play.

use std::cmp::Ordering;

use glam::Vec2;

use ninja_slice::Settings;
use ninja_slice::audio::{AudioDirector, AudioSink, SoundEffect};
use ninja_slice::consts::SIM_DT;
use ninja_slice::sim::{GameState, GestureEvent, TargetKind, TickInput, tick};

/// Sink that logs cues instead of playing them
struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("cue: {effect:?}");
    }
    fn start_loop(&mut self, effect: SoundEffect) {
        log::debug!("loop on: {effect:?}");
    }
    fn stop_loop(&mut self, effect: SoundEffect) {
        log::debug!("loop off: {effect:?}");
    }
}

/// Demo session cap: ten minutes of simulated play
const MAX_FRAMES: u64 = 120 * 600;

fn main() {
    env_logger::init();

    let settings = Settings::load(std::path::Path::new("ninja-slice-settings.json"));
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);
    log::info!("starting demo session with seed {seed}");

    let mut state = GameState::new(seed);
    let mut director = AudioDirector::new();
    director.set_muted(settings.muted);
    let mut sink = LogSink;

    // Auto-player: each frame, swipe through the lowest airborne non-bomb
    // target once it has risen into the field. Bombs are left alone.
    let mut slicing = false;
    let mut frames = 0u64;
    while !state.ended && frames < MAX_FRAMES {
        let mut input = TickInput::default();
        let quarry = state
            .targets
            .iter()
            .filter(|t| t.is_airborne() && t.kind != TargetKind::Bomb && t.pos.y > 0.0)
            .min_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal))
            .map(|t| t.pos);

        if let Some(point) = quarry {
            if !slicing {
                input
                    .gestures
                    .push(GestureEvent::Began(point + Vec2::new(-40.0, 0.0)));
                slicing = true;
            }
            input.gestures.push(GestureEvent::Moved(point));
        } else if slicing {
            input.gestures.push(GestureEvent::Ended);
            slicing = false;
        }

        tick(&mut state, &input, SIM_DT);
        director.update(SIM_DT);
        for event in state.drain_events() {
            director.handle(event, &mut sink);
        }
        frames += 1;
    }

    println!(
        "score {}  lives {}  waves {}  ({:.1}s simulated)",
        state.score,
        state.lives,
        state.cursor,
        frames as f32 * SIM_DT
    );
}
