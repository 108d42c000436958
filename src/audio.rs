//! Sound cue layer
//!
//! The sim emits `GameEvent`s; this module turns them into cue playback on
//! a host-provided sink. Audio is best-effort: a sink may drop cues and the
//! sim never hears about it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A target leaves the launcher
    Launch,
    /// A target is sliced
    Whack,
    /// A bomb is sliced
    Explosion,
    /// A target fell through unsliced
    Miss,
    /// Slice gesture swipes, three variants
    Swoosh1,
    Swoosh2,
    Swoosh3,
    /// Looping fuse, alive while any bomb is airborne
    BombFuse,
    /// Session over
    GameOver,
}

/// Playback surface supplied by the host engine
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn start_loop(&mut self, effect: SoundEffect);
    fn stop_loop(&mut self, effect: SoundEffect);
}

/// Seconds one swoosh cue takes; no new swoosh starts until it is done
const SWOOSH_SECS: f32 = 0.8;

/// Maps drained game events onto sink playback, holding the bits of audio
/// state that are not gameplay: the swoosh debounce and its variant pick.
pub struct AudioDirector {
    swoosh_cooldown: f32,
    rng: Pcg32,
    muted: bool,
}

impl Default for AudioDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDirector {
    pub fn new() -> Self {
        Self {
            swoosh_cooldown: 0.0,
            // Cue variety only; independent of session determinism
            rng: Pcg32::seed_from_u64(0x51),
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Count down the swoosh debounce
    pub fn update(&mut self, dt: f32) {
        self.swoosh_cooldown = (self.swoosh_cooldown - dt).max(0.0);
    }

    pub fn handle(&mut self, event: GameEvent, sink: &mut dyn AudioSink) {
        // Loop bookkeeping still runs while muted so no fuse lingers
        let muted = self.muted;
        match event {
            GameEvent::FuseLit => {
                // Re-lighting restarts the loop for the newest bomb
                sink.stop_loop(SoundEffect::BombFuse);
                if !muted {
                    sink.start_loop(SoundEffect::BombFuse);
                }
            }
            GameEvent::FuseOut => sink.stop_loop(SoundEffect::BombFuse),
            GameEvent::SessionEnded { .. } => {
                sink.stop_loop(SoundEffect::BombFuse);
                if !muted {
                    sink.play(SoundEffect::GameOver);
                }
            }
            GameEvent::Launched if !muted => sink.play(SoundEffect::Launch),
            GameEvent::Sliced { .. } if !muted => sink.play(SoundEffect::Whack),
            GameEvent::BombDetonated { .. } if !muted => sink.play(SoundEffect::Explosion),
            GameEvent::LifeLost if !muted => sink.play(SoundEffect::Miss),
            GameEvent::SliceMoved if !muted => {
                if self.swoosh_cooldown == 0.0 {
                    let swoosh = match self.rng.random_range(0..3) {
                        0 => SoundEffect::Swoosh1,
                        1 => SoundEffect::Swoosh2,
                        _ => SoundEffect::Swoosh3,
                    };
                    sink.play(swoosh);
                    self.swoosh_cooldown = SWOOSH_SECS;
                }
            }
            _ => {}
        }
    }
}
