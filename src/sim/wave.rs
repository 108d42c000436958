//! Spawn sequencing, difficulty ramp, and trajectory generation

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{BombPolicy, GameEvent, GameState, Target, TargetKind, TargetPhase, WavePattern};
use super::timer::TimerAction;
use crate::consts::*;

/// The fixed warm-up prefix that eases the player in before the random tail
pub const WARMUP: [WavePattern; 7] = [
    WavePattern::SingleSafe,
    WavePattern::SingleSafe,
    WavePattern::PairWithBomb,
    WavePattern::PairWithBomb,
    WavePattern::Triple,
    WavePattern::Single,
    WavePattern::Chain,
];

/// Build the session's spawn program: the warm-up prefix followed by
/// `RANDOM_TAIL_LEN` patterns drawn uniformly with replacement.
pub fn build_sequence(rng: &mut Pcg32) -> Vec<WavePattern> {
    let mut sequence = Vec::with_capacity(WARMUP.len() + RANDOM_TAIL_LEN);
    sequence.extend_from_slice(&WARMUP);
    for _ in 0..RANDOM_TAIL_LEN {
        sequence.push(random_pattern(rng));
    }
    sequence
}

fn random_pattern(rng: &mut Pcg32) -> WavePattern {
    WavePattern::ALL[rng.random_range(0..WavePattern::ALL.len())]
}

/// Dispatch the wave at the cursor. No-op once the session has ended.
///
/// The ramp tightens before the entry is read, so the interval and stagger
/// in effect are always one step ahead of the pattern being dispatched.
pub fn advance_wave(state: &mut GameState) {
    if state.ended {
        return;
    }
    state.ramp.tighten();

    if state.cursor >= state.sequence.len() {
        // The program ran dry; splice in another random stretch rather than
        // leaving the field empty with nothing left to re-arm.
        log::debug!("spawn program exhausted at wave {}, extending", state.cursor);
        for _ in 0..RANDOM_TAIL_LEN {
            let pattern = random_pattern(&mut state.rng);
            state.sequence.push(pattern);
        }
    }

    let pattern = state.sequence[state.cursor];
    match pattern {
        WavePattern::SingleSafe => launch_target(state, BombPolicy::Never),
        WavePattern::Single => launch_target(state, BombPolicy::Random),
        WavePattern::PairWithBomb => {
            launch_target(state, BombPolicy::Never);
            launch_target(state, BombPolicy::Always);
        }
        WavePattern::Pair => {
            for _ in 0..2 {
                launch_target(state, BombPolicy::Random);
            }
        }
        WavePattern::Triple => {
            for _ in 0..3 {
                launch_target(state, BombPolicy::Random);
            }
        }
        WavePattern::Quad => {
            for _ in 0..4 {
                launch_target(state, BombPolicy::Random);
            }
        }
        WavePattern::Chain => dispatch_chain(state, 5.0),
        WavePattern::FastChain => dispatch_chain(state, 10.0),
    }

    state.cursor += 1;
    state.next_wave_queued = false;
}

/// One target now, four more deferred at even fractions of the stagger
fn dispatch_chain(state: &mut GameState, divisor: f32) {
    launch_target(state, BombPolicy::Random);
    let step = (state.ramp.chain_stagger / divisor) as f64;
    for k in 1..=4u32 {
        state.timers.schedule(
            state.clock,
            step * f64::from(k),
            state.generation,
            TimerAction::ChainSpawn,
        );
    }
}

/// Launch one target from below the field and register it as active.
pub fn launch_target(state: &mut GameState, policy: BombPolicy) {
    let kind = match policy {
        BombPolicy::Always => TargetKind::Bomb,
        BombPolicy::Never => TargetKind::Normal,
        BombPolicy::Random => match state.rng.random_range(0..=6) {
            0 => TargetKind::Bomb,
            1 => TargetKind::Bonus,
            _ => TargetKind::Normal,
        },
    };

    let x = state.rng.random_range(SPAWN_X_MIN..=SPAWN_X_MAX) as f32;

    // Edge spawns get flung hard toward the far side; central spawns drift
    // gently toward the nearer edge. Either way the arc crosses the field.
    let vx: i32 = if x < ZONE_LEFT_EDGE {
        state.rng.random_range(8..=15)
    } else if x < ZONE_CENTER {
        state.rng.random_range(3..=5)
    } else if x < ZONE_RIGHT_EDGE {
        -state.rng.random_range(3..=5)
    } else {
        -state.rng.random_range(8..=15)
    };
    let vy: i32 = state.rng.random_range(24..=32);
    let angular_vel = state.rng.random_range(-3.0..=3.0);

    let id = state.next_entity_id();
    state.targets.push(Target {
        id,
        kind,
        pos: Vec2::new(x, SPAWN_Y),
        vel: Vec2::new(vx as f32, vy as f32) * VELOCITY_STEP,
        angle: 0.0,
        angular_vel,
        phase: TargetPhase::Airborne,
        scale: 1.0,
        alpha: 1.0,
    });

    if kind == TargetKind::Bomb {
        // Re-lighting restarts the loop for the newest bomb
        state.fuse_active = true;
        state.events.push(GameEvent::FuseLit);
    } else {
        state.events.push(GameEvent::Launched);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timer::TimerQueue;
    use rand::SeedableRng;

    #[test]
    fn sequence_starts_with_the_warmup_prefix() {
        let mut rng = Pcg32::seed_from_u64(7);
        let sequence = build_sequence(&mut rng);
        assert_eq!(&sequence[..WARMUP.len()], &WARMUP);
        assert_eq!(sequence.len(), WARMUP.len() + RANDOM_TAIL_LEN);
    }

    #[test]
    fn safe_spawns_never_produce_bombs() {
        let mut state = GameState::new(42);
        for _ in 0..1000 {
            launch_target(&mut state, BombPolicy::Never);
        }
        assert!(state.targets.iter().all(|t| t.kind != TargetKind::Bomb));
    }

    #[test]
    fn forced_bomb_lights_the_fuse() {
        let mut state = GameState::new(42);
        launch_target(&mut state, BombPolicy::Always);
        assert_eq!(state.targets[0].kind, TargetKind::Bomb);
        assert!(state.fuse_active);
        assert!(state.drain_events().contains(&GameEvent::FuseLit));
    }

    #[test]
    fn random_policy_produces_every_kind() {
        let mut state = GameState::new(42);
        for _ in 0..1000 {
            launch_target(&mut state, BombPolicy::Random);
        }
        let count = |kind| state.targets.iter().filter(|t| t.kind == kind).count();
        let normals = count(TargetKind::Normal);
        let bonuses = count(TargetKind::Bonus);
        let bombs = count(TargetKind::Bomb);
        assert!(normals > bonuses && normals > bombs);
        assert!(bonuses > 0 && bombs > 0);
    }

    #[test]
    fn launch_velocity_points_inward_from_the_edges() {
        let mut state = GameState::new(7);
        for _ in 0..500 {
            launch_target(&mut state, BombPolicy::Never);
        }
        for target in &state.targets {
            if target.pos.x < ZONE_CENTER {
                assert!(target.vel.x > 0.0, "left-half spawn must travel right");
            } else {
                assert!(target.vel.x < 0.0, "right-half spawn must travel left");
            }
            assert!(target.vel.y >= 24.0 * VELOCITY_STEP);
            assert!(target.vel.y <= 32.0 * VELOCITY_STEP);
        }
    }

    #[test]
    fn ramp_tightens_exactly_once_per_dispatch() {
        let mut state = GameState::new(1);
        // Warm-up entry 4 dispatches three targets in one wave
        state.cursor = 4;
        let before = state.ramp;
        advance_wave(&mut state);
        assert_eq!(state.targets.len(), 3);
        assert!((state.ramp.spawn_interval - before.spawn_interval * SPAWN_INTERVAL_DECAY).abs() < 1e-6);
        assert!((state.ramp.chain_stagger - before.chain_stagger * CHAIN_STAGGER_DECAY).abs() < 1e-6);
        assert!((state.ramp.time_scale - before.time_scale * TIME_SCALE_GROWTH).abs() < 1e-6);
    }

    #[test]
    fn chain_defers_four_staggered_spawns() {
        let mut state = GameState::new(3);
        state.timers = TimerQueue::default();
        state.cursor = 6; // warm-up Chain entry
        let stagger = state.ramp.chain_stagger * CHAIN_STAGGER_DECAY;
        advance_wave(&mut state);

        assert_eq!(state.targets.len(), 1);
        assert_eq!(state.timers.pending(), 4);
        let step = f64::from(stagger / 5.0);
        for k in 1..=4u32 {
            let due = state.timers.drain_due(step * f64::from(k) + 1e-9, 0);
            assert_eq!(due, vec![TimerAction::ChainSpawn], "link {k} due");
        }
    }

    #[test]
    fn fast_chain_staggers_at_a_tenth() {
        let mut state = GameState::new(3);
        state.timers = TimerQueue::default();
        state.sequence[0] = WavePattern::FastChain;
        let stagger = state.ramp.chain_stagger * CHAIN_STAGGER_DECAY;
        advance_wave(&mut state);

        let step = f64::from(stagger / 10.0);
        assert_eq!(state.timers.drain_due(step * 4.0 + 1e-9, 0).len(), 4);
    }

    #[test]
    fn advance_is_inert_after_session_end() {
        let mut state = GameState::new(5);
        state.end_session(false);
        let ramp = state.ramp;
        let cursor = state.cursor;
        advance_wave(&mut state);
        assert_eq!(state.ramp, ramp);
        assert_eq!(state.cursor, cursor);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn exhausted_program_grows_a_new_tail() {
        let mut state = GameState::new(5);
        let len = state.sequence.len();
        state.cursor = len;
        advance_wave(&mut state);
        assert_eq!(state.sequence.len(), len + RANDOM_TAIL_LEN);
        assert_eq!(state.cursor, len + 1);
    }
}
