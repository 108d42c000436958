//! Per-frame session update
//!
//! Drains due timers, applies the frame's gestures, integrates flight,
//! sweeps the field, and re-arms the sequencer once the field is clear.

use super::slice::{self, GestureEvent};
use super::state::{BombPolicy, GameEvent, GameState, TargetKind, TargetPhase};
use super::timer::TimerAction;
use super::wave;
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Gesture events observed since the previous tick, oldest first
    pub gestures: Vec<GestureEvent>,
}

/// Advance the session by one frame of `dt` seconds.
///
/// The tick runs identically before and after session end - targets keep
/// falling in slow motion - only spawning and gesture input are gated.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.clock += f64::from(dt);

    // Deferred work scheduled by earlier frames
    for action in state.timers.drain_due(state.clock, state.generation) {
        match action {
            TimerAction::NextWave => wave::advance_wave(state),
            // Chain links outlive the wave that scheduled them; the ended
            // check here is the spawn gate, not a cancellation
            TimerAction::ChainSpawn => {
                if !state.ended {
                    wave::launch_target(state, BombPolicy::Random);
                }
            }
        }
    }

    for &event in &input.gestures {
        slice::handle_gesture(state, event);
    }

    // Ballistic flight, scaled by the ramp; vanish fades run on real time
    let sdt = dt * state.ramp.time_scale;
    for target in &mut state.targets {
        match target.phase {
            TargetPhase::Airborne => {
                target.vel.y += GRAVITY_Y * sdt;
                target.pos += target.vel * sdt;
                target.angle += target.angular_vel * sdt;
            }
            TargetPhase::Vanishing { ref mut timer } => {
                *timer += dt;
                let t = (*timer / VANISH_SECS).min(1.0);
                target.scale = 1.0 - t;
                target.alpha = 1.0 - t;
            }
        }
    }
    state.targets.retain(|t| match t.phase {
        TargetPhase::Vanishing { timer } => timer < VANISH_SECS,
        TargetPhase::Airborne => true,
    });

    if state.trail.fading && state.trail.alpha > 0.0 {
        state.trail.alpha = (state.trail.alpha - dt / TRAIL_FADE_SECS).max(0.0);
    }

    sweep_missed(state);

    // Re-arm: once the field is clear, the next wave fires one spawn
    // interval later. Scheduling is not gated on `ended`; advance_wave is.
    if !state.any_airborne() && !state.next_wave_queued {
        let delay = f64::from(state.ramp.spawn_interval);
        state
            .timers
            .schedule(state.clock, delay, state.generation, TimerAction::NextWave);
        state.next_wave_queued = true;
    }

    // The fuse loop dies with the last airborne bomb
    if state.fuse_active && !state.any_airborne_bomb() {
        state.fuse_active = false;
        state.events.push(GameEvent::FuseOut);
    }
}

/// Targets that fell below the field exited unseen: non-bombs cost a life,
/// bombs just leave.
fn sweep_missed(state: &mut GameState) {
    let mut missed = 0;
    state.targets.retain(|t| {
        if !t.is_airborne() || t.pos.y >= OFFSCREEN_Y {
            return true;
        }
        if t.kind != TargetKind::Bomb {
            missed += 1;
        }
        false
    });
    for _ in 0..missed {
        state.lose_life();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Target;
    use crate::sim::timer::TimerQueue;
    use glam::Vec2;

    fn run(state: &mut GameState, frames: u32) {
        let input = TickInput::default();
        for _ in 0..frames {
            tick(state, &input, SIM_DT);
        }
    }

    fn falling(id: u32, kind: TargetKind, y: f32) -> Target {
        Target {
            id,
            kind,
            pos: Vec2::new(512.0, y),
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            phase: TargetPhase::Airborne,
            scale: 1.0,
            alpha: 1.0,
        }
    }

    #[test]
    fn first_wave_fires_after_the_opening_delay() {
        let mut state = GameState::new(5);
        let input = TickInput::default();
        while state.clock < FIRST_WAVE_DELAY - 0.05 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.targets.is_empty());

        run(&mut state, 20);
        assert!(!state.targets.is_empty());
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn missed_target_costs_a_life_and_is_removed() {
        let mut state = GameState::new(5);
        state.targets.push(falling(1, TargetKind::Normal, -150.0));

        run(&mut state, 1);
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert!(state.targets.is_empty());
        assert!(state.drain_events().contains(&GameEvent::LifeLost));
    }

    #[test]
    fn falling_bomb_exits_silently() {
        let mut state = GameState::new(5);
        state.fuse_active = true;
        state.targets.push(falling(1, TargetKind::Bomb, -150.0));

        run(&mut state, 1);
        assert_eq!(state.lives, 3);
        assert!(state.targets.is_empty());
        let events = state.drain_events();
        assert!(!events.contains(&GameEvent::LifeLost));
        assert!(events.contains(&GameEvent::FuseOut));
        assert!(!state.fuse_active);
    }

    #[test]
    fn three_misses_end_the_session() {
        let mut state = GameState::new(5);
        for id in 0..3 {
            state.targets.push(falling(id, TargetKind::Normal, -150.0));
        }
        run(&mut state, 1);
        assert_eq!(state.lives, 0);
        assert!(state.ended);
        assert!(!state.ended_by_bomb);
    }

    #[test]
    fn drain_schedules_exactly_one_rearm_at_the_current_interval() {
        let mut state = GameState::new(5);
        state.timers = TimerQueue::default();
        state.next_wave_queued = false;
        let interval = f64::from(state.ramp.spawn_interval);

        run(&mut state, 1);
        assert!(state.next_wave_queued);
        assert_eq!(state.timers.pending(), 1);

        // Repeated ticks must not stack further re-arms
        run(&mut state, 3);
        assert_eq!(state.timers.pending(), 1);

        let drained_at = state.clock;
        let not_yet = state
            .timers
            .clone()
            .drain_due(drained_at + interval - 4.0 * f64::from(SIM_DT), state.generation);
        assert!(not_yet.is_empty());
        let due = state
            .timers
            .drain_due(drained_at + interval, state.generation);
        assert_eq!(due, vec![TimerAction::NextWave]);
    }

    #[test]
    fn sliced_target_shrinks_then_disappears() {
        let mut state = GameState::new(5);
        state.targets.push(falling(1, TargetKind::Normal, 300.0));
        let input = TickInput {
            gestures: vec![
                GestureEvent::Began(Vec2::new(512.0, 300.0)),
                GestureEvent::Moved(Vec2::new(512.0, 300.0)),
            ],
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.score, 1);
        assert!(!state.targets[0].is_airborne());

        run(&mut state, 12);
        assert!(state.targets[0].scale < 1.0);

        run(&mut state, 24);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn trail_fades_after_gesture_ends() {
        let mut state = GameState::new(5);
        let input = TickInput {
            gestures: vec![
                GestureEvent::Began(Vec2::ZERO),
                GestureEvent::Moved(Vec2::new(10.0, 0.0)),
                GestureEvent::Ended,
            ],
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.trail.fading);

        run(&mut state, 40);
        assert_eq!(state.trail.alpha, 0.0);
    }

    #[test]
    fn chain_wave_spawns_five_targets_over_the_stagger() {
        let mut state = GameState::new(5);
        state.timers = TimerQueue::default();
        state.cursor = 6; // warm-up Chain entry
        wave::advance_wave(&mut state);
        state.drain_events();

        let mut launches = 0;
        let mut frames = 0;
        while frames < 120 * 4 {
            run(&mut state, 1);
            launches += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Launched | GameEvent::FuseLit))
                .count();
            frames += 1;
        }
        // One immediate launch happened inside advance_wave
        assert_eq!(launches + 1, 5);
    }

    #[test]
    fn stale_generation_timers_never_spawn() {
        let mut state = GameState::new(5);
        state
            .timers
            .schedule(state.clock, 0.5, state.generation, TimerAction::ChainSpawn);
        state.restart(6);

        run(&mut state, 120); // well past the stale deadline, before wave one
        assert!(state.targets.is_empty());
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn targets_keep_falling_in_slow_motion_after_the_end() {
        let mut state = GameState::new(5);
        state.targets.push(falling(1, TargetKind::Normal, 400.0));
        state.end_session(true);
        let y = state.targets[0].pos.y;

        run(&mut state, 60);
        assert!(state.targets[0].pos.y < y);
        assert_eq!(state.ramp.time_scale, ENDED_TIME_SCALE);
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        let input = TickInput::default();
        for _ in 0..(120 * 30) {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.cursor, b.cursor);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.targets.len(), b.targets.len());
        for (ta, tb) in a.targets.iter().zip(&b.targets) {
            assert_eq!(ta.id, tb.id);
            assert_eq!(ta.kind, tb.kind);
            assert!((ta.pos - tb.pos).length() < 1e-4);
        }
    }
}
