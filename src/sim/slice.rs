//! Gesture tracking and slice hit resolution

use glam::Vec2;

use super::state::{GameEvent, GameState, TargetKind, TargetPhase};
use crate::consts::*;

/// One pointer event in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Began(Vec2),
    Moved(Vec2),
    Ended,
}

/// Route one gesture event. Everything is rejected once the session is
/// over: no trail updates, no hits.
pub fn handle_gesture(state: &mut GameState, event: GestureEvent) {
    if state.ended {
        return;
    }
    match event {
        GestureEvent::Began(point) => state.trail.begin(point),
        GestureEvent::Moved(point) => {
            state.trail.push(point);
            state.events.push(GameEvent::SliceMoved);
            resolve_hits(state, point);
        }
        GestureEvent::Ended => state.trail.fade_out(),
    }
}

/// Slice every airborne target under `point`. A single move can take out
/// several overlapping targets; the session-ending bomb transition is
/// applied after the whole point has been resolved.
fn resolve_hits(state: &mut GameState, point: Vec2) {
    let mut bomb_hit = false;
    for i in 0..state.targets.len() {
        let target = &state.targets[i];
        if !target.is_airborne() || !target.contains(point) {
            continue;
        }
        let (kind, pos) = (target.kind, target.pos);
        // Inert from this instant: no further hits, no miss sweep
        state.targets[i].phase = TargetPhase::Vanishing { timer: 0.0 };
        match kind {
            TargetKind::Normal => {
                state.score += NORMAL_SCORE;
                state.events.push(GameEvent::Sliced { kind, pos });
            }
            TargetKind::Bonus => {
                state.score += BONUS_SCORE;
                state.events.push(GameEvent::Sliced { kind, pos });
            }
            TargetKind::Bomb => {
                state.events.push(GameEvent::BombDetonated { pos });
                bomb_hit = true;
            }
        }
    }
    if bomb_hit {
        state.end_session(true);
    }
}
