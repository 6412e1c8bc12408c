//! Minigame domain — three self-contained, input-driven simulations.
//!
//! Each simulation owns its internal clock and state machine, is advanced
//! exactly once per frame by the systems below, and reports its outcome
//! through query methods. None of them has an internal failure/abort
//! state: walking away is the owning scene's decision, and the outcomes
//! are gradations of success read on completion.

use bevy::prelude::*;

use crate::shared::*;

pub mod lockpick;
pub mod study;
pub mod touch;

pub use lockpick::{LockPickSimulation, LockPin};
pub use study::{StudyPhase, StudySimulation};
pub use touch::{TouchSimulation, TouchZone};

pub struct MinigamePlugin;

impl Plugin for MinigamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LockPickSimulation>()
            .init_resource::<StudySimulation>()
            .init_resource::<TouchSimulation>()
            .add_systems(
                Update,
                update_lock_picking.run_if(in_state(AppState::LockPicking)),
            )
            .add_systems(Update, update_study.run_if(in_state(AppState::Studying)))
            .add_systems(Update, update_touch.run_if(in_state(AppState::TouchScene)))
            // Leaving a minigame (finished or abandoned) clears its state
            // before the next mode's enter systems run.
            .add_systems(OnExit(AppState::LockPicking), reset_lock_picking)
            .add_systems(OnExit(AppState::Studying), reset_study)
            .add_systems(OnExit(AppState::TouchScene), reset_touch);
    }
}

// ─── Per-frame drivers ───────────────────────────────────────────────────────

fn update_lock_picking(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut sim: ResMut<LockPickSimulation>,
) {
    sim.advance(time.delta_secs());
    sim.move_pick(input.pointer_delta.x * lockpick::PICK_SENSITIVITY);
    if input.confirm {
        sim.try_lock();
    }
}

fn update_study(time: Res<Time>, input: Res<PlayerInput>, mut sim: ResMut<StudySimulation>) {
    sim.advance(time.delta_secs());
    if input.confirm {
        sim.confirm();
    }
}

fn update_touch(time: Res<Time>, input: Res<PlayerInput>, mut sim: ResMut<TouchSimulation>) {
    sim.advance(time.delta_secs(), input.pointer, input.pointer_pressed);
}

fn reset_lock_picking(mut sim: ResMut<LockPickSimulation>) {
    *sim = LockPickSimulation::default();
}

fn reset_study(mut sim: ResMut<StudySimulation>) {
    sim.reset();
}

fn reset_touch(mut sim: ResMut<TouchSimulation>) {
    sim.reset();
}
