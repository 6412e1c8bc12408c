//! Player apartment — the hub scene.
//!
//! Phone takes the next job off the board, the bed advances the clock,
//! the door leads to the day job, the laptop opens the shop, and in the
//! evening the student comes over for tutoring.

use bevy::prelude::*;

use crate::minigames::StudySimulation;
use crate::shared::*;

use super::{row_region, Interaction, SceneInteractions, SceneStatus};

pub fn handle_apartment(
    mut events: EventReader<InteractionEvent>,
    mut player: ResMut<PlayerState>,
    mut clock: ResMut<Clock>,
    houses: Res<HouseRegistry>,
    mut status: ResMut<SceneStatus>,
    mut advance_writer: EventWriter<AdvanceTimeEvent>,
    mut study: ResMut<StudySimulation>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for ev in events.read() {
        match ev.id.as_str() {
            "apartment:phone" => {
                if player.current_job.is_some() {
                    status.set("You already have a job lined up.");
                    continue;
                }
                match houses.next_available(&player.completed_jobs) {
                    Some(house) => {
                        info!("[Apartment] Accepted job '{}'", house.id);
                        status.set(format!("New job: {} — {}", house.name, house.address));
                        player.current_job = Some(house.id.clone());
                        player.clear_entry_points();
                    }
                    None => status.set("No work on the board right now."),
                }
            }
            "apartment:bed" => {
                advance_writer.send(AdvanceTimeEvent);
            }
            "apartment:door" => {
                if !clock.slot.is_daytime() {
                    status.set("Too late to visit a client now.");
                } else if player.current_job.is_none() {
                    status.set("No job to go to. Check the phone.");
                } else if !clock.try_spend_action() {
                    status.set("You're out of energy for this period.");
                } else {
                    next_state.set(AppState::JobSite);
                }
            }
            "apartment:laptop" => {
                next_state.set(AppState::Shop);
            }
            "apartment:tutor" => {
                if clock.slot != TimeSlot::Evening {
                    status.set("Elise only comes by in the evening.");
                } else if !clock.try_spend_action() {
                    status.set("You're too tired to tutor anyone.");
                } else {
                    // Any study notes on hand convert into today's boost
                    // before the session starts.
                    while player.remove_item_once(ITEM_STUDY_NOTES) {
                        player.study_boost += 2;
                    }
                    study.reset();
                    next_state.set(AppState::Studying);
                }
            }
            _ => {}
        }
    }
}

/// Going to bed with a job lined up rolls straight into the night visit.
pub fn night_job_departure(
    mut slot_events: EventReader<SlotChangedEvent>,
    player: Res<PlayerState>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for ev in slot_events.read() {
        if ev.slot == TimeSlot::Night && player.current_job.is_some() {
            info!("[Apartment] Night falls — heading to the job");
            next_state.set(AppState::Infiltration);
        }
    }
}

pub fn rebuild_apartment(
    player: Res<PlayerState>,
    clock: Res<Clock>,
    mut interactions: ResMut<SceneInteractions>,
) {
    let mut items = vec![
        Interaction::new("apartment:phone", "Phone — check for work", row_region(0)),
        Interaction::new("apartment:bed", "Bed — sleep / wait", row_region(1)),
    ];

    let door = Interaction::new("apartment:door", "Door — go to the job", row_region(2));
    items.push(if player.current_job.is_some() && clock.slot.is_daytime() {
        door
    } else {
        door.disabled()
    });

    items.push(Interaction::new(
        "apartment:laptop",
        "Laptop — order supplies",
        row_region(3),
    ));

    let tutor = Interaction::new("apartment:tutor", "Tutor Elise", row_region(4));
    items.push(if clock.slot == TimeSlot::Evening {
        tutor
    } else {
        tutor.disabled()
    });

    interactions.items = items;
}

/// Closes the study session and banks its outcome into the student's
/// stats. The boost is read from player state here, at query time.
pub fn resolve_study_session(
    input: Res<PlayerInput>,
    study: Res<StudySimulation>,
    mut player: ResMut<PlayerState>,
    mut status: ResMut<SceneStatus>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if input.cancel {
        next_state.set(AppState::Apartment);
        status.set("You cut the session short.");
        return;
    }
    if !study.is_complete() || !input.confirm {
        return;
    }

    let bonus = study.grade_bonus(player.study_boost);
    let passed = study.is_success();
    let stats = player.student_mut(DEFAULT_STUDENT_ID);
    stats.modify_grade(bonus);
    stats.modify_mood(if passed { 5 } else { -5 });

    info!(
        "[Apartment] Study session over — {} hits, +{} grade",
        study.successes(),
        bonus
    );
    status.set(if passed {
        "Good session. Elise actually learned something."
    } else {
        "Rough session. Maybe next time."
    });
    next_state.set(AppState::Apartment);
}
