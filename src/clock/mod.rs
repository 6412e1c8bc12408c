//! Clock domain — day and time-slot progression.
//!
//! Responsible for:
//! - Advancing the time slot when the player sleeps or waits (never by
//!   wall-clock timer)
//! - Replenishing the per-period action budget on the work-reset slot
//! - Consuming single-use boost items (coffee) as part of the same
//!   transition: reset first, then apply each boost, then remove it
//! - Rolling the day counter and clearing per-day boosts every morning
//! - Sending SlotChangedEvent for other domains

use bevy::prelude::*;

use crate::shared::*;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            process_advance_time.run_if(not(in_state(AppState::Loading))),
        );
    }
}

/// Applies one slot transition to the clock and player state. Returns the
/// event describing the new slot.
///
/// Ordering inside the work-reset transition is a contract, not an
/// accident: the budget resets to the base, every held coffee adds one
/// action, and each coffee consumed is removed from the inventory in the
/// same step.
pub fn advance_clock(
    clock: &mut Clock,
    player: &mut PlayerState,
    settings: &GameSettings,
) -> SlotChangedEvent {
    let (next, new_day) = clock.slot.next(settings.time_policy);
    clock.slot = next;
    clock.base_actions_per_period = settings.base_actions_per_period;

    if new_day {
        clock.day += 1;
        player.study_boost = 0;
    }

    if next.is_work_reset_slot(settings.time_policy) {
        clock.actions_remaining = clock.base_actions_per_period;
        while player.remove_item_once(ITEM_COFFEE) {
            clock.actions_remaining += 1;
        }
    }

    SlotChangedEvent {
        day: clock.day,
        slot: clock.slot,
        new_day,
    }
}

fn process_advance_time(
    mut advance_reader: EventReader<AdvanceTimeEvent>,
    mut slot_writer: EventWriter<SlotChangedEvent>,
    mut clock: ResMut<Clock>,
    mut player: ResMut<PlayerState>,
    settings: Res<GameSettings>,
) {
    for _ in advance_reader.read() {
        let event = advance_clock(&mut clock, &mut player, &settings);
        info!(
            "[Clock] Advanced to Day {} {:?} — {} action(s) remaining",
            event.day, event.slot, clock.actions_remaining
        );
        slot_writer.send(event);
    }
}
