//! Night infiltration of the prepared house.
//!
//! Every prepared entry point rolls against its success chance; a copied
//! key is a guaranteed way in. Inside, the player collects the payout,
//! may approach the resident (touch scene), and escapes to close the job.

use bevy::prelude::*;
use rand::Rng;

use crate::minigames::TouchSimulation;
use crate::shared::*;

use super::job_site::house_key_item;
use super::{row_region, Interaction, SceneInteractions, SceneStatus};

#[derive(Resource, Debug, Clone, Default)]
pub struct InfiltrationState {
    pub inside: bool,
    pub collected: bool,
    /// Entry names still worth trying; a failed roll removes its entry.
    pub viable_entries: Vec<String>,
}

pub fn begin_infiltration(
    player: Res<PlayerState>,
    houses: Res<HouseRegistry>,
    mut infil: ResMut<InfiltrationState>,
    mut status: ResMut<SceneStatus>,
) {
    *infil = InfiltrationState::default();

    let Some(house) = player.current_job.as_ref().and_then(|id| houses.get(id)) else {
        status.set("No job tonight.");
        return;
    };

    infil.viable_entries = house
        .entry_points
        .iter()
        .filter(|e| player.is_entry_prepared(&e.name))
        .map(|e| e.name.clone())
        .collect();

    if infil.viable_entries.is_empty() && !player.has_item(&house_key_item(&house.id)) {
        status.set("No entry points prepared. This visit is a bust.");
    } else {
        status.set("Choose an entry point...");
    }
}

pub fn handle_infiltration(
    mut events: EventReader<InteractionEvent>,
    mut player: ResMut<PlayerState>,
    houses: Res<HouseRegistry>,
    mut infil: ResMut<InfiltrationState>,
    mut rng: ResMut<GameRng>,
    mut touch: ResMut<TouchSimulation>,
    mut status: ResMut<SceneStatus>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(job_id) = player.current_job.clone() else {
        return;
    };
    let Some(house) = houses.get(&job_id).cloned() else {
        return;
    };

    for ev in events.read() {
        match ev.id.as_str() {
            "infil:key" => {
                infil.inside = true;
                status.set("The copied key turns clean. You're in.");
            }
            "infil:collect" => {
                if !infil.collected {
                    player.add_money(house.money_reward);
                    infil.collected = true;
                    status.set(format!("Collected ${} in valuables.", house.money_reward));
                }
            }
            "infil:approach" => {
                touch.reset();
                next_state.set(AppState::TouchScene);
            }
            "infil:escape" => {
                info!("[Infiltration] Job '{}' complete", house.id);
                player.completed_jobs.push(house.id.clone());
                player.current_job = None;
                player.clear_entry_points();
                status.set("You slip out the way you came.");
                next_state.set(AppState::Apartment);
            }
            "infil:abort" => {
                player.clear_entry_points();
                status.set("You back off and head home empty-handed.");
                next_state.set(AppState::Apartment);
            }
            id => {
                if let Some(name) = id.strip_prefix("infil:entry:") {
                    attempt_entry(name, &house, &mut infil, &mut rng, &mut status);
                }
            }
        }
        // Once inside, the remaining entry options are moot.
        if infil.inside {
            infil.viable_entries.clear();
        }
    }
}

fn attempt_entry(
    name: &str,
    house: &HouseDef,
    infil: &mut InfiltrationState,
    rng: &mut GameRng,
    status: &mut SceneStatus,
) {
    let Some(entry) = house.entry_points.iter().find(|e| e.name == name) else {
        return;
    };
    if !infil.viable_entries.iter().any(|n| n == name) {
        return;
    }

    let roll: f32 = rng.0.gen();
    if roll <= entry.base_chance {
        infil.inside = true;
        status.set(format!("Success! Entered through the {name}."));
    } else {
        infil.viable_entries.retain(|n| n != name);
        if infil.viable_entries.is_empty() {
            status.set(format!("The {name} was blocked — and that was your last option."));
        } else {
            status.set(format!("The {name} was blocked. Try another way."));
        }
    }
}

pub fn rebuild_infiltration(
    player: Res<PlayerState>,
    houses: Res<HouseRegistry>,
    infil: Res<InfiltrationState>,
    mut interactions: ResMut<SceneInteractions>,
) {
    let mut items = Vec::new();
    let house = player.current_job.as_ref().and_then(|id| houses.get(id));
    let Some(house) = house else {
        interactions.items = items;
        return;
    };

    if !infil.inside {
        let mut row = 0;
        if player.has_item(&house_key_item(&house.id)) {
            items.push(Interaction::new(
                "infil:key",
                "Use the copied key (front door) — 100%",
                row_region(row),
            ));
            row += 1;
        }
        for name in &infil.viable_entries {
            let chance = house
                .entry_points
                .iter()
                .find(|e| &e.name == name)
                .map(|e| (e.base_chance * 100.0) as u32)
                .unwrap_or(0);
            items.push(Interaction::new(
                format!("infil:entry:{name}"),
                format!("{name} — {chance}% chance"),
                row_region(row),
            ));
            row += 1;
        }
        items.push(Interaction::new("infil:abort", "Abort and go home", row_region(row)));
    } else {
        items.push(Interaction::new("infil:collect", "Collect valuables", row_region(0)));
        items.push(Interaction::new(
            "infil:approach",
            format!("Approach {}", house.resident_name),
            row_region(1),
        ));
        items.push(Interaction::new("infil:escape", "Escape", row_region(2)));
    }

    interactions.items = items;
}

/// Watches the touch scene; completion warms the resident toward you.
pub fn resolve_touch_scene(
    input: Res<PlayerInput>,
    touch: Res<TouchSimulation>,
    player: Res<PlayerState>,
    houses: Res<HouseRegistry>,
    mut relationships: ResMut<Relationships>,
    mut status: ResMut<SceneStatus>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if input.cancel {
        next_state.set(AppState::Infiltration);
        status.set("You step back into the shadows.");
        return;
    }
    if !touch.is_complete() || !input.confirm {
        return;
    }

    if let Some(house) = player.current_job.as_ref().and_then(|id| houses.get(id)) {
        let rel = relationships.get_or_insert(&house.resident, &house.resident_name);
        rel.modify_attraction(5.0);
    }
    status.set("She stirs but doesn't wake. Time to go.");
    next_state.set(AppState::Infiltration);
}
