//! Day visit to the client's house.
//!
//! The resident greets you once per job; the front lock is the lock-pick
//! minigame; cracking it fast stretches the exploration window used to
//! scout and prepare night entry points or copy the house key.

use bevy::prelude::*;

use crate::minigames::LockPickSimulation;
use crate::shared::*;

use super::{row_region, Interaction, SceneInteractions, SceneStatus};

/// Base exploration window, scaled by the lock-pick time bonus.
pub const BASE_EXPLORATION_SECS: f32 = 60.0;

#[derive(Resource, Debug, Clone, Default)]
pub struct JobSiteState {
    /// Which job this state belongs to; a new job resets everything.
    pub job_id: Option<HouseId>,
    pub lock_picked: bool,
    pub greeted: bool,
    pub exploration_remaining: f32,
}

impl JobSiteState {
    fn sync_to_job(&mut self, job_id: &str) {
        if self.job_id.as_deref() != Some(job_id) {
            *self = JobSiteState {
                job_id: Some(job_id.to_string()),
                ..Default::default()
            };
        }
    }
}

/// First arrival at a job opens the resident's greeting dialog.
pub fn greet_resident(
    player: Res<PlayerState>,
    houses: Res<HouseRegistry>,
    library: Res<DialogLibrary>,
    mut site: ResMut<JobSiteState>,
    mut dialog_writer: EventWriter<StartDialogEvent>,
) {
    let Some(job_id) = player.current_job.clone() else {
        return;
    };
    site.sync_to_job(&job_id);
    if site.greeted {
        return;
    }
    let Some(house) = houses.get(&job_id) else {
        warn!("[JobSite] Current job '{}' missing from registry", job_id);
        return;
    };
    let Some(root) = library.root_of(&house.resident).cloned() else {
        warn!(
            "[JobSite] No dialog tree for resident '{}' — skipping greeting",
            house.resident
        );
        site.greeted = true;
        return;
    };
    site.greeted = true;
    dialog_writer.send(StartDialogEvent {
        character_id: house.resident.clone(),
        node_id: root,
    });
}

pub fn handle_job_site(
    mut events: EventReader<InteractionEvent>,
    mut player: ResMut<PlayerState>,
    houses: Res<HouseRegistry>,
    mut lockpick: ResMut<LockPickSimulation>,
    mut rng: ResMut<GameRng>,
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
            "job:lock" => {
                lockpick.setup(
                    house.lock_difficulty,
                    player.has_tool(TOOL_ADVANCED_LOCKPICK),
                    &mut rng,
                );
                next_state.set(AppState::LockPicking);
            }
            "job:copy_key" => {
                let key_id = house_key_item(&house.id);
                if player.has_item(&key_id) {
                    status.set("You already copied this key.");
                } else {
                    player.inventory.push(key_id);
                    status.set("Key copied. The front door is yours tonight.");
                }
            }
            "job:return" => {
                next_state.set(AppState::Apartment);
            }
            id => {
                if let Some(name) = id.strip_prefix("job:discover:") {
                    player.discover_entry_point(name);
                    status.set(format!("Found a way in: {name}"));
                } else if let Some(name) = id.strip_prefix("job:prepare:") {
                    if player.is_entry_discovered(name) {
                        player.prepare_entry_point(name);
                        status.set(format!("{name} is prepared for tonight."));
                    }
                }
            }
        }
    }
}

/// Exploration is the only time-boxed activity: once the lock is open the
/// window counts down in real time and hitting zero forces the trip home.
pub fn tick_exploration_timer(
    time: Res<Time>,
    mut site: ResMut<JobSiteState>,
    mut status: ResMut<SceneStatus>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if !site.lock_picked {
        return;
    }
    site.exploration_remaining -= time.delta_secs();
    if site.exploration_remaining <= 0.0 {
        site.exploration_remaining = 0.0;
        info!("[JobSite] Exploration window closed");
        status.set("The resident is getting suspicious. You head home.");
        next_state.set(AppState::Apartment);
    }
}

pub fn rebuild_job_site(
    player: Res<PlayerState>,
    houses: Res<HouseRegistry>,
    site: Res<JobSiteState>,
    mut interactions: ResMut<SceneInteractions>,
) {
    let mut items = Vec::new();

    let house = player
        .current_job
        .as_ref()
        .and_then(|id| houses.get(id));
    let Some(house) = house else {
        interactions.items = items;
        return;
    };

    if !site.lock_picked {
        items.push(Interaction::new("job:lock", "Pick the front lock", row_region(0)));
    } else {
        let mut row = 0;
        for entry in &house.entry_points {
            if !player.is_entry_discovered(&entry.name) {
                items.push(Interaction::new(
                    format!("job:discover:{}", entry.name),
                    format!("Look over the {}", entry.name),
                    row_region(row),
                ));
            } else if !player.is_entry_prepared(&entry.name) {
                items.push(Interaction::new(
                    format!("job:prepare:{}", entry.name),
                    format!("Prepare the {}", entry.name),
                    row_region(row),
                ));
            } else {
                items.push(
                    Interaction::new(
                        format!("job:ready:{}", entry.name),
                        format!("{} [READY]", entry.name),
                        row_region(row),
                    )
                    .disabled(),
                );
            }
            row += 1;
        }

        if player.has_tool(TOOL_KEY_COPIER) && !player.has_item(&house_key_item(&house.id)) {
            items.push(Interaction::new("job:copy_key", "Copy the house key", row_region(row)));
            row += 1;
        }

        items.push(Interaction::new("job:return", "Head home", row_region(row)));
    }

    interactions.items = items;
}

/// Watches the lock-pick minigame and banks its outcome: the time-bonus
/// multiplier stretches the exploration window.
pub fn resolve_lock_picking(
    input: Res<PlayerInput>,
    lockpick: Res<LockPickSimulation>,
    mut site: ResMut<JobSiteState>,
    mut status: ResMut<SceneStatus>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if input.cancel {
        status.set("You back off the lock.");
        next_state.set(AppState::JobSite);
        return;
    }
    if !lockpick.is_complete() || !input.confirm {
        return;
    }
    let bonus = lockpick.bonus_time_multiplier();
    site.lock_picked = true;
    site.exploration_remaining = BASE_EXPLORATION_SECS * bonus;
    info!(
        "[JobSite] Lock open in {:.1}s — exploration window {:.0}s",
        lockpick.elapsed(),
        site.exploration_remaining
    );
    status.set("The lock gives. The house is open.");
    next_state.set(AppState::JobSite);
}

pub fn house_key_item(house_id: &str) -> String {
    format!("key_{house_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_site_state_resets_for_new_job() {
        let mut site = JobSiteState {
            job_id: Some("old".to_string()),
            lock_picked: true,
            greeted: true,
            exploration_remaining: 12.0,
        };
        site.sync_to_job("new");
        assert_eq!(site.job_id.as_deref(), Some("new"));
        assert!(!site.lock_picked);
        assert!(!site.greeted);
    }

    #[test]
    fn test_job_site_state_persists_for_same_job() {
        let mut site = JobSiteState {
            job_id: Some("same".to_string()),
            lock_picked: true,
            greeted: true,
            exploration_remaining: 12.0,
        };
        site.sync_to_job("same");
        assert!(site.lock_picked);
        assert!(site.greeted);
    }

    #[test]
    fn test_house_key_item_naming() {
        assert_eq!(house_key_item("willow_lane"), "key_willow_lane");
    }
}
