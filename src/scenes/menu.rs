//! Main menu: new game or continue from the snapshot on disk.

use bevy::prelude::*;

use crate::save;
use crate::shared::*;

use super::{row_region, Interaction, SceneInteractions, SceneStatus};

pub fn rebuild_menu(mut interactions: ResMut<SceneInteractions>) {
    let mut items = vec![Interaction::new("menu:new_game", "New game", row_region(0))];
    let continue_item = Interaction::new("menu:continue", "Continue", row_region(1));
    items.push(if save::has_save_file() {
        continue_item
    } else {
        continue_item.disabled()
    });
    interactions.items = items;
}

pub fn handle_menu(
    mut events: EventReader<InteractionEvent>,
    mut clock: ResMut<Clock>,
    mut player: ResMut<PlayerState>,
    mut relationships: ResMut<Relationships>,
    settings: Res<GameSettings>,
    mut status: ResMut<SceneStatus>,
    mut load_writer: EventWriter<LoadRequestEvent>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for ev in events.read() {
        match ev.id.as_str() {
            "menu:new_game" => {
                *clock = Clock {
                    base_actions_per_period: settings.base_actions_per_period,
                    actions_remaining: settings.base_actions_per_period,
                    ..Default::default()
                };
                *player = PlayerState::default();
                *relationships = Relationships::default();
                status.set("A new town, a new set of locks.");
                info!("[Menu] New game started");
                next_state.set(AppState::Apartment);
            }
            "menu:continue" => {
                load_writer.send(LoadRequestEvent);
            }
            _ => {}
        }
    }
}

/// Enters play once a menu-initiated load reports success.
pub fn enter_game_after_load(
    mut load_events: EventReader<LoadCompleteEvent>,
    mut status: ResMut<SceneStatus>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for ev in load_events.read() {
        if ev.success {
            next_state.set(AppState::Apartment);
        } else if let Some(msg) = &ev.error_message {
            status.set(format!("Could not load the save: {msg}"));
        }
    }
}
