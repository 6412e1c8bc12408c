//! Story event triggers.
//!
//! Data-driven one-shot (or repeatable) events fire when the player
//! enters a scene or clicks an interaction, gated on time of day, held
//! items, and relationship flags. Fired ids are recorded in
//! `completed_events` so non-repeatable events stay fired across
//! save/load.

use bevy::prelude::*;
use bevy::state::state::StateTransitionEvent;

use crate::shared::*;

pub struct EventsPlugin;

impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (check_scene_enter_triggers, check_interaction_triggers, apply_item_grants)
                .run_if(not(in_state(AppState::Loading))),
        );
    }
}

/// Scene name used in event target strings.
pub fn scene_target(state: AppState) -> Option<&'static str> {
    match state {
        AppState::Apartment => Some("apartment"),
        AppState::JobSite => Some("job_site"),
        AppState::Infiltration => Some("infiltration"),
        AppState::Shop => Some("shop"),
        _ => None,
    }
}

/// True when every condition on the event currently holds.
pub fn conditions_met(
    event: &StoryEvent,
    clock: &Clock,
    player: &PlayerState,
    relationships: &Relationships,
) -> bool {
    if !event.repeatable && player.completed_events.contains(&event.id) {
        return false;
    }
    if let Some(required) = event.required_time {
        let daytime = clock.slot.is_daytime();
        match required {
            TimeRequirement::Day if !daytime => return false,
            TimeRequirement::Night if daytime => return false,
            _ => {}
        }
    }
    if let Some(item) = &event.required_item {
        if !player.has_tool(item) && !player.has_item(item) {
            return false;
        }
    }
    if let Some((character_id, flag)) = &event.required_flag {
        let holds = relationships
            .records
            .get(character_id)
            .map(|r| r.flag(flag))
            .unwrap_or(false);
        if !holds {
            return false;
        }
    }
    true
}

fn execute(
    event: &StoryEvent,
    player: &mut PlayerState,
    dialog_writer: &mut EventWriter<StartDialogEvent>,
    grant_writer: &mut EventWriter<GrantItemEvent>,
) {
    info!("[Events] Firing '{}'", event.id);
    if !event.repeatable {
        player.completed_events.insert(event.id.clone());
    }
    match &event.action {
        EventAction::StartDialog {
            character_id,
            node_id,
        } => {
            dialog_writer.send(StartDialogEvent {
                character_id: character_id.clone(),
                node_id: node_id.clone(),
            });
        }
        EventAction::GrantItem { item_id } => {
            grant_writer.send(GrantItemEvent {
                item_id: item_id.clone(),
            });
        }
    }
}

fn check_scene_enter_triggers(
    mut transitions: EventReader<StateTransitionEvent<AppState>>,
    registry: Res<EventRegistry>,
    clock: Res<Clock>,
    mut player: ResMut<PlayerState>,
    relationships: Res<Relationships>,
    mut dialog_writer: EventWriter<StartDialogEvent>,
    mut grant_writer: EventWriter<GrantItemEvent>,
) {
    for transition in transitions.read() {
        let Some(entered) = transition.entered else {
            continue;
        };
        let Some(target) = scene_target(entered) else {
            continue;
        };
        for event in &registry.events {
            if event.trigger == TriggerKind::OnSceneEnter
                && event.target == target
                && conditions_met(event, &clock, &player, &relationships)
            {
                execute(event, &mut player, &mut dialog_writer, &mut grant_writer);
            }
        }
    }
}

fn check_interaction_triggers(
    mut interactions: EventReader<InteractionEvent>,
    registry: Res<EventRegistry>,
    clock: Res<Clock>,
    mut player: ResMut<PlayerState>,
    relationships: Res<Relationships>,
    mut dialog_writer: EventWriter<StartDialogEvent>,
    mut grant_writer: EventWriter<GrantItemEvent>,
) {
    for interaction in interactions.read() {
        for event in &registry.events {
            if event.trigger == TriggerKind::OnInteract
                && event.target == interaction.id
                && conditions_met(event, &clock, &player, &relationships)
            {
                execute(event, &mut player, &mut dialog_writer, &mut grant_writer);
            }
        }
    }
}

/// Single consumer for item grants, wherever they come from.
fn apply_item_grants(
    mut grants: EventReader<GrantItemEvent>,
    mut player: ResMut<PlayerState>,
) {
    for grant in grants.read() {
        info!("[Events] Granted item '{}'", grant.item_id);
        player.inventory.push(grant.item_id.clone());
    }
}
