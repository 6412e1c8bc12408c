//! Scene domain — the playable modes and their interaction surfaces.
//!
//! Each scene publishes a list of clickable regions (`SceneInteractions`)
//! that the renderer draws and this module hit-tests. Clicks become
//! `InteractionEvent`s, handlers mutate state through the shared
//! resources/events, and the interaction list is rebuilt after the
//! handlers have run — mutation never happens while the list is being
//! walked.

use bevy::prelude::*;

use crate::shared::*;

pub mod apartment;
pub mod infiltration;
pub mod job_site;
pub mod menu;
pub mod shop;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneInteractions>()
            .init_resource::<SceneStatus>()
            .init_resource::<job_site::JobSiteState>()
            .init_resource::<infiltration::InfiltrationState>()
            .add_systems(
                Update,
                dispatch_interactions.run_if(scene_context_active),
            )
            // Main menu
            .add_systems(OnEnter(AppState::MainMenu), menu::rebuild_menu)
            .add_systems(
                Update,
                (menu::handle_menu, menu::enter_game_after_load)
                    .run_if(in_state(AppState::MainMenu)),
            )
            // Apartment
            .add_systems(
                Update,
                (
                    apartment::handle_apartment,
                    apartment::night_job_departure,
                    apartment::rebuild_apartment,
                )
                    .chain()
                    .run_if(in_state(AppState::Apartment)),
            )
            // Job site
            .add_systems(OnEnter(AppState::JobSite), job_site::greet_resident)
            .add_systems(
                Update,
                (
                    job_site::handle_job_site,
                    job_site::tick_exploration_timer,
                    job_site::rebuild_job_site,
                )
                    .chain()
                    .run_if(in_state(AppState::JobSite)),
            )
            .add_systems(
                Update,
                job_site::resolve_lock_picking.run_if(in_state(AppState::LockPicking)),
            )
            // Infiltration
            .add_systems(OnEnter(AppState::Infiltration), infiltration::begin_infiltration)
            .add_systems(
                Update,
                (
                    infiltration::handle_infiltration,
                    infiltration::rebuild_infiltration,
                )
                    .chain()
                    .run_if(in_state(AppState::Infiltration)),
            )
            .add_systems(
                Update,
                infiltration::resolve_touch_scene.run_if(in_state(AppState::TouchScene)),
            )
            // Shop
            .add_systems(
                Update,
                (shop::handle_shop, shop::rebuild_shop)
                    .chain()
                    .run_if(in_state(AppState::Shop)),
            )
            // Studying resolution lives with the apartment flow that opened it
            .add_systems(
                Update,
                apartment::resolve_study_session.run_if(in_state(AppState::Studying)),
            );
    }
}

// ─── Interaction surface ─────────────────────────────────────────────────────

/// One clickable region the active scene currently offers.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub id: String,
    pub label: String,
    pub region: Rect,
    pub enabled: bool,
}

impl Interaction {
    pub fn new(id: impl Into<String>, label: impl Into<String>, region: Rect) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            region,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Rebuilt by the active scene whenever its state changes; consumed
/// read-only by the renderer.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneInteractions {
    pub items: Vec<Interaction>,
}

/// One-line status readout for the renderer (entry attempt results,
/// refusals, rewards).
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneStatus {
    pub message: String,
}

impl SceneStatus {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

fn scene_context_active(context: Res<InputContext>) -> bool {
    *context == InputContext::Scene || *context == InputContext::Menu
}

/// Turns a pointer click into at most one InteractionEvent.
fn dispatch_interactions(
    input: Res<PlayerInput>,
    interactions: Res<SceneInteractions>,
    mut writer: EventWriter<InteractionEvent>,
) {
    if !input.pointer_just_pressed {
        return;
    }
    let Some(pointer) = input.pointer else {
        return;
    };
    if let Some(hit) = interactions
        .items
        .iter()
        .find(|i| i.enabled && i.region.contains(pointer))
    {
        writer.send(InteractionEvent { id: hit.id.clone() });
    }
}

/// Stacks interaction rows down the screen, shared layout helper.
pub fn row_region(index: usize) -> Rect {
    let x = 440.0;
    let y = 120.0 + index as f32 * 70.0;
    Rect::new(x, y, x + 400.0, y + 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_regions_stack_without_overlap() {
        for i in 0..5 {
            assert!(row_region(i).max.y <= row_region(i + 1).min.y);
        }
    }

    #[test]
    fn test_disabled_interaction() {
        let i = Interaction::new("x", "X", row_region(0)).disabled();
        assert!(!i.enabled);
    }
}
