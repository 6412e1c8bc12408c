//! Data layer — populates all registries at game startup.
//!
//! This plugin runs in OnEnter(AppState::Loading), loads the settings
//! file, fills every registry (HouseRegistry, ShopCatalog, EventRegistry,
//! DialogLibrary) from built-in design data and the dialog content
//! directory, then transitions the game into AppState::MainMenu.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once AppState has advanced past Loading.

mod catalog;
mod houses;
mod settings;
mod story;

use bevy::prelude::*;
use std::path::Path;

use crate::dialog::{build_fallback_dialog, load_dialog_directory};
use crate::shared::*;

pub use settings::load_settings;

pub const DIALOG_DIR: &str = "assets/dialogs";

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to
/// MainMenu.
fn load_all_data(
    mut game_settings: ResMut<GameSettings>,
    mut clock: ResMut<Clock>,
    mut house_registry: ResMut<HouseRegistry>,
    mut catalog_res: ResMut<ShopCatalog>,
    mut event_registry: ResMut<EventRegistry>,
    mut library: ResMut<DialogLibrary>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    info!("DataPlugin: populating registries…");

    *game_settings = settings::load_settings(Path::new(settings::SETTINGS_PATH));
    clock.base_actions_per_period = game_settings.base_actions_per_period;
    clock.actions_remaining = game_settings.base_actions_per_period;
    info!(
        "  Settings: {:?} policy, {} actions/period",
        game_settings.time_policy, game_settings.base_actions_per_period
    );

    houses::populate_houses(&mut house_registry);
    info!("  Houses loaded: {}", house_registry.houses.len());

    catalog::populate_catalog(&mut catalog_res);
    info!("  Shop items loaded: {}", catalog_res.items.len());

    story::populate_events(&mut event_registry);
    info!("  Story events loaded: {}", event_registry.events.len());

    load_dialog_directory(Path::new(DIALOG_DIR), &mut library);
    if library.nodes.is_empty() {
        // A partial failure keeps whatever loaded; only a fully empty
        // library falls back to the built-in tree.
        warn!("  No dialog content found — installing built-in fallback tree");
        build_fallback_dialog(&mut library);
    }
    info!(
        "  Dialog nodes loaded: {} across {} character(s)",
        library.nodes.len(),
        library.roots.len()
    );

    info!("DataPlugin: all registries populated. Transitioning to MainMenu.");
    next_state.set(AppState::MainMenu);
}
