//! Settings file loading.
//!
//! `assets/settings.ron` tunes the time-slot policy, the base action
//! budget, and the dialog reveal rate. A missing or malformed file falls
//! back to the defaults with a warning; the game never refuses to boot
//! over settings.

use bevy::prelude::*;
use std::path::Path;

use crate::shared::GameSettings;

pub const SETTINGS_PATH: &str = "assets/settings.ron";

#[cfg(not(target_arch = "wasm32"))]
pub fn load_settings(path: &Path) -> GameSettings {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "[Settings] Could not read {} ({e}); using defaults",
                path.display()
            );
            return GameSettings::default();
        }
    };
    match ron::from_str::<GameSettings>(&text) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(
                "[Settings] Malformed {} ({e}); using defaults",
                path.display()
            );
            GameSettings::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_settings(_path: &Path) -> GameSettings {
    GameSettings::default()
}
