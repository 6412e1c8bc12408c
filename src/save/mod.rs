use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;
pub const SAVE_FILE_NAME: &str = "savegame.json";

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_save_request, handle_load_request, autosave_on_day_end)
                .run_if(not(in_state(AppState::Loading))),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM HELPERS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn save_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join(SAVE_FILE_NAME)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn has_save_file() -> bool {
    save_path().exists()
}

#[cfg(target_arch = "wasm32")]
pub fn has_save_file() -> bool {
    false
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE / LOAD LOGIC
// ═══════════════════════════════════════════════════════════════════════

/// Builds the snapshot document. The dialog library and relationship
/// records are deliberately absent: trees are static content, and
/// loading must leave them structurally intact.
pub fn build_save_file(clock: &Clock, player: &PlayerState) -> SaveFile {
    SaveFile {
        version: SAVE_VERSION,
        clock: clock.clone(),
        player: player.clone(),
    }
}

/// Replaces the live state wholesale from a parsed snapshot — a full
/// overwrite, never a merge. Loaded stats are re-clamped in case the file
/// was edited by hand.
pub fn apply_save_file(file: SaveFile, clock: &mut Clock, player: &mut PlayerState) {
    *clock = file.clock;
    *player = file.player;
    for stats in player.students.values_mut() {
        stats.normalize();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_save(clock: &Clock, player: &PlayerState) -> Result<(), String> {
    let file = build_save_file(clock, player);
    let json =
        serde_json::to_string_pretty(&file).map_err(|e| format!("Serialization failed: {e}"))?;

    let path = save_path();
    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {e}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("Rename failed: {e}"))?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn write_save(_clock: &Clock, _player: &PlayerState) -> Result<(), String> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn read_save() -> Result<SaveFile, String> {
    let path = save_path();
    if !path.exists() {
        return Err("No save file found".to_string());
    }
    let json = fs::read_to_string(&path)
        .map_err(|e| format!("Read failed for {}: {e}", path.display()))?;
    let file: SaveFile =
        serde_json::from_str(&json).map_err(|e| format!("Deserialization failed: {e}"))?;

    // Version check — future versions can add migration here
    if file.version != SAVE_VERSION {
        warn!(
            "Save file has version {} but current version is {}. Attempting to load anyway.",
            file.version, SAVE_VERSION
        );
    }

    Ok(file)
}

#[cfg(target_arch = "wasm32")]
fn read_save() -> Result<SaveFile, String> {
    Err("Saves not available in browser".to_string())
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    clock: Res<Clock>,
    player: Res<PlayerState>,
) {
    for _ in save_events.read() {
        match write_save(&clock, &player) {
            Ok(()) => {
                info!("[Save] Game saved");
                complete_events.send(SaveCompleteEvent {
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Save FAILED: {e}");
                complete_events.send(SaveCompleteEvent {
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

/// A failed read or parse leaves every live resource untouched: the file
/// is fully parsed before any field is applied.
fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    mut clock: ResMut<Clock>,
    mut player: ResMut<PlayerState>,
) {
    for _ in load_events.read() {
        match read_save() {
            Ok(file) => {
                apply_save_file(file, &mut clock, &mut player);
                info!("[Save] Game loaded — Day {} {:?}", clock.day, clock.slot);
                complete_events.send(LoadCompleteEvent {
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Load FAILED: {e}");
                complete_events.send(LoadCompleteEvent {
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

/// Every morning rollover triggers an autosave.
fn autosave_on_day_end(
    mut slot_events: EventReader<SlotChangedEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    for ev in slot_events.read() {
        if ev.new_day {
            info!("[Save] Autosaving at the start of day {}", ev.day);
            save_writer.send(SaveRequestEvent);
        }
    }
}
