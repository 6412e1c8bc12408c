//! Dialog content loader.
//!
//! One JSON document per character: a characterId, a rootNodeId, and a
//! node list whose ids and choice targets are local to the file. Every id
//! is namespaced with `<characterId>_` on load so multiple characters'
//! trees coexist in one global node map without collisions.
//!
//! A malformed file drops only its own nodes; the rest of the directory
//! still loads. The built-in fallback tree is used only when the whole
//! load yields an empty library (see the data plugin).

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
use std::path::Path;

use crate::shared::*;

// ─── File format (camelCase on disk) ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DialogFileData {
    character_id: String,
    root_node_id: String,
    nodes: Vec<DialogNodeData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DialogNodeData {
    id: String,
    character_name: String,
    text: String,
    #[serde(default = "default_expression")]
    expression: String,
    #[serde(default)]
    is_end_node: bool,
    #[serde(default)]
    choices: Vec<DialogChoiceData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DialogChoiceData {
    text: String,
    next_node_id: String,
    #[serde(default)]
    trust_modifier: f32,
    #[serde(default)]
    attraction_modifier: f32,
    #[serde(default)]
    required_flags: HashMap<String, bool>,
    #[serde(default)]
    set_flags: HashMap<String, bool>,
}

fn default_expression() -> String {
    "neutral".to_string()
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parses one character's dialog document and namespaces every node id and
/// choice target with the character id. Returns the character id, the
/// namespaced root id, and the nodes.
pub fn parse_dialog_file(
    json: &str,
) -> Result<(CharacterId, String, Vec<DialogNode>), String> {
    let data: DialogFileData =
        serde_json::from_str(json).map_err(|e| format!("parse error: {e}"))?;

    if data.nodes.is_empty() {
        return Err(format!("'{}' defines no nodes", data.character_id));
    }

    let prefix = format!("{}_", data.character_id);
    let nodes = data
        .nodes
        .into_iter()
        .map(|node_data| {
            let mut node = DialogNode::new(
                format!("{prefix}{}", node_data.id),
                node_data.character_name,
                node_data.text,
                node_data.expression,
            );
            node.is_end_node = node_data.is_end_node;
            node.choices = node_data
                .choices
                .into_iter()
                .map(|c| DialogChoice {
                    text: c.text,
                    next_node_id: format!("{prefix}{}", c.next_node_id),
                    trust_modifier: c.trust_modifier,
                    attraction_modifier: c.attraction_modifier,
                    required_flags: c.required_flags,
                    set_flags: c.set_flags,
                })
                .collect();
            node
        })
        .collect();

    let root = format!("{prefix}{}", data.root_node_id);
    Ok((data.character_id, root, nodes))
}

// ─── Directory loading ───────────────────────────────────────────────────────

/// Loads every `*.json` under `dir` into the library. Bad files are
/// logged and skipped; good files are kept.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_dialog_directory(dir: &Path, library: &mut DialogLibrary) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("[Dialog] Dialog directory {} unreadable: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                warn!("[Dialog] Could not read {}: {}", path.display(), e);
                continue;
            }
        };
        match parse_dialog_file(&json) {
            Ok((character_id, root, nodes)) => {
                info!(
                    "[Dialog] Loaded {} node(s) for '{}' from {}",
                    nodes.len(),
                    character_id,
                    path.display()
                );
                for node in nodes {
                    library.nodes.insert(node.id.clone(), node);
                }
                library.roots.insert(character_id, root);
            }
            Err(e) => {
                warn!("[Dialog] Skipping {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_dialog_directory(_dir: &Path, _library: &mut DialogLibrary) {}
