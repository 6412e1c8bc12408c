//! Dialog domain — branching conversation trees with relationship effects.
//!
//! The library of nodes is loaded once at boot (see `loader`); this module
//! owns the runtime session: a typewriter reveal, flag-filtered choices,
//! and the trust/attraction mutations a confirmed choice applies.

use bevy::prelude::*;

use crate::shared::*;

mod builtin;
mod loader;

pub use builtin::build_fallback_dialog;
pub use loader::{load_dialog_directory, parse_dialog_file};

pub struct DialogPlugin;

impl Plugin for DialogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogSession>()
            .add_systems(
                Update,
                handle_start_dialog.run_if(not(in_state(AppState::Loading))),
            )
            .add_systems(
                Update,
                (tick_reveal, handle_choice_input, finish_session)
                    .chain()
                    .run_if(in_state(AppState::Dialogue)),
            )
            .add_systems(OnExit(AppState::Dialogue), reset_session);
    }
}

// ─── Session state machine ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Idle,
    Revealing,
    AwaitingChoice,
    Ended,
}

/// Runtime state of the active conversation. One session at a time.
#[derive(Resource, Debug, Default)]
pub struct DialogSession {
    pub phase: DialogPhase,
    pub character_id: CharacterId,
    pub node_id: String,
    pub speaker: String,
    pub expression: String,
    pub is_end_node: bool,
    full_text: String,
    /// Reveal cursor in characters; fractional part carries between frames.
    reveal_cursor: f32,
    /// Choices filtered by required flags at node entry, declared order.
    pub available: Vec<DialogChoice>,
    pub selected: usize,
    /// Where to return when the conversation closes.
    pub return_state: AppState,
    /// True only on the tick the reveal completed. The input that ended
    /// the reveal must not also confirm a choice or close the session.
    pub reveal_just_finished: bool,
}

impl DialogSession {
    /// Enters the given node: resets the reveal cursor and snapshots the
    /// filtered choice list.
    pub fn begin_node(&mut self, node: &DialogNode, relationship: &CharacterRelationship) {
        self.node_id = node.id.clone();
        self.speaker = node.character_name.clone();
        self.expression = node.expression.clone();
        self.is_end_node = node.is_end_node;
        self.full_text = node.text.clone();
        self.reveal_cursor = 0.0;
        self.available = node.available_choices(relationship);
        self.selected = 0;
        self.reveal_just_finished = false;
        self.phase = DialogPhase::Revealing;
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// The portion of the text currently revealed.
    pub fn displayed_text(&self) -> String {
        let shown = (self.reveal_cursor as usize).min(self.char_count());
        self.full_text.chars().take(shown).collect()
    }

    pub fn is_reveal_complete(&self) -> bool {
        self.reveal_cursor as usize >= self.char_count()
    }

    fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }

    /// Advances the typewriter. Returns true when the reveal finished on
    /// this call.
    pub fn advance_reveal(&mut self, dt: f32, chars_per_sec: f32) -> bool {
        if self.phase != DialogPhase::Revealing {
            return false;
        }
        self.reveal_cursor += chars_per_sec * dt;
        self.finish_reveal_if_done()
    }

    /// Jumps the cursor to the end of the text.
    pub fn skip_reveal(&mut self) -> bool {
        if self.phase != DialogPhase::Revealing {
            return false;
        }
        self.reveal_cursor = self.char_count() as f32;
        self.finish_reveal_if_done()
    }

    fn finish_reveal_if_done(&mut self) -> bool {
        if !self.is_reveal_complete() {
            return false;
        }
        // An end node ends the session once revealed, whatever it
        // declares; so does any node with no surviving choices.
        self.phase = if self.is_end_node || self.available.is_empty() {
            DialogPhase::Ended
        } else {
            DialogPhase::AwaitingChoice
        };
        true
    }

    pub fn select_prev(&mut self) {
        if self.available.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.available.len() - 1
        } else {
            self.selected - 1
        };
    }

    pub fn select_next(&mut self) {
        if self.available.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.available.len();
    }

    pub fn selected_choice(&self) -> Option<&DialogChoice> {
        self.available.get(self.selected)
    }

    pub fn reset(&mut self) {
        *self = DialogSession::default();
    }
}

// ─── Choice hit regions ──────────────────────────────────────────────────────

const CHOICE_WIDTH: f32 = 800.0;
const CHOICE_HEIGHT: f32 = 50.0;
const CHOICE_PADDING: f32 = 10.0;
const CHOICE_START_Y: f32 = 300.0;

/// Window-space region for the choice at the given index. The renderer
/// draws in the same coordinates, so hover hit-testing and display agree.
pub fn choice_region(index: usize) -> Rect {
    let x = (SCREEN_WIDTH - CHOICE_WIDTH) / 2.0;
    let y = CHOICE_START_Y + index as f32 * (CHOICE_HEIGHT + CHOICE_PADDING);
    Rect::new(x, y, x + CHOICE_WIDTH, y + CHOICE_HEIGHT)
}

// ─── Systems ─────────────────────────────────────────────────────────────────

fn handle_start_dialog(
    mut start_reader: EventReader<StartDialogEvent>,
    mut error_writer: EventWriter<DialogContentError>,
    library: Res<DialogLibrary>,
    mut relationships: ResMut<Relationships>,
    mut session: ResMut<DialogSession>,
    current_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for ev in start_reader.read() {
        let Some(node) = library.node(&ev.node_id) else {
            warn!(
                "[Dialog] Start requested for missing node '{}' (character '{}')",
                ev.node_id, ev.character_id
            );
            error_writer.send(DialogContentError {
                character_id: ev.character_id.clone(),
                missing_node_id: ev.node_id.clone(),
            });
            continue;
        };

        let relationship =
            relationships.get_or_insert(&ev.character_id, &node.character_name);
        session.character_id = ev.character_id.clone();
        session.return_state = *current_state.get();
        session.begin_node(node, relationship);

        info!(
            "[Dialog] Session started at '{}' with {}",
            node.id, node.character_name
        );
        next_state.set(AppState::Dialogue);
    }
}

fn tick_reveal(
    time: Res<Time>,
    input: Res<PlayerInput>,
    settings: Res<GameSettings>,
    mut session: ResMut<DialogSession>,
) {
    session.reveal_just_finished = false;
    if session.phase != DialogPhase::Revealing {
        return;
    }
    let finished = if input.skip {
        session.skip_reveal()
    } else {
        session.advance_reveal(time.delta_secs(), settings.reveal_chars_per_sec)
    };
    session.reveal_just_finished = finished;
}

/// Choice navigation and confirmation. Keyboard moves the cursor first;
/// pointer hover overrides it afterwards, so the pointer wins whenever it
/// sits over a choice region this tick.
fn handle_choice_input(
    input: Res<PlayerInput>,
    library: Res<DialogLibrary>,
    mut relationships: ResMut<Relationships>,
    mut session: ResMut<DialogSession>,
    mut error_writer: EventWriter<DialogContentError>,
) {
    if session.phase != DialogPhase::AwaitingChoice || session.reveal_just_finished {
        return;
    }

    if input.up {
        session.select_prev();
    }
    if input.down {
        session.select_next();
    }
    if let Some(pointer) = input.pointer {
        for i in 0..session.available.len() {
            if choice_region(i).contains(pointer) {
                session.selected = i;
            }
        }
    }

    if !input.confirm {
        return;
    }
    let Some(choice) = session.selected_choice().cloned() else {
        return;
    };

    // Apply relationship effects before following the link, so a broken
    // target still leaves the chosen deltas in place.
    let character_id = session.character_id.clone();
    let speaker = session.speaker.clone();
    let relationship = relationships.get_or_insert(&character_id, &speaker);
    relationship.modify_trust(choice.trust_modifier);
    relationship.modify_attraction(choice.attraction_modifier);
    for (flag, value) in &choice.set_flags {
        relationship.set_flag(flag, *value);
    }

    match library.node(&choice.next_node_id) {
        Some(next_node) => {
            session.begin_node(next_node, relationship);
        }
        None => {
            warn!(
                "[Dialog] Choice '{}' points at missing node '{}'",
                choice.text, choice.next_node_id
            );
            error_writer.send(DialogContentError {
                character_id,
                missing_node_id: choice.next_node_id.clone(),
            });
            session.phase = DialogPhase::Ended;
        }
    }
}

/// Closes the session once the end node has been read (confirm) or the
/// player backs out (cancel).
fn finish_session(
    input: Res<PlayerInput>,
    session: Res<DialogSession>,
    mut ended_writer: EventWriter<DialogEndedEvent>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let close = (session.phase == DialogPhase::Ended
        && input.confirm
        && !session.reveal_just_finished)
        || input.cancel;
    if !close {
        return;
    }
    ended_writer.send(DialogEndedEvent {
        character_id: session.character_id.clone(),
    });
    next_state.set(session.return_state);
}

/// Runs before the next mode's OnEnter, so an aborted session never leaks
/// into the following scene.
fn reset_session(mut session: ResMut<DialogSession>) {
    session.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_choices(n: usize) -> DialogNode {
        let mut node = DialogNode::new("mara_root", "Mara", "Hello", "neutral");
        for i in 0..n {
            node.choices
                .push(DialogChoice::new(format!("c{i}"), format!("t{i}"), 0.0, 0.0));
        }
        node
    }

    #[test]
    fn test_reveal_completes_after_expected_ticks() {
        let rel = CharacterRelationship::new("Mara");
        let mut session = DialogSession::default();
        session.begin_node(&node_with_choices(1), &rel);

        // "Hello" at 2 chars/sec: ceil(5/2) = 3 one-second ticks.
        let rate = 2.0;
        let ticks = (5.0_f32 / rate).ceil() as usize;
        for i in 0..ticks {
            let done = session.advance_reveal(1.0, rate);
            assert_eq!(done, i == ticks - 1, "finished exactly on the last tick");
        }
        assert_eq!(session.displayed_text(), "Hello");
        assert_eq!(session.phase, DialogPhase::AwaitingChoice);
    }

    #[test]
    fn test_reveal_of_end_node_without_choices_ends_session() {
        let rel = CharacterRelationship::new("Mara");
        let mut node = node_with_choices(0);
        node.is_end_node = true;
        let mut session = DialogSession::default();
        session.begin_node(&node, &rel);
        session.skip_reveal();
        assert_eq!(session.phase, DialogPhase::Ended);
    }

    #[test]
    fn test_skip_jumps_to_full_text() {
        let rel = CharacterRelationship::new("Mara");
        let mut session = DialogSession::default();
        session.begin_node(&node_with_choices(2), &rel);
        session.advance_reveal(0.01, 33.0);
        assert_ne!(session.displayed_text(), "Hello");
        session.skip_reveal();
        assert_eq!(session.displayed_text(), "Hello");
        assert_eq!(session.phase, DialogPhase::AwaitingChoice);
    }

    #[test]
    fn test_choice_selection_wraps_both_directions() {
        let rel = CharacterRelationship::new("Mara");
        let mut session = DialogSession::default();
        session.begin_node(&node_with_choices(3), &rel);
        session.skip_reveal();

        assert_eq!(session.selected, 0);
        session.select_prev();
        assert_eq!(session.selected, 2);
        session.select_next();
        assert_eq!(session.selected, 0);
        session.select_next();
        assert_eq!(session.selected, 1);
    }

    #[test]
    fn test_flag_gated_choice_not_offered() {
        let mut rel = CharacterRelationship::new("Mara");
        let mut node = node_with_choices(1);
        let mut gated = DialogChoice::new("secret", "t9", 0.0, 0.0);
        gated.required_flags.insert("heard_rumor".to_string(), true);
        node.choices.push(gated);

        let mut session = DialogSession::default();
        session.begin_node(&node, &rel);
        assert_eq!(session.available.len(), 1);

        rel.set_flag("heard_rumor", true);
        session.begin_node(&node, &rel);
        assert_eq!(session.available.len(), 2);
    }

    #[test]
    fn test_choice_filter_preserves_declared_order() {
        let mut rel = CharacterRelationship::new("Mara");
        rel.set_flag("a", true);
        let mut node = DialogNode::new("mara_root", "Mara", "Hi", "neutral");
        for (text, flag) in [("one", None), ("two", Some("a")), ("three", None)] {
            let mut c = DialogChoice::new(text, "t", 0.0, 0.0);
            if let Some(f) = flag {
                c.required_flags.insert(f.to_string(), true);
            }
            node.choices.push(c);
        }
        let mut session = DialogSession::default();
        session.begin_node(&node, &rel);
        let texts: Vec<&str> = session.available.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_choice_regions_do_not_overlap() {
        let a = choice_region(0);
        let b = choice_region(1);
        assert!(a.max.y <= b.min.y);
    }
}
