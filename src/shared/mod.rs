//! Shared resources, events, and states for Nightlatch.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// APP STATE — top-level scene machine
// ═══════════════════════════════════════════════════════════════════════

/// Exactly one scene mode is active at a time. Transitions go through
/// `NextState<AppState>`; OnExit of the old mode always runs before
/// OnEnter of the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum AppState {
    #[default]
    Loading,
    MainMenu,
    Apartment,
    JobSite,
    Infiltration,
    Shop,
    Dialogue,
    LockPicking,
    Studying,
    TouchScene,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK — day / time-slot progression
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Which slot sequence the clock walks. The two-slot policy treats
/// Morning as the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimePolicy {
    TwoSlot,
    #[default]
    FourSlot,
}

impl TimeSlot {
    /// The slot that follows this one under the given policy, and whether
    /// the step rolls over into a new day.
    pub fn next(self, policy: TimePolicy) -> (TimeSlot, bool) {
        match policy {
            TimePolicy::TwoSlot => match self {
                TimeSlot::Night => (TimeSlot::Morning, true),
                _ => (TimeSlot::Night, false),
            },
            TimePolicy::FourSlot => match self {
                TimeSlot::Morning => (TimeSlot::Afternoon, false),
                TimeSlot::Afternoon => (TimeSlot::Evening, false),
                TimeSlot::Evening => (TimeSlot::Night, false),
                TimeSlot::Night => (TimeSlot::Morning, true),
            },
        }
    }

    /// The slot whose arrival replenishes the action budget.
    pub fn is_work_reset_slot(self, policy: TimePolicy) -> bool {
        match policy {
            TimePolicy::TwoSlot => self == TimeSlot::Night,
            TimePolicy::FourSlot => self == TimeSlot::Evening,
        }
    }

    pub fn is_daytime(self) -> bool {
        !matches!(self, TimeSlot::Night)
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    pub day: u32,
    pub slot: TimeSlot,
    pub actions_remaining: u32,
    pub base_actions_per_period: u32,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            day: 1,
            slot: TimeSlot::Morning,
            actions_remaining: DEFAULT_ACTIONS_PER_PERIOD,
            base_actions_per_period: DEFAULT_ACTIONS_PER_PERIOD,
        }
    }
}

impl Clock {
    /// Spends one action if any remain. The budget never goes negative.
    pub fn try_spend_action(&mut self) -> bool {
        if self.actions_remaining > 0 {
            self.actions_remaining -= 1;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER STATE
// ═══════════════════════════════════════════════════════════════════════

/// String identifiers throughout, for data-driven flexibility.
pub type ItemId = String;
pub type HouseId = String;
pub type CharacterId = String;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub money: u32,
    /// Acquisition order, duplicates allowed.
    pub inventory: Vec<ItemId>,
    pub unlocked_tools: HashSet<ItemId>,
    pub completed_events: HashSet<String>,
    pub completed_jobs: Vec<HouseId>,
    pub current_job: Option<HouseId>,
    /// Per-job transient state, cleared when a job ends.
    pub discovered_entry_points: HashMap<String, bool>,
    pub prepared_entry_points: HashMap<String, bool>,
    /// Per-day study bonus from consumables; resets every morning.
    pub study_boost: i32,
    pub students: HashMap<CharacterId, StudentStats>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            money: STARTING_MONEY,
            inventory: Vec::new(),
            unlocked_tools: HashSet::new(),
            completed_events: HashSet::new(),
            completed_jobs: Vec::new(),
            current_job: None,
            discovered_entry_points: HashMap::new(),
            prepared_entry_points: HashMap::new(),
            study_boost: 0,
            students: HashMap::new(),
        }
    }
}

impl PlayerState {
    pub fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Refuses the purchase rather than going negative.
    pub fn spend_money(&mut self, amount: u32) -> bool {
        if self.money >= amount {
            self.money -= amount;
            true
        } else {
            false
        }
    }

    pub fn unlock_tool(&mut self, tool_id: &str) {
        self.unlocked_tools.insert(tool_id.to_string());
    }

    pub fn has_tool(&self, tool_id: &str) -> bool {
        self.unlocked_tools.contains(tool_id)
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|i| i == item_id)
    }

    pub fn count_item(&self, item_id: &str) -> usize {
        self.inventory.iter().filter(|i| *i == item_id).count()
    }

    /// Removes one unit of the item. Returns false if none was held.
    pub fn remove_item_once(&mut self, item_id: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|i| i == item_id) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn discover_entry_point(&mut self, name: &str) {
        self.discovered_entry_points.insert(name.to_string(), true);
    }

    pub fn prepare_entry_point(&mut self, name: &str) {
        self.prepared_entry_points.insert(name.to_string(), true);
    }

    pub fn is_entry_discovered(&self, name: &str) -> bool {
        self.discovered_entry_points.get(name).copied().unwrap_or(false)
    }

    pub fn is_entry_prepared(&self, name: &str) -> bool {
        self.prepared_entry_points.get(name).copied().unwrap_or(false)
    }

    pub fn clear_entry_points(&mut self) {
        self.discovered_entry_points.clear();
        self.prepared_entry_points.clear();
    }

    pub fn student_mut(&mut self, character_id: &str) -> &mut StudentStats {
        self.students
            .entry(character_id.to_string())
            .or_default()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STUDENT STATS — clamped axes + derived predicates
// ═══════════════════════════════════════════════════════════════════════

/// Per-character progression axes. Every axis stays inside [0, 100] at
/// every write site; the fields are private so no caller can bypass the
/// clamp. Threshold predicates are recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStats {
    grade: i32,
    affection: i32,
    lust: i32,
    mood: i32,
}

impl Default for StudentStats {
    fn default() -> Self {
        Self {
            grade: 20,
            affection: 0,
            lust: 0,
            mood: 50,
        }
    }
}

impl StudentStats {
    pub fn grade(&self) -> i32 {
        self.grade
    }

    pub fn affection(&self) -> i32 {
        self.affection
    }

    pub fn lust(&self) -> i32 {
        self.lust
    }

    pub fn mood(&self) -> i32 {
        self.mood
    }

    pub fn modify_grade(&mut self, delta: i32) {
        self.grade = (self.grade + delta).clamp(0, 100);
    }

    pub fn modify_affection(&mut self, delta: i32) {
        self.affection = (self.affection + delta).clamp(0, 100);
    }

    pub fn modify_lust(&mut self, delta: i32) {
        self.lust = (self.lust + delta).clamp(0, 100);
    }

    pub fn modify_mood(&mut self, delta: i32) {
        self.mood = (self.mood + delta).clamp(0, 100);
    }

    /// Re-clamps every axis. Only needed after deserializing external
    /// data; live writes are clamped at the source.
    pub fn normalize(&mut self) {
        self.grade = self.grade.clamp(0, 100);
        self.affection = self.affection.clamp(0, 100);
        self.lust = self.lust.clamp(0, 100);
        self.mood = self.mood.clamp(0, 100);
    }

    pub fn is_passing(&self) -> bool {
        self.grade >= 60
    }

    pub fn is_trusting(&self) -> bool {
        self.affection >= 60
    }

    pub fn is_happy(&self) -> bool {
        self.mood >= 70
    }

    pub fn can_accept_advances(&self) -> bool {
        self.affection >= 50 && self.lust >= 30
    }

    pub fn is_ready_for_romance(&self) -> bool {
        self.grade >= 70 && self.affection >= 80 && self.lust >= 70
    }

    pub fn is_ready_for_friend_ending(&self) -> bool {
        self.grade >= 80 && self.affection >= 70 && self.lust < 60
    }

    pub fn is_ready_for_secret_ending(&self) -> bool {
        self.grade >= 90 && self.affection >= 90 && self.lust >= 90
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RELATIONSHIPS — dialog-owned trust/attraction + story flags
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRelationship {
    pub character_name: String,
    trust: f32,
    attraction: f32,
    flags: HashMap<String, bool>,
}

impl CharacterRelationship {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            character_name: name.into(),
            trust: 50.0,
            attraction: 20.0,
            flags: HashMap::new(),
        }
    }

    pub fn trust(&self) -> f32 {
        self.trust
    }

    pub fn attraction(&self) -> f32 {
        self.attraction
    }

    pub fn modify_trust(&mut self, amount: f32) {
        self.trust = (self.trust + amount).clamp(0.0, 100.0);
    }

    pub fn modify_attraction(&mut self, amount: f32) {
        self.attraction = (self.attraction + amount).clamp(0.0, 100.0);
    }

    pub fn set_flag(&mut self, flag: &str, value: bool) {
        self.flags.insert(flag.to_string(), value);
    }

    /// Absent flags read as false.
    pub fn flag(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    pub fn trust_label(&self) -> &'static str {
        match self.trust {
            t if t >= 80.0 => "Very High",
            t if t >= 60.0 => "High",
            t if t >= 40.0 => "Neutral",
            t if t >= 20.0 => "Low",
            _ => "Very Low",
        }
    }

    pub fn attraction_label(&self) -> &'static str {
        match self.attraction {
            a if a >= 80.0 => "Smitten",
            a if a >= 60.0 => "Very Attracted",
            a if a >= 40.0 => "Interested",
            a if a >= 20.0 => "Neutral",
            _ => "Indifferent",
        }
    }
}

/// Character id → relationship record. Owned by the dialog domain;
/// intentionally NOT part of the save snapshot (see save module).
#[derive(Resource, Debug, Clone, Default)]
pub struct Relationships {
    pub records: HashMap<CharacterId, CharacterRelationship>,
}

impl Relationships {
    pub fn get_or_insert(&mut self, character_id: &str, display_name: &str) -> &mut CharacterRelationship {
        self.records
            .entry(character_id.to_string())
            .or_insert_with(|| CharacterRelationship::new(display_name))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DIALOG GRAPH
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogChoice {
    pub text: String,
    pub next_node_id: String,
    pub trust_modifier: f32,
    pub attraction_modifier: f32,
    /// Every entry must match the relationship's flag value exactly for
    /// the choice to be offered.
    pub required_flags: HashMap<String, bool>,
    pub set_flags: HashMap<String, bool>,
}

impl DialogChoice {
    pub fn new(
        text: impl Into<String>,
        next_node_id: impl Into<String>,
        trust_modifier: f32,
        attraction_modifier: f32,
    ) -> Self {
        Self {
            text: text.into(),
            next_node_id: next_node_id.into(),
            trust_modifier,
            attraction_modifier,
            required_flags: HashMap::new(),
            set_flags: HashMap::new(),
        }
    }

    pub fn is_available(&self, relationship: &CharacterRelationship) -> bool {
        self.required_flags
            .iter()
            .all(|(flag, required)| relationship.flag(flag) == *required)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogNode {
    /// Globally unique after loader namespacing (`<character>_<local id>`).
    pub id: String,
    pub character_name: String,
    pub text: String,
    pub expression: String,
    pub is_end_node: bool,
    /// Declared order is display order; filtering never re-sorts.
    pub choices: Vec<DialogChoice>,
}

impl DialogNode {
    pub fn new(
        id: impl Into<String>,
        character_name: impl Into<String>,
        text: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            character_name: character_name.into(),
            text: text.into(),
            expression: expression.into(),
            is_end_node: false,
            choices: Vec::new(),
        }
    }

    pub fn available_choices(&self, relationship: &CharacterRelationship) -> Vec<DialogChoice> {
        self.choices
            .iter()
            .filter(|c| c.is_available(relationship))
            .cloned()
            .collect()
    }
}

/// All loaded dialog trees in one namespaced node map.
#[derive(Resource, Debug, Clone, Default)]
pub struct DialogLibrary {
    pub nodes: HashMap<String, DialogNode>,
    /// Character id → namespaced root node id.
    pub roots: HashMap<CharacterId, String>,
}

impl DialogLibrary {
    pub fn node(&self, node_id: &str) -> Option<&DialogNode> {
        self.nodes.get(node_id)
    }

    pub fn root_of(&self, character_id: &str) -> Option<&String> {
        self.roots.get(character_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HOUSES & ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Window,
    BackDoor,
    Skylight,
    Padlock,
}

/// Static definition of one access route into a house. The discovered /
/// prepared flags live in PlayerState keyed by name, so the definition
/// itself never mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPointDef {
    pub kind: EntryKind,
    pub name: String,
    /// Probability in [0, 1] that an attempt through this route succeeds.
    pub base_chance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseDef {
    pub id: HouseId,
    pub name: String,
    pub address: String,
    pub resident: CharacterId,
    pub resident_name: String,
    pub lock_difficulty: i32,
    pub money_reward: u32,
    pub entry_points: Vec<EntryPointDef>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct HouseRegistry {
    pub houses: HashMap<HouseId, HouseDef>,
    /// Job-board ordering.
    pub order: Vec<HouseId>,
}

impl HouseRegistry {
    pub fn get(&self, id: &str) -> Option<&HouseDef> {
        self.houses.get(id)
    }

    /// First house on the board that has not been completed yet.
    pub fn next_available(&self, completed: &[HouseId]) -> Option<&HouseDef> {
        self.order
            .iter()
            .find(|id| !completed.contains(id))
            .and_then(|id| self.houses.get(id))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SHOP
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItemKind {
    /// One-time purchase, goes into unlocked_tools.
    Tool,
    /// Repeatable purchase, goes into inventory.
    Consumable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: ItemId,
    pub name: String,
    pub price: u32,
    pub description: String,
    pub kind: ShopItemKind,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ShopCatalog {
    pub items: Vec<ShopItem>,
}

impl ShopCatalog {
    pub fn get(&self, id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STORY EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    OnSceneEnter,
    OnInteract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRequirement {
    Day,
    Night,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventAction {
    StartDialog {
        character_id: CharacterId,
        node_id: String,
    },
    GrantItem {
        item_id: ItemId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEvent {
    pub id: String,
    pub trigger: TriggerKind,
    /// Which scene/interaction fires this trigger (e.g. "job_site:lock").
    pub target: String,
    pub required_time: Option<TimeRequirement>,
    pub required_item: Option<ItemId>,
    pub required_flag: Option<(CharacterId, String)>,
    pub action: EventAction,
    pub repeatable: bool,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct EventRegistry {
    pub events: Vec<StoryEvent>,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT SNAPSHOT — the only view of hardware input the game sees
// ═══════════════════════════════════════════════════════════════════════

/// Per-frame input snapshot. Rebuilt from hardware state once per frame in
/// PreUpdate; every gameplay system reads this and nothing else.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub pointer: Option<Vec2>,
    /// Pointer movement since last frame, in window pixels.
    pub pointer_delta: Vec2,
    pub pointer_pressed: bool,
    pub pointer_just_pressed: bool,
    pub pointer_just_released: bool,
    pub confirm: bool,
    pub cancel: bool,
    pub up: bool,
    pub down: bool,
    pub skip: bool,
}

/// Which input mapping is live, derived from AppState every frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Disabled,
    Menu,
    Scene,
    Dialogue,
    Minigame,
}

// ═══════════════════════════════════════════════════════════════════════
// RNG — seedable randomness for pin placement and entry rolls
// ═══════════════════════════════════════════════════════════════════════

/// All gameplay randomness flows through this resource so tests can seed
/// it and replay outcomes.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════════════════════════════════════

/// Tunables read from assets/settings.ron at boot, with these defaults as
/// the fallback when the file is missing or malformed.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub time_policy: TimePolicy,
    pub base_actions_per_period: u32,
    pub reveal_chars_per_sec: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_policy: TimePolicy::FourSlot,
            base_actions_per_period: DEFAULT_ACTIONS_PER_PERIOD,
            reveal_chars_per_sec: DEFAULT_REVEAL_CHARS_PER_SEC,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Player slept/waited; the clock advances exactly one slot per event.
#[derive(Event, Debug, Clone)]
pub struct AdvanceTimeEvent;

/// Emitted after the clock has moved to a new slot.
#[derive(Event, Debug, Clone)]
pub struct SlotChangedEvent {
    pub day: u32,
    pub slot: TimeSlot,
    pub new_day: bool,
}

/// Ask the dialog domain to open a session at the given node.
#[derive(Event, Debug, Clone)]
pub struct StartDialogEvent {
    pub character_id: CharacterId,
    pub node_id: String,
}

/// The dialog session finished (end node revealed or session aborted).
#[derive(Event, Debug, Clone)]
pub struct DialogEndedEvent {
    pub character_id: CharacterId,
}

/// A choice referenced a node id that does not exist in the library.
/// Content-authoring error: surfaced loudly instead of staying silent.
#[derive(Event, Debug, Clone)]
pub struct DialogContentError {
    pub character_id: CharacterId,
    pub missing_node_id: String,
}

/// One unit of an item enters the inventory.
#[derive(Event, Debug, Clone)]
pub struct GrantItemEvent {
    pub item_id: ItemId,
}

/// A scene interaction region was clicked.
#[derive(Event, Debug, Clone)]
pub struct InteractionEvent {
    pub id: String,
}

#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE DATA
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub clock: Clock,
    pub player: PlayerState,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

pub const STARTING_MONEY: u32 = 50;
pub const DEFAULT_ACTIONS_PER_PERIOD: u32 = 3;
pub const DEFAULT_REVEAL_CHARS_PER_SEC: f32 = 33.0;

/// Consumable that adds one action to the period budget when the budget
/// resets, and is drunk (removed) in the same transition.
pub const ITEM_COFFEE: &str = "coffee";
/// Consumable that raises the per-day study boost when used.
pub const ITEM_STUDY_NOTES: &str = "study_notes";

pub const TOOL_ADVANCED_LOCKPICK: &str = "advanced_lockpick";
pub const TOOL_KEY_COPIER: &str = "key_copier";

/// Default character the built-in fallback dialog belongs to.
pub const DEFAULT_RESIDENT_ID: &str = "mara";
/// The tutoring thread tracks this character's stats.
pub const DEFAULT_STUDENT_ID: &str = "elise";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_axes_clamped_on_every_write() {
        let mut stats = StudentStats::default();
        stats.modify_grade(1_000);
        assert_eq!(stats.grade(), 100);
        stats.modify_grade(-10_000);
        assert_eq!(stats.grade(), 0);
        stats.modify_affection(-5);
        assert_eq!(stats.affection(), 0);
        stats.modify_lust(250);
        assert_eq!(stats.lust(), 100);
        stats.modify_mood(-51);
        assert_eq!(stats.mood(), 0);
    }

    #[test]
    fn test_stat_predicates_are_derived() {
        let mut stats = StudentStats::default();
        assert!(!stats.is_passing());
        stats.modify_grade(40); // 20 -> 60
        assert!(stats.is_passing());
        stats.modify_grade(-1);
        assert!(!stats.is_passing());
    }

    #[test]
    fn test_can_accept_advances_thresholds() {
        let mut stats = StudentStats::default();
        stats.modify_affection(50);
        stats.modify_lust(29);
        assert!(!stats.can_accept_advances());
        stats.modify_lust(1);
        assert!(stats.can_accept_advances());
    }

    #[test]
    fn test_spend_money_refuses_overdraft() {
        let mut player = PlayerState::default();
        assert_eq!(player.money, 50);
        assert!(player.spend_money(30));
        assert_eq!(player.money, 20);
        assert!(!player.spend_money(30));
        assert_eq!(player.money, 20);
    }

    #[test]
    fn test_unlock_tool_idempotent() {
        let mut player = PlayerState::default();
        player.unlock_tool("advanced_lockpick");
        player.unlock_tool("advanced_lockpick");
        assert_eq!(player.unlocked_tools.len(), 1);
        assert!(player.has_tool("advanced_lockpick"));
    }

    #[test]
    fn test_remove_item_once_removes_single_unit() {
        let mut player = PlayerState::default();
        player.inventory.push("coffee".to_string());
        player.inventory.push("coffee".to_string());
        assert!(player.remove_item_once("coffee"));
        assert_eq!(player.count_item("coffee"), 1);
        assert!(player.remove_item_once("coffee"));
        assert!(!player.remove_item_once("coffee"));
    }

    #[test]
    fn test_relationship_clamps() {
        let mut rel = CharacterRelationship::new("Mara");
        rel.modify_trust(1000.0);
        assert_eq!(rel.trust(), 100.0);
        rel.modify_attraction(-500.0);
        assert_eq!(rel.attraction(), 0.0);
    }

    #[test]
    fn test_relationship_flags_default_false() {
        let mut rel = CharacterRelationship::new("Mara");
        assert!(!rel.flag("met_before"));
        rel.set_flag("met_before", true);
        assert!(rel.flag("met_before"));
        rel.set_flag("met_before", false);
        assert!(!rel.flag("met_before"));
    }

    #[test]
    fn test_choice_availability_requires_exact_flag_match() {
        let mut rel = CharacterRelationship::new("Mara");
        let mut choice = DialogChoice::new("Hi", "next", 0.0, 0.0);
        choice.required_flags.insert("met_before".to_string(), true);
        assert!(!choice.is_available(&rel));
        rel.set_flag("met_before", true);
        assert!(choice.is_available(&rel));
        // A required-false flag must also match exactly.
        let mut choice2 = DialogChoice::new("Hi again", "next", 0.0, 0.0);
        choice2.required_flags.insert("met_before".to_string(), false);
        assert!(!choice2.is_available(&rel));
    }

    #[test]
    fn test_two_slot_progression() {
        let (next, rollover) = TimeSlot::Morning.next(TimePolicy::TwoSlot);
        assert_eq!(next, TimeSlot::Night);
        assert!(!rollover);
        let (next, rollover) = TimeSlot::Night.next(TimePolicy::TwoSlot);
        assert_eq!(next, TimeSlot::Morning);
        assert!(rollover);
    }

    #[test]
    fn test_four_slot_progression() {
        let mut slot = TimeSlot::Morning;
        let order = [
            TimeSlot::Afternoon,
            TimeSlot::Evening,
            TimeSlot::Night,
            TimeSlot::Morning,
        ];
        for (i, expected) in order.iter().enumerate() {
            let (next, rollover) = slot.next(TimePolicy::FourSlot);
            assert_eq!(next, *expected);
            assert_eq!(rollover, i == order.len() - 1);
            slot = next;
        }
    }

    #[test]
    fn test_action_budget_never_negative() {
        let mut clock = Clock::default();
        clock.actions_remaining = 1;
        assert!(clock.try_spend_action());
        assert!(!clock.try_spend_action());
        assert_eq!(clock.actions_remaining, 0);
    }
}
