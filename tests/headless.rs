//! Headless integration tests for Nightlatch.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic systems (skipping all rendering/UI), and verify that the
//! core loops — boot, time, dialog, scenes, persistence — work together.
//!
//! Run with: `cargo test --test headless`

use std::sync::Mutex;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

/// The save gateway writes one file next to the test binary; tests that
/// touch it take this lock so parallel test threads don't interleave.
static SAVE_FILE_LOCK: Mutex<()> = Mutex::new(());

use nightlatch::clock::ClockPlugin;
use nightlatch::data::DataPlugin;
use nightlatch::dialog::{DialogPhase, DialogPlugin, DialogSession};
use nightlatch::events::EventsPlugin;
use nightlatch::minigames::MinigamePlugin;
use nightlatch::save::SavePlugin;
use nightlatch::scenes::{ScenePlugin, SceneStatus};
use nightlatch::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events
/// registered but NO rendering, windowing, or hardware input. The input
/// snapshot resources exist so state-gated systems can run; tests drive
/// the game through events rather than keystrokes.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Scene state machine ──────────────────────────────────────────────
    app.init_state::<AppState>();

    // ── Shared resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<Clock>()
        .init_resource::<PlayerState>()
        .init_resource::<Relationships>()
        .init_resource::<DialogLibrary>()
        .init_resource::<HouseRegistry>()
        .init_resource::<ShopCatalog>()
        .init_resource::<EventRegistry>()
        .init_resource::<GameSettings>()
        .init_resource::<PlayerInput>()
        .init_resource::<InputContext>()
        .insert_resource(GameRng::seeded(42));

    // ── Shared events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<AdvanceTimeEvent>()
        .add_event::<SlotChangedEvent>()
        .add_event::<StartDialogEvent>()
        .add_event::<DialogEndedEvent>()
        .add_event::<DialogContentError>()
        .add_event::<GrantItemEvent>()
        .add_event::<InteractionEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<LoadCompleteEvent>();

    // ── Domain plugins (everything except input/rendering) ───────────────
    app.add_plugins(ClockPlugin)
        .add_plugins(DialogPlugin)
        .add_plugins(MinigamePlugin)
        .add_plugins(ScenePlugin)
        .add_plugins(EventsPlugin)
        .add_plugins(SavePlugin)
        .add_plugins(DataPlugin);

    app
}

fn set_state(app: &mut App, state: AppState) {
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(state);
    app.update(); // process state transition
}

fn current_state(app: &App) -> AppState {
    *app.world().resource::<State<AppState>>().get()
}

fn click(app: &mut App, id: &str) {
    app.world_mut().send_event(InteractionEvent { id: id.to_string() });
    app.update();
}

fn drain_count<E: Event>(app: &mut App) -> usize {
    app.world_mut().resource_mut::<Events<E>>().drain().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_boot_reaches_main_menu_with_populated_registries() {
    let mut app = build_test_app();

    // First update enters Loading and populates registries; second
    // applies the queued NextState.
    app.update();
    app.update();

    assert_eq!(
        current_state(&app),
        AppState::MainMenu,
        "Expected to reach MainMenu after loading data"
    );

    assert!(
        !app.world().resource::<HouseRegistry>().houses.is_empty(),
        "House registry should be populated during boot"
    );
    assert!(
        !app.world().resource::<ShopCatalog>().items.is_empty(),
        "Shop catalog should be populated during boot"
    );
    assert!(
        !app.world().resource::<EventRegistry>().events.is_empty(),
        "Event registry should be populated during boot"
    );

    let library = app.world().resource::<DialogLibrary>();
    assert!(
        !library.nodes.is_empty(),
        "Dialog library should have content or the built-in fallback"
    );
    let root = library.root_of(DEFAULT_RESIDENT_ID).expect("default resident root");
    assert!(library.node(root).is_some(), "root node resolves");
}

#[test]
fn test_smoke_ticks_in_apartment() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    for _ in 0..120 {
        app.update();
    }
    assert_eq!(current_state(&app), AppState::Apartment);
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock & action budget
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_advance_time_event_consumes_coffee_on_evening_reset() {
    let mut app = build_test_app();
    app.update();
    app.update();

    // Pre-complete the welcome gift so its coffee doesn't skew the count.
    app.world_mut()
        .resource_mut::<PlayerState>()
        .completed_events
        .insert("welcome_package".to_string());
    set_state(&mut app, AppState::Apartment);

    {
        let mut clock = app.world_mut().resource_mut::<Clock>();
        clock.slot = TimeSlot::Afternoon;
        clock.actions_remaining = 0;
    }
    app.world_mut()
        .resource_mut::<PlayerState>()
        .inventory
        .push(ITEM_COFFEE.to_string());

    app.world_mut().send_event(AdvanceTimeEvent);
    app.update();

    let clock = app.world().resource::<Clock>();
    assert_eq!(clock.slot, TimeSlot::Evening);
    assert_eq!(clock.actions_remaining, 4, "base 3 + one coffee");
    assert_eq!(
        app.world().resource::<PlayerState>().count_item(ITEM_COFFEE),
        0,
        "exactly one coffee consumed"
    );
}

#[test]
fn test_day_rollover_autosaves() {
    let _guard = SAVE_FILE_LOCK.lock().unwrap();
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    app.world_mut().resource_mut::<Clock>().slot = TimeSlot::Night;
    app.world_mut().send_event(AdvanceTimeEvent);
    app.update(); // clock advances, autosave request queued
    app.update(); // save handled

    assert_eq!(app.world().resource::<Clock>().day, 2);
    let completions = drain_count::<SaveCompleteEvent>(&mut app);
    assert_eq!(completions, 1, "day rollover should trigger one autosave");
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialog
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_start_dialog_enters_dialogue_state_and_reveals() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    let root = app
        .world()
        .resource::<DialogLibrary>()
        .root_of(DEFAULT_RESIDENT_ID)
        .unwrap()
        .clone();
    app.world_mut().send_event(StartDialogEvent {
        character_id: DEFAULT_RESIDENT_ID.to_string(),
        node_id: root.clone(),
    });
    app.update(); // start handled, transition queued
    app.update(); // transition applied

    assert_eq!(current_state(&app), AppState::Dialogue);
    let session = app.world().resource::<DialogSession>();
    assert_eq!(session.node_id, root);
    assert_eq!(session.phase, DialogPhase::Revealing);
    assert!(
        !session.available.is_empty(),
        "root node offers choices once revealed"
    );
}

#[test]
fn test_missing_dialog_node_surfaces_content_error() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    app.world_mut().send_event(StartDialogEvent {
        character_id: "nobody".to_string(),
        node_id: "nobody_ghost_node".to_string(),
    });
    app.update();
    app.update();

    assert_eq!(
        current_state(&app),
        AppState::Apartment,
        "a broken start request must not change modes"
    );
    assert_eq!(drain_count::<DialogContentError>(&mut app), 1);
}

#[test]
fn test_dialogue_exit_resets_session() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    let root = app
        .world()
        .resource::<DialogLibrary>()
        .root_of(DEFAULT_RESIDENT_ID)
        .unwrap()
        .clone();
    app.world_mut().send_event(StartDialogEvent {
        character_id: DEFAULT_RESIDENT_ID.to_string(),
        node_id: root,
    });
    app.update();
    app.update();
    assert_eq!(current_state(&app), AppState::Dialogue);

    set_state(&mut app, AppState::Apartment);
    let session = app.world().resource::<DialogSession>();
    assert_eq!(session.phase, DialogPhase::Idle, "OnExit cleanup ran");
    assert!(session.available.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Scene flows
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_phone_accepts_next_job() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    click(&mut app, "apartment:phone");

    let player = app.world().resource::<PlayerState>();
    let first_house = app.world().resource::<HouseRegistry>().order[0].clone();
    assert_eq!(player.current_job.as_deref(), Some(first_house.as_str()));

    // A second call is refused while a job is active.
    click(&mut app, "apartment:phone");
    assert_eq!(
        app.world().resource::<PlayerState>().current_job.as_deref(),
        Some(first_house.as_str())
    );
}

#[test]
fn test_door_spends_an_action_and_enters_job_site() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    click(&mut app, "apartment:phone");
    let before = app.world().resource::<Clock>().actions_remaining;
    click(&mut app, "apartment:door");
    app.update(); // apply queued transition

    assert_eq!(current_state(&app), AppState::JobSite);
    assert_eq!(app.world().resource::<Clock>().actions_remaining, before - 1);
}

#[test]
fn test_door_refused_without_actions() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    click(&mut app, "apartment:phone");
    app.world_mut().resource_mut::<Clock>().actions_remaining = 0;
    click(&mut app, "apartment:door");
    app.update();

    assert_eq!(current_state(&app), AppState::Apartment);
    assert!(!app.world().resource::<SceneStatus>().message.is_empty());
}

#[test]
fn test_job_site_greets_resident_once() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    click(&mut app, "apartment:phone");
    click(&mut app, "apartment:door");
    app.update(); // enter JobSite; greeting dialog queued
    app.update(); // dialogue transition applied

    assert_eq!(current_state(&app), AppState::Dialogue);

    // Returning to the job site must not re-greet.
    set_state(&mut app, AppState::JobSite);
    app.update();
    assert_eq!(current_state(&app), AppState::JobSite);
}

#[test]
fn test_shop_purchase_paths() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Shop);

    // Consumable purchase: coffee costs 20 of the starting 50.
    click(&mut app, &format!("shop:buy:{ITEM_COFFEE}"));
    {
        let player = app.world().resource::<PlayerState>();
        assert_eq!(player.money, 30);
        assert_eq!(player.count_item(ITEM_COFFEE), 1);
    }

    // Unaffordable tool: refused, money unchanged.
    click(&mut app, &format!("shop:buy:{TOOL_ADVANCED_LOCKPICK}"));
    {
        let player = app.world().resource::<PlayerState>();
        assert_eq!(player.money, 30);
        assert!(!player.has_tool(TOOL_ADVANCED_LOCKPICK));
    }

    // Tool purchase is one-time.
    app.world_mut().resource_mut::<PlayerState>().money = 500;
    click(&mut app, &format!("shop:buy:{TOOL_ADVANCED_LOCKPICK}"));
    click(&mut app, &format!("shop:buy:{TOOL_ADVANCED_LOCKPICK}"));
    {
        let player = app.world().resource::<PlayerState>();
        assert_eq!(player.money, 350, "second purchase refused");
        assert!(player.has_tool(TOOL_ADVANCED_LOCKPICK));
    }
}

#[test]
fn test_infiltration_entry_attempts_shrink_or_succeed() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);
    click(&mut app, "apartment:phone");

    // Prepare one entry point by hand.
    let house_id = app.world().resource::<PlayerState>().current_job.clone().unwrap();
    let entry_name = app.world().resource::<HouseRegistry>().houses[&house_id]
        .entry_points[0]
        .name
        .clone();
    {
        let mut player = app.world_mut().resource_mut::<PlayerState>();
        player.discover_entry_point(&entry_name);
        player.prepare_entry_point(&entry_name);
    }

    set_state(&mut app, AppState::Infiltration);
    let viable_before = app
        .world()
        .resource::<nightlatch::scenes::infiltration::InfiltrationState>()
        .viable_entries
        .len();
    assert_eq!(viable_before, 1);

    click(&mut app, &format!("infil:entry:{entry_name}"));
    let infil = app
        .world()
        .resource::<nightlatch::scenes::infiltration::InfiltrationState>();
    assert!(
        infil.inside || infil.viable_entries.is_empty(),
        "an attempt either gets you in or burns the entry"
    );
}

#[test]
fn test_infiltration_escape_completes_job() {
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);
    click(&mut app, "apartment:phone");
    let house_id = app.world().resource::<PlayerState>().current_job.clone().unwrap();
    let reward = app.world().resource::<HouseRegistry>().houses[&house_id].money_reward;

    set_state(&mut app, AppState::Infiltration);
    app.world_mut()
        .resource_mut::<nightlatch::scenes::infiltration::InfiltrationState>()
        .inside = true;

    click(&mut app, "infil:collect");
    assert_eq!(
        app.world().resource::<PlayerState>().money,
        STARTING_MONEY + reward
    );
    // Collecting twice pays once.
    click(&mut app, "infil:collect");
    assert_eq!(
        app.world().resource::<PlayerState>().money,
        STARTING_MONEY + reward
    );

    click(&mut app, "infil:escape");
    app.update();
    let player = app.world().resource::<PlayerState>();
    assert_eq!(player.current_job, None);
    assert!(player.completed_jobs.contains(&house_id));
    assert!(player.prepared_entry_points.is_empty());
    assert_eq!(current_state(&app), AppState::Apartment);
}

// ─────────────────────────────────────────────────────────────────────────────
// Story events
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_welcome_package_fires_once() {
    let mut app = build_test_app();
    app.update();
    app.update();

    set_state(&mut app, AppState::Apartment);
    app.update(); // grant event applied

    let player = app.world().resource::<PlayerState>();
    assert_eq!(player.count_item(ITEM_COFFEE), 1);
    assert!(player.completed_events.contains("welcome_package"));

    // Re-entering the scene must not grant again.
    set_state(&mut app, AppState::Shop);
    set_state(&mut app, AppState::Apartment);
    app.update();
    assert_eq!(app.world().resource::<PlayerState>().count_item(ITEM_COFFEE), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_save_then_load_round_trips_through_the_app() {
    let _guard = SAVE_FILE_LOCK.lock().unwrap();
    let mut app = build_test_app();
    app.update();
    app.update();
    set_state(&mut app, AppState::Apartment);

    {
        let mut player = app.world_mut().resource_mut::<PlayerState>();
        player.money = 444;
        player.inventory.push("skeleton_key".to_string());
        player.student_mut(DEFAULT_STUDENT_ID).modify_grade(30);
    }
    {
        let mut clock = app.world_mut().resource_mut::<Clock>();
        clock.day = 7;
        clock.slot = TimeSlot::Evening;
    }
    app.world_mut()
        .resource_mut::<Relationships>()
        .get_or_insert(DEFAULT_RESIDENT_ID, "Mara")
        .set_flag("warmed_up", true);

    app.world_mut().send_event(SaveRequestEvent);
    app.update();
    assert_eq!(drain_count::<SaveCompleteEvent>(&mut app), 1);

    // Wreck the live state, then load it back.
    {
        let mut player = app.world_mut().resource_mut::<PlayerState>();
        *player = PlayerState::default();
    }
    {
        let mut clock = app.world_mut().resource_mut::<Clock>();
        *clock = Clock::default();
    }
    app.world_mut().send_event(LoadRequestEvent);
    app.update();

    let player = app.world().resource::<PlayerState>();
    let clock = app.world().resource::<Clock>();
    assert_eq!(player.money, 444);
    assert!(player.has_item("skeleton_key"));
    assert_eq!(player.students[DEFAULT_STUDENT_ID].grade(), 50);
    assert_eq!(clock.day, 7);
    assert_eq!(clock.slot, TimeSlot::Evening);

    // Relationships live outside the snapshot and must survive loading
    // structurally intact.
    let relationships = app.world().resource::<Relationships>();
    assert!(relationships.records[DEFAULT_RESIDENT_ID].flag("warmed_up"));
}
