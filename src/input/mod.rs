use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .init_resource::<InputContext>()
            .init_resource::<PointerTracker>()
            .add_systems(
                PreUpdate,
                (manage_input_context, reset_and_read_input).chain(),
            );
    }
}

/// Remembers the last cursor position so the snapshot can carry a delta.
#[derive(Resource, Debug, Default)]
pub struct PointerTracker {
    last: Option<Vec2>,
}

/// The single point where hardware input becomes game actions.
/// Everything downstream reads PlayerInput; nothing else touches
/// ButtonInput or the window cursor.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    context: Res<InputContext>,
    mut tracker: ResMut<PointerTracker>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    // Pointer state is captured in every context so draw layers can show
    // hover feedback even while input is otherwise disabled.
    let cursor = windows.get_single().ok().and_then(|w| w.cursor_position());
    input.pointer = cursor;
    input.pointer_delta = match (cursor, tracker.last) {
        (Some(now), Some(prev)) => now - prev,
        _ => Vec2::ZERO,
    };
    tracker.last = cursor;

    if *context == InputContext::Disabled {
        return;
    }

    input.pointer_pressed = mouse.pressed(MouseButton::Left);
    input.pointer_just_pressed = mouse.just_pressed(MouseButton::Left);
    input.pointer_just_released = mouse.just_released(MouseButton::Left);

    match *context {
        InputContext::Disabled => {}

        InputContext::Scene | InputContext::Menu => {
            input.confirm = keys.just_pressed(KeyCode::Enter)
                || keys.just_pressed(KeyCode::Space);
            input.cancel = keys.just_pressed(KeyCode::Escape);
            input.up = keys.just_pressed(KeyCode::ArrowUp) || keys.just_pressed(KeyCode::KeyW);
            input.down = keys.just_pressed(KeyCode::ArrowDown) || keys.just_pressed(KeyCode::KeyS);
        }

        InputContext::Dialogue => {
            input.confirm = keys.just_pressed(KeyCode::Enter)
                || keys.just_pressed(KeyCode::Space)
                || input.pointer_just_pressed;
            input.cancel = keys.just_pressed(KeyCode::Escape);
            input.up = keys.just_pressed(KeyCode::ArrowUp) || keys.just_pressed(KeyCode::KeyW);
            input.down = keys.just_pressed(KeyCode::ArrowDown) || keys.just_pressed(KeyCode::KeyS);
            input.skip = keys.just_pressed(KeyCode::ControlLeft)
                || keys.just_pressed(KeyCode::Space)
                || input.pointer_just_pressed;
        }

        InputContext::Minigame => {
            input.confirm = keys.just_pressed(KeyCode::Space) || input.pointer_just_pressed;
            input.cancel = keys.just_pressed(KeyCode::Escape);
        }
    }
}

/// Derives InputContext from AppState. One system, replaces per-domain
/// input guards.
fn manage_input_context(state: Res<State<AppState>>, mut context: ResMut<InputContext>) {
    *context = match *state.get() {
        AppState::Loading => InputContext::Disabled,
        AppState::MainMenu => InputContext::Menu,
        AppState::Apartment
        | AppState::JobSite
        | AppState::Infiltration
        | AppState::Shop => InputContext::Scene,
        AppState::Dialogue => InputContext::Dialogue,
        AppState::LockPicking | AppState::Studying | AppState::TouchScene => {
            InputContext::Minigame
        }
    };
}
