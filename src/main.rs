mod shared;
mod input;
mod clock;
mod dialog;
mod minigames;
mod scenes;
mod events;
mod save;
mod data;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Nightlatch".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Scene state machine
        .init_state::<AppState>()
        // Shared resources
        .init_resource::<Clock>()
        .init_resource::<PlayerState>()
        .init_resource::<Relationships>()
        .init_resource::<DialogLibrary>()
        .init_resource::<HouseRegistry>()
        .init_resource::<ShopCatalog>()
        .init_resource::<EventRegistry>()
        .init_resource::<GameRng>()
        .init_resource::<GameSettings>()
        // Events
        .add_event::<AdvanceTimeEvent>()
        .add_event::<SlotChangedEvent>()
        .add_event::<StartDialogEvent>()
        .add_event::<DialogEndedEvent>()
        .add_event::<DialogContentError>()
        .add_event::<GrantItemEvent>()
        .add_event::<InteractionEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<LoadCompleteEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(dialog::DialogPlugin)
        .add_plugins(minigames::MinigamePlugin)
        .add_plugins(scenes::ScenePlugin)
        .add_plugins(events::EventsPlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
