//! Built-in story events.

use crate::shared::*;

pub fn populate_events(registry: &mut EventRegistry) {
    registry.events = vec![
        // A neighbour leaves a welcome gift on the first morning home.
        StoryEvent {
            id: "welcome_package".to_string(),
            trigger: TriggerKind::OnSceneEnter,
            target: "apartment".to_string(),
            required_time: Some(TimeRequirement::Day),
            required_item: None,
            required_flag: None,
            action: EventAction::GrantItem {
                item_id: ITEM_COFFEE.to_string(),
            },
            repeatable: false,
        },
        // Mara opens up once she trusts you enough to have flagged it.
        StoryEvent {
            id: "mara_confides".to_string(),
            trigger: TriggerKind::OnSceneEnter,
            target: "job_site".to_string(),
            required_time: Some(TimeRequirement::Day),
            required_item: None,
            required_flag: Some((DEFAULT_RESIDENT_ID.to_string(), "warmed_up".to_string())),
            action: EventAction::StartDialog {
                character_id: DEFAULT_RESIDENT_ID.to_string(),
                node_id: format!("{DEFAULT_RESIDENT_ID}_greeting"),
            },
            repeatable: false,
        },
    ];
}
