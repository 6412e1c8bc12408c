//! Built-in job board: the houses, their residents, and their access
//! routes. Success chances are per attempt; difficulty feeds the
//! lock-pick pin count and tolerance.

use crate::shared::*;

pub fn populate_houses(registry: &mut HouseRegistry) {
    let houses = vec![
        HouseDef {
            id: "willow_lane".to_string(),
            name: "The Voss House".to_string(),
            address: "14 Willow Lane".to_string(),
            resident: DEFAULT_RESIDENT_ID.to_string(),
            resident_name: "Mara".to_string(),
            lock_difficulty: 1,
            money_reward: 100,
            entry_points: vec![
                EntryPointDef {
                    kind: EntryKind::Window,
                    name: "Kitchen Window".to_string(),
                    base_chance: 0.7,
                },
                EntryPointDef {
                    kind: EntryKind::BackDoor,
                    name: "Back Door".to_string(),
                    base_chance: 0.5,
                },
                EntryPointDef {
                    kind: EntryKind::Padlock,
                    name: "Cellar Padlock".to_string(),
                    base_chance: 0.6,
                },
            ],
        },
        HouseDef {
            id: "maple_court".to_string(),
            name: "The Brandt Place".to_string(),
            address: "3 Maple Court".to_string(),
            resident: "vera".to_string(),
            resident_name: "Vera".to_string(),
            lock_difficulty: 3,
            money_reward: 220,
            entry_points: vec![
                EntryPointDef {
                    kind: EntryKind::Window,
                    name: "Balcony Window".to_string(),
                    base_chance: 0.55,
                },
                EntryPointDef {
                    kind: EntryKind::Skylight,
                    name: "Attic Skylight".to_string(),
                    base_chance: 0.4,
                },
                EntryPointDef {
                    kind: EntryKind::BackDoor,
                    name: "Garden Door".to_string(),
                    base_chance: 0.5,
                },
            ],
        },
    ];

    for house in houses {
        registry.order.push(house.id.clone());
        registry.houses.insert(house.id.clone(), house);
    }
}
