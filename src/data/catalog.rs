//! Built-in shop catalog.

use crate::shared::*;

pub fn populate_catalog(catalog: &mut ShopCatalog) {
    catalog.items = vec![
        ShopItem {
            id: TOOL_ADVANCED_LOCKPICK.to_string(),
            name: "Advanced Lockpick Set".to_string(),
            price: 150,
            description: "Wider sweet-spot tolerance. Makes lock picking easier.".to_string(),
            kind: ShopItemKind::Tool,
        },
        ShopItem {
            id: "flashlight".to_string(),
            name: "Tactical Flashlight".to_string(),
            price: 100,
            description: "Better visibility during night work.".to_string(),
            kind: ShopItemKind::Tool,
        },
        ShopItem {
            id: "tension_wrench".to_string(),
            name: "Titanium Tension Wrench".to_string(),
            price: 200,
            description: "Keeps picks from snapping under pressure.".to_string(),
            kind: ShopItemKind::Tool,
        },
        ShopItem {
            id: TOOL_KEY_COPIER.to_string(),
            name: "Key Impression Kit".to_string(),
            price: 300,
            description: "Copy a client's key during a day visit.".to_string(),
            kind: ShopItemKind::Tool,
        },
        ShopItem {
            id: "skeleton_key".to_string(),
            name: "Skeleton Key".to_string(),
            price: 500,
            description: "Opens simple locks outright. Single use.".to_string(),
            kind: ShopItemKind::Consumable,
        },
        ShopItem {
            id: ITEM_COFFEE.to_string(),
            name: "Strong Coffee".to_string(),
            price: 20,
            description: "One extra action when the evening budget resets.".to_string(),
            kind: ShopItemKind::Consumable,
        },
        ShopItem {
            id: ITEM_STUDY_NOTES.to_string(),
            name: "Annotated Study Notes".to_string(),
            price: 40,
            description: "Boosts the next tutoring session.".to_string(),
            kind: ShopItemKind::Consumable,
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut catalog = ShopCatalog::default();
        populate_catalog(&mut catalog);
        let mut ids: Vec<&str> = catalog.items.iter().map(|i| i.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.items.len());
    }

    #[test]
    fn test_boost_items_are_consumables() {
        let mut catalog = ShopCatalog::default();
        populate_catalog(&mut catalog);
        assert_eq!(catalog.get(ITEM_COFFEE).unwrap().kind, ShopItemKind::Consumable);
        assert_eq!(
            catalog.get(ITEM_STUDY_NOTES).unwrap().kind,
            ShopItemKind::Consumable
        );
        assert_eq!(
            catalog.get(TOOL_ADVANCED_LOCKPICK).unwrap().kind,
            ShopItemKind::Tool
        );
    }
}
