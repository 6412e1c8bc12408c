//! Online supply shop, reached from the apartment laptop.
//!
//! Tools are one-time purchases that land in `unlocked_tools`;
//! consumables stack in the inventory. Spending is clamped: an
//! unaffordable purchase is refused and money never goes negative.

use bevy::prelude::*;

use crate::shared::*;

use super::{row_region, Interaction, SceneInteractions, SceneStatus};

pub fn handle_shop(
    mut events: EventReader<InteractionEvent>,
    mut player: ResMut<PlayerState>,
    catalog: Res<ShopCatalog>,
    mut status: ResMut<SceneStatus>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for ev in events.read() {
        if ev.id == "shop:leave" {
            next_state.set(AppState::Apartment);
            continue;
        }
        let Some(item_id) = ev.id.strip_prefix("shop:buy:") else {
            continue;
        };
        let Some(item) = catalog.get(item_id).cloned() else {
            continue;
        };

        if item.kind == ShopItemKind::Tool && player.has_tool(&item.id) {
            status.set(format!("You already own the {}.", item.name));
            continue;
        }
        if !player.spend_money(item.price) {
            status.set(format!("Not enough money for the {}.", item.name));
            continue;
        }
        match item.kind {
            ShopItemKind::Tool => player.unlock_tool(&item.id),
            ShopItemKind::Consumable => player.inventory.push(item.id.clone()),
        }
        info!("[Shop] Bought '{}' for ${}", item.id, item.price);
        status.set(format!("Bought: {}", item.name));
    }
}

pub fn rebuild_shop(
    player: Res<PlayerState>,
    catalog: Res<ShopCatalog>,
    mut interactions: ResMut<SceneInteractions>,
) {
    let mut items = Vec::new();
    for (row, entry) in catalog.items.iter().enumerate() {
        let owned = entry.kind == ShopItemKind::Tool && player.has_tool(&entry.id);
        let label = if owned {
            format!("{} [OWNED]", entry.name)
        } else {
            format!("{} — ${}", entry.name, entry.price)
        };
        let interaction =
            Interaction::new(format!("shop:buy:{}", entry.id), label, row_region(row));
        items.push(if owned || player.money < entry.price {
            interaction.disabled()
        } else {
            interaction
        });
    }
    items.push(Interaction::new(
        "shop:leave",
        "Close the laptop",
        row_region(catalog.items.len()),
    ));
    interactions.items = items;
}
