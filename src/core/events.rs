//! Plain data exchanged with the presentation layer.

use super::Vec2;
use crate::items::{EquipmentSlot, Item};
use serde::{Deserialize, Serialize};

/// Discrete input produced by the host's input layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Start or keep walking in this direction (need not be normalized).
    Move(Vec2),
    Stop,
    Attack,
    /// Equip an inventory item into its slot.
    Equip { item_id: String },
    Unequip(EquipmentSlot),
    /// Throw an inventory item away.
    Drop { item_id: String },
}

/// Fire-and-forget messages for the host's toast/notification layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    LootAcquired { item_id: String, name: String },
    YangAcquired { amount: u64 },
    LevelUp { level: u32, display_ms: u64 },
    UpgradeFailed { item_name: String, reason: String },
    InventoryFull { item_name: String },
}

pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notification: Notification) {}
}

/// Keeps every notification in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub received: Vec<Notification>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}

impl Notification {
    pub fn loot(item: &Item) -> Self {
        Notification::LootAcquired {
            item_id: item.id.clone(),
            name: item.display_name.clone(),
        }
    }
}
