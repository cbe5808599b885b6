//! Gem sockets on weapons and body armor.

use super::inventory::Inventory;
use super::types::{GemKind, Item, ItemCategory, Socket};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GemError {
    #[error("{category:?} items cannot hold gem sockets")]
    NotSocketable { category: ItemCategory },

    #[error("Item already has the maximum of {cap} sockets")]
    SocketCapReached { cap: usize },

    #[error("Socket {index} does not exist")]
    NoSuchSocket { index: usize },

    #[error("Socket {index} already holds a gem")]
    SocketFilled { index: usize },

    #[error("{gem:?} gems only fit {expected:?} items")]
    WrongArchetype { gem: GemKind, expected: ItemCategory },

    #[error("Item already holds a {gem:?} gem")]
    DuplicateGem { gem: GemKind },

    #[error("No {gem:?} gem in inventory")]
    GemMissing { gem: GemKind },
}

/// Opens one more empty socket. The caller pays the diamond.
pub fn add_socket(item: &Item) -> Result<Item, GemError> {
    let cap = item.category.socket_cap();
    if cap == 0 {
        return Err(GemError::NotSocketable {
            category: item.category,
        });
    }
    if item.gem_slots.len() >= cap {
        return Err(GemError::SocketCapReached { cap });
    }
    let mut updated = item.clone();
    updated.gem_slots.push(Socket::default());
    Ok(updated)
}

/// Checks every precondition of `insert_gem` except inventory stock.
pub fn can_insert_gem(item: &Item, socket_index: usize, gem: GemKind) -> Result<(), GemError> {
    if item.category.socket_cap() == 0 {
        return Err(GemError::NotSocketable {
            category: item.category,
        });
    }
    let socket = item
        .gem_slots
        .get(socket_index)
        .ok_or(GemError::NoSuchSocket {
            index: socket_index,
        })?;
    if socket.gem.is_some() {
        return Err(GemError::SocketFilled {
            index: socket_index,
        });
    }
    if gem.target_category() != item.category {
        return Err(GemError::WrongArchetype {
            gem,
            expected: gem.target_category(),
        });
    }
    if item.has_gem(gem) {
        return Err(GemError::DuplicateGem { gem });
    }
    Ok(())
}

/// Sockets `gem` into `socket_index`, consuming one gem from `inventory`.
/// On error neither the item nor the inventory changes.
pub fn insert_gem(
    item: &Item,
    socket_index: usize,
    gem: GemKind,
    inventory: &mut Inventory,
) -> Result<Item, GemError> {
    can_insert_gem(item, socket_index, gem)?;
    inventory
        .remove(gem.item_id(), 1)
        .map_err(|_| GemError::GemMissing { gem })?;

    let mut updated = item.clone();
    updated.gem_slots[socket_index].gem = Some(gem);
    tracing::debug!(item = %updated.id, ?gem, socket_index, "gem inserted");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog::template;
    use crate::items::types::MAX_SOCKETS;

    fn item(template_id: &str) -> Item {
        template(template_id).unwrap().instantiate("test".to_string())
    }

    fn stocked(gems: &[GemKind]) -> Inventory {
        let mut inv = Inventory::new(20);
        for gem in gems {
            inv.add(template(gem.item_id()).unwrap().instantiate(gem.item_id().to_string()))
                .unwrap();
        }
        inv
    }

    fn socketed(template_id: &str, sockets: usize) -> Item {
        let mut it = item(template_id);
        for _ in 0..sockets {
            it = add_socket(&it).unwrap();
        }
        it
    }

    #[test]
    fn test_socket_cap() {
        let sword = socketed("full-moon-sword", MAX_SOCKETS);
        assert_eq!(sword.gem_slots.len(), 3);
        assert_eq!(
            add_socket(&sword),
            Err(GemError::SocketCapReached { cap: 3 })
        );
    }

    #[test]
    fn test_accessories_not_socketable() {
        assert!(matches!(
            add_socket(&item("jade-necklace")),
            Err(GemError::NotSocketable { .. })
        ));
    }

    #[test]
    fn test_insert_consumes_gem_and_adds_stats() {
        let sword = socketed("full-moon-sword", 1);
        let mut inv = stocked(&[GemKind::Attack]);
        let before = sword.effective_stats();

        let updated = insert_gem(&sword, 0, GemKind::Attack, &mut inv).unwrap();
        assert_eq!(updated.gem_slots[0].gem, Some(GemKind::Attack));
        assert_eq!(inv.count("gem-attack"), 0);
        assert_eq!(updated.effective_stats().min_attack, before.min_attack + 10);
    }

    #[test]
    fn test_filled_socket_rejects_second_gem() {
        let sword = socketed("full-moon-sword", 1);
        let mut inv = stocked(&[GemKind::Attack, GemKind::Critical]);
        let sword = insert_gem(&sword, 0, GemKind::Attack, &mut inv).unwrap();
        assert_eq!(
            insert_gem(&sword, 0, GemKind::Critical, &mut inv),
            Err(GemError::SocketFilled { index: 0 })
        );
        assert_eq!(inv.count("gem-critical"), 1);
    }

    #[test]
    fn test_duplicate_gem_rejected() {
        let sword = socketed("full-moon-sword", 2);
        let mut inv = stocked(&[GemKind::Monster, GemKind::Monster]);
        let sword = insert_gem(&sword, 0, GemKind::Monster, &mut inv).unwrap();
        assert_eq!(
            insert_gem(&sword, 1, GemKind::Monster, &mut inv),
            Err(GemError::DuplicateGem {
                gem: GemKind::Monster
            })
        );
        assert_eq!(inv.count("gem-monster"), 1);
    }

    #[test]
    fn test_archetype_mismatch() {
        let armor = socketed("iron-plate", 1);
        let mut inv = stocked(&[GemKind::Critical]);
        assert!(matches!(
            insert_gem(&armor, 0, GemKind::Critical, &mut inv),
            Err(GemError::WrongArchetype { .. })
        ));
        let sword = socketed("full-moon-sword", 1);
        assert!(matches!(
            insert_gem(&sword, 0, GemKind::Vitality, &mut inv),
            Err(GemError::WrongArchetype { .. })
        ));
    }

    #[test]
    fn test_missing_gem_or_socket() {
        let sword = socketed("full-moon-sword", 1);
        let mut empty = Inventory::new(5);
        assert_eq!(
            insert_gem(&sword, 0, GemKind::Attack, &mut empty),
            Err(GemError::GemMissing {
                gem: GemKind::Attack
            })
        );
        assert_eq!(
            insert_gem(&sword, 2, GemKind::Attack, &mut empty),
            Err(GemError::NoSuchSocket { index: 2 })
        );
    }
}
