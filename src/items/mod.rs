//! Item system: types, catalog, inventory, equipment, bonuses and gem sockets.

pub mod bonus;
pub mod catalog;
pub mod equipment;
pub mod gems;
pub mod inventory;
pub mod types;

pub use bonus::{add_random_bonus, reroll_all_bonuses, BonusError};
pub use catalog::*;
pub use equipment::*;
pub use gems::{add_socket, insert_gem, GemError};
pub use inventory::*;
pub use types::*;
