//! Stonefall - simulation and progression core for a real-time action RPG.
//!
//! The crate owns everything between raw input and the renderer: a spatial
//! grid for range queries and culling, a frame gate, pooled particles, melee
//! combat, equipment stats, leveling, item upgrades, affixes, gem sockets,
//! weighted chests and timed respawns with a boss state machine.
//!
//! [`core::world::World`] ties these together behind a single `tick` call.
//! Rendering, audio, storage and notifications stay with the host.

pub mod character;
pub mod combat;
pub mod core;
pub mod enhancement;
pub mod items;
pub mod loot;
pub mod pool;
pub mod spatial;

pub use crate::core::config::EngineConfig;
pub use crate::core::events::{InputEvent, Notification, NotificationSink, NullSink, RecordingSink};
pub use crate::core::world::{ActionError, TickReport, World};
