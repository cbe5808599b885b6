//! The player character: stats, experience and snapshots.

pub mod actor;
pub mod experience;
pub mod save;

pub use actor::*;
pub use experience::*;
pub use save::*;
