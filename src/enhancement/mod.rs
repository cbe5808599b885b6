//! Item plus-level upgrades: rate tables, material requirements and attempts.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
