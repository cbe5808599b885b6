//! Melee hitboxes, the damage formula and combo timing.

pub mod hitbox;
pub mod logic;
pub mod types;

pub use hitbox::*;
pub use logic::*;
pub use types::*;
