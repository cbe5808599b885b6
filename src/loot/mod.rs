//! Chest tables, spawn scheduling and boss behavior.

pub mod boss;
pub mod chest;
pub mod spawn;

pub use boss::*;
pub use chest::*;
pub use spawn::*;
