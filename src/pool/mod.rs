//! Bounded reusable storage for per-frame transient records.

pub mod object_pool;
pub mod particles;

pub use object_pool::*;
pub use particles::*;
