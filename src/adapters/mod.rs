//! Infrastructure adapters for external systems.

pub mod cache;
pub mod memory;
pub mod signal;
pub mod sqlite;
