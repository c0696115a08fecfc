//! Repository modules for every persisted Qualis record.
//!
//! Each module adds methods to `QualisService` via `impl QualisService` blocks.

pub mod collector;
pub mod component;
pub mod config_change;
pub mod project;
pub mod snapshot;
