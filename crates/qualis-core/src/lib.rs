//! # qualis-core
//!
//! Core types, ID prefixes, and error types for Qualis.
//!
//! This crate provides the foundational types shared across all Qualis crates:
//! - Entity structs for the persisted record set (collectors, projects,
//!   quality snapshots, config-change records, dashboard components)
//! - Collector kind and config-change operation enums
//! - The `ServerListProvider` capability used by the reconciliation engine
//! - ID prefix constants
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod servers;
