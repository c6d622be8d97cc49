//! Task store orchestration.
//!
//! # Responsibility
//! - Own the in-memory list and keep the persistence slot mirrored.
//! - Expose every mutation and query a presentation layer may call.

pub mod task_store;
