//! Board domain model for the topic outline, priority matrix and recycle bin.
//!
//! # Responsibility
//! - Define canonical data structures owned by the entity store.
//! - Define the persisted snapshot shape shared by store and persistence.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId`.
//! - Serial numbers are derived from position and never stored.
//! - Deletion moves payloads into the recycle bin, never hard-deletes.

pub mod board;
