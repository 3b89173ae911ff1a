//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage-slot contract used by board persistence.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - A slot holds at most one payload; writes overwrite.
//! - Repository APIs surface DB transport errors unchanged.

pub mod snapshot_repo;
