//! Board use-case services.
//!
//! # Responsibility
//! - Own the authoritative board state and its mutation rules.
//! - Bridge board state to snapshot persistence.
//! - Translate user gestures into store mutations plus render/save passes.

pub mod board_store;
pub mod controller;
pub mod persistence;
