//! Presentation-neutral projection of the board.
//!
//! # Responsibility
//! - Rebuild the outline, priority matrix and recycle bin from state.
//! - Provide drag insertion geometry for presentation layers.
//!
//! # Invariants
//! - Rendering is pure: same board and config yield the same view.
//! - Every render is a full rebuild; no diffing against a previous view.

pub mod drag;
pub mod render;
