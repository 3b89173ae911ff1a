//! Drag-over insertion geometry.
//!
//! Presentation layers hand in the vertical boxes of the siblings that are
//! not being dragged, in display order, and get back the index the dragged
//! item should be inserted before.

/// Vertical extent of one sibling on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingBox {
    pub top: f64,
    pub height: f64,
}

impl SiblingBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Returns the index of the nearest sibling whose midpoint lies below
/// `cursor_y`, or `None` when the item should be appended.
pub fn insertion_point(siblings: &[SiblingBox], cursor_y: f64) -> Option<usize> {
    siblings
        .iter()
        .enumerate()
        .map(|(index, sibling)| (index, cursor_y - sibling.midpoint()))
        .filter(|(_, offset)| *offset < 0.0)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(index, _)| index)
}
