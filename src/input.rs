//! Input model: keys and the per-surface gesture state machines.
//!
//! `Gesture` is the canvas gesture tracked between pointer-down and
//! pointer-up. Drag and resize are variants of one enum, so the two can never
//! be active together. `ReorderState` tracks the order-list drag, which runs
//! on a separate input surface. `EditSession` is the inline text editor.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geom::Point;
use crate::hit::Corner;

/// A keyboard key, holding the key name as reported by the host (e.g. `"Enter"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key confirms an inline edit.
    #[must_use]
    pub fn is_confirm(&self) -> bool {
        self.0 == "Enter"
    }
}

/// Geometry and pointer position captured when a resize begins.
///
/// Every move recomputes the element from this snapshot rather than from the
/// previous move, so rounding never accumulates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeAnchor {
    /// Canvas-space pointer position at pointer-down.
    pub pointer: Point,
    /// Element x at pointer-down.
    pub x: f64,
    /// Element y at pointer-down.
    pub y: f64,
    /// Element width at pointer-down.
    pub width: f64,
    /// Element height at pointer-down.
    pub height: f64,
}

/// Active canvas gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an element.
    Dragging {
        /// Id of the element being dragged.
        id: ElementId,
        /// Pointer minus element top-left at pointer-down, in canvas space.
        offset: Point,
    },
    /// The user is resizing an element by one of its corner handles.
    Resizing {
        /// Id of the element being resized.
        id: ElementId,
        /// Which corner handle is held.
        corner: Corner,
        /// Snapshot taken at pointer-down.
        anchor: ResizeAnchor,
    },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The element the gesture targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(*id),
        }
    }
}

/// Inline content editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Element whose content is being edited.
    pub id: ElementId,
    /// Uncommitted text.
    pub buffer: String,
}

/// Order-list drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReorderState {
    /// Element picked up at drag start.
    pub dragging: Option<ElementId>,
    /// Row currently hovered, when it differs from the dragged one.
    pub hover: Option<ElementId>,
}

impl ReorderState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.dragging.is_some()
    }
}
