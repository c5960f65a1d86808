//! Order-list engine: drag-and-drop reordering of the element sequence.
//!
//! DESIGN
//! ======
//! The list speaks the native drag protocol: drag start hands the host a text
//! payload carrying the source row index, and drop hands it back. The index is
//! only a hint. Between start and drop the collection may change (an element
//! removed from the canvas, say), so the drop resolves the dragged element by
//! the id recorded at start and reads its index fresh.

#[cfg(test)]
#[path = "order_list_test.rs"]
mod order_list_test;

use tracing::debug;

use crate::doc::{ElementId, ElementStore};
use crate::engine::Action;
use crate::input::ReorderState;

/// Transfer type used for the drag payload.
pub const PAYLOAD_MIME: &str = "text/plain";

/// Data placed on the native drag transfer at drag start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    /// Transfer type, always [`PAYLOAD_MIME`].
    pub mime: &'static str,
    /// Source row index as decimal text.
    pub data: String,
}

impl DragPayload {
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self { mime: PAYLOAD_MIME, data: index.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("drag payload is empty")]
    Empty,
    #[error("drag payload is not a row index: {0:?}")]
    InvalidIndex(String),
}

/// Read the source row index out of raw transfer text.
///
/// # Errors
///
/// Returns [`PayloadError::Empty`] for blank text and
/// [`PayloadError::InvalidIndex`] for anything that isn't an unsigned integer.
pub fn parse_payload(data: &str) -> Result<usize, PayloadError> {
    let trimmed = data.trim();
    if trimmed.is_empty() {
        return Err(PayloadError::Empty);
    }
    trimmed.parse().map_err(|_| PayloadError::InvalidIndex(trimmed.to_owned()))
}

/// Per-row visual state for the list renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowState {
    /// This row is the one being dragged.
    pub dragging: bool,
    /// This row is under the dragged one.
    pub hover: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OrderListEngine {
    state: ReorderState,
}

impl OrderListEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ReorderState {
        self.state
    }

    /// Visual state of the row showing element `id`.
    #[must_use]
    pub fn row_state(&self, id: ElementId) -> RowState {
        RowState { dragging: self.state.dragging == Some(id), hover: self.state.hover == Some(id) }
    }

    /// Pick up the row at `index`. Returns the payload to place on the
    /// transfer, or `None` if the index is out of range.
    pub fn drag_start(&mut self, store: &ElementStore, index: usize) -> Option<DragPayload> {
        let el = store.at(index)?;
        debug!(id = el.id, index, "reorder start");
        self.state = ReorderState { dragging: Some(el.id), hover: None };
        Some(DragPayload::from_index(index))
    }

    /// The dragged row entered the row at `index`.
    pub fn drag_enter(&mut self, store: &ElementStore, index: usize) -> Vec<Action> {
        let Some(dragging) = self.state.dragging else {
            return vec![];
        };
        let Some(el) = store.at(index) else {
            return vec![];
        };
        if el.id == dragging || self.state.hover == Some(el.id) {
            return vec![];
        }
        self.state.hover = Some(el.id);
        vec![Action::RenderNeeded]
    }

    /// Whether a drop over the list should be accepted. Hosts call this from
    /// their drag-over handler and cancel the default when it returns true.
    #[must_use]
    pub fn drag_over(&self) -> bool {
        self.state.is_active()
    }

    /// Drop the dragged element on the row at `drop_index`.
    ///
    /// The element is removed from its current position and reinserted at
    /// `drop_index`, interpreted after the removal. Transient state is cleared
    /// whatever the outcome.
    pub fn drop(&mut self, store: &mut ElementStore, drop_index: usize, payload: &str) -> Vec<Action> {
        let state = std::mem::take(&mut self.state);
        let Some(id) = state.dragging else {
            return vec![];
        };
        let Some(from) = store.index_of(id) else {
            debug!(id, "reorder target gone; drop ignored");
            return vec![Action::RenderNeeded];
        };
        match parse_payload(payload) {
            Ok(hint) if hint != from => debug!(id, hint, from, "payload index is stale"),
            Ok(_) => {}
            Err(e) => debug!(id, error = %e, "ignoring drag payload"),
        }

        let before = store.ids();
        store.relocate(from, drop_index);
        let to = store.index_of(id).unwrap_or(from);
        if store.ids() == before {
            return vec![Action::RenderNeeded];
        }
        debug!(id, from, to, "reordered");
        vec![Action::Reordered { id, from, to }, Action::RenderNeeded]
    }

    /// The native drag finished (after a drop or a cancel).
    pub fn drag_end(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.state);
        if state.is_active() || state.hover.is_some() {
            return vec![Action::RenderNeeded];
        }
        vec![]
    }

    /// Forget a removed element if it was part of the drag.
    pub fn element_removed(&mut self, id: ElementId) {
        if self.state.hover == Some(id) {
            self.state.hover = None;
        }
    }
}
