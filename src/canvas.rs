//! Canvas interaction engine: drag, resize, and inline content editing.
//!
//! The engine owns only transient state (the active [`Gesture`] and the
//! optional [`EditSession`]). Element data lives in the shared
//! [`ElementStore`], passed in on every call, so the order-list engine can
//! work on the same collection between canvas events. All points given to
//! this engine are in canvas coordinates.

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use tracing::{debug, trace};

use crate::config::ResizeClamp;
use crate::consts::MIN_ELEMENT_SIZE;
use crate::doc::{ElementId, ElementPatch, ElementStore};
use crate::engine::Action;
use crate::geom::Point;
use crate::hit::{Corner, HitPart};
use crate::input::{EditSession, Gesture, Key, ResizeAnchor};

/// Cursor shown over an element body while no gesture is active.
pub const CURSOR_IDLE: &str = "grab";
/// Cursor shown while an element is being dragged.
pub const CURSOR_DRAGGING: &str = "grabbing";

/// Axis-aligned geometry produced by a resize step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Geometry of an element resized from `anchor` with the pointer now at
/// `pointer`.
///
/// Corners on the left or top edge move that edge by the pointer delta and
/// shrink the size by the same amount, so the opposite edge stays put. Size
/// is floored at `min_size`. With [`ResizeClamp::SizeOnly`] the position still
/// follows the raw delta once the floor kicks in; [`ResizeClamp::PinEdge`]
/// re-derives it from the floored size.
#[must_use]
pub fn resize_geometry(corner: Corner, anchor: &ResizeAnchor, pointer: Point, min_size: f64, clamp: ResizeClamp) -> Rect {
    let delta = pointer.sub(anchor.pointer);
    let (mut x, mut y) = (anchor.x, anchor.y);
    let (mut width, mut height) = (anchor.width, anchor.height);

    if corner.moves_left() {
        width -= delta.x;
        x += delta.x;
    } else {
        width += delta.x;
    }
    if corner.moves_top() {
        height -= delta.y;
        y += delta.y;
    } else {
        height += delta.y;
    }

    let width = width.max(min_size);
    let height = height.max(min_size);
    if clamp == ResizeClamp::PinEdge {
        if corner.moves_left() {
            x = anchor.x + anchor.width - width;
        }
        if corner.moves_top() {
            y = anchor.y + anchor.height - height;
        }
    }
    Rect { x, y, width, height }
}

/// Pointer-driven gesture state machine for the canvas surface.
#[derive(Debug, Clone)]
pub struct CanvasEngine {
    gesture: Gesture,
    edit: Option<EditSession>,
    min_size: f64,
    clamp: ResizeClamp,
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new(MIN_ELEMENT_SIZE, ResizeClamp::default())
    }
}

impl CanvasEngine {
    #[must_use]
    pub fn new(min_size: f64, clamp: ResizeClamp) -> Self {
        Self { gesture: Gesture::Idle, edit: None, min_size, clamp }
    }

    // --- Queries ---

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    #[must_use]
    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Id of the element whose content is being edited, if any.
    #[must_use]
    pub fn editing(&self) -> Option<ElementId> {
        self.edit.as_ref().map(|e| e.id)
    }

    // --- Pointer ---

    /// Begin a gesture according to what was pressed.
    ///
    /// Bodies start a drag, corner handles start a resize. Buttons and the
    /// inline edit input never start a gesture. A press on an element that no
    /// longer exists does nothing.
    pub fn pointer_down(&mut self, store: &ElementStore, id: ElementId, part: HitPart, pt: Point) -> Vec<Action> {
        let Some(el) = store.get(id) else {
            return vec![];
        };
        match part {
            HitPart::Body => {
                let offset = pt.sub(Point::new(el.x, el.y));
                debug!(id, offset_x = offset.x, offset_y = offset.y, "drag start");
                self.gesture = Gesture::Dragging { id, offset };
                vec![Action::SetCursor(CURSOR_DRAGGING.to_owned())]
            }
            HitPart::ResizeHandle(corner) => {
                let anchor = ResizeAnchor { pointer: pt, x: el.x, y: el.y, width: el.width, height: el.height };
                debug!(id, %corner, "resize start");
                self.gesture = Gesture::Resizing { id, corner, anchor };
                vec![Action::SetCursor(corner.cursor().to_owned())]
            }
            HitPart::Button | HitPart::TextInput => vec![],
        }
    }

    /// Apply a pointer move to the element under the active gesture.
    pub fn pointer_move(&mut self, store: &mut ElementStore, pt: Point) -> Vec<Action> {
        let (id, patch) = match self.gesture {
            Gesture::Idle => return vec![],
            Gesture::Dragging { id, offset } => {
                let pos = pt.sub(offset);
                (id, ElementPatch::position(pos.x, pos.y))
            }
            Gesture::Resizing { id, corner, anchor } => {
                let r = resize_geometry(corner, &anchor, pt, self.min_size, self.clamp);
                (id, ElementPatch::geometry(r.x, r.y, r.width, r.height))
            }
        };

        if !store.apply_patch(id, &patch) {
            trace!(id, "gesture target missing; move ignored");
            return vec![];
        }
        trace!(id, ?patch, "gesture move");
        vec![Action::ElementUpdated { id, fields: patch }, Action::RenderNeeded]
    }

    /// End whatever gesture is active.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        let ended = std::mem::take(&mut self.gesture);
        match ended.target() {
            Some(id) => {
                debug!(id, "gesture end");
                vec![Action::SetCursor(CURSOR_IDLE.to_owned())]
            }
            None => vec![],
        }
    }

    // --- Inline edit ---

    /// Open the inline editor on an element, seeded with its content.
    pub fn double_click(&mut self, store: &ElementStore, id: ElementId) -> Vec<Action> {
        let Some(el) = store.get(id) else {
            return vec![];
        };
        debug!(id, "edit start");
        self.edit = Some(EditSession { id, buffer: el.content.clone() });
        vec![Action::EditStarted { id, text: el.content.clone() }]
    }

    /// Replace the uncommitted edit text. Returns false when not editing.
    pub fn edit_input(&mut self, text: impl Into<String>) -> bool {
        match self.edit.as_mut() {
            Some(session) => {
                session.buffer = text.into();
                true
            }
            None => false,
        }
    }

    /// Write the edit buffer into the element and close the editor.
    pub fn commit_edit(&mut self, store: &mut ElementStore) -> Vec<Action> {
        let Some(EditSession { id, buffer }) = self.edit.take() else {
            return vec![];
        };
        let patch = ElementPatch::content(buffer);
        let mut actions = Vec::new();
        if store.apply_patch(id, &patch) {
            debug!(id, "edit committed");
            actions.push(Action::ElementUpdated { id, fields: patch });
            actions.push(Action::RenderNeeded);
        }
        actions.push(Action::EditEnded { id });
        actions
    }

    /// Key handling while the inline editor is open: the confirm key commits.
    pub fn key_down(&mut self, store: &mut ElementStore, key: &Key) -> Vec<Action> {
        if self.edit.is_some() && key.is_confirm() {
            return self.commit_edit(store);
        }
        vec![]
    }

    /// Forget edit state for an element that was just removed.
    ///
    /// Returns true if the removed element was being edited. Gesture state is
    /// left alone; later moves find no target and do nothing.
    pub fn element_removed(&mut self, id: ElementId) -> bool {
        if self.editing() == Some(id) {
            self.edit = None;
            return true;
        }
        false
    }
}
