//! Engine composition: one element store, two interaction engines, one
//! compiled stylesheet.
//!
//! `EngineCore` is what a host talks to. Every input method returns the
//! [`Action`]s the host should carry out. Whenever an event actually changes
//! the elements or the layout configuration, the stylesheet is recompiled
//! before the method returns, so [`EngineCore::output`] is never stale.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, trace};

use crate::canvas::CanvasEngine;
use crate::compiler::compile_with;
use crate::config::EditorConfig;
use crate::doc::{Element, ElementId, ElementPatch, ElementStore, LoadError, Snapshot};
use crate::geom::{Point, Viewport};
use crate::hit::{HitPart, hit_test};
use crate::input::{EditSession, Gesture, Key, ReorderState};
use crate::layout::{LayoutConfig, LayoutMode, LayoutProperty};
use crate::order_list::{DragPayload, OrderListEngine, RowState};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId, fields: ElementPatch },
    ElementRemoved { id: ElementId },
    Reordered { id: ElementId, from: usize, to: usize },
    EditStarted { id: ElementId, text: String },
    EditEnded { id: ElementId },
    LayoutChanged(LayoutConfig),
    /// The compiled stylesheet text changed.
    OutputChanged,
    SetCursor(String),
    RenderNeeded,
}

impl Action {
    /// Whether this action reports a change to the compiler's inputs.
    #[must_use]
    pub fn changes_document(&self) -> bool {
        matches!(
            self,
            Self::ElementCreated(_)
                | Self::ElementUpdated { .. }
                | Self::ElementRemoved { .. }
                | Self::Reordered { .. }
                | Self::LayoutChanged(_)
        )
    }
}

/// Core engine state. Free of any host dependency so it can be driven from
/// tests, the CLI, or a UI shell alike.
pub struct EngineCore {
    store: ElementStore,
    layout: LayoutConfig,
    canvas: CanvasEngine,
    order: OrderListEngine,
    viewport: Viewport,
    config: EditorConfig,
    output: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let mut core = Self {
            store: ElementStore::new(),
            layout: LayoutConfig::default(),
            canvas: CanvasEngine::new(config.min_size, config.resize_clamp),
            order: OrderListEngine::new(),
            viewport: Viewport::default(),
            config,
            output: String::new(),
        };
        core.recompile();
        core
    }

    // --- Document ---

    /// Append an element with default geometry and return its id.
    pub fn add_element(&mut self) -> ElementId {
        let id = self.store.add(&self.config.element_label);
        debug!(id, "element added");
        self.recompile();
        id
    }

    /// Replace the element collection wholesale.
    ///
    /// # Errors
    ///
    /// Rejects duplicate or out-of-range ids, leaving the collection as it was.
    pub fn load_elements(&mut self, elements: Vec<Element>) -> Result<(), LoadError> {
        self.store.load(elements)?;
        self.recompile();
        Ok(())
    }

    /// Replace the layout configuration wholesale.
    pub fn load_layout(&mut self, layout: LayoutConfig) {
        self.layout = layout;
        self.recompile();
    }

    /// Delete an element. Unknown ids do nothing.
    pub fn remove_element(&mut self, id: ElementId) -> Vec<Action> {
        if self.store.remove(id).is_none() {
            return vec![];
        }
        debug!(id, "element removed");
        let mut actions = vec![Action::ElementRemoved { id }];
        if self.canvas.element_removed(id) {
            actions.push(Action::EditEnded { id });
        }
        self.order.element_removed(id);
        actions.push(Action::RenderNeeded);
        self.settle(actions)
    }

    // --- Layout controls ---

    /// Switch layout mode. Properties of the modes being left go back to
    /// their defaults; element geometry is untouched.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) -> Vec<Action> {
        if !self.layout.set_mode(mode) {
            return vec![];
        }
        debug!(%mode, "layout mode changed");
        self.settle(vec![Action::LayoutChanged(self.layout.clone()), Action::RenderNeeded])
    }

    /// Set one layout property's raw text.
    pub fn set_layout_property(&mut self, property: LayoutProperty, value: impl Into<String>) -> Vec<Action> {
        if !self.layout.set(property, value) {
            return vec![];
        }
        self.settle(vec![Action::LayoutChanged(self.layout.clone()), Action::RenderNeeded])
    }

    // --- Viewport ---

    /// Record where the canvas's top-left corner sits on screen.
    pub fn set_viewport(&mut self, left: f64, top: f64) {
        self.viewport = Viewport::new(left, top);
    }

    // --- Canvas input ---

    /// Pointer pressed on `part` of element `id`.
    pub fn on_pointer_down(&mut self, id: ElementId, part: HitPart, screen_pt: Point) -> Vec<Action> {
        let pt = self.viewport.screen_to_canvas(screen_pt);
        self.canvas.pointer_down(&self.store, id, part, pt)
    }

    /// Pointer pressed somewhere on the canvas; the engine classifies the
    /// target itself. Misses do nothing.
    pub fn on_pointer_down_at(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.viewport.screen_to_canvas(screen_pt);
        match hit_test(pt, self.store.as_slice()) {
            Some(hit) => self.canvas.pointer_down(&self.store, hit.element_id, hit.part, pt),
            None => vec![],
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.viewport.screen_to_canvas(screen_pt);
        let actions = self.canvas.pointer_move(&mut self.store, pt);
        self.settle(actions)
    }

    /// Pointer released anywhere in the document.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.canvas.pointer_up()
    }

    pub fn on_double_click(&mut self, id: ElementId) -> Vec<Action> {
        self.canvas.double_click(&self.store, id)
    }

    /// The inline editor's text changed. Returns false when no edit is open.
    pub fn on_edit_input(&mut self, text: impl Into<String>) -> bool {
        self.canvas.edit_input(text)
    }

    /// The inline editor lost focus.
    pub fn on_edit_blur(&mut self) -> Vec<Action> {
        let actions = self.canvas.commit_edit(&mut self.store);
        self.settle(actions)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let actions = self.canvas.key_down(&mut self.store, key);
        self.settle(actions)
    }

    // --- Order list input ---

    pub fn on_list_drag_start(&mut self, index: usize) -> Option<DragPayload> {
        self.order.drag_start(&self.store, index)
    }

    pub fn on_list_drag_enter(&mut self, index: usize) -> Vec<Action> {
        self.order.drag_enter(&self.store, index)
    }

    #[must_use]
    pub fn on_list_drag_over(&self) -> bool {
        self.order.drag_over()
    }

    pub fn on_list_drop(&mut self, index: usize, payload: &str) -> Vec<Action> {
        let actions = self.order.drop(&mut self.store, index, payload);
        self.settle(actions)
    }

    pub fn on_list_drag_end(&mut self) -> Vec<Action> {
        self.order.drag_end()
    }

    // --- Queries ---

    /// Elements in sequence order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.store.as_slice()
    }

    /// A handle on the current collection unaffected by later events.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// The compiled stylesheet for the current elements and layout.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        self.canvas.gesture()
    }

    #[must_use]
    pub fn edit(&self) -> Option<&EditSession> {
        self.canvas.edit()
    }

    #[must_use]
    pub fn reorder_state(&self) -> ReorderState {
        self.order.state()
    }

    #[must_use]
    pub fn row_state(&self, id: ElementId) -> RowState {
        self.order.row_state(id)
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // --- Derivation ---

    /// Recompile if any action touched the compiler's inputs, reporting
    /// `OutputChanged` when the text differs.
    fn settle(&mut self, mut actions: Vec<Action>) -> Vec<Action> {
        if actions.iter().any(Action::changes_document) && self.recompile() {
            actions.push(Action::OutputChanged);
        }
        actions
    }

    fn recompile(&mut self) -> bool {
        let next = compile_with(&self.config.compile_options(), &self.layout, self.store.as_slice());
        if next == self.output {
            return false;
        }
        trace!(bytes = next.len(), elements = self.store.len(), "stylesheet recompiled");
        self.output = next;
        true
    }
}
