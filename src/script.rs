//! Scripted input sessions.
//!
//! A script is a JSON document holding an optional starting design and a list
//! of input steps, each named by its `op`. [`Session`] plays steps against an
//! engine mounted on a [`DocumentListeners`] hub, so pointer-up travels the
//! same document-wide path a UI host would use.
//!
//! ```json
//! {
//!   "layout": { "mode": "flex" },
//!   "steps": [
//!     { "op": "add" },
//!     { "op": "pointer_down", "id": 1, "part": "body", "x": 20, "y": 20 },
//!     { "op": "pointer_move", "x": 80, "y": 40 },
//!     { "op": "pointer_up" }
//!   ]
//! }
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EditorConfig;
use crate::doc::{Element, ElementId, LoadError, validate_ids};
use crate::engine::{Action, EngineCore};
use crate::geom::Point;
use crate::hit::HitPart;
use crate::input::Key;
use crate::layout::{LayoutConfig, LayoutMode, LayoutProperty};
use crate::listener::{CanvasMount, DocumentListeners};
use crate::order_list::DragPayload;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {step}: `part` given without `id`")]
    PartWithoutId { step: usize },
    #[error("step {step}: no order-list row at index {index}")]
    NoSuchRow { step: usize, index: usize },
    #[error("invalid design: {0}")]
    Design(#[from] LoadError),
}

/// A layout configuration plus the elements it lays out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Design {
    /// Check element ids without loading anything.
    ///
    /// # Errors
    ///
    /// Duplicate or out-of-range ids.
    pub fn validate(&self) -> Result<(), LoadError> {
        validate_ids(&self.elements)?;
        Ok(())
    }
}

/// One scripted input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Add,
    Remove {
        id: ElementId,
    },
    Viewport {
        left: f64,
        top: f64,
    },
    /// Press at screen `(x, y)`. Without `id` the engine hit-tests; with `id`
    /// the step names the target itself (`part` defaults to the body).
    PointerDown {
        #[serde(default)]
        id: Option<ElementId>,
        #[serde(default)]
        part: Option<HitPart>,
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    /// Release anywhere in the document.
    PointerUp {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    DoubleClick {
        id: ElementId,
    },
    EditInput {
        text: String,
    },
    EditBlur,
    KeyDown {
        key: String,
    },
    SetMode {
        mode: LayoutMode,
    },
    SetProperty {
        property: LayoutProperty,
        value: String,
    },
    ListDragStart {
        index: usize,
    },
    ListDragEnter {
        index: usize,
    },
    /// Drop on row `index`. Without `payload` the one produced by the last
    /// drag start is used.
    ListDrop {
        index: usize,
        #[serde(default)]
        payload: Option<String>,
    },
    ListDragEnd,
}

/// A full script: starting design and steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(flatten)]
    pub design: Design,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Json`] if the text is not a valid script.
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Counts gathered while replaying a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    pub actions: usize,
    pub output_changes: usize,
}

/// An engine mounted on a document, driven step by step.
pub struct Session {
    engine: Rc<RefCell<EngineCore>>,
    document: DocumentListeners,
    mount: CanvasMount,
    last_payload: Option<DragPayload>,
}

impl Session {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let engine = Rc::new(RefCell::new(EngineCore::with_config(config)));
        let document = DocumentListeners::new();
        let mount = CanvasMount::new(Rc::clone(&engine), &document);
        Self { engine, document, mount, last_payload: None }
    }

    /// Borrow the engine for queries.
    #[must_use]
    pub fn engine(&self) -> Ref<'_, EngineCore> {
        self.engine.borrow()
    }

    /// Load the starting design, then play every step.
    ///
    /// # Errors
    ///
    /// Stops at the first step that cannot be applied.
    pub fn run(&mut self, script: &Script) -> Result<ReplayReport, ScriptError> {
        self.load(&script.design)?;
        let mut report = ReplayReport::default();
        for (i, step) in script.steps.iter().enumerate() {
            let actions = self.apply(i, step)?;
            report.steps += 1;
            report.actions += actions.len();
            report.output_changes += actions.iter().filter(|a| matches!(a, Action::OutputChanged)).count();
        }
        debug!(steps = report.steps, actions = report.actions, "script replayed");
        Ok(report)
    }

    /// Replace the engine's layout and elements with `design`.
    ///
    /// # Errors
    ///
    /// [`ScriptError::Design`] if the elements can't be loaded; the engine is
    /// then left untouched.
    pub fn load(&mut self, design: &Design) -> Result<(), ScriptError> {
        let mut core = self.engine.borrow_mut();
        core.load_elements(design.elements.clone())?;
        core.load_layout(design.layout.clone());
        Ok(())
    }

    /// Apply one step. `index` is only used in error messages.
    ///
    /// # Errors
    ///
    /// See [`ScriptError`].
    pub fn apply(&mut self, index: usize, step: &Step) -> Result<Vec<Action>, ScriptError> {
        if let Step::PointerUp { x, y } = *step {
            self.document.dispatch_pointer_up(Point::new(x, y));
            return Ok(self.mount.drain_actions());
        }

        let mut core = self.engine.borrow_mut();
        let actions = match step {
            Step::Add => {
                let id = core.add_element();
                core.element(id).cloned().map(Action::ElementCreated).into_iter().chain([Action::RenderNeeded]).collect()
            }
            Step::Remove { id } => core.remove_element(*id),
            Step::Viewport { left, top } => {
                core.set_viewport(*left, *top);
                vec![]
            }
            Step::PointerDown { id, part, x, y } => {
                let pt = Point::new(*x, *y);
                match (id, part) {
                    (Some(id), part) => core.on_pointer_down(*id, part.unwrap_or(HitPart::Body), pt),
                    (None, None) => core.on_pointer_down_at(pt),
                    (None, Some(_)) => return Err(ScriptError::PartWithoutId { step: index }),
                }
            }
            Step::PointerMove { x, y } => core.on_pointer_move(Point::new(*x, *y)),
            Step::PointerUp { .. } => vec![],
            Step::DoubleClick { id } => core.on_double_click(*id),
            Step::EditInput { text } => {
                core.on_edit_input(text.clone());
                vec![]
            }
            Step::EditBlur => core.on_edit_blur(),
            Step::KeyDown { key } => core.on_key_down(&Key(key.clone())),
            Step::SetMode { mode } => core.set_layout_mode(*mode),
            Step::SetProperty { property, value } => core.set_layout_property(*property, value.clone()),
            Step::ListDragStart { index: row } => {
                let payload = core.on_list_drag_start(*row).ok_or(ScriptError::NoSuchRow { step: index, index: *row })?;
                self.last_payload = Some(payload);
                vec![]
            }
            Step::ListDragEnter { index: row } => core.on_list_drag_enter(*row),
            Step::ListDrop { index: row, payload } => {
                let data = match (payload, &self.last_payload) {
                    (Some(text), _) => text.clone(),
                    (None, Some(p)) => p.data.clone(),
                    (None, None) => String::new(),
                };
                core.on_list_drop(*row, &data)
            }
            Step::ListDragEnd => {
                self.last_payload = None;
                core.on_list_drag_end()
            }
        };
        Ok(actions)
    }
}
