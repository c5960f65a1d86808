//! Document model: element records, sparse updates, and the shared store.
//!
//! `ElementStore` is the single owner of the element sequence that both the
//! canvas engine and the order-list engine mutate. The sequence lives behind an
//! `Rc` and every mutation goes through `Rc::make_mut`, so a reader holding a
//! [`Snapshot`] keeps seeing the collection exactly as it was when taken while
//! the store moves on to a new value.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ELEMENT_HEIGHT, DEFAULT_ELEMENT_WIDTH, DEFAULT_ELEMENT_X, DEFAULT_ELEMENT_Y, MAX_ELEMENT_ID};

/// Identifier for an element. Assigned from 1 upward and never reused.
pub type ElementId = u64;

/// An immutable view of the element sequence at one point in time.
pub type Snapshot = Rc<Vec<Element>>;

/// Why a set of elements can't be loaded into the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("duplicate element id {0}")]
    DuplicateId(ElementId),
    #[error("element id {id} exceeds the maximum of {max}")]
    IdOutOfRange { id: ElementId, max: ElementId },
}

/// Check that ids are unique and within range, returning the largest one
/// (0 for an empty slice).
///
/// # Errors
///
/// The first duplicate or out-of-range id found, in sequence order.
pub fn validate_ids(elements: &[Element]) -> Result<ElementId, LoadError> {
    let mut seen = HashSet::with_capacity(elements.len());
    let mut max_id = 0;
    for el in elements {
        if el.id > MAX_ELEMENT_ID {
            return Err(LoadError::IdOutOfRange { id: el.id, max: MAX_ELEMENT_ID });
        }
        if !seen.insert(el.id) {
            return Err(LoadError::DuplicateId(el.id));
        }
        max_id = max_id.max(el.id);
    }
    Ok(max_id)
}

/// A rectangular element placed inside the layout container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Text shown inside the element.
    pub content: String,
}

impl Element {
    /// An element with default geometry labelled `"{label} {id}"`.
    #[must_use]
    pub fn with_defaults(id: ElementId, label: &str) -> Self {
        Self {
            id,
            x: DEFAULT_ELEMENT_X,
            y: DEFAULT_ELEMENT_Y,
            width: DEFAULT_ELEMENT_WIDTH,
            height: DEFAULT_ELEMENT_HEIGHT,
            content: format!("{label} {id}"),
        }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ElementPatch {
    /// Patch that moves an element's top-left corner.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Patch that replaces the full geometry.
    #[must_use]
    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x: Some(x), y: Some(y), width: Some(width), height: Some(height), content: None }
    }

    /// Patch that replaces the text content.
    #[must_use]
    pub fn content(text: impl Into<String>) -> Self {
        Self { content: Some(text.into()), ..Default::default() }
    }
}

/// Ordered, copy-on-write store of elements.
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Snapshot,
    next_id: ElementId,
}

impl ElementStore {
    /// Create an empty store whose first element will get id 1.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Rc::new(Vec::new()), next_id: 1 }
    }

    /// Append a default element and return its id.
    pub fn add(&mut self, label: &str) -> ElementId {
        let id = self.next_id;
        self.next_id += 1;
        Rc::make_mut(&mut self.elements).push(Element::with_defaults(id, label));
        id
    }

    /// Replace the whole sequence. The id counter resumes after the largest id
    /// seen so later additions stay unique. On error the store is unchanged.
    ///
    /// # Errors
    ///
    /// See [`validate_ids`].
    pub fn load(&mut self, elements: Vec<Element>) -> Result<(), LoadError> {
        let max_id = validate_ids(&elements)?;
        self.next_id = self.next_id.max(max_id + 1);
        self.elements = Rc::new(elements);
        Ok(())
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(Rc::make_mut(&mut self.elements).remove(index))
    }

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Current position of an element in the sequence.
    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Element at a sequence position.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Apply a sparse update. Returns false if the element doesn't exist.
    pub fn apply_patch(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let el = &mut Rc::make_mut(&mut self.elements)[index];
        if let Some(x) = patch.x {
            el.x = x;
        }
        if let Some(y) = patch.y {
            el.y = y;
        }
        if let Some(w) = patch.width {
            el.width = w;
        }
        if let Some(h) = patch.height {
            el.height = h;
        }
        if let Some(ref text) = patch.content {
            el.content.clone_from(text);
        }
        true
    }

    /// Remove the element at `from` and reinsert it at `to`.
    ///
    /// `to` is interpreted after the removal and clamped to the new length.
    /// Returns false when `from` is out of range.
    pub fn relocate(&mut self, from: usize, to: usize) -> bool {
        if from >= self.elements.len() {
            return false;
        }
        let elements = Rc::make_mut(&mut self.elements);
        let moved = elements.remove(from);
        let to = to.min(elements.len());
        elements.insert(to, moved);
        true
    }

    /// A cheap handle on the current sequence that later mutations won't touch.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Rc::clone(&self.elements)
    }

    /// The current sequence in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Ids in sequence order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    /// The id the next [`ElementStore::add`] will assign.
    #[must_use]
    pub fn next_id(&self) -> ElementId {
        self.next_id
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}
