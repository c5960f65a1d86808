//! Shared numeric constants for the layout engine.

// ── Elements ────────────────────────────────────────────────────

/// Left edge of a newly added element, in canvas pixels.
pub const DEFAULT_ELEMENT_X: f64 = 10.0;

/// Top edge of a newly added element, in canvas pixels.
pub const DEFAULT_ELEMENT_Y: f64 = 10.0;

/// Width of a newly added element.
pub const DEFAULT_ELEMENT_WIDTH: f64 = 100.0;

/// Height of a newly added element.
pub const DEFAULT_ELEMENT_HEIGHT: f64 = 50.0;

/// Largest id a loaded element may carry. Ids stay exact as JSON numbers and
/// the counter has room to keep counting past them.
pub const MAX_ELEMENT_ID: u64 = (1 << 53) - 1;

/// Smallest width or height a resize gesture may produce.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of the square resize handle centred on each corner.
pub const HANDLE_SIZE_PX: f64 = 10.0;

/// Side length of the remove button in the top-right corner.
pub const REMOVE_BUTTON_SIZE_PX: f64 = 20.0;

/// Inset of the remove button from the element's top and right edges.
pub const REMOVE_BUTTON_INSET_PX: f64 = 5.0;

// ── Container ───────────────────────────────────────────────────

/// Fixed container height emitted by the compiler, in pixels.
pub const DEFAULT_CONTAINER_HEIGHT_PX: f64 = 500.0;
