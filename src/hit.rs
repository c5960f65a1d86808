#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{HANDLE_SIZE_PX, REMOVE_BUTTON_INSET_PX, REMOVE_BUTTON_SIZE_PX};
use crate::doc::{Element, ElementId};
use crate::geom::Point;

/// Which part of an element received a pointer-down.
///
/// Hosts with a DOM classify the event target themselves (handle class, a
/// `button` ancestor, an `input` tag); others can call [`hit_test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPart {
    Body,
    ResizeHandle(Corner),
    Button,
    TextInput,
}

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se];

    /// Whether dragging this corner moves the element's left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether dragging this corner moves the element's top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }

    /// The corner's position on an element's bounding box.
    #[must_use]
    pub fn point_on(self, el: &Element) -> Point {
        let x = if self.moves_left() { el.x } else { el.right() };
        let y = if self.moves_top() { el.y } else { el.bottom() };
        Point::new(x, y)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nw => "nw",
            Self::Ne => "ne",
            Self::Sw => "sw",
            Self::Se => "se",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a handle's direction attribute names no corner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resize corner: {0:?}")]
pub struct CornerParseError(pub String);

impl FromStr for Corner {
    type Err = CornerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nw" => Ok(Self::Nw),
            "ne" => Ok(Self::Ne),
            "sw" => Ok(Self::Sw),
            "se" => Ok(Self::Se),
            other => Err(CornerParseError(other.to_owned())),
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Find what lies under `canvas_pt`.
///
/// Elements later in the sequence paint on top, so they are tested first. For
/// each element the corner handles (which overhang the box by half their size)
/// win over the remove button, which wins over the body.
#[must_use]
pub fn hit_test(canvas_pt: Point, elements: &[Element]) -> Option<Hit> {
    elements.iter().rev().find_map(|el| {
        hit_element(canvas_pt, el).map(|part| Hit { element_id: el.id, part })
    })
}

fn hit_element(pt: Point, el: &Element) -> Option<HitPart> {
    let half = HANDLE_SIZE_PX / 2.0;
    for corner in Corner::ALL {
        let c = corner.point_on(el);
        if in_rect(pt, c.x - half, c.y - half, HANDLE_SIZE_PX, HANDLE_SIZE_PX) {
            return Some(HitPart::ResizeHandle(corner));
        }
    }

    let button_x = el.right() - REMOVE_BUTTON_INSET_PX - REMOVE_BUTTON_SIZE_PX;
    let button_y = el.y + REMOVE_BUTTON_INSET_PX;
    if in_rect(pt, button_x, button_y, REMOVE_BUTTON_SIZE_PX, REMOVE_BUTTON_SIZE_PX) {
        return Some(HitPart::Button);
    }

    if in_rect(pt, el.x, el.y, el.width, el.height) {
        return Some(HitPart::Body);
    }
    None
}

fn in_rect(pt: Point, x: f64, y: f64, w: f64, h: f64) -> bool {
    pt.x >= x && pt.x <= x + w && pt.y >= y && pt.y <= y + h
}
