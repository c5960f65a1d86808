//! Container layout configuration.
//!
//! DESIGN
//! ======
//! Property values are kept as the raw text the controls produced. Nothing
//! here validates them; the compiler writes them out verbatim. Fields that
//! belong to an inactive mode are kept but reset whenever the mode moves away
//! from their owner, so re-entering a mode always starts from defaults.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FLEX_DIRECTION: &str = "row";
pub const DEFAULT_JUSTIFY_CONTENT: &str = "flex-start";
pub const DEFAULT_ALIGN_ITEMS: &str = "stretch";
pub const DEFAULT_GRID_TEMPLATE_COLUMNS: &str = "1fr";
pub const DEFAULT_GRID_TEMPLATE_ROWS: &str = "auto";
pub const DEFAULT_GAP: &str = "0";

/// Container layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Elements are placed at their stored coordinates.
    #[default]
    Absolute,
    /// Flexible-box flow in sequence order.
    Flex,
    /// Grid flow in sequence order.
    Grid,
}

impl LayoutMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Flex => "flex",
            Self::Grid => "grid",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name is not one of `absolute`, `flex`, `grid`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout mode: {0:?}")]
pub struct LayoutModeParseError(pub String);

impl FromStr for LayoutMode {
    type Err = LayoutModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(Self::Absolute),
            "flex" => Ok(Self::Flex),
            "grid" => Ok(Self::Grid),
            other => Err(LayoutModeParseError(other.to_owned())),
        }
    }
}

/// Which container property a control edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutProperty {
    FlexDirection,
    JustifyContent,
    AlignItems,
    GridTemplateColumns,
    GridTemplateRows,
    Gap,
}

impl LayoutProperty {
    /// The mode whose output this property affects.
    #[must_use]
    pub fn owner(self) -> LayoutMode {
        match self {
            Self::FlexDirection | Self::JustifyContent | Self::AlignItems => LayoutMode::Flex,
            Self::GridTemplateColumns | Self::GridTemplateRows | Self::Gap => LayoutMode::Grid,
        }
    }
}

/// Container layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub flex_direction: String,
    pub justify_content: String,
    pub align_items: String,
    pub grid_template_columns: String,
    pub grid_template_rows: String,
    pub gap: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Absolute,
            flex_direction: DEFAULT_FLEX_DIRECTION.to_owned(),
            justify_content: DEFAULT_JUSTIFY_CONTENT.to_owned(),
            align_items: DEFAULT_ALIGN_ITEMS.to_owned(),
            grid_template_columns: DEFAULT_GRID_TEMPLATE_COLUMNS.to_owned(),
            grid_template_rows: DEFAULT_GRID_TEMPLATE_ROWS.to_owned(),
            gap: DEFAULT_GAP.to_owned(),
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the active mode, resetting the properties of every mode that is
    /// not the new one. Returns true if anything changed.
    pub fn set_mode(&mut self, mode: LayoutMode) -> bool {
        let before = self.clone();
        self.mode = mode;
        if mode != LayoutMode::Flex {
            self.reset_flex();
        }
        if mode != LayoutMode::Grid {
            self.reset_grid();
        }
        *self != before
    }

    /// Set one property's raw text. Returns true if the value changed.
    pub fn set(&mut self, property: LayoutProperty, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.slot_mut(property);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Current raw text of one property.
    #[must_use]
    pub fn get(&self, property: LayoutProperty) -> &str {
        match property {
            LayoutProperty::FlexDirection => &self.flex_direction,
            LayoutProperty::JustifyContent => &self.justify_content,
            LayoutProperty::AlignItems => &self.align_items,
            LayoutProperty::GridTemplateColumns => &self.grid_template_columns,
            LayoutProperty::GridTemplateRows => &self.grid_template_rows,
            LayoutProperty::Gap => &self.gap,
        }
    }

    fn slot_mut(&mut self, property: LayoutProperty) -> &mut String {
        match property {
            LayoutProperty::FlexDirection => &mut self.flex_direction,
            LayoutProperty::JustifyContent => &mut self.justify_content,
            LayoutProperty::AlignItems => &mut self.align_items,
            LayoutProperty::GridTemplateColumns => &mut self.grid_template_columns,
            LayoutProperty::GridTemplateRows => &mut self.grid_template_rows,
            LayoutProperty::Gap => &mut self.gap,
        }
    }

    fn reset_flex(&mut self) {
        DEFAULT_FLEX_DIRECTION.clone_into(&mut self.flex_direction);
        DEFAULT_JUSTIFY_CONTENT.clone_into(&mut self.justify_content);
        DEFAULT_ALIGN_ITEMS.clone_into(&mut self.align_items);
    }

    fn reset_grid(&mut self) {
        DEFAULT_GRID_TEMPLATE_COLUMNS.clone_into(&mut self.grid_template_columns);
        DEFAULT_GRID_TEMPLATE_ROWS.clone_into(&mut self.grid_template_rows);
        DEFAULT_GAP.clone_into(&mut self.gap);
    }
}
