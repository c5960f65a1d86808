//! Layout compiler: configuration + elements to stylesheet text.
//!
//! The output is a pure function of its inputs. The container rule always
//! carries the fixed size and border; the per-element rules carry size always
//! and coordinates only in absolute mode, since flex and grid place elements
//! by flow.

#[cfg(test)]
#[path = "compiler_test.rs"]
mod compiler_test;

use std::fmt;

use crate::consts::DEFAULT_CONTAINER_HEIGHT_PX;
use crate::doc::{Element, ElementId};
use crate::layout::{LayoutConfig, LayoutMode};

/// Selector of the container rule.
pub const CONTAINER_SELECTOR: &str = ".layout-container";

/// Knobs that shape the output but are not part of the layout configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompileOptions {
    /// Container height in pixels.
    pub container_height_px: f64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { container_height_px: DEFAULT_CONTAINER_HEIGHT_PX }
    }
}

/// Compile with default options.
#[must_use]
pub fn compile(layout: &LayoutConfig, elements: &[Element]) -> String {
    compile_with(&CompileOptions::default(), layout, elements)
}

/// Compile the stylesheet for `layout` and `elements` (in sequence order).
#[must_use]
pub fn compile_with(options: &CompileOptions, layout: &LayoutConfig, elements: &[Element]) -> String {
    Stylesheet { options, layout, elements }.to_string()
}

/// Selector of the rule generated for element `id`.
#[must_use]
pub fn element_selector(id: ElementId) -> String {
    format!(".element-{id}")
}

struct Stylesheet<'a> {
    options: &'a CompileOptions,
    layout: &'a LayoutConfig,
    elements: &'a [Element],
}

impl fmt::Display for Stylesheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout;
        writeln!(f, "{CONTAINER_SELECTOR} {{")?;
        match layout.mode {
            LayoutMode::Flex => {
                writeln!(f, " display: flex;")?;
                writeln!(f, " flex-direction: {};", layout.flex_direction)?;
                writeln!(f, " justify-content: {};", layout.justify_content)?;
                writeln!(f, " align-items: {};", layout.align_items)?;
            }
            LayoutMode::Grid => {
                writeln!(f, " display: grid;")?;
                writeln!(f, " grid-template-columns: {};", layout.grid_template_columns)?;
                writeln!(f, " grid-template-rows: {};", layout.grid_template_rows)?;
                writeln!(f, " gap: {}px;", layout.gap)?;
            }
            LayoutMode::Absolute => {
                writeln!(f, " position: relative;")?;
            }
        }
        writeln!(f, " width: 100%;")?;
        writeln!(f, " height: {}px;", Num(self.options.container_height_px))?;
        writeln!(f, " border: 1px solid #ccc;")?;
        writeln!(f, "}}")?;
        writeln!(f)?;

        for el in self.elements {
            writeln!(f, "{} {{", element_selector(el.id))?;
            if layout.mode == LayoutMode::Absolute {
                writeln!(f, " position: absolute;")?;
                writeln!(f, " left: {}px;", Num(el.x))?;
                writeln!(f, " top: {}px;", Num(el.y))?;
            }
            writeln!(f, " width: {}px;", Num(el.width))?;
            writeln!(f, " height: {}px;", Num(el.height))?;
            writeln!(f, " background-color: #f0f0f0;")?;
            writeln!(f, " border: 1px solid #bbb;")?;
            writeln!(f, " padding: 10px;")?;
            writeln!(f, "}}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Shortest round-trip number text as a browser would print it: `10` not
/// `10.0`, `0` for negative zero, `Infinity` for unbounded values, and
/// exponent form (`1e+21`, `1.5e-7`) outside `[1e-6, 1e21)`.
struct Num(f64);

impl fmt::Display for Num {
    #[allow(clippy::float_cmp)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v == 0.0 {
            return f.write_str("0");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
        }
        let magnitude = v.abs();
        if !(1e-6..1e21).contains(&magnitude) {
            let text = format!("{v:e}");
            if let Some((mantissa, exponent)) = text.split_once('e') {
                let sign = if exponent.starts_with('-') { "" } else { "+" };
                return write!(f, "{mantissa}e{sign}{exponent}");
            }
        }
        write!(f, "{v}")
    }
}
