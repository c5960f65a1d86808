//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;
use std::str::FromStr;

use crate::compiler::CompileOptions;
use crate::consts::{DEFAULT_CONTAINER_HEIGHT_PX, MIN_ELEMENT_SIZE};

pub const DEFAULT_ELEMENT_LABEL: &str = "Element";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be positive, got {value}")]
    NotPositive { var: &'static str, value: String },
    #[error("unsupported {var} value: {value:?} (expected size-only or pin-edge)")]
    InvalidResizeClamp { var: &'static str, value: String },
}

/// How the minimum-size floor interacts with position during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeClamp {
    /// Floor only the size. Position still follows the raw pointer delta, so
    /// pushing a left or top edge past the floor drags the opposite edge along.
    #[default]
    SizeOnly,
    /// Derive position from the floored size, pinning the opposite edge.
    PinEdge,
}

impl ResizeClamp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SizeOnly => "size-only",
            Self::PinEdge => "pin-edge",
        }
    }
}

impl fmt::Display for ResizeClamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeClamp {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "size-only" => Ok(Self::SizeOnly),
            "pin-edge" => Ok(Self::PinEdge),
            other => Err(ConfigError::InvalidResizeClamp { var: "LAYOUT_RESIZE_CLAMP", value: other.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Floor applied to width and height during resize.
    pub min_size: f64,
    /// Prefix of the default content given to new elements.
    pub element_label: String,
    /// Container height written by the compiler.
    pub container_height_px: f64,
    pub resize_clamp: ResizeClamp,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_ELEMENT_SIZE,
            element_label: DEFAULT_ELEMENT_LABEL.to_owned(),
            container_height_px: DEFAULT_CONTAINER_HEIGHT_PX,
            resize_clamp: ResizeClamp::SizeOnly,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `LAYOUT_MIN_SIZE`: default 10
    /// - `LAYOUT_ELEMENT_LABEL`: default `Element`
    /// - `LAYOUT_CONTAINER_HEIGHT`: default 500
    /// - `LAYOUT_RESIZE_CLAMP`: `size-only` (default) or `pin-edge`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first variable that fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first variable that fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let min_size = parse_positive("LAYOUT_MIN_SIZE", lookup("LAYOUT_MIN_SIZE"), defaults.min_size)?;
        let container_height_px =
            parse_positive("LAYOUT_CONTAINER_HEIGHT", lookup("LAYOUT_CONTAINER_HEIGHT"), defaults.container_height_px)?;
        let element_label = lookup("LAYOUT_ELEMENT_LABEL").unwrap_or(defaults.element_label);
        let resize_clamp = match lookup("LAYOUT_RESIZE_CLAMP") {
            Some(raw) => raw.trim().parse()?,
            None => defaults.resize_clamp,
        };
        Ok(Self { min_size, element_label, container_height_px, resize_clamp })
    }

    /// Compiler options derived from this config.
    #[must_use]
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions { container_height_px: self.container_height_px }
    }
}

fn parse_positive(var: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw.clone() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NotPositive { var, value: raw });
    }
    Ok(value)
}
