//! Direct-manipulation core for a visual layout editor.
//!
//! The crate is headless. A host (DOM shell, TUI, or the bundled CLI) owns
//! presentation and forwards raw input to [`engine::EngineCore`], which routes
//! it to two independent interaction engines sharing one element collection:
//! the canvas engine (drag, resize, inline edit) and the order-list engine
//! (drag-and-drop reordering). After every effective mutation the engine
//! recompiles the stylesheet text exposed through [`engine::EngineCore::output`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and host-facing [`engine::Action`]s |
//! | [`canvas`] | Canvas interaction engine: drag/resize state machine, inline edit |
//! | [`order_list`] | Order-list reorder engine |
//! | [`compiler`] | Pure layout-configuration-to-stylesheet compiler |
//! | [`layout`] | Container layout configuration and mode switching |
//! | [`doc`] | Element records and the shared copy-on-write store |
//! | [`input`] | Gesture state types and keys |
//! | [`hit`] | Target classification and hit-testing |
//! | [`geom`] | Points and the screen-to-canvas viewport origin |
//! | [`listener`] | Document-wide pointer-up registration with scoped teardown |
//! | [`config`] | Editor configuration and environment overrides |
//! | [`script`] | Scripted input sessions replayed by the CLI |
//! | [`consts`] | Shared numeric constants |

pub mod canvas;
pub mod compiler;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layout;
pub mod listener;
pub mod order_list;
pub mod script;
