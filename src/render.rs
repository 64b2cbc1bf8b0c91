//! Markdown to HTML rendering.
//!
//! The [`RenderEngine`] compiles the enabled [`Stage`]s into a [`Pipeline`]
//! and runs Markdown text through it. Which optional stages run is decided by
//! [`RenderOptions`], either the engine's defaults or per-call overrides.

mod engine;
mod highlight;
mod options;
pub mod pipeline;
pub mod slug;

pub use engine::RenderEngine;
pub use highlight::SyntaxHighlighter;
pub use options::{RenderConfig, RenderOptions};
pub use pipeline::{Pipeline, RenderError, Stage};
