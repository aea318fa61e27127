//! Quill Engine - field rendering pipeline
//!
//! The single entry point per card field: preprocess the markup string,
//! tokenize it with options derived from the field, lay it out with
//! shrink-to-fit, and composite the result onto the target surface.
//!
//! The engine degrades rather than fails: unknown icons and commands vanish
//! silently, and a field that still overflows at the minimum font size is
//! drawn as-is with the overflow reported in the diagnostics. The only
//! errors that surface are scratch-surface allocation failures.

mod preprocess;
mod renderer;

pub use preprocess::preprocess;
pub use renderer::{CardContext, FieldRenderer, RenderReport};

/// Engine error types
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Render(#[from] quill_render::RenderError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
