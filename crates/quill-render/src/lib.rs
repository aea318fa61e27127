//! Quill Render - glyph compositing
//!
//! Draws a layout result onto a caller-supplied surface:
//! - Font store with shaping-based measurement (fontdb + rustybuzz)
//! - Text glyphs with shadow, outline, and fill passes
//! - Icon glyphs with tinting, arc transforms, and multi-pass outlines
//! - Per-line alignment, full justification, and paragraph placement
//!
//! Scratch surfaces are reused across fields and shrink iterations; the
//! compositor holds them by `&mut`, so two renders cannot share one set.

mod compositor;
mod fonts;
mod justify;
mod scratch;

pub use compositor::Compositor;
pub use fonts::FontStore;
pub use justify::justified_space_width;
pub use scratch::Scratch;

/// Render error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not allocate a {width}x{height} scratch surface")]
    SurfaceCreation { width: u32, height: u32 },

    #[error("target surface is empty")]
    EmptyTarget,
}

pub type Result<T> = std::result::Result<T, RenderError>;
