//! Reusable scratch surfaces
//!
//! One surface per logical line, one for the assembled paragraph, and one
//! auxiliary surface for the multi-pass icon effects. All three are sized to
//! the target card once and reused across every field and every shrink
//! iteration of a render.

use tiny_skia::Pixmap;

use crate::{RenderError, Result};

/// The compositor's working surfaces
pub struct Scratch {
    pub(crate) line: Pixmap,
    pub(crate) paragraph: Pixmap,
    pub(crate) aux: Pixmap,
}

impl Scratch {
    /// Allocate surfaces for a card of the given pixel dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let make = || {
            Pixmap::new(width, height).ok_or(RenderError::SurfaceCreation { width, height })
        };
        Ok(Self {
            line: make()?,
            paragraph: make()?,
            aux: make()?,
        })
    }

    /// Grow the surfaces if a larger card comes along; never shrinks.
    pub fn ensure(&mut self, width: u32, height: u32) -> Result<()> {
        if width <= self.line.width() && height <= self.line.height() {
            return Ok(());
        }
        let width = width.max(self.line.width());
        let height = height.max(self.line.height());
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.line.width()
    }

    pub fn height(&self) -> u32 {
        self.line.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(Scratch::new(0, 10).is_err());
    }

    #[test]
    fn test_ensure_grows_only() {
        let mut scratch = Scratch::new(100, 50).unwrap();
        scratch.ensure(40, 40).unwrap();
        assert_eq!((scratch.width(), scratch.height()), (100, 50));
        scratch.ensure(120, 60).unwrap();
        assert_eq!((scratch.width(), scratch.height()), (120, 60));
    }
}
