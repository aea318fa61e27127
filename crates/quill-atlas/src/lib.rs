//! Quill Atlas - icon symbol registry
//!
//! Maps icon codes to decoded images and rendering metadata:
//! - Alias resolution for hybrid codes written in either order
//! - Pack-prefixed lookup with fallback to the standard code
//! - Randomized "back" image variants through an injected random source
//!
//! The atlas is built once, before any rendering starts, and is read-only
//! afterwards. Images sit behind `Arc`, so concurrent reads from independent
//! render pipelines are safe.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tiny_skia::Pixmap;

/// Atlas error types
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("icon {code:?} has a non-positive size factor")]
    InvalidFactor { code: String },

    #[error("icon {code:?} registered twice")]
    DuplicateCode { code: String },
}

pub type Result<T> = std::result::Result<T, AtlasError>;

/// Injected randomness for back-variant selection.
///
/// The engine never seeds its own generator; the host supplies one, and
/// tests supply a deterministic sequence.
pub trait RandomSource {
    /// A value in `0..bound` (`bound` is never 0).
    fn next(&mut self, bound: u32) -> u32;
}

/// Randomized back-image variants for one icon.
///
/// `pattern` contains `{}`, replaced by an index in `0..count` to form the
/// code of the back image.
#[derive(Debug, Clone)]
pub struct BackVariants {
    pub pattern: String,
    pub count: u32,
}

/// Rendering metadata for one icon code
#[derive(Clone)]
pub struct SymbolInfo {
    pub code: String,
    pub image: Arc<Pixmap>,
    /// Width as a multiple of the nominal icon size
    pub width_factor: f32,
    /// Height as a multiple of the nominal icon size
    pub height_factor: f32,
    /// Tint the icon to the current symbol color
    pub color_match: bool,
    pub back: Option<BackVariants>,
}

impl fmt::Debug for SymbolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolInfo")
            .field("code", &self.code)
            .field("image", &(self.image.width(), self.image.height()))
            .field("width_factor", &self.width_factor)
            .field("height_factor", &self.height_factor)
            .field("color_match", &self.color_match)
            .field("back", &self.back)
            .finish()
    }
}

impl SymbolInfo {
    /// Plain icon with square 1:1 sizing.
    pub fn new(code: impl Into<String>, image: Arc<Pixmap>) -> Self {
        Self {
            code: code.into(),
            image,
            width_factor: 1.0,
            height_factor: 1.0,
            color_match: false,
            back: None,
        }
    }

    pub fn with_factors(mut self, width: f32, height: f32) -> Self {
        self.width_factor = width;
        self.height_factor = height;
        self
    }

    pub fn color_matched(mut self) -> Self {
        self.color_match = true;
        self
    }

    pub fn with_back(mut self, pattern: impl Into<String>, count: u32) -> Self {
        self.back = Some(BackVariants { pattern: pattern.into(), count });
        self
    }

    /// Expand the back-variant pattern with a random index.
    pub fn back_code(&self, rng: &mut dyn RandomSource) -> Option<String> {
        let back = self.back.as_ref()?;
        if back.count == 0 {
            return None;
        }
        let index = rng.next(back.count);
        Some(back.pattern.replace("{}", &index.to_string()))
    }
}

/// Collects icons before the atlas is frozen
#[derive(Default)]
pub struct AtlasBuilder {
    symbols: HashMap<String, Arc<SymbolInfo>>,
}

impl AtlasBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: SymbolInfo) -> Result<()> {
        if info.width_factor <= 0.0 || info.height_factor <= 0.0 {
            return Err(AtlasError::InvalidFactor { code: info.code });
        }
        if self.symbols.contains_key(&info.code) {
            return Err(AtlasError::DuplicateCode { code: info.code });
        }
        self.symbols.insert(info.code.clone(), Arc::new(info));
        Ok(())
    }

    pub fn build(self) -> SymbolAtlas {
        SymbolAtlas { symbols: self.symbols }
    }
}

/// Read-only icon registry
pub struct SymbolAtlas {
    symbols: HashMap<String, Arc<SymbolInfo>>,
}

impl SymbolAtlas {
    pub fn builder() -> AtlasBuilder {
        AtlasBuilder::new()
    }

    /// Look up a code, resolving hybrid aliases written in either order.
    pub fn get(&self, code: &str) -> Option<&Arc<SymbolInfo>> {
        if let Some(info) = self.symbols.get(code) {
            return Some(info);
        }
        self.symbols.get(alias(code)?.as_str())
    }

    /// Look up with the pack prefix first, falling back to the bare code.
    pub fn resolve(&self, prefix: &str, code: &str) -> Option<&Arc<SymbolInfo>> {
        if !prefix.is_empty() {
            if let Some(info) = self.get(&format!("{prefix}{code}")) {
                return Some(info);
            }
        }
        // A prefixed code in the markup still resolves when the atlas only
        // carries the bare entry.
        let bare = code.strip_prefix(prefix).filter(|_| !prefix.is_empty());
        self.get(code).or_else(|| bare.and_then(|c| self.get(c)))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Reversed spelling for two-letter hybrid codes (`uw` -> `wu`), including
/// the three-letter phyrexian form (`wgp` -> `gwp`).
fn alias(code: &str) -> Option<String> {
    let is_color = |c: u8| matches!(c, b'w' | b'u' | b'b' | b'r' | b'g');
    match code.as_bytes() {
        [a, b] if is_color(*a) && is_color(*b) && a != b => {
            Some(format!("{}{}", *b as char, *a as char))
        }
        [a, b, b'p'] if is_color(*a) && is_color(*b) && a != b => {
            Some(format!("{}{}p", *b as char, *a as char))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SeqRandom(u32);

    impl RandomSource for SeqRandom {
        fn next(&mut self, bound: u32) -> u32 {
            let v = self.0 % bound;
            self.0 += 1;
            v
        }
    }

    fn pixmap() -> Arc<Pixmap> {
        Arc::new(Pixmap::new(4, 4).unwrap())
    }

    fn atlas_with(codes: &[&str]) -> SymbolAtlas {
        let mut builder = SymbolAtlas::builder();
        for code in codes {
            builder.insert(SymbolInfo::new(*code, pixmap())).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_exact_lookup() {
        let atlas = atlas_with(&["w", "u"]);
        assert!(atlas.get("w").is_some());
        assert!(atlas.get("q").is_none());
    }

    #[test]
    fn test_hybrid_alias() {
        let atlas = atlas_with(&["wu", "gwp"]);
        assert!(atlas.get("uw").is_some());
        assert!(atlas.get("wgp").is_some());
        // Aliasing never invents codes
        assert!(atlas.get("wb").is_none());
    }

    #[test]
    fn test_prefixed_resolution() {
        let atlas = atlas_with(&["pw+1", "t"]);
        // Prefix match wins
        assert_eq!(atlas.resolve("pw", "+1").unwrap().code, "pw+1");
        // Fallback to the bare code
        assert_eq!(atlas.resolve("pw", "t").unwrap().code, "t");
        // Markup that already carries the prefix
        assert_eq!(atlas.resolve("pw", "pw+1").unwrap().code, "pw+1");
        assert!(atlas.resolve("pw", "+2").is_none());
    }

    #[test]
    fn test_back_variants_deterministic() {
        let info = SymbolInfo::new("t", pixmap()).with_back("tback{}", 3);
        let mut rng = SeqRandom(0);
        assert_eq!(info.back_code(&mut rng).unwrap(), "tback0");
        assert_eq!(info.back_code(&mut rng).unwrap(), "tback1");
        assert_eq!(info.back_code(&mut rng).unwrap(), "tback2");
        assert_eq!(info.back_code(&mut rng).unwrap(), "tback0");
    }

    #[test]
    fn test_no_back_variants() {
        let info = SymbolInfo::new("w", pixmap());
        let mut rng = SeqRandom(0);
        assert!(info.back_code(&mut rng).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut builder = SymbolAtlas::builder();
        builder.insert(SymbolInfo::new("w", pixmap())).unwrap();
        let err = builder.insert(SymbolInfo::new("w", pixmap())).unwrap_err();
        assert!(matches!(err, AtlasError::DuplicateCode { .. }));
    }
}
