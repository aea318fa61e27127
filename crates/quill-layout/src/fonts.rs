//! Per-font-family rendering strategies
//!
//! The families used on card faces disagree about how italic and bold are
//! reached: some ship style-suffixed families ("Mplantin Italic"), some carry
//! proper style axes selected by keyword, and the medieval display face has
//! no upright shape at all — an italic toggle there just resets the style
//! flag. Modeling this as a strategy table keeps the family list extensible.

use std::collections::HashMap;

/// How a family reaches its italic shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItalicMode {
    /// Query the style-suffixed family name ("<family> Italic")
    Suffix,
    /// Select the italic style axis
    #[default]
    Keyword,
    /// The face has no upright companion; the toggle resets the style flag
    ResetShape,
}

/// How a family reaches its bold shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoldMode {
    /// Query the style-suffixed family name ("<family> Bold")
    Suffix,
    /// Select the bold weight axis
    #[default]
    Keyword,
}

/// Strategy entry for one family
#[derive(Debug, Clone)]
pub struct FamilyTraits {
    /// Real family name as registered with the font store
    pub family: String,
    pub italic: ItalicMode,
    pub bold: BoldMode,
    /// Trailing-letter replacements (swash finals) applied per word
    pub swash_finals: Vec<(char, char)>,
}

impl FamilyTraits {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            italic: ItalicMode::default(),
            bold: BoldMode::default(),
            swash_finals: Vec::new(),
        }
    }

    /// Replace a word's final letter with its swash form, if the family has
    /// one for it.
    pub fn swash_word(&self, word: &str) -> String {
        if self.swash_finals.is_empty() {
            return word.to_string();
        }
        let mut chars: Vec<char> = word.chars().collect();
        if let Some(last) = chars.last_mut() {
            if let Some(&(_, repl)) = self.swash_finals.iter().find(|(c, _)| c == last) {
                *last = repl;
            }
        }
        chars.into_iter().collect()
    }
}

/// Family-keyed strategy table
#[derive(Debug, Clone)]
pub struct FontTraits {
    families: HashMap<String, FamilyTraits>,
    fallback: FamilyTraits,
}

impl FontTraits {
    pub fn new() -> Self {
        Self {
            families: HashMap::new(),
            fallback: FamilyTraits::new("serif"),
        }
    }

    /// The stock card-face families.
    pub fn standard() -> Self {
        let mut traits = Self::new();
        traits.register("beleren", FamilyTraits::new("Beleren"));
        traits.register("mplantin", FamilyTraits {
            family: "MPlantin".to_string(),
            italic: ItalicMode::Suffix,
            bold: BoldMode::Keyword,
            swash_finals: Vec::new(),
        });
        traits.register("relay", FamilyTraits {
            family: "Relay Medium".to_string(),
            italic: ItalicMode::Keyword,
            bold: BoldMode::Suffix,
            swash_finals: Vec::new(),
        });
        traits.register("goudymedieval", FamilyTraits {
            family: "Goudy Medieval".to_string(),
            italic: ItalicMode::ResetShape,
            bold: BoldMode::Keyword,
            swash_finals: vec![('r', '\u{a75b}'), ('t', '\u{a787}')],
        });
        traits
    }

    pub fn register(&mut self, key: impl Into<String>, family: FamilyTraits) {
        self.families.insert(key.into(), family);
    }

    /// Traits for a family key; unknown keys get keyword-style defaults.
    pub fn family(&self, key: &str) -> &FamilyTraits {
        self.families.get(key).unwrap_or(&self.fallback)
    }
}

impl Default for FontTraits {
    fn default() -> Self {
        Self::standard()
    }
}
