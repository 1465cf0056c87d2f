//! User-visible label lookup
//!
//! Unit names and report headings go through a [`Translator`] so that a
//! front end can swap in its own catalogue. The core only ships the
//! pass-through implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps a source label to its display text.
pub trait Translator: Send + Sync {
    fn tr(&self, text: &str) -> String;
}

/// Returns every label unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn tr(&self, text: &str) -> String {
        text.to_string()
    }
}

/// A fixed lookup table; labels without an entry pass through.
#[derive(Debug, Default, Clone)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, source: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(source.into(), text.into());
        self
    }
}

impl Translator for CatalogTranslator {
    fn tr(&self, text: &str) -> String {
        self.entries
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}

/// Shared translator handle held by unit systems
pub type SharedTranslator = Arc<dyn Translator>;

pub fn identity() -> SharedTranslator {
    Arc::new(IdentityTranslator)
}

impl fmt::Debug for dyn Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Translator")
    }
}
