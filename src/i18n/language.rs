//! LanguageTag: a validated model language identifier.

use std::fmt;

use serde::Serialize;

use crate::i18n::LanguageRegistry;

/// A language+script tag accepted by the translation model (e.g., `eng_Latn`).
///
/// Only the registry hands these out, so every tag that reaches a
/// [`Translator`](crate::translator::Translator) is one the model knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LanguageTag(&'static str);

impl LanguageTag {
    pub(crate) const fn new(tag: &'static str) -> Self {
        Self(tag)
    }

    /// The raw tag string (e.g., "fra_Latn").
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// The display name of this tag's language.
    pub fn name(&self) -> &'static str {
        LanguageRegistry::get()
            .name_for_tag(*self)
            .unwrap_or(self.0)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
