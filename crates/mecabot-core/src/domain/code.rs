//! Category codes: the lower-case, underscore-separated identifiers callers see.

use serde::{Deserialize, Serialize};

/// Identifier of a repair category, e.g. `cambio_aceite`.
///
/// Codes reach callers from two sources. Codes produced by the model are
/// already snake_case and are kept verbatim ([`CategoryCode::trusted`]).
/// Codes derived from a stored display name go through
/// [`CategoryCode::from_display_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCode(String);

impl CategoryCode {
    /// Normalize a display name: lower-case it and replace every space with
    /// `_`. Accents, punctuation and other whitespace are kept.
    ///
    /// `"Cambio de batería"` becomes `cambio_de_batería`.
    pub fn from_display_name(name: &str) -> Self {
        CategoryCode(name.to_lowercase().replace(' ', "_"))
    }

    /// Wrap a code as given, without normalization.
    pub fn trusted(code: impl Into<String>) -> Self {
        CategoryCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Readable name for seeding a store: underscores become spaces and the
    /// first letter is capitalized (`cambio_aceite` -> `Cambio aceite`).
    ///
    /// `from_display_name(code.to_display_name())` gives back `code` for
    /// any code without upper-case letters or spaces.
    pub fn to_display_name(&self) -> String {
        let spaced = self.0.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CategoryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
