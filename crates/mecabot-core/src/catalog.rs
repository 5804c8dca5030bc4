//! Compiled-in category catalog taught to the model.
//!
//! The catalog is independent of the category store. The two may list
//! different categories; nothing here reconciles them.

use serde::Serialize;

use crate::domain::{CategoryCode, MecabotError, Result};

/// The ten categories (and average minutes) the classifier prompt lists.
const BUILTIN: [(&str, u32); 10] = [
    ("cambio_aceite", 30),
    ("pastillas_freno", 90),
    ("revision_general", 120),
    ("cambio_neumaticos", 60),
    ("alineacion_direccion", 45),
    ("cambio_bateria", 20),
    ("reparacion_escape", 75),
    ("cambio_amortiguadores", 150),
    ("reparacion_motor", 300),
    ("diagnostico_electronico", 60),
];

/// One `code=minutes` pair of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: CategoryCode,
    pub minutes: u32,
}

/// Immutable, ordered list of valid category codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCatalog {
    entries: Vec<CatalogEntry>,
}

impl CategoryCatalog {
    /// The catalog shipped with MecaBot.
    pub fn builtin() -> Self {
        CategoryCatalog {
            entries: BUILTIN
                .iter()
                .map(|(code, minutes)| CatalogEntry {
                    code: CategoryCode::trusted(*code),
                    minutes: *minutes,
                })
                .collect(),
        }
    }

    /// Build a custom catalog from `(code, minutes)` pairs.
    ///
    /// Rejects an empty list, blank codes and repeated codes.
    pub fn from_pairs<I, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, u32)>,
        C: Into<String>,
    {
        let mut entries: Vec<CatalogEntry> = Vec::new();
        for (code, minutes) in pairs {
            let code = code.into();
            if code.trim().is_empty() {
                return Err(MecabotError::Config(
                    "catalog codes must not be blank".to_string(),
                ));
            }
            if entries.iter().any(|e| e.code.as_str() == code) {
                return Err(MecabotError::Config(format!(
                    "catalog code listed twice: {}",
                    code
                )));
            }
            entries.push(CatalogEntry {
                code: CategoryCode::trusted(code),
                minutes,
            });
        }
        if entries.is_empty() {
            return Err(MecabotError::Config(
                "catalog must list at least one category".to_string(),
            ));
        }
        Ok(CategoryCatalog { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.code.as_str() == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lists_ten_categories() {
        let catalog = CategoryCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get("cambio_aceite").map(|e| e.minutes), Some(30));
        assert_eq!(catalog.get("pastillas_freno").map(|e| e.minutes), Some(90));
        assert_eq!(catalog.get("reparacion_motor").map(|e| e.minutes), Some(300));
        assert!(catalog.get("cambio_de_batería").is_none());
    }

    #[test]
    fn test_builtin_codes_are_snake_case() {
        for entry in CategoryCatalog::builtin().entries() {
            let code = entry.code.as_str();
            assert!(
                code.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{code}"
            );
        }
    }

    #[test]
    fn test_from_pairs_rejects_duplicates_and_empty() {
        assert!(CategoryCatalog::from_pairs(Vec::<(String, u32)>::new()).is_err());
        assert!(CategoryCatalog::from_pairs([("a", 1), ("a", 2)]).is_err());
        assert!(CategoryCatalog::from_pairs([(" ", 1)]).is_err());
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let catalog = CategoryCatalog::from_pairs([("zeta", 5), ("alfa", 10)]).unwrap();
        let codes: Vec<&str> = catalog.entries().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["zeta", "alfa"]);
    }
}
