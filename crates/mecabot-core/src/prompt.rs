//! Classifier prompt construction.

use crate::catalog::CategoryCatalog;

const INSTRUCTION: &str =
    r#"Devuelve SOLO JSON con la forma {"category":"<snake_case>", "minutes":<int>}"#;
const CATALOG_PREFIX: &str = "Categorías y minutos válidos: ";
const UNKNOWN_RULE: &str = "Si no reconoces la avería usa null en ambos campos.";

/// Fixed Spanish instruction template with the catalog baked in.
///
/// The catalog listing is rendered once at construction; `render` only
/// interpolates the description, verbatim and unescaped.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    catalog_line: String,
}

impl PromptTemplate {
    pub fn new(catalog: &CategoryCatalog) -> Self {
        let listing = catalog
            .entries()
            .iter()
            .map(|entry| format!("{}={}", entry.code, entry.minutes))
            .collect::<Vec<_>>()
            .join(", ");
        PromptTemplate {
            catalog_line: format!("{}{}.", CATALOG_PREFIX, listing),
        }
    }

    pub fn render(&self, description: &str) -> String {
        format!(
            "{}\n{}\n{}\nDescripción: \"{}\"\n",
            INSTRUCTION, self.catalog_line, UNKNOWN_RULE, description
        )
    }
}
