//! Schema definitions for the MecaBot SurrealDB tables
//!
//! Tables:
//! - repair_category: Known repair categories with their average duration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Module for serializing chrono DateTime to SurrealDB datetime format
mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Lookup key for a category name: the name lower-cased, nothing else.
///
/// No trimming and no accent folding happen here, so `" Frenos"` and
/// `"Frenos"` are different keys while `"FRENOS"` and `"frenos"` are not.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// A repair category row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairCategory {
    /// SurrealDB record ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<surrealdb::sql::Thing>,
    /// Display name as entered by an operator (e.g. "Cambio de batería")
    pub name: String,
    /// `name_key(name)`, the column the unique index and lookups use
    pub name_key: String,
    /// Average repair time in minutes
    pub avg_minutes: u32,
    /// Created timestamp
    #[serde(with = "surreal_datetime")]
    pub created_at: DateTime<Utc>,
}

impl RepairCategory {
    /// Create a new, not yet persisted, category record
    pub fn new(name: &str, avg_minutes: u32) -> Self {
        RepairCategory {
            id: None,
            name: name.to_string(),
            name_key: name_key(name),
            avg_minutes,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_lowercases_unicode() {
        assert_eq!(name_key("Cambio de BATERÍA"), "cambio de batería");
    }

    #[test]
    fn test_name_key_keeps_whitespace() {
        assert_eq!(name_key("  Frenos "), "  frenos ");
    }

    #[test]
    fn test_new_record_derives_key() {
        let record = RepairCategory::new("Alineación Dirección", 45);
        assert!(record.id.is_none());
        assert_eq!(record.name, "Alineación Dirección");
        assert_eq!(record.name_key, "alineación dirección");
        assert_eq!(record.avg_minutes, 45);
    }

    #[test]
    fn test_name_key_ignores_case_only() {
        let record = RepairCategory::new("Cambio de batería", 45);
        assert_eq!(record.name_key, name_key("cambio de batería"));
        assert_eq!(record.name_key, name_key("CAMBIO DE BATERÍA"));
        assert_ne!(record.name_key, name_key("cambio de bateria"));
        assert_ne!(record.name_key, name_key("cambio de batería "));
        assert_ne!(record.name_key, name_key("batería"));
    }
}
