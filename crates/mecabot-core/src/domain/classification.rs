//! Classification result and its wire shape.

use serde::{Deserialize, Serialize};

use super::code::CategoryCode;

/// Outcome of classifying one problem description.
///
/// On the wire this is always `{"category": ..., "minutes": ...}` with both
/// fields set or both `null`. `Unclassified` is a valid answer ("no match
/// found"), not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ClassificationWire", into = "ClassificationWire")]
pub enum ClassificationResult {
    Classified { category: CategoryCode, minutes: u32 },
    Unclassified,
}

impl ClassificationResult {
    pub fn classified(category: CategoryCode, minutes: u32) -> Self {
        ClassificationResult::Classified { category, minutes }
    }

    pub fn category(&self) -> Option<&CategoryCode> {
        match self {
            ClassificationResult::Classified { category, .. } => Some(category),
            ClassificationResult::Unclassified => None,
        }
    }

    pub fn minutes(&self) -> Option<u32> {
        match self {
            ClassificationResult::Classified { minutes, .. } => Some(*minutes),
            ClassificationResult::Unclassified => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, ClassificationResult::Classified { .. })
    }
}

/// Two nullable fields, exactly as the model is asked to reply.
///
/// Unknown fields are rejected so that a reply with a different shape
/// counts as unparseable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationWire {
    pub category: Option<String>,
    pub minutes: Option<u32>,
}

impl ClassificationWire {
    /// Both fields present, or nothing. A half-filled reply is unclassified.
    pub fn into_result(self) -> ClassificationResult {
        match (self.category, self.minutes) {
            (Some(category), Some(minutes)) => {
                ClassificationResult::classified(CategoryCode::trusted(category), minutes)
            }
            _ => ClassificationResult::Unclassified,
        }
    }
}

impl From<ClassificationWire> for ClassificationResult {
    fn from(wire: ClassificationWire) -> Self {
        wire.into_result()
    }
}

impl From<ClassificationResult> for ClassificationWire {
    fn from(result: ClassificationResult) -> Self {
        match result {
            ClassificationResult::Classified { category, minutes } => ClassificationWire {
                category: Some(category.as_str().to_string()),
                minutes: Some(minutes),
            },
            ClassificationResult::Unclassified => ClassificationWire::default(),
        }
    }
}
