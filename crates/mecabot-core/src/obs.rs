//! Structured events for the classification lifecycle.
//!
//! Every classification runs inside a `mecabot.classify` span carrying a
//! request id, so interleaved concurrent requests can be told apart in the
//! logs. Event names are stable: `classification.started`,
//! `classification.model_unusable`, `classification.store_fault` and
//! `classification.resolved`.

use tracing::{info, warn, Span};
use uuid::Uuid;

/// Request-scoped span. Attach it with `tracing::Instrument` rather than
/// entering it, since the classification future is awaited across threads.
#[derive(Debug, Clone)]
pub struct ClassificationSpan {
    span: Span,
    request_id: Uuid,
}

impl ClassificationSpan {
    pub fn new() -> Self {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("mecabot.classify", request_id = %request_id);
        Self { span, request_id }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Default for ClassificationSpan {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit event: a description entered the pipeline.
pub fn emit_classification_started(description_chars: usize) {
    info!(
        event = "classification.started",
        description_chars = description_chars
    );
}

/// Emit event: the model reply was not an acceptable classification.
pub fn emit_model_unusable(reason: &str) {
    info!(event = "classification.model_unusable", reason = %reason);
}

/// Emit event: the category store failed during fallback.
pub fn emit_store_fault(error: &dyn std::fmt::Display, propagated: bool) {
    tracing::error!(
        event = "classification.store_fault",
        error = %error,
        propagated = propagated,
    );
}

/// Emit event: classification finished.
pub fn emit_classification_resolved(source: &str, category: Option<&str>, minutes: Option<u32>) {
    match (category, minutes) {
        (Some(category), Some(minutes)) => info!(
            event = "classification.resolved",
            source = %source,
            category = %category,
            minutes = minutes,
        ),
        _ => info!(event = "classification.resolved", source = %source, classified = false),
    }
}

/// Emit event: a model category is not in the compiled catalog.
pub fn emit_category_outside_catalog(category: &str) {
    warn!(event = "classification.outside_catalog", category = %category);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_get_distinct_request_ids() {
        let a = ClassificationSpan::new();
        let b = ClassificationSpan::new();
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_emitters_do_not_panic_without_subscriber() {
        emit_classification_started(42);
        emit_model_unusable("not json");
        emit_store_fault(&"connection refused", false);
        emit_classification_resolved("model", Some("cambio_aceite"), Some(30));
        emit_classification_resolved("none", None, None);
        emit_category_outside_catalog("lavado");
    }
}
