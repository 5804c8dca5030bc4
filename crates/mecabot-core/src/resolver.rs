//! Classification resolution pipeline.
//!
//! One request runs four stages in order: prompt construction, a single
//! model call, a strict parse of the reply and, only when the model gave no
//! usable answer, one case-insensitive store lookup on the trimmed original
//! description. There are no retries and no loops between stages.

use std::sync::Arc;

use category_store::CategoryStore;
use llm_gateway::ClassifierGateway;
use serde::{Deserialize, Serialize};
use tracing::{debug, Instrument};

use crate::catalog::CategoryCatalog;
use crate::domain::{CategoryCode, ClassificationResult, ClassificationWire, Result};
use crate::metrics::METRICS;
use crate::obs::{self, ClassificationSpan};
use crate::prompt::PromptTemplate;

/// What to do when the category store fails during the fallback lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreFaultPolicy {
    /// Log and count the fault, then answer `Unclassified`.
    #[default]
    TreatAsNotFound,
    /// Return the fault to the caller as `MecabotError::Store`.
    Propagate,
}

/// Which stage produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Model,
    Store,
    None,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Model => "model",
            ResolutionSource::Store => "store",
            ResolutionSource::None => "none",
        }
    }
}

/// A classification together with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub source: ResolutionSource,
}

/// Outcome of the strict parse stage.
///
/// `Unclassified` and `Unparseable` lead to the same fallback; they are kept
/// apart only so the logs can say why the model answer was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ModelVerdict {
    Classified(ClassificationResult),
    Unclassified,
    Unparseable(String),
}

/// Decode the model reply as exactly `{"category": .., "minutes": ..}`.
///
/// Only a JSON object is accepted. serde would otherwise also decode a
/// two-element array such as `["cambio_aceite", 30]` into the wire struct.
pub(crate) fn parse_model_reply(reply: &str) -> ModelVerdict {
    let value = match serde_json::from_str::<serde_json::Value>(reply) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        Ok(other) => {
            return ModelVerdict::Unparseable(format!("expected a JSON object, got {}", other))
        }
        Err(e) => return ModelVerdict::Unparseable(e.to_string()),
    };
    match serde_json::from_value::<ClassificationWire>(value) {
        Ok(wire) => match wire.into_result() {
            ClassificationResult::Unclassified => ModelVerdict::Unclassified,
            classified => ModelVerdict::Classified(classified),
        },
        Err(e) => ModelVerdict::Unparseable(e.to_string()),
    }
}

/// Resolves free-text problem descriptions into a category and minutes.
///
/// Holds no per-request state; one resolver can serve any number of
/// concurrent `classify` calls.
pub struct ClassificationResolver<G: ?Sized, S: ?Sized> {
    gateway: Arc<G>,
    store: Arc<S>,
    catalog: CategoryCatalog,
    template: PromptTemplate,
    store_fault_policy: StoreFaultPolicy,
}

impl<G, S> ClassificationResolver<G, S>
where
    G: ClassifierGateway + ?Sized,
    S: CategoryStore + ?Sized,
{
    pub fn new(gateway: Arc<G>, store: Arc<S>, catalog: CategoryCatalog) -> Self {
        let template = PromptTemplate::new(&catalog);
        Self {
            gateway,
            store,
            catalog,
            template,
            store_fault_policy: StoreFaultPolicy::default(),
        }
    }

    pub fn with_store_fault_policy(mut self, policy: StoreFaultPolicy) -> Self {
        self.store_fault_policy = policy;
        self
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn store_fault_policy(&self) -> StoreFaultPolicy {
        self.store_fault_policy
    }

    /// The exact prompt `classify` would send for `description`.
    pub fn prompt_for(&self, description: &str) -> String {
        self.template.render(description)
    }

    /// Classify `description`.
    ///
    /// Only a store fault under [`StoreFaultPolicy::Propagate`] produces an
    /// error; every other failure ends as `Unclassified`.
    pub async fn classify(&self, description: &str) -> Result<ClassificationResult> {
        Ok(self.resolve(description).await?.result)
    }

    /// Like [`classify`](Self::classify), but also reports which stage answered.
    pub async fn resolve(&self, description: &str) -> Result<Resolution> {
        let span = ClassificationSpan::new();
        self.run_pipeline(description).instrument(span.span()).await
    }

    async fn run_pipeline(&self, description: &str) -> Result<Resolution> {
        METRICS.inc_classifications();
        obs::emit_classification_started(description.chars().count());

        let prompt = self.template.render(description);
        let reply = self.gateway.get_completion(&prompt).await;
        debug!(reply_len = reply.len(), "model reply received");

        match parse_model_reply(&reply) {
            ModelVerdict::Classified(result) => {
                if let Some(code) = result.category() {
                    if self.catalog.get(code.as_str()).is_none() {
                        obs::emit_category_outside_catalog(code.as_str());
                    }
                }
                METRICS.inc_model_accepted();
                return Ok(finish(result, ResolutionSource::Model));
            }
            ModelVerdict::Unclassified => obs::emit_model_unusable("model returned null fields"),
            ModelVerdict::Unparseable(reason) => obs::emit_model_unusable(&reason),
        }

        self.fall_back_to_store(description.trim()).await
    }

    async fn fall_back_to_store(&self, name: &str) -> Result<Resolution> {
        match self.store.find_by_name_case_insensitive(name).await {
            Ok(Some(record)) => {
                METRICS.inc_store_hits();
                let result = ClassificationResult::classified(
                    CategoryCode::from_display_name(&record.name),
                    record.avg_minutes,
                );
                Ok(finish(result, ResolutionSource::Store))
            }
            Ok(None) => Ok(finish(
                ClassificationResult::Unclassified,
                ResolutionSource::None,
            )),
            Err(err) => {
                METRICS.inc_store_faults();
                match self.store_fault_policy {
                    StoreFaultPolicy::TreatAsNotFound => {
                        obs::emit_store_fault(&err, false);
                        Ok(finish(
                            ClassificationResult::Unclassified,
                            ResolutionSource::None,
                        ))
                    }
                    StoreFaultPolicy::Propagate => {
                        obs::emit_store_fault(&err, true);
                        Err(err.into())
                    }
                }
            }
        }
    }
}

fn finish(result: ClassificationResult, source: ResolutionSource) -> Resolution {
    if !result.is_classified() {
        METRICS.inc_unclassified();
    }
    obs::emit_classification_resolved(
        source.as_str(),
        result.category().map(|c| c.as_str()),
        result.minutes(),
    );
    Resolution { result, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(code: &str, minutes: u32) -> ModelVerdict {
        ModelVerdict::Classified(ClassificationResult::classified(
            CategoryCode::trusted(code),
            minutes,
        ))
    }

    #[test]
    fn test_parse_accepts_both_fields() {
        assert_eq!(
            parse_model_reply(r#"{"category":"cambio_aceite","minutes":30}"#),
            classified("cambio_aceite", 30)
        );
    }

    #[test]
    fn test_parse_allows_surrounding_whitespace() {
        assert_eq!(
            parse_model_reply(" \n{\"category\":\"cambio_bateria\", \"minutes\":20}\n"),
            classified("cambio_bateria", 20)
        );
    }

    #[test]
    fn test_parse_trusts_model_category_verbatim() {
        assert_eq!(
            parse_model_reply(r#"{"category":"Cambio Raro","minutes":5}"#),
            classified("Cambio Raro", 5)
        );
    }

    #[test]
    fn test_parse_null_fields_is_unclassified() {
        assert_eq!(
            parse_model_reply(r#"{"category":null, "minutes":null}"#),
            ModelVerdict::Unclassified
        );
        assert_eq!(parse_model_reply("{}"), ModelVerdict::Unclassified);
    }

    #[test]
    fn test_parse_half_filled_is_unclassified() {
        assert_eq!(
            parse_model_reply(r#"{"category":"cambio_aceite","minutes":null}"#),
            ModelVerdict::Unclassified
        );
        assert_eq!(
            parse_model_reply(r#"{"category":null,"minutes":30}"#),
            ModelVerdict::Unclassified
        );
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        let cases = [
            "Claro, aquí tienes la categoría: cambio_aceite",
            "",
            "null",
            "[]",
            r#"["cambio_aceite", 30]"#,
            "[null, null]",
            r#""cambio_aceite""#,
            r#"{"category":"cambio_aceite","minutes":-5}"#,
            r#"{"category":"cambio_aceite","minutes":30.5}"#,
            r#"{"category":"cambio_aceite","minutes":"30"}"#,
            r#"{"category":42,"minutes":30}"#,
            r#"{"category":"cambio_aceite","minutes":30,"confidence":0.9}"#,
            r#"Respuesta: {"category":"cambio_aceite","minutes":30}"#,
            r#"{"category":"cambio_aceite","minutes":30} gracias"#,
            r#"{"category":"cambio_aceite","#,
        ];
        for case in cases {
            assert!(
                matches!(parse_model_reply(case), ModelVerdict::Unparseable(_)),
                "expected unparseable: {case:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_array_with_valid_values() {
        match parse_model_reply(r#"["cambio_aceite",30]"#) {
            ModelVerdict::Unparseable(reason) => assert!(reason.contains("JSON object")),
            other => panic!("array reply must not classify: {other:?}"),
        }
    }

    #[test]
    fn test_resolution_serializes_flat() {
        let resolution = Resolution {
            result: ClassificationResult::classified(CategoryCode::trusted("cambio_aceite"), 30),
            source: ResolutionSource::Model,
        };
        assert_eq!(
            serde_json::to_value(&resolution).unwrap(),
            serde_json::json!({"category": "cambio_aceite", "minutes": 30, "source": "model"})
        );

        let none = Resolution {
            result: ClassificationResult::Unclassified,
            source: ResolutionSource::None,
        };
        assert_eq!(
            serde_json::to_value(&none).unwrap(),
            serde_json::json!({"category": null, "minutes": null, "source": "none"})
        );
    }

    #[test]
    fn test_store_fault_policy_default_and_names() {
        assert_eq!(StoreFaultPolicy::default(), StoreFaultPolicy::TreatAsNotFound);
        assert_eq!(
            serde_json::to_value(StoreFaultPolicy::Propagate).unwrap(),
            serde_json::json!("propagate")
        );
        assert_eq!(
            serde_json::to_value(StoreFaultPolicy::TreatAsNotFound).unwrap(),
            serde_json::json!("treat-as-not-found")
        );
    }
}
