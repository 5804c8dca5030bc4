//! Scripted gateway for tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{ClassifierGateway, SENTINEL_PAYLOAD};

/// Answers every prompt with the same reply and records what it was asked.
#[derive(Debug)]
pub struct ScriptedGateway {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(reply: impl Into<String>) -> Self {
        ScriptedGateway {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A gateway that behaves like a failed provider call.
    pub fn failing() -> Self {
        Self::new(SENTINEL_PAYLOAD)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ClassifierGateway for ScriptedGateway {
    async fn get_completion(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}
