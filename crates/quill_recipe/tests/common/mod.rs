//! Shared test doubles for the recipe engine.

#![allow(dead_code)]

use async_trait::async_trait;
use quill_core::{GenerationSettings, Recipe, StepDefinition};
use quill_error::GenerationError;
use quill_interface::{GenerationBackend, RawResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One call as seen by the backend.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub settings: GenerationSettings,
}

/// Backend that replays scripted answers and records every call.
///
/// Once the script runs out it answers `reply <n>` with a normal stop,
/// where `n` counts calls from 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<VecDeque<Result<RawResponse, GenerationError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Vec<Result<RawResponse, GenerationError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            ..Self::default()
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<RawResponse, GenerationError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                model: model.to_string(),
                prompt: prompt.to_string(),
                settings: settings.clone(),
            });
            calls.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(RawResponse::stop(format!("reply {}", n))))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// The two-step blog recipe used across tests.
pub fn blog_recipe() -> Recipe {
    Recipe::builder()
        .name("blog")
        .description("Blog posts about a city")
        .steps(vec![
            StepDefinition::new(1, "Research {city}."),
            StepDefinition::new(2, "Write a post about {city}."),
        ])
        .build()
        .unwrap()
}
