// src/provider/fallback.rs — Fallback chain for provider resilience
//
// Tries candidates in order, moving on when a call fails with a transient
// error. A failed candidate is put on cooldown so later requests in the same
// session skip it. Safety rejections surface immediately: every candidate
// would reject the same prompt.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::Stream;

use super::{ChatChunk, ChatRequest, ChatResponse, ModelInfo, ModelProvider};
use crate::infra::errors::CopyBloomError;

pub struct FallbackCandidate {
    pub provider: Arc<dyn ModelProvider>,
    /// Model id used for this candidate instead of the request's model.
    pub model_override: Option<String>,
}

impl FallbackCandidate {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            model_override: None,
        }
    }

    pub fn with_model(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model_override: Some(model.into()),
        }
    }

    fn key(&self) -> String {
        match &self.model_override {
            Some(model) => format!("{}/{}", self.provider.id(), model),
            None => self.provider.id().to_string(),
        }
    }
}

pub struct FallbackProvider {
    candidates: Vec<FallbackCandidate>,
    cooldowns: Mutex<HashMap<String, Instant>>,
    cooldown_duration: Duration,
}

impl FallbackProvider {
    pub fn new(candidates: Vec<FallbackCandidate>) -> Self {
        Self {
            candidates,
            cooldowns: Mutex::new(HashMap::new()),
            cooldown_duration: Duration::from_secs(60),
        }
    }

    fn is_cooled_down(&self, key: &str) -> bool {
        let cooldowns = self.cooldowns.lock().unwrap_or_else(|p| p.into_inner());
        cooldowns
            .get(key)
            .is_some_and(|start| start.elapsed() < self.cooldown_duration)
    }

    fn mark_failed(&self, key: &str) {
        let mut cooldowns = self.cooldowns.lock().unwrap_or_else(|p| p.into_inner());
        cooldowns.insert(key.to_string(), Instant::now());
    }

    fn request_for(&self, candidate: &FallbackCandidate, request: &ChatRequest) -> ChatRequest {
        let mut req = request.clone();
        if let Some(ref model) = candidate.model_override {
            req.model = model.clone();
        }
        req
    }

    /// Transient errors and empty replies move on to the next candidate.
    fn falls_through(error: &CopyBloomError) -> bool {
        error.is_retriable() || matches!(error, CopyBloomError::EmptyResponse)
    }
}

#[async_trait]
impl ModelProvider for FallbackProvider {
    fn id(&self) -> &str {
        "fallback"
    }

    fn name(&self) -> &str {
        "Fallback chain"
    }

    fn models(&self) -> Vec<ModelInfo> {
        self.candidates
            .first()
            .map(|c| c.provider.models())
            .unwrap_or_default()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, CopyBloomError> {
        for candidate in &self.candidates {
            let key = candidate.key();
            if self.is_cooled_down(&key) {
                continue;
            }

            match candidate
                .provider
                .chat(self.request_for(candidate, &request))
                .await
            {
                Ok(response) => return Ok(response),
                Err(e) if Self::falls_through(&e) => {
                    tracing::warn!(candidate = %key, "Candidate failed, trying fallback: {}", e);
                    self.mark_failed(&key);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(CopyBloomError::AllProvidersExhausted)
    }

    async fn chat_stream(
        &self,
        request: ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<ChatChunk, CopyBloomError>> + Send>>, CopyBloomError>
    {
        // Fall through only on connection failures; mid-stream errors are
        // surfaced to the consumer as-is.
        for candidate in &self.candidates {
            let key = candidate.key();
            if self.is_cooled_down(&key) {
                continue;
            }

            match candidate
                .provider
                .chat_stream(self.request_for(candidate, &request))
                .await
            {
                Ok(stream) => return Ok(stream),
                Err(e) if Self::falls_through(&e) => {
                    tracing::warn!(candidate = %key, "Candidate stream failed, trying fallback: {}", e);
                    self.mark_failed(&key);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(CopyBloomError::AllProvidersExhausted)
    }
}
