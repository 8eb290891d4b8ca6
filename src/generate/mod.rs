// src/generate/mod.rs — Prompt construction + generation

pub mod chat;
pub mod copy;
pub mod ideas;
pub mod script;
pub mod story;

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;

use crate::infra::config::Config;
use crate::infra::errors::CopyBloomError;
use crate::provider::{ChatChunk, ChatRequest, ModelProvider};
use crate::quality::{QualityRefiner, Refined};

pub use chat::ChatSession;
pub use copy::CopyBrief;
pub use ideas::{parse_video_ideas, VideoIdea};
pub use script::ScriptBrief;
pub use story::{StoryBrief, StoryElements};

/// Drives every content-producing operation: builds the prompt, calls the
/// provider, and runs the result through the quality loop.
pub struct Generator {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_output_tokens: u32,
    temperature: Option<f32>,
    refiner: QualityRefiner,
    refine_enabled: bool,
}

impl Generator {
    pub fn new(provider: Arc<dyn ModelProvider>, config: &Config) -> Self {
        let refiner = QualityRefiner::new(
            provider.clone(),
            config.model.id.clone(),
            config.quality.clone(),
        )
        .with_max_output_tokens(config.model.max_output_tokens);

        Self {
            provider,
            model: config.model.id.clone(),
            max_output_tokens: config.model.max_output_tokens,
            temperature: config.model.temperature,
            refiner,
            refine_enabled: true,
        }
    }

    /// Skip the quality loop entirely (`--no-refine`).
    pub fn with_refine_enabled(mut self, enabled: bool) -> Self {
        self.refine_enabled = enabled;
        self
    }

    pub fn provider(&self) -> &Arc<dyn ModelProvider> {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn refiner(&self) -> &QualityRefiner {
        &self.refiner
    }

    pub(crate) fn refine_enabled(&self) -> bool {
        self.refine_enabled
    }

    pub(crate) fn request(&self, prompt: String) -> ChatRequest {
        let mut req = ChatRequest::prompt(&self.model, prompt).with_max_tokens(self.max_output_tokens);
        if let Some(t) = self.temperature {
            req = req.with_temperature(t);
        }
        req
    }

    /// One raw generation call, no quality loop.
    pub(crate) async fn generate_text(&self, prompt: String) -> Result<String, CopyBloomError> {
        let response = self.provider.chat(self.request(prompt)).await?;
        Ok(response.content)
    }

    /// Stream a raw generation call. Only useful when the quality loop is off;
    /// refinement needs the complete text before it can score anything.
    pub async fn stream_text(
        &self,
        prompt: String,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<ChatChunk, CopyBloomError>> + Send>>, CopyBloomError>
    {
        self.provider.chat_stream(self.request(prompt)).await
    }

    /// Generate then refine. This is the path every user-facing content
    /// operation takes; only the initial generation can fail, the refinement
    /// loop absorbs its own failures.
    pub(crate) async fn generate_refined(&self, prompt: String) -> Result<Refined, CopyBloomError> {
        let initial = self.generate_text(prompt).await?;

        if !self.refine_enabled {
            return Ok(Refined {
                content: initial,
                final_score: 0,
                attempts: 0,
                met_threshold: false,
            });
        }

        Ok(self.refiner.refine(&initial).await)
    }
}
