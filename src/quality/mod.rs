// src/quality/mod.rs — Content-quality refinement loop
//
// Generated marketing text is scored by the same model that produced it and,
// while the score sits under the threshold, rewritten and re-scored up to a
// fixed attempt cap. Every external call inside the loop degrades to a safe
// default on failure, so `refine` never raises past its own boundary.

pub mod parser;

use std::sync::Arc;

use crate::infra::config::QualityConfig;
use crate::provider::{ChatRequest, ModelProvider};

/// Outcome of one refinement run.
#[derive(Debug, Clone)]
pub struct Refined {
    /// The best available version of the content.
    pub content: String,
    /// Score of `content` from its most recent evaluation.
    pub final_score: u8,
    /// Number of rewrite attempts that were made (0..=max_attempts).
    pub attempts: u8,
    /// Whether the final score cleared the configured threshold.
    pub met_threshold: bool,
}

pub struct QualityRefiner {
    provider: Arc<dyn ModelProvider>,
    model: String,
    config: QualityConfig,
    max_output_tokens: u32,
}

impl QualityRefiner {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>, config: QualityConfig) -> Self {
        Self {
            provider,
            model: model.into(),
            config,
            max_output_tokens: 1000,
        }
    }

    /// Output cap applied to improvement rewrites.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Improve `initial` until it meets the quality bar or the attempt cap
    /// is exhausted, then return the best available version.
    ///
    /// With the default config this makes at most 3 evaluation calls and at
    /// most 2 improvement calls. Exhausting the cap below the threshold is a
    /// normal terminal condition, not an error.
    ///
    /// Monotonicity is NOT guaranteed: a rewrite is re-scored against the
    /// threshold but never compared to its predecessor's score, so a rewrite
    /// that the evaluator likes less can still be accepted into the next
    /// iteration. Callers must not rely on each attempt scoring higher than
    /// the last.
    pub async fn refine(&self, initial: &str) -> Refined {
        let mut content = initial.to_string();
        let mut attempts: u8 = 0;

        let mut score = self.evaluate(&content).await;
        tracing::debug!(score, "Initial content quality");

        while score < self.config.score_threshold && attempts < self.config.max_attempts {
            tracing::debug!(
                score,
                threshold = self.config.score_threshold,
                "Score below threshold, rewriting"
            );
            content = self.improve(&content, score).await;
            score = self.evaluate(&content).await;
            attempts += 1;
            tracing::debug!(score, attempts, "Rewritten content quality");
        }

        Refined {
            met_threshold: score >= self.config.score_threshold,
            content,
            final_score: score,
            attempts,
        }
    }

    /// Score `content` from 1 to 10. Provider failure or an unparsable reply
    /// falls back to the configured default score; this never errors.
    pub async fn evaluate(&self, content: &str) -> u8 {
        let request = ChatRequest::prompt(&self.model, evaluation_prompt(content));

        match self.provider.chat(request).await {
            Ok(response) => match parser::extract_score(&response.content) {
                Some(score) => score,
                None => {
                    tracing::warn!(
                        reply = %response.content.chars().take(80).collect::<String>(),
                        "Evaluator reply had no score, using fallback"
                    );
                    self.config.fallback_score
                }
            },
            Err(e) => {
                tracing::warn!("Evaluation call failed: {}, using fallback score", e);
                self.config.fallback_score
            }
        }
    }

    /// Rewrite `content` aiming for the threshold. Provider failure or an
    /// implausibly short reply returns the original content unchanged.
    pub async fn improve(&self, content: &str, current_score: u8) -> String {
        let request = ChatRequest::prompt(
            &self.model,
            improvement_prompt(content, current_score, self.config.score_threshold),
        )
        .with_max_tokens(self.max_output_tokens);

        match self.provider.chat(request).await {
            Ok(response) => {
                let improved = response.content.trim();
                if improved.len() < self.config.min_improved_len {
                    tracing::warn!(
                        len = improved.len(),
                        min = self.config.min_improved_len,
                        "Rewrite suspiciously short, keeping previous content"
                    );
                    content.to_string()
                } else {
                    improved.to_string()
                }
            }
            Err(e) => {
                tracing::warn!("Improvement call failed: {}, keeping previous content", e);
                content.to_string()
            }
        }
    }
}

fn evaluation_prompt(content: &str) -> String {
    format!(
        "Evaluate the quality of the following marketing content on a scale of 1-10.\n\
         Consider these factors: clarity, persuasiveness, engagement, relevance, \
         and call-to-action effectiveness.\n\
         Content to evaluate:\n\
         \"{}\"\n\n\
         Respond with ONLY a number between 1-10, nothing else.",
        content
    )
}

fn improvement_prompt(content: &str, current_score: u8, threshold: u8) -> String {
    format!(
        "The following marketing content scored {}/10 in quality.\n\
         Please improve it to achieve a score of {} or higher while maintaining \
         the same message and intent:\n\
         \"{}\"\n\n\
         Return ONLY the improved content, nothing else.",
        current_score, threshold, content
    )
}
