// tests/refiner_test.rs — Integration tests for the quality refinement loop

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::Stream;

use copybloom::infra::config::QualityConfig;
use copybloom::infra::errors::CopyBloomError;
use copybloom::provider::{
    ChatChunk, ChatRequest, ChatResponse, ModelInfo, ModelProvider, StopReason, TokenUsage,
};
use copybloom::quality::QualityRefiner;

// ---------- Scripted provider ----------

/// Plays back a fixed sequence of evaluation scores and rewrites content with
/// a supplied function, while counting calls of each kind. Requests are
/// classified by their prompt text.
struct ScriptedProvider {
    eval_replies: Mutex<VecDeque<String>>,
    improver: Box<dyn Fn(&str) -> String + Send + Sync>,
    eval_calls: AtomicUsize,
    improve_calls: AtomicUsize,
    fail_evals: bool,
    fail_improves: bool,
}

impl ScriptedProvider {
    fn new(eval_replies: &[&str], improver: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            eval_replies: Mutex::new(eval_replies.iter().map(|s| s.to_string()).collect()),
            improver: Box::new(improver),
            eval_calls: AtomicUsize::new(0),
            improve_calls: AtomicUsize::new(0),
            fail_evals: false,
            fail_improves: false,
        }
    }

    fn failing(fail_evals: bool, fail_improves: bool) -> Self {
        let mut p = Self::new(&[], |c| c.to_string());
        p.fail_evals = fail_evals;
        p.fail_improves = fail_improves;
        p
    }

    fn eval_calls(&self) -> usize {
        self.eval_calls.load(Ordering::SeqCst)
    }

    fn improve_calls(&self) -> usize {
        self.improve_calls.load(Ordering::SeqCst)
    }

    /// Pull the content being rewritten out of the improvement prompt.
    fn content_from_improvement_prompt(prompt: &str) -> &str {
        let start = prompt.find("intent:\n\"").map(|i| i + "intent:\n\"".len());
        let end = prompt.rfind("\"\n\nReturn ONLY");
        match (start, end) {
            (Some(s), Some(e)) if e > s => &prompt[s..e],
            _ => "",
        }
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    fn models(&self) -> Vec<ModelInfo> {
        vec![]
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, CopyBloomError> {
        let prompt = &request.messages[0].content;

        let content = if prompt.starts_with("Evaluate the quality") {
            self.eval_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_evals {
                return Err(CopyBloomError::Provider {
                    provider: "scripted".into(),
                    message: "HTTP 500".into(),
                    retriable: false,
                });
            }
            self.eval_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "9".to_string())
        } else if prompt.starts_with("The following marketing content scored") {
            self.improve_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_improves {
                return Err(CopyBloomError::Provider {
                    provider: "scripted".into(),
                    message: "HTTP 500".into(),
                    retriable: false,
                });
            }
            (self.improver)(Self::content_from_improvement_prompt(prompt))
        } else {
            panic!("unexpected prompt: {}", prompt);
        };

        Ok(ChatResponse {
            content,
            usage: TokenUsage::default(),
            stop_reason: StopReason::EndTurn,
        })
    }

    async fn chat_stream(
        &self,
        _request: ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<ChatChunk, CopyBloomError>> + Send>>, CopyBloomError>
    {
        Err(CopyBloomError::NoProvider)
    }
}

fn refiner(provider: Arc<ScriptedProvider>, config: QualityConfig) -> QualityRefiner {
    QualityRefiner::new(provider, "gemini-1.5-flash", config)
}

fn loose_config() -> QualityConfig {
    // Short test strings would trip the truncation guard otherwise.
    QualityConfig {
        min_improved_len: 1,
        ..QualityConfig::default()
    }
}

// ---------- Loop behavior ----------

#[tokio::test]
async fn good_content_passes_through_unchanged() {
    let provider = Arc::new(ScriptedProvider::new(&["9"], |c| format!("{} [improved]", c)));
    let r = refiner(provider.clone(), loose_config());

    let result = r.refine("Buy now!").await;

    assert_eq!(result.content, "Buy now!");
    assert_eq!(result.final_score, 9);
    assert_eq!(result.attempts, 0);
    assert!(result.met_threshold);
    assert_eq!(provider.eval_calls(), 1);
    assert_eq!(provider.improve_calls(), 0);
}

#[tokio::test]
async fn hopeless_content_stops_after_two_rewrites() {
    let provider = Arc::new(ScriptedProvider::new(&["1", "1", "1"], |c| {
        format!("{} [improved]", c)
    }));
    let r = refiner(provider.clone(), loose_config());

    let result = r.refine("meh").await;

    assert_eq!(provider.eval_calls(), 3);
    assert_eq!(provider.improve_calls(), 2);
    assert_eq!(result.attempts, 2);
    assert_eq!(result.final_score, 1);
    assert!(!result.met_threshold);
    assert!(!result.content.is_empty());
}

#[tokio::test]
async fn scores_climb_and_rewrites_accumulate() {
    // 4 then 6 trigger rewrites; 9 ends the loop.
    let provider = Arc::new(ScriptedProvider::new(&["4", "6", "9"], |c| {
        format!("{} [improved]", c)
    }));
    let r = refiner(provider.clone(), loose_config());

    let result = r.refine("Buy now!").await;

    assert_eq!(result.content, "Buy now! [improved] [improved]");
    assert_eq!(result.final_score, 9);
    assert_eq!(result.attempts, 2);
    assert!(result.met_threshold);
    assert_eq!(provider.eval_calls(), 3);
    assert_eq!(provider.improve_calls(), 2);
}

#[tokio::test]
async fn threshold_cleared_on_first_rewrite() {
    let provider = Arc::new(ScriptedProvider::new(&["5", "8"], |c| {
        format!("{} [improved]", c)
    }));
    let r = refiner(provider.clone(), loose_config());

    let result = r.refine("Buy now!").await;

    assert_eq!(result.content, "Buy now! [improved]");
    assert_eq!(result.attempts, 1);
    assert!(result.met_threshold);
    assert_eq!(provider.improve_calls(), 1);
}

// ---------- Degradation ----------

#[tokio::test]
async fn suspiciously_short_rewrite_is_discarded() {
    let provider = Arc::new(ScriptedProvider::new(&["4", "9"], |_| "ok".to_string()));
    // Default config keeps the 50-char truncation guard.
    let r = refiner(provider.clone(), QualityConfig::default());

    let original = "This campaign copy is long enough to dodge the truncation guard easily.";
    let result = r.refine(original).await;

    // The rewrite was rejected, so the original survives the attempt.
    assert_eq!(result.content, original);
    assert_eq!(result.attempts, 1);
    assert_eq!(provider.improve_calls(), 1);
}

#[tokio::test]
async fn evaluator_reply_with_prose_still_scores() {
    let provider = Arc::new(ScriptedProvider::new(&["Score: 7/10, well done", "8"], |c| {
        format!("{} [improved]", c)
    }));
    let r = refiner(provider.clone(), loose_config());

    let result = r.refine("Buy now!").await;

    // First reply parses as 7, which is below threshold.
    assert_eq!(result.attempts, 1);
    assert!(result.met_threshold);
}

#[tokio::test]
async fn evaluator_reply_without_digits_uses_fallback() {
    let provider = Arc::new(ScriptedProvider::new(&["looks great to me!"], |c| c.to_string()));
    let r = refiner(provider.clone(), loose_config());

    let score = r.evaluate("Buy now!").await;

    assert_eq!(score, QualityConfig::default().fallback_score);
}

#[tokio::test]
async fn failing_evaluator_uses_fallback_score() {
    let provider = Arc::new(ScriptedProvider::failing(true, false));
    let r = refiner(provider.clone(), loose_config());

    let score = r.evaluate("Buy now!").await;

    assert_eq!(score, 7);
}

#[tokio::test]
async fn total_provider_outage_returns_original_content() {
    // Both call kinds fail; refine must still hand back usable content.
    let provider = Arc::new(ScriptedProvider::failing(true, true));
    let r = refiner(provider.clone(), loose_config());

    let result = r.refine("Buy now!").await;

    assert_eq!(result.content, "Buy now!");
    assert_eq!(result.final_score, 7);
    assert_eq!(result.attempts, 2);
    assert!(!result.met_threshold);
    assert_eq!(provider.eval_calls(), 3);
    assert_eq!(provider.improve_calls(), 2);
}

#[tokio::test]
async fn failing_improver_keeps_previous_content() {
    let provider = Arc::new(ScriptedProvider::failing(false, true));
    {
        let mut replies = provider.eval_replies.lock().unwrap();
        replies.push_back("4".into());
        replies.push_back("4".into());
        replies.push_back("4".into());
    }
    let r = refiner(provider.clone(), loose_config());

    let result = r.refine("Buy now!").await;

    assert_eq!(result.content, "Buy now!");
    assert_eq!(result.attempts, 2);
}
