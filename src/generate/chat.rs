// src/generate/chat.rs — Marketing assistant chat

use super::Generator;
use crate::infra::errors::CopyBloomError;
use crate::provider::{ChatRequest, Message};

const ASSISTANT_SYSTEM_PROMPT: &str = "You are a marketing assistant for CopyBloom. \
You help with copy generation, campaign ideas, and optimization suggestions. \
Keep replies practical and grounded in the user's campaign context.";

/// Conversation state for one chat session, owned by the caller.
///
/// History is capped: once `limit` entries accumulate, the oldest are dropped
/// so long sessions stay inside the model's token budget. One user message
/// plus one assistant reply count as two entries.
#[derive(Debug, Clone)]
pub struct ChatSession {
    history: Vec<Message>,
    limit: usize,
}

impl ChatSession {
    pub fn new(limit: usize) -> Self {
        Self {
            history: Vec::new(),
            limit,
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    fn push(&mut self, message: Message) {
        self.history.push(message);
        if self.history.len() > self.limit {
            let overflow = self.history.len() - self.limit;
            self.history.drain(..overflow);
        }
    }

    /// Send one user message: history plus the new message goes to the model,
    /// the reply runs through the quality loop, and both sides are recorded.
    pub async fn send(
        &mut self,
        generator: &Generator,
        message: &str,
    ) -> Result<String, CopyBloomError> {
        let mut messages = self.history.clone();
        messages.push(Message::user(message));

        let request = ChatRequest {
            model: generator.model().to_string(),
            messages,
            max_tokens: Some(1000),
            temperature: None,
            system: Some(ASSISTANT_SYSTEM_PROMPT.into()),
        };

        let response = generator.provider().chat(request).await?;
        let refined = generator.refine_reply(&response.content).await;

        self.push(Message::user(message));
        self.push(Message::assistant(refined.clone()));

        Ok(refined)
    }
}

impl Generator {
    /// Run a chat reply through the quality loop when refinement is enabled.
    pub(crate) async fn refine_reply(&self, reply: &str) -> String {
        if !self.refine_enabled() {
            return reply.to_string();
        }
        self.refiner().refine(reply).await.content
    }
}
