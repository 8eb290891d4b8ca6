// src/provider/google.rs — Google Generative AI (Gemini) provider

use async_trait::async_trait;
use futures::Stream;
use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use std::pin::Pin;

use super::{ChatChunk, ChatRequest, ChatResponse, ModelInfo, ModelProvider, Role, StopReason, TokenUsage};
use crate::infra::errors::CopyBloomError;

pub struct GoogleProvider {
    api_key: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn base_url(&self) -> &str {
        "https://generativelanguage.googleapis.com/v1beta"
    }

    /// Build the Gemini request body from a ChatRequest.
    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = Vec::new();

        for m in &request.messages {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "model",
            };

            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": m.content }],
            }));
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "safetySettings": safety_settings(),
        });

        // System instruction
        if let Some(ref system) = request.system {
            body["system_instruction"] = serde_json::json!({
                "parts": [{ "text": system }],
            });
        }

        // Generation config
        let mut gen_config = serde_json::json!({});
        if let Some(max_tokens) = request.max_tokens {
            gen_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            gen_config["temperature"] = serde_json::json!(temp);
        }
        if gen_config != serde_json::json!({}) {
            body["generationConfig"] = gen_config;
        }

        body
    }
}

/// Marketing output should stay brand-safe; block anything medium or above.
fn safety_settings() -> serde_json::Value {
    serde_json::json!([
        { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
        { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
        { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
        { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
    ])
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    fn models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gemini-1.5-flash".into(),
                name: "Gemini 1.5 Flash".into(),
                context_window: 1_048_576,
                max_output_tokens: 8_192,
                supports_streaming: true,
            },
            ModelInfo {
                id: "gemini-1.5-pro".into(),
                name: "Gemini 1.5 Pro".into(),
                context_window: 2_097_152,
                max_output_tokens: 8_192,
                supports_streaming: true,
            },
            ModelInfo {
                id: "gemini-2.0-flash".into(),
                name: "Gemini 2.0 Flash".into(),
                context_window: 1_048_576,
                max_output_tokens: 8_192,
                supports_streaming: true,
            },
        ]
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, CopyBloomError> {
        let body = self.build_request_body(&request);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url(),
            request.model,
            self.api_key,
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CopyBloomError::Provider {
                provider: "google".into(),
                message: e.to_string(),
                retriable: e.is_timeout() || e.is_connect(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CopyBloomError::RateLimited {
                provider: "google".into(),
                retry_after_ms: 5000,
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CopyBloomError::Provider {
                provider: "google".into(),
                message: format!("HTTP {}: {}", status, error_body),
                retriable: status.is_server_error(),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| CopyBloomError::Provider {
                provider: "google".into(),
                message: format!("Failed to parse response: {}", e),
                retriable: false,
            })?;

        let stop_reason = match resp["candidates"][0]["finishReason"].as_str() {
            Some("STOP") => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY") => StopReason::Safety,
            _ => StopReason::Unknown,
        };

        // Extract text content from candidates[0].content.parts
        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut content = String::new();
        for part in &parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }

        if content.is_empty() {
            if stop_reason == StopReason::Safety {
                return Err(CopyBloomError::SafetyBlocked {
                    provider: "google".into(),
                });
            }
            return Err(CopyBloomError::EmptyResponse);
        }

        let usage = TokenUsage {
            input_tokens: resp["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .unwrap_or(0) as u32,
            output_tokens: resp["usageMetadata"]["candidatesTokenCount"]
                .as_u64()
                .unwrap_or(0) as u32,
        };

        Ok(ChatResponse {
            content,
            usage,
            stop_reason,
        })
    }

    async fn chat_stream(
        &self,
        request: ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<ChatChunk, CopyBloomError>> + Send>>, CopyBloomError>
    {
        let body = self.build_request_body(&request);

        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url(),
            request.model,
            self.api_key,
        );

        let request_builder = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body);

        let mut es = request_builder
            .eventsource()
            .map_err(|e| CopyBloomError::Provider {
                provider: "google".into(),
                message: format!("Failed to open SSE stream: {}", e),
                retriable: false,
            })?;

        let stream = async_stream::stream! {
            while let Some(event) = es.next().await {
                match event {
                    Ok(Event::Open) => {},
                    Ok(Event::Message(msg)) => {
                        if msg.data == "[DONE]" {
                            break;
                        }
                        let parsed: serde_json::Value = match serde_json::from_str(&msg.data) {
                            Ok(v) => v,
                            Err(e) => {
                                yield Err(CopyBloomError::Provider {
                                    provider: "google".into(),
                                    message: format!("Failed to parse SSE data: {}", e),
                                    retriable: false,
                                });
                                break;
                            }
                        };

                        let parts = parsed["candidates"][0]["content"]["parts"]
                            .as_array()
                            .cloned()
                            .unwrap_or_default();

                        let mut delta_text = String::new();
                        for part in &parts {
                            if let Some(text) = part["text"].as_str() {
                                delta_text.push_str(text);
                            }
                        }

                        let usage = if parsed["usageMetadata"].is_object() {
                            let input = parsed["usageMetadata"]["promptTokenCount"]
                                .as_u64()
                                .unwrap_or(0) as u32;
                            let output = parsed["usageMetadata"]["candidatesTokenCount"]
                                .as_u64()
                                .unwrap_or(0) as u32;
                            if input > 0 || output > 0 {
                                Some(TokenUsage {
                                    input_tokens: input,
                                    output_tokens: output,
                                })
                            } else {
                                None
                            }
                        } else {
                            None
                        };

                        if !delta_text.is_empty() || usage.is_some() {
                            yield Ok(ChatChunk {
                                delta: delta_text,
                                usage,
                            });
                        }
                    }
                    Err(reqwest_eventsource::Error::StreamEnded) => break,
                    Err(e) => {
                        yield Err(CopyBloomError::Provider {
                            provider: "google".into(),
                            message: format!("SSE stream error: {}", e),
                            retriable: false,
                        });
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_roles_and_config() {
        let provider = GoogleProvider::new("test-key".into());
        let request = ChatRequest {
            model: "gemini-1.5-flash".into(),
            messages: vec![
                super::super::Message::user("hi"),
                super::super::Message::assistant("hello"),
            ],
            max_tokens: Some(1000),
            temperature: Some(0.5),
            system: Some("be brief".into()),
        };
        let body = provider.build_request_body(&request);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_request_body_omits_empty_generation_config() {
        let provider = GoogleProvider::new("test-key".into());
        let request = ChatRequest::prompt("gemini-1.5-flash", "hi");
        let body = provider.build_request_body(&request);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_model_catalog_includes_default() {
        let provider = GoogleProvider::new("test-key".into());
        assert!(provider.models().iter().any(|m| m.id == "gemini-1.5-flash"));
    }
}
