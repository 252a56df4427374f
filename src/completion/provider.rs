// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! LLM Provider abstraction layer.
//!
//! Supports:
//! - Claude API (Anthropic) — default, best reasoning
//! - Ollama (local) — offline/privacy mode

use std::time::Duration;

use crate::config::CompletionConfig;
use crate::errors::CompletionError;

/// A plain-text completion backend. The structured client layers schema
/// validation on top; providers only move prompts and text.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a system prompt plus a user prompt and return the model's
    /// text response.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError>;

    /// Provider name for display
    fn name(&self) -> &str;

    /// Model identifier for display
    fn model(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Claude API provider
// ---------------------------------------------------------------------------

pub struct ClaudeProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_tokens: u32,
    base_url: String,
}

impl ClaudeProvider {
    pub fn new(
        api_key: String,
        model: Option<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::provider(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| "claude-sonnet-4-5-20250929".to_string()),
            client,
            max_tokens,
            base_url: "https://api.anthropic.com".to_string(),
        })
    }

    /// Point the provider at a different endpoint (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ClaudeProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::provider(format!("Claude API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CompletionError::provider(format!(
                "Claude API error ({status}): {error_body}"
            )));
        }

        let api_response: serde_json::Value = response.json().await.map_err(|e| {
            CompletionError::provider(format!("Failed to parse Claude API response: {e}"))
        })?;

        extract_text_blocks(&api_response["content"]).ok_or_else(|| {
            CompletionError::provider("Claude response contained no text content".to_string())
        })
    }

    fn name(&self) -> &str {
        "claude"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn extract_text_blocks(content: &serde_json::Value) -> Option<String> {
    let blocks = content.as_array()?;
    let text: Vec<&str> = blocks
        .iter()
        .filter(|b| b["type"].as_str() == Some("text"))
        .filter_map(|b| b["text"].as_str())
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Ollama provider (local models)
// ---------------------------------------------------------------------------

pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(model: Option<String>, base_url: Option<String>) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // Local models can be slow
            .build()
            .map_err(|e| CompletionError::provider(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.unwrap_or_else(|| "http://localhost:11434".to_string()),
            model: model.unwrap_or_else(|| "llama3.1:70b".to_string()),
            client,
        })
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                CompletionError::provider(format!(
                    "Failed to connect to Ollama (is it running? `ollama serve`): {e}"
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CompletionError::provider(format!(
                "Ollama error ({status}): {error_body}"
            )));
        }

        let api_response: serde_json::Value = response.json().await.map_err(|e| {
            CompletionError::provider(format!("Failed to parse Ollama response: {e}"))
        })?;

        api_response["message"]["content"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                CompletionError::provider("Ollama response contained no message content".to_string())
            })
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Claude,
    Ollama,
}

impl std::str::FromStr for ProviderType {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderType::Claude),
            "ollama" | "local" => Ok(ProviderType::Ollama),
            other => Err(CompletionError::provider(format!(
                "Unknown provider '{other}'. Use 'claude' or 'ollama'."
            ))),
        }
    }
}

/// Create a completion provider from configuration.
pub fn create_provider(
    config: &CompletionConfig,
) -> Result<Box<dyn CompletionProvider>, CompletionError> {
    let provider_type: ProviderType = config.provider.parse()?;

    match provider_type {
        ProviderType::Claude => {
            let key = config
                .api_key
                .clone()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
                .ok_or_else(|| {
                    CompletionError::provider(
                        "Claude API key required. Set ANTHROPIC_API_KEY or configure api_key.",
                    )
                })?;
            Ok(Box::new(ClaudeProvider::new(
                key,
                config.model.clone(),
                config.max_tokens,
                Duration::from_secs(config.timeout_secs),
            )?))
        }
        ProviderType::Ollama => Ok(Box::new(OllamaProvider::new(
            config.model.clone(),
            config.ollama_url.clone(),
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_type_parses_aliases() {
        assert_eq!("claude".parse::<ProviderType>().unwrap(), ProviderType::Claude);
        assert_eq!("Anthropic".parse::<ProviderType>().unwrap(), ProviderType::Claude);
        assert_eq!("local".parse::<ProviderType>().unwrap(), ProviderType::Ollama);
        assert!("gpt".parse::<ProviderType>().is_err());
    }

    #[test]
    fn text_blocks_are_joined() {
        let content = serde_json::json!([
            { "type": "text", "text": "hello" },
            { "type": "tool_use", "id": "x" },
            { "type": "text", "text": "world" },
        ]);
        assert_eq!(extract_text_blocks(&content).unwrap(), "hello\nworld");
        assert!(extract_text_blocks(&serde_json::json!([])).is_none());
    }
}
