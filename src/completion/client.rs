// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use validator::Validate;

use super::provider::CompletionProvider;
use crate::errors::CompletionError;

/// An opaque prompt text with named `{{placeholder}}` slots, filled from
/// the serialized input value at call time.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: &'static str,
    system: &'static str,
    text: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, system: &'static str, text: &'static str) -> Self {
        Self { name, system, text }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn system(&self) -> &'static str {
        self.system
    }

    /// Substitute every `{{placeholder}}` from the given input object.
    /// String values are inserted verbatim; other values as JSON. A
    /// placeholder with no matching input field is a contract violation.
    pub fn render(&self, input: &serde_json::Value) -> Result<String, CompletionError> {
        let fields = input.as_object().ok_or_else(|| {
            CompletionError::schema("prompt input must serialize to an object", self.text)
        })?;

        let mut rendered = self.text.to_string();
        for placeholder in placeholders(self.text) {
            let value = fields.get(placeholder.as_str()).ok_or_else(|| {
                CompletionError::schema(
                    format!("no input value for placeholder '{{{{{placeholder}}}}}'"),
                    self.text,
                )
            })?;
            let substitution = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            rendered = rendered.replace(&format!("{{{{{placeholder}}}}}"), &substitution);
        }

        Ok(rendered)
    }
}

fn placeholders(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        rest = &rest[start + 2..];
        if let Some(end) = rest.find("}}") {
            let name = &rest[..end];
            if !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !names.iter().any(|n| n == name)
            {
                names.push(name.to_string());
            }
            rest = &rest[end + 2..];
        } else {
            break;
        }
    }
    names
}

/// Wraps a completion provider into a typed call: validate the input,
/// render the template, invoke the provider, and validate the response
/// against the output type. Performs no retries; retry policy belongs to
/// callers.
#[derive(Clone)]
pub struct StructuredClient {
    provider: Arc<dyn CompletionProvider>,
}

impl StructuredClient {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn complete<I, O>(
        &self,
        template: &PromptTemplate,
        input: &I,
    ) -> Result<O, CompletionError>
    where
        I: Serialize + Validate,
        O: DeserializeOwned,
    {
        input
            .validate()
            .map_err(|e| CompletionError::schema(format!("input validation failed: {e}"), ""))?;

        let input_value = serde_json::to_value(input)
            .map_err(|e| CompletionError::schema(format!("input serialization failed: {e}"), ""))?;

        let prompt = template.render(&input_value)?;

        debug!(
            template = template.name(),
            provider = self.provider.name(),
            model = self.provider.model(),
            "Invoking structured completion"
        );

        let raw = self.provider.complete(template.system(), &prompt).await?;

        let payload = extract_json_payload(&raw);
        serde_json::from_str(payload)
            .map_err(|e| CompletionError::schema(format!("response does not match schema: {e}"), &raw))
    }
}

/// Models often wrap JSON in prose or markdown fences. Locate the JSON
/// payload: prefer a fenced block, otherwise the span from the first
/// opening brace/bracket to the last closing one.
fn extract_json_payload(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(fence_start) = trimmed.find("```") {
        let after_fence = &trimmed[fence_start + 3..];
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(fence_end) = body.find("```") {
            return body[..fence_end].trim();
        }
    }

    let open = trimmed.find(['{', '[']);
    let close = trimmed.rfind(['}', ']']);
    match (open, close) {
        (Some(start), Some(end)) if end >= start => trimmed[start..=end].trim(),
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Mutex;

    struct CannedProvider {
        responses: Mutex<Vec<Result<String, CompletionError>>>,
    }

    impl CannedProvider {
        fn new(responses: Vec<Result<String, CompletionError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, CompletionError> {
            self.responses
                .lock()
                .unwrap()
                .remove(0)
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    #[derive(Serialize, Validate)]
    struct EchoInput {
        #[validate(length(min = 1))]
        message: String,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct EchoOutput {
        echoed: String,
    }

    const ECHO: PromptTemplate = PromptTemplate::new("echo", "You echo things.", "Echo: {{message}}");

    #[test]
    fn render_substitutes_placeholders() {
        let rendered = ECHO
            .render(&serde_json::json!({ "message": "hi there" }))
            .unwrap();
        assert_eq!(rendered, "Echo: hi there");
    }

    #[test]
    fn render_fails_on_missing_placeholder_value() {
        let err = ECHO.render(&serde_json::json!({ "other": 1 })).unwrap_err();
        assert!(matches!(err, CompletionError::SchemaValidation { .. }));
    }

    #[test]
    fn non_string_values_render_as_json() {
        const T: PromptTemplate = PromptTemplate::new("t", "", "Count: {{count}}");
        let rendered = T.render(&serde_json::json!({ "count": 3 })).unwrap();
        assert_eq!(rendered, "Count: 3");
    }

    #[test]
    fn json_payload_is_found_inside_fences() {
        let raw = "Here you go:\n```json\n{\"echoed\": \"hi\"}\n```\nanything else";
        assert_eq!(extract_json_payload(raw), "{\"echoed\": \"hi\"}");
    }

    #[test]
    fn json_payload_is_found_inside_prose() {
        let raw = "Sure! {\"echoed\": \"hi\"} Hope that helps.";
        assert_eq!(extract_json_payload(raw), "{\"echoed\": \"hi\"}");
    }

    #[tokio::test]
    async fn complete_parses_valid_response() {
        let provider = CannedProvider::new(vec![Ok("{\"echoed\": \"hi\"}".to_string())]);
        let client = StructuredClient::new(provider);
        let out: EchoOutput = client
            .complete(
                &ECHO,
                &EchoInput {
                    message: "hi".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(out.echoed, "hi");
    }

    #[tokio::test]
    async fn complete_rejects_schema_mismatch() {
        let provider = CannedProvider::new(vec![Ok("{\"unexpected\": true}".to_string())]);
        let client = StructuredClient::new(provider);
        let err = client
            .complete::<_, EchoOutput>(
                &ECHO,
                &EchoInput {
                    message: "hi".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::SchemaValidation { .. }));
    }

    #[tokio::test]
    async fn complete_propagates_provider_errors() {
        let provider = CannedProvider::new(vec![Err(CompletionError::provider("rate limit"))]);
        let client = StructuredClient::new(provider);
        let err = client
            .complete::<_, EchoOutput>(
                &ECHO,
                &EchoInput {
                    message: "hi".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn complete_rejects_invalid_input() {
        let provider = CannedProvider::new(vec![Ok("{}".to_string())]);
        let client = StructuredClient::new(provider);
        let err = client
            .complete::<_, EchoOutput>(
                &ECHO,
                &EchoInput {
                    message: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
    }
}
