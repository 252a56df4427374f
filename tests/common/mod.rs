// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

// Each test binary exercises a subset of this harness.
#![allow(dead_code)]

/**
 * Bountyy Oy - Shared Test Harness
 * Scripted completion provider for deterministic pipeline tests
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use vigilante_scanner::completion::CompletionProvider;
use vigilante_scanner::errors::CompletionError;

/// A canned reply for one matched completion call.
#[derive(Debug, Clone)]
pub enum CannedResponse {
    Json(String),
    ProviderError(String),
}

impl CannedResponse {
    pub fn json(body: &str) -> Self {
        CannedResponse::Json(body.to_string())
    }

    pub fn provider_error(reason: &str) -> Self {
        CannedResponse::ProviderError(reason.to_string())
    }
}

struct Rule {
    needle: String,
    responses: Mutex<VecDeque<CannedResponse>>,
}

/// Deterministic completion provider: the first rule whose needle
/// appears in the system-plus-user prompt wins. A rule with several
/// responses pops them in order and repeats the last one.
#[derive(Default)]
pub struct ScriptedProvider {
    rules: Vec<Rule>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, needle: &str, response: CannedResponse) -> Self {
        self.on_sequence(needle, vec![response])
    }

    pub fn on_sequence(mut self, needle: &str, responses: Vec<CannedResponse>) -> Self {
        assert!(!responses.is_empty(), "a rule needs at least one response");
        self.rules.push(Rule {
            needle: needle.to_string(),
            responses: Mutex::new(responses.into()),
        });
        self
    }

    /// Total completion calls observed, across all rules.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let haystack = format!("{system}\n{prompt}");

        for rule in &self.rules {
            if haystack.contains(&rule.needle) {
                let mut responses = rule.responses.lock().unwrap();
                let response = if responses.len() > 1 {
                    responses.pop_front().unwrap()
                } else {
                    responses.front().cloned().unwrap()
                };
                return match response {
                    CannedResponse::Json(body) => Ok(body),
                    CannedResponse::ProviderError(reason) => {
                        Err(CompletionError::Provider { reason })
                    }
                };
            }
        }

        Err(CompletionError::Provider {
            reason: "no scripted response matched the prompt".to_string(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "test"
    }
}

/// Needle matching the vulnerability-generation prompt.
pub const GENERATION_NEEDLE: &str = "Convert the raw scan alerts";

/// Needle matching the executive-summary prompt.
pub const SUMMARY_NEEDLE: &str = "Summarize the vulnerability findings";

/// Needle matching the attack-story prompt.
pub const STORY_NEEDLE: &str = "step-by-step story";

/// A generation response with one entry per (name, severity) pair.
pub fn generation_body(vulns: &[(&str, &str)]) -> String {
    let entries: Vec<serde_json::Value> = vulns
        .iter()
        .map(|(name, severity)| {
            serde_json::json!({
                "name": name,
                "description": format!("{name} was detected."),
                "severity": severity,
                "cwe": "CWE-89",
                "remediation": format!("Fix {name}."),
                "evidence": format!("Evidence for {name}."),
            })
        })
        .collect();
    serde_json::json!({ "vulnerabilities": entries }).to_string()
}

/// An assessment response with the given severity and justification.
pub fn assessment_body(severity: &str, justification: &str) -> String {
    serde_json::json!({
        "assessedSeverity": severity,
        "assessmentJustification": justification,
    })
    .to_string()
}

/// An attack-story response with `count` contiguous steps.
pub fn story_body(count: u32) -> String {
    let steps: Vec<serde_json::Value> = (1..=count)
        .map(|number| {
            serde_json::json!({
                "step": number,
                "title": format!("Step {number}"),
                "description": format!("The attacker performs step {number}."),
            })
        })
        .collect();
    serde_json::json!({ "attackStory": steps }).to_string()
}

/// A summary response with fixed prose.
pub fn summary_body(text: &str) -> String {
    serde_json::json!({ "summary": text }).to_string()
}
