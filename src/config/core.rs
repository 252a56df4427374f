// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{PipelineError, PipelineResult};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub completion: CompletionConfig,

    #[validate(nested)]
    pub osint: OsintConfig,

    #[serde(default)]
    #[validate(nested)]
    pub orchestrator: OrchestratorConfig,
}

/// Structured completion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletionConfig {
    /// Provider selection: "claude" (default) or "ollama"
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub ollama_url: Option<String>,

    #[validate(range(min = 256, max = 65536))]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[validate(range(min = 1, max = 600))]
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            api_key: None,
            ollama_url: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

/// OSINT provider configuration. Every credential is optional: a missing
/// key makes that provider report Unconfigured rather than failing the
/// aggregate. Base URLs are overridable so tests can point at a mock
/// server.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OsintConfig {
    #[serde(default)]
    pub reputation_api_key: Option<String>,

    #[serde(default)]
    pub registration_api_key: Option<String>,

    #[serde(default)]
    pub host_api_key: Option<String>,

    #[serde(default)]
    pub certificate_api_key: Option<String>,

    #[validate(url)]
    #[serde(default = "default_reputation_base_url")]
    pub reputation_base_url: String,

    #[validate(url)]
    #[serde(default = "default_registration_base_url")]
    pub registration_base_url: String,

    #[validate(url)]
    #[serde(default = "default_host_base_url")]
    pub host_base_url: String,

    #[validate(url)]
    #[serde(default = "default_certificate_base_url")]
    pub certificate_base_url: String,

    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_osint_timeout")]
    pub timeout_secs: u64,
}

impl Default for OsintConfig {
    fn default() -> Self {
        Self {
            reputation_api_key: None,
            registration_api_key: None,
            host_api_key: None,
            certificate_api_key: None,
            reputation_base_url: default_reputation_base_url(),
            registration_base_url: default_registration_base_url(),
            host_base_url: default_host_base_url(),
            certificate_base_url: default_certificate_base_url(),
            timeout_secs: default_osint_timeout(),
        }
    }
}

/// Orchestrator pacing and fan-out configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrchestratorConfig {
    /// Delay between reconnaissance log lines, in milliseconds. Zero in
    /// headless use; the UI sets a nonzero value for visible pacing.
    #[serde(default)]
    pub recon_step_delay_ms: u64,

    /// In-flight cap for concurrent severity assessments.
    #[validate(range(min = 1, max = 64))]
    #[serde(default = "default_assessment_concurrency")]
    pub assessment_concurrency: usize,

    /// Extra attempts for the generation stage on transient provider
    /// failures (total attempts = retries + 1).
    #[validate(range(max = 10))]
    #[serde(default = "default_generation_retries")]
    pub generation_retries: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            recon_step_delay_ms: 0,
            assessment_concurrency: default_assessment_concurrency(),
            generation_retries: default_generation_retries(),
        }
    }
}

fn default_provider() -> String {
    "claude".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_completion_timeout() -> u64 {
    120
}

fn default_reputation_base_url() -> String {
    "https://www.virustotal.com".to_string()
}

fn default_registration_base_url() -> String {
    "https://www.whoisxmlapi.com".to_string()
}

fn default_host_base_url() -> String {
    "https://api.shodan.io".to_string()
}

fn default_certificate_base_url() -> String {
    "https://api.certspotter.com".to_string()
}

fn default_osint_timeout() -> u64 {
    30
}

fn default_assessment_concurrency() -> usize {
    8
}

fn default_generation_retries() -> u32 {
    2
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> PipelineResult<Self> {
        let completion = CompletionConfig {
            provider: std::env::var("COMPLETION_PROVIDER").unwrap_or_else(|_| default_provider()),
            model: std::env::var("COMPLETION_MODEL").ok(),
            api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            ollama_url: std::env::var("OLLAMA_URL").ok(),
            max_tokens: env_parsed("COMPLETION_MAX_TOKENS", default_max_tokens()),
            timeout_secs: env_parsed("COMPLETION_TIMEOUT_SECS", default_completion_timeout()),
        };

        let osint = OsintConfig {
            reputation_api_key: std::env::var("VIRUSTOTAL_API_KEY").ok(),
            registration_api_key: std::env::var("WHOISXML_API_KEY").ok(),
            host_api_key: std::env::var("SHODAN_API_KEY").ok(),
            certificate_api_key: std::env::var("SSLMATE_API_KEY").ok(),
            ..OsintConfig::default()
        };

        let orchestrator = OrchestratorConfig {
            recon_step_delay_ms: env_parsed("RECON_STEP_DELAY_MS", 0),
            assessment_concurrency: env_parsed(
                "ASSESSMENT_CONCURRENCY",
                default_assessment_concurrency(),
            ),
            generation_retries: env_parsed("GENERATION_RETRIES", default_generation_retries()),
        };

        let config = Self {
            completion,
            osint,
            orchestrator,
        };

        config
            .validate()
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        Ok(config)
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
