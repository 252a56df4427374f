// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Pipeline Error Types
 * Production-ready error handling with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use thiserror::Error;

/// Errors produced by the structured completion client.
///
/// The two variants are deliberately distinct: schema failures are never
/// retried (the model produced output that does not match the contract),
/// while provider failures are transient infrastructure errors that
/// callers may retry.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The model response could not be coerced to the declared output
    /// schema (malformed JSON, missing required field, invalid enum value).
    #[error("Schema validation failed: {reason} (response snippet: {snippet})")]
    SchemaValidation { reason: String, snippet: String },

    /// The completion call itself failed (timeout, auth, rate limit,
    /// non-2xx response).
    #[error("Completion provider error: {reason}")]
    Provider { reason: String },
}

impl CompletionError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompletionError::Provider { .. })
    }

    pub(crate) fn schema(reason: impl Into<String>, raw: &str) -> Self {
        CompletionError::SchemaValidation {
            reason: reason.into(),
            snippet: truncate_snippet(raw, 200),
        }
    }

    pub(crate) fn provider(reason: impl Into<String>) -> Self {
        CompletionError::Provider {
            reason: reason.into(),
        }
    }
}

fn truncate_snippet(raw: &str, max: usize) -> String {
    if raw.len() <= max {
        return raw.to_string();
    }
    let mut end = max;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &raw[..end])
}

/// Fatal failure of the vulnerability generation stage. There is no
/// meaningful partial vulnerability list, so this always flips the scan
/// to Failed.
#[derive(Error, Debug)]
#[error("Vulnerability generation failed: {source}")]
pub struct GenerationError {
    #[from]
    source: CompletionError,
}

impl GenerationError {
    /// Retryable only when the underlying failure was transient
    /// provider trouble, never for schema violations.
    pub fn is_retryable(&self) -> bool {
        self.source.is_retryable()
    }
}

/// OSINT aggregation errors. Provider-level failures never surface here;
/// they degrade to absent sub-records. Only malformed input escapes the
/// aggregator.
#[derive(Error, Debug)]
pub enum OsintError {
    #[error("Invalid scan target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
}

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Scan {id} not found for owner {owner_id}")]
    NotFound { owner_id: String, id: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Top-level pipeline error with comprehensive variants
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Structured completion errors
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Vulnerability generation stage errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// OSINT aggregation errors
    #[error("OSINT error: {0}")]
    Osint(#[from] OsintError),

    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Completion(e) => e.is_retryable(),
            PipelineError::Generation(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
