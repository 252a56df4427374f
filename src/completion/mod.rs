// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Structured completion layer: a provider abstraction over LLM HTTP
//! APIs plus a client that turns prompt templates and typed schemas
//! into validated structured output.

pub mod client;
pub mod provider;

pub use client::{PromptTemplate, StructuredClient};
pub use provider::{create_provider, ClaudeProvider, CompletionProvider, OllamaProvider, ProviderType};
