// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

pub mod core;

pub use core::{AppConfig, CompletionConfig, OrchestratorConfig, OsintConfig};
