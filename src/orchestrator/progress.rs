// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Progress and log event stream for an in-flight scan.
//!
//! The orchestrator owns the only mutable state; consumers (UI, test
//! harness) subscribe to the receiver and observe a monotonically
//! increasing progress indicator plus an append-only ordered log.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::mpsc;
use tracing::info;

use crate::types::ScanStatus;

/// Reconnaissance stage descriptions, emitted in this exact order
/// before the AI stages run.
pub const RECON_LOG_LINES: [&str; 8] = [
    "Target confirmed. Initializing scanners...",
    "Checking for open ports (Nmap)...",
    "Analyzing web server configuration...",
    "Scanning for SQL injection vectors...",
    "Probing for Cross-Site Scripting (XSS)...",
    "Checking for insecure headers...",
    "Analyzing robots.txt and sitemap.xml...",
    "Compiling results...",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Log { message: String },
    Progress { percent: u8 },
    StatusChange { status: ScanStatus },
}

/// Emits scan events to an optional subscriber. Progress is clamped to
/// 0-100 and never decreases; stale or lower values are dropped.
pub struct ProgressReporter {
    tx: Option<mpsc::UnboundedSender<ScanEvent>>,
    last_percent: AtomicU8,
}

impl ProgressReporter {
    /// Reporter plus the receiving end for a subscriber.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ScanEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx: Some(tx),
                last_percent: AtomicU8::new(0),
            },
            rx,
        )
    }

    /// Reporter with no subscriber; events are still logged via tracing.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            last_percent: AtomicU8::new(0),
        }
    }

    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        info!(stage = %message, "Scan progress");
        self.send(ScanEvent::Log { message });
    }

    pub fn progress(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.last_percent.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            self.send(ScanEvent::Progress { percent });
        }
    }

    pub fn status(&self, status: ScanStatus) {
        self.send(ScanEvent::StatusChange { status });
    }

    fn send(&self, event: ScanEvent) {
        if let Some(tx) = &self.tx {
            // A dropped receiver must never interrupt the pipeline.
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn progress_is_monotonic() {
        let (reporter, mut rx) = ProgressReporter::channel();

        reporter.progress(10);
        reporter.progress(5); // dropped
        reporter.progress(10); // dropped, not an increase
        reporter.progress(42);
        reporter.progress(200); // clamped to 100

        drop(reporter);

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            if let ScanEvent::Progress { percent } = event {
                seen.push(percent);
            }
        }
        assert_eq!(seen, vec![10, 42, 100]);
    }

    #[tokio::test]
    async fn log_events_arrive_in_order() {
        let (reporter, mut rx) = ProgressReporter::channel();
        for line in RECON_LOG_LINES {
            reporter.log(line);
        }
        drop(reporter);

        let mut messages = Vec::new();
        while let Some(event) = rx.recv().await {
            if let ScanEvent::Log { message } = event {
                messages.push(message);
            }
        }
        assert_eq!(messages, RECON_LOG_LINES.to_vec());
    }

    #[test]
    fn disabled_reporter_does_not_panic() {
        let reporter = ProgressReporter::disabled();
        reporter.log("hello");
        reporter.progress(50);
        reporter.status(ScanStatus::Scanning);
    }
}
