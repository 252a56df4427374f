// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Orchestrator
 * Drives the scan pipeline state machine: persisted stage sequencing,
 * progress reporting and partial-failure handling.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

pub mod progress;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::assessor::SeverityAssessor;
use crate::config::OrchestratorConfig;
use crate::errors::{GenerationError, PipelineError, PipelineResult};
use crate::generator::{VulnerabilityGenerator, SIMULATED_SCAN_ARTIFACT};
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::store::ScanStore;
use crate::types::{ChainOfCustody, Scan, ScanStatus, Vulnerability};

pub use progress::{ProgressReporter, ScanEvent, RECON_LOG_LINES};

/// Everything needed to start one scan.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub owner_id: String,
    pub url: String,
    pub custody: ChainOfCustody,
    /// Raw scan-log artifact from the scan-log producer. Defaults to the
    /// simulated artifact when absent.
    pub scan_artifact: Option<String>,
}

/// Runs the scan pipeline for a single target. One orchestrator
/// invocation owns one scan document; the caller must not start two
/// runs for the same scan id. The orchestrator is the only writer of
/// `status`.
pub struct ScanOrchestrator {
    store: Arc<dyn ScanStore>,
    generator: VulnerabilityGenerator,
    assessor: SeverityAssessor,
    reporter: ProgressReporter,
    retry: RetryConfig,
    recon_step_delay: Duration,
}

impl ScanOrchestrator {
    pub fn new(
        store: Arc<dyn ScanStore>,
        generator: VulnerabilityGenerator,
        assessor: SeverityAssessor,
        config: &OrchestratorConfig,
        reporter: ProgressReporter,
    ) -> Self {
        Self {
            store,
            generator,
            assessor,
            reporter,
            retry: RetryConfig::default().with_max_attempts(config.generation_retries + 1),
            recon_step_delay: Duration::from_millis(config.recon_step_delay_ms),
        }
    }

    /// Run the pipeline to a terminal state. Stage failures are absorbed
    /// into the persisted record (returned with status Failed); only
    /// storage and configuration errors propagate as `Err`. Writes are
    /// ordered and individually awaited: create (Queued), patch
    /// (Scanning + custody), patch (terminal + results).
    pub async fn run(&self, request: ScanRequest) -> PipelineResult<Scan> {
        let mut scan = Scan {
            id: String::new(),
            owner_id: request.owner_id.clone(),
            url: request.url.clone(),
            status: ScanStatus::Queued,
            created_at: Utc::now().to_rfc3339(),
            completed_at: None,
            vulnerabilities: Vec::new(),
            summary: None,
            chain_of_custody: None,
        };
        scan.id = self.store.create(&request.owner_id, &scan).await?;
        info!(scan_id = %scan.id, url = %scan.url, "Scan created");

        self.transition(&mut scan, ScanStatus::Scanning)?;
        scan.chain_of_custody = Some(request.custody.clone());
        self.store
            .patch(
                &scan.owner_id,
                &scan.id,
                json!({
                    "status": scan.status,
                    "chainOfCustody": request.custody,
                }),
            )
            .await?;

        self.recon_phase().await;

        self.reporter.log("Running AI-powered vulnerability generation...");
        self.reporter.progress(70);
        let artifact = request
            .scan_artifact
            .as_deref()
            .unwrap_or(SIMULATED_SCAN_ARTIFACT);

        let generated = retry_with_backoff(
            &self.retry,
            "vulnerability_generation",
            || self.generator.generate(artifact),
            GenerationError::is_retryable,
        )
        .await;

        let generated = match generated {
            Ok(list) => list,
            Err(e) => {
                error!(scan_id = %scan.id, error = %e, "Vulnerability generation failed");
                return self.fail(scan).await;
            }
        };
        info!(scan_id = %scan.id, count = generated.len(), "Vulnerabilities generated");

        self.reporter.log("Running AI-powered severity assessment...");
        self.reporter.progress(85);
        let context = format!("The vulnerability was found on the {} website.", scan.url);
        let assessments = self.assessor.assess_all(&generated, &context).await;

        scan.vulnerabilities = generated
            .into_iter()
            .zip(assessments)
            .enumerate()
            .map(|(index, (vuln, assessment))| {
                let (assessed_severity, assessment_justification) = match assessment {
                    Some(a) => (Some(a.assessed_severity), Some(a.assessment_justification)),
                    None => (None, None),
                };
                Vulnerability {
                    id: format!("vuln-{}-{}", scan.id, index),
                    name: vuln.name,
                    description: vuln.description,
                    severity: vuln.severity,
                    cwe: vuln.cwe,
                    remediation: vuln.remediation,
                    evidence: vuln.evidence,
                    assessed_severity,
                    assessment_justification,
                }
            })
            .collect();

        self.transition(&mut scan, ScanStatus::Completed)?;
        scan.completed_at = Some(Utc::now().to_rfc3339());
        self.store
            .patch(
                &scan.owner_id,
                &scan.id,
                json!({
                    "status": scan.status,
                    "completedAt": scan.completed_at,
                    "vulnerabilities": scan.vulnerabilities,
                }),
            )
            .await?;

        self.reporter.progress(100);
        self.reporter.log("Scan complete.");
        info!(scan_id = %scan.id, vulnerabilities = scan.vulnerabilities.len(), "Scan completed");

        // Read back the persisted record so callers observe exactly
        // what downstream consumers will.
        let persisted = self.store.get(&scan.owner_id, &scan.id).await?;
        Ok(persisted)
    }

    /// Cosmetic reconnaissance pacing. The log lines are part of the
    /// observable contract; the delay is not.
    async fn recon_phase(&self) {
        let total = RECON_LOG_LINES.len() as u32;
        for (index, line) in RECON_LOG_LINES.iter().enumerate() {
            self.reporter.log(*line);
            self.reporter
                .progress(((index as u32 + 1) * 60 / total) as u8);
            if !self.recon_step_delay.is_zero() {
                tokio::time::sleep(self.recon_step_delay).await;
            }
        }
    }

    async fn fail(&self, mut scan: Scan) -> PipelineResult<Scan> {
        self.transition(&mut scan, ScanStatus::Failed)?;
        scan.completed_at = Some(Utc::now().to_rfc3339());
        self.store
            .patch(
                &scan.owner_id,
                &scan.id,
                json!({
                    "status": scan.status,
                    "completedAt": scan.completed_at,
                }),
            )
            .await?;
        self.reporter.log("Scan failed.");

        let persisted = self.store.get(&scan.owner_id, &scan.id).await?;
        Ok(persisted)
    }

    fn transition(&self, scan: &mut Scan, next: ScanStatus) -> PipelineResult<()> {
        if !scan.status.can_transition_to(next) {
            return Err(PipelineError::Configuration(format!(
                "illegal scan status transition {} -> {}",
                scan.status, next
            )));
        }
        scan.status = next;
        self.reporter.status(next);
        Ok(())
    }
}
