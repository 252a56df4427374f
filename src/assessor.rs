// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Contextual severity assessment, fanned out per vulnerability.
//!
//! Assessment is best-effort enrichment: a failed call leaves that one
//! vulnerability with its as-generated severity and the stage as a
//! whole always succeeds.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::completion::{PromptTemplate, StructuredClient};
use crate::types::{GeneratedVulnerability, Severity};

const ASSESSMENT_PROMPT: PromptTemplate = PromptTemplate::new(
    "assess_vulnerability",
    "You are a senior security analyst reviewing the findings of an automated vulnerability scan.",
    r#"Given the vulnerability below and the context in which it was found, assign a contextual severity and justify it.

Respond with a JSON object containing exactly two fields: 'assessedSeverity' (one of 'Critical', 'High', 'Medium', 'Low') and 'assessmentJustification' (one or two sentences explaining the rating in this context).

**Vulnerability (JSON):**
{{vulnerability}}

**Context:**
{{context}}
"#,
);

#[derive(Debug, Serialize, Validate)]
struct AssessmentInput {
    #[validate(length(min = 2))]
    vulnerability: String,
    #[validate(length(min = 1))]
    context: String,
}

/// A successful per-item assessment.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeverityAssessment {
    pub assessed_severity: Severity,
    pub assessment_justification: String,
}

/// Assesses each vulnerability independently, all calls issued
/// concurrently with a bounded in-flight cap.
#[derive(Clone)]
pub struct SeverityAssessor {
    client: StructuredClient,
    concurrency: usize,
}

impl SeverityAssessor {
    pub fn new(client: StructuredClient, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    /// Assess every vulnerability. The returned vector is positionally
    /// aligned with the input; a `None` marks an item whose assessment
    /// failed and which keeps its original severity.
    pub async fn assess_all(
        &self,
        vulnerabilities: &[GeneratedVulnerability],
        context: &str,
    ) -> Vec<Option<SeverityAssessment>> {
        let indexed: Vec<(usize, Option<SeverityAssessment>)> =
            stream::iter(vulnerabilities.iter().enumerate())
                .map(|(index, vuln)| async move { (index, self.assess_one(vuln, context).await) })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut results: Vec<Option<SeverityAssessment>> = vec![None; vulnerabilities.len()];
        for (index, assessment) in indexed {
            results[index] = assessment;
        }
        results
    }

    async fn assess_one(
        &self,
        vulnerability: &GeneratedVulnerability,
        context: &str,
    ) -> Option<SeverityAssessment> {
        let serialized = match serde_json::to_string(vulnerability) {
            Ok(json) => json,
            Err(e) => {
                warn!(vulnerability = %vulnerability.name, error = %e, "Could not serialize vulnerability for assessment");
                return None;
            }
        };

        let input = AssessmentInput {
            vulnerability: serialized,
            context: context.to_string(),
        };

        match self.client.complete(&ASSESSMENT_PROMPT, &input).await {
            Ok(assessment) => Some(assessment),
            Err(e) => {
                warn!(
                    vulnerability = %vulnerability.name,
                    error = %e,
                    "Severity assessment failed, keeping original severity"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_parses_model_shape() {
        let raw = r#"{
            "assessedSeverity": "Critical",
            "assessmentJustification": "Login page is internet-facing."
        }"#;
        let assessment: SeverityAssessment = serde_json::from_str(raw).unwrap();
        assert_eq!(assessment.assessed_severity, Severity::Critical);
    }

    #[test]
    fn assessment_rejects_unknown_severity() {
        let raw = r#"{
            "assessedSeverity": "Catastrophic",
            "assessmentJustification": "nope"
        }"#;
        assert!(serde_json::from_str::<SeverityAssessment>(raw).is_err());
    }
}
