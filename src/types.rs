// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};

/// Scan lifecycle states. Transitions are monotonic: Queued -> Scanning
/// -> Completed | Failed. Terminal states are never left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanStatus {
    Queued,
    Scanning,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }

    pub fn can_transition_to(&self, next: ScanStatus) -> bool {
        matches!(
            (self, next),
            (ScanStatus::Queued, ScanStatus::Scanning)
                | (ScanStatus::Scanning, ScanStatus::Completed)
                | (ScanStatus::Scanning, ScanStatus::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Queued => "Queued",
            ScanStatus::Scanning => "Scanning",
            ScanStatus::Completed => "Completed",
            ScanStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vulnerability severity. Serialized capitalized to match the persisted
/// document format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank, most severe first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable audit record of who initiated a scan, from where, and when.
/// Attached at scan creation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainOfCustody {
    pub user_id: String,
    pub user_ip: String,
    pub user_agent: String,
    pub timestamp: String,
}

/// A confirmed finding attached to a scan.
///
/// `severity` is the as-generated value and is retained for audit even
/// after assessment; `assessed_severity`, when present, is the
/// authoritative severity for reporting and counting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessed_severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_justification: Option<String>,
}

impl Vulnerability {
    /// The severity used everywhere findings are counted or exported:
    /// the assessed value when present, the raw value otherwise.
    pub fn effective_severity(&self) -> Severity {
        self.assessed_severity.unwrap_or(self.severity)
    }
}

/// A candidate vulnerability as produced by the generator, before an id
/// is assigned. Deserialized straight from model output, so every field
/// is validated by shape here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVulnerability {
    pub name: String,
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub cwe: Option<String>,
    pub remediation: String,
    #[serde(default)]
    pub evidence: Option<String>,
}

/// Root aggregate tracking one vulnerability-assessment run for one
/// target URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub id: String,
    pub owner_id: String,
    pub url: String,
    pub status: ScanStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_of_custody: Option<ChainOfCustody>,
}

impl Scan {
    /// Count findings by effective severity, ordered Critical, High,
    /// Medium, Low.
    pub fn severity_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for vuln in &self.vulnerabilities {
            counts[vuln.effective_severity().rank() as usize] += 1;
        }
        counts
    }
}

/// One step in a reconstructed attack narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryStep {
    pub step: u32,
    pub title: String,
    pub description: String,
}

/// Ordered attack narrative. Step numbers are contiguous starting at 1;
/// the generation contract asks for 3-5 steps but consumers must not
/// assume an exact count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackStory {
    pub steps: Vec<StoryStep>,
}
