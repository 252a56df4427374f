// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Report assembly and export: merges the scan record with concurrently
//! gathered summary, OSINT and attack-path data into an ordered section
//! list, renderable as a paginated document or a flat tabular export.

pub mod assembler;
pub mod formats;

use serde::{Deserialize, Serialize};

use crate::osint::OsintRecord;
use crate::types::{AttackStory, ChainOfCustody, Vulnerability};

pub use assembler::ReportAssembler;

/// A report section body that either materialized or degraded. A failed
/// gathering call yields an explicit placeholder, never a missing
/// section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum SectionContent<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T> SectionContent<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, SectionContent::Ready(_))
    }
}

/// One row of the flat tabular export: fixed columns, effective
/// severity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityRow {
    pub id: String,
    pub name: String,
    pub severity: String,
    pub description: String,
    pub cwe: String,
    pub evidence: String,
    pub remediation: String,
}

impl From<&Vulnerability> for VulnerabilityRow {
    fn from(vuln: &Vulnerability) -> Self {
        Self {
            id: vuln.id.clone(),
            name: vuln.name.clone(),
            severity: vuln.effective_severity().to_string(),
            description: vuln.description.clone(),
            cwe: vuln.cwe.clone().unwrap_or_default(),
            evidence: vuln.evidence.clone().unwrap_or_default(),
            remediation: vuln.remediation.clone(),
        }
    }
}

/// Report sections in their fixed rendering order. The attack-path
/// section is omitted entirely (not rendered empty) for scans with no
/// vulnerabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReportSection {
    TitlePage {
        product: String,
        target: String,
        generated_at: String,
        prepared_for: String,
    },
    ExecutiveSummary {
        content: SectionContent<String>,
    },
    AttackPath {
        content: SectionContent<AttackStory>,
    },
    OsintFindings {
        content: SectionContent<OsintRecord>,
    },
    VulnerabilityTable {
        rows: Vec<VulnerabilityRow>,
    },
    VulnerabilityDetail {
        index: usize,
        vulnerability: Vulnerability,
    },
    ChainOfCustody {
        custody: Option<ChainOfCustody>,
    },
    Disclaimer {
        paragraphs: Vec<String>,
    },
}

/// Assembled report for one completed scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub target: String,
    pub generated_at: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn has_attack_path(&self) -> bool {
        self.sections
            .iter()
            .any(|section| matches!(section, ReportSection::AttackPath { .. }))
    }
}
