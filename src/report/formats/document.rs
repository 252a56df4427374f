// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use chrono::{Datelike, Utc};

use crate::osint::{OsintRecord, ProviderResult};
use crate::report::{Report, ReportSection, SectionContent};
use crate::types::Vulnerability;

const UNAVAILABLE_PLACEHOLDER: &str = "This section could not be generated";

/// One rendered page of the report document.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub title: String,
    pub body: String,
    pub footer: String,
}

/// A paginated, human-readable rendering of an assembled report.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(&"=".repeat(72));
            out.push('\n');
            out.push_str(&page.title);
            out.push_str("\n\n");
            out.push_str(&page.body);
            out.push_str("\n\n");
            out.push_str(&page.footer);
            out.push('\n');
        }
        out
    }
}

/// Renders an assembled report section-by-section, one page per
/// section, in the report's fixed order.
pub struct DocumentRenderer {
    product_name: String,
}

impl DocumentRenderer {
    pub fn new() -> Self {
        Self {
            product_name: "VigilanteAI".to_string(),
        }
    }

    pub fn render(&self, report: &Report) -> RenderedDocument {
        let drafts: Vec<(String, String)> = report
            .sections
            .iter()
            .map(|section| self.render_section(section))
            .collect();

        let total = drafts.len();
        let year = Utc::now().year();
        let pages = drafts
            .into_iter()
            .enumerate()
            .map(|(index, (title, body))| Page {
                number: index + 1,
                title,
                body,
                footer: format!(
                    "(c) {} {}. All rights reserved. -- Page {} of {}",
                    year,
                    self.product_name,
                    index + 1,
                    total
                ),
            })
            .collect();

        RenderedDocument { pages }
    }

    fn render_section(&self, section: &ReportSection) -> (String, String) {
        match section {
            ReportSection::TitlePage {
                product,
                target,
                generated_at,
                prepared_for,
            } => (
                format!("{product} - Vulnerability Scan Report"),
                format!(
                    "Target URL: {target}\nDate: {generated_at}\n\nReport Prepared For:\n{prepared_for}"
                ),
            ),
            ReportSection::ExecutiveSummary { content } => (
                "Executive Summary".to_string(),
                match content {
                    SectionContent::Ready(summary) => summary.clone(),
                    SectionContent::Unavailable { reason } => {
                        format!("{UNAVAILABLE_PLACEHOLDER}: {reason}")
                    }
                },
            ),
            ReportSection::AttackPath { content } => (
                "Simulated Attack Path".to_string(),
                match content {
                    SectionContent::Ready(story) => {
                        let mut body = String::new();
                        for step in &story.steps {
                            body.push_str(&format!(
                                "Step {}: {}\n    {}\n",
                                step.step, step.title, step.description
                            ));
                        }
                        body
                    }
                    SectionContent::Unavailable { reason } => {
                        format!("{UNAVAILABLE_PLACEHOLDER}: {reason}")
                    }
                },
            ),
            ReportSection::OsintFindings { content } => (
                "OSINT Findings".to_string(),
                match content {
                    SectionContent::Ready(record) => render_osint(record),
                    SectionContent::Unavailable { reason } => {
                        format!("{UNAVAILABLE_PLACEHOLDER}: {reason}")
                    }
                },
            ),
            ReportSection::VulnerabilityTable { rows } => {
                let mut body = String::from("Severity | Vulnerability | CWE\n");
                body.push_str("---------|---------------|----\n");
                for row in rows {
                    body.push_str(&format!("{} | {} | {}\n", row.severity, row.name, row.cwe));
                }
                if rows.is_empty() {
                    body.push_str("No vulnerabilities were identified.\n");
                }
                ("Vulnerability Overview".to_string(), body)
            }
            ReportSection::VulnerabilityDetail {
                index,
                vulnerability,
            } => (
                format!("{}. {}", index, vulnerability.name),
                render_vulnerability_detail(vulnerability),
            ),
            ReportSection::ChainOfCustody { custody } => (
                "Chain of Custody".to_string(),
                match custody {
                    Some(record) => format!(
                        "Initiated by: {}\nClient IP: {}\nUser agent: {}\nTimestamp: {}",
                        record.user_id, record.user_ip, record.user_agent, record.timestamp
                    ),
                    None => "No chain-of-custody record was attached to this scan.".to_string(),
                },
            ),
            ReportSection::Disclaimer { paragraphs } => (
                "Legal Disclaimer & Notice".to_string(),
                paragraphs.join("\n\n"),
            ),
        }
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_vulnerability_detail(vuln: &Vulnerability) -> String {
    let mut body = format!(
        "Severity: {}\nReported severity: {}\n",
        vuln.effective_severity(),
        vuln.severity
    );
    if let Some(justification) = &vuln.assessment_justification {
        body.push_str(&format!("Assessment: {justification}\n"));
    }
    if let Some(cwe) = &vuln.cwe {
        body.push_str(&format!("CWE: {cwe}\n"));
    }
    body.push_str(&format!("\nDescription:\n{}\n", vuln.description));
    if let Some(evidence) = &vuln.evidence {
        body.push_str(&format!("\nEvidence:\n{evidence}\n"));
    }
    body.push_str(&format!("\nRemediation:\n{}\n", vuln.remediation));
    body
}

fn render_osint(record: &OsintRecord) -> String {
    let mut body = String::new();

    body.push_str("Domain reputation: ");
    match &record.reputation {
        ProviderResult::Available(report) => {
            let stats = &report.last_analysis_stats;
            body.push_str(&format!(
                "score {}, verdicts: {} harmless / {} malicious / {} suspicious / {} undetected\n",
                report.reputation,
                stats.harmless,
                stats.malicious,
                stats.suspicious,
                stats.undetected
            ));
        }
        other => body.push_str(&format!("{}\n", provider_status(other))),
    }

    body.push_str("Domain registration: ");
    match &record.registration {
        ProviderResult::Available(reg) => {
            body.push_str(&format!(
                "registrar {}, created {}, expires {}\n",
                reg.registrar_name.as_deref().unwrap_or("unknown"),
                reg.created_date.as_deref().unwrap_or("unknown"),
                reg.expires_date.as_deref().unwrap_or("unknown")
            ));
        }
        other => body.push_str(&format!("{}\n", provider_status(other))),
    }

    body.push_str("Host exposure: ");
    match &record.host {
        ProviderResult::Available(host) => {
            let ports: Vec<String> = host.ports.iter().map(|p| p.to_string()).collect();
            body.push_str(&format!(
                "{} ({}), open ports: [{}]\n",
                host.ip_str.as_deref().unwrap_or("unknown IP"),
                host.org.as_deref().unwrap_or("unknown org"),
                ports.join(", ")
            ));
        }
        other => body.push_str(&format!("{}\n", provider_status(other))),
    }

    body.push_str("Certificate issuances: ");
    match &record.certificates {
        ProviderResult::Available(issuances) => {
            body.push_str(&format!("{} certificates on record\n", issuances.len()));
        }
        other => body.push_str(&format!("{}\n", provider_status(other))),
    }

    body
}

fn provider_status<T>(result: &ProviderResult<T>) -> String {
    match result {
        ProviderResult::Available(_) => "available".to_string(),
        ProviderResult::Unconfigured => "not configured".to_string(),
        ProviderResult::Unavailable { reason } => format!("unavailable ({reason})"),
    }
}
