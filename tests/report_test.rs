// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Report Assembly Integration Tests
 * Tolerant-join section gathering and export rendering
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

mod common;

use std::sync::Arc;

use common::{
    story_body, summary_body, CannedResponse, ScriptedProvider, STORY_NEEDLE, SUMMARY_NEEDLE,
};
use vigilante_scanner::completion::StructuredClient;
use vigilante_scanner::config::OsintConfig;
use vigilante_scanner::osint::OsintAggregator;
use vigilante_scanner::report::formats::{CsvExporter, DocumentRenderer};
use vigilante_scanner::report::{ReportAssembler, ReportSection, SectionContent};
use vigilante_scanner::story::AttackStoryGenerator;
use vigilante_scanner::types::{ChainOfCustody, Scan, ScanStatus, Severity, Vulnerability};

fn vulnerability(index: usize, name: &str, raw: Severity, assessed: Option<Severity>) -> Vulnerability {
    Vulnerability {
        id: format!("vuln-scan-1-{index}"),
        name: name.to_string(),
        description: format!("{name} was detected."),
        severity: raw,
        cwe: Some("CWE-79".to_string()),
        remediation: format!("Fix {name}."),
        evidence: Some(format!("Evidence for {name}.")),
        assessed_severity: assessed,
        assessment_justification: assessed.map(|_| "Contextual rating.".to_string()),
    }
}

fn completed_scan(vulnerabilities: Vec<Vulnerability>) -> Scan {
    Scan {
        id: "scan-1".to_string(),
        owner_id: "user-1".to_string(),
        url: "https://example.com".to_string(),
        status: ScanStatus::Completed,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        completed_at: Some("2026-01-01T00:12:00Z".to_string()),
        vulnerabilities,
        summary: None,
        chain_of_custody: Some(ChainOfCustody {
            user_id: "user-1".to_string(),
            user_ip: "198.51.100.7".to_string(),
            user_agent: "report-test/1.0".to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        }),
    }
}

fn assembler(provider: Arc<ScriptedProvider>) -> ReportAssembler {
    let client = StructuredClient::new(provider);
    // No credentials configured: OSINT degrades without any network use.
    let osint = OsintAggregator::new(&OsintConfig::default()).unwrap();
    let story = AttackStoryGenerator::new(client.clone());
    ReportAssembler::new(client, osint, story)
}

fn section_kinds(sections: &[ReportSection]) -> Vec<&'static str> {
    sections
        .iter()
        .map(|section| match section {
            ReportSection::TitlePage { .. } => "titlePage",
            ReportSection::ExecutiveSummary { .. } => "executiveSummary",
            ReportSection::AttackPath { .. } => "attackPath",
            ReportSection::OsintFindings { .. } => "osintFindings",
            ReportSection::VulnerabilityTable { .. } => "vulnerabilityTable",
            ReportSection::VulnerabilityDetail { .. } => "vulnerabilityDetail",
            ReportSection::ChainOfCustody { .. } => "chainOfCustody",
            ReportSection::Disclaimer { .. } => "disclaimer",
        })
        .collect()
}

#[tokio::test]
async fn clean_scan_omits_attack_path_entirely() {
    let provider = Arc::new(ScriptedProvider::new().on(
        SUMMARY_NEEDLE,
        CannedResponse::json(&summary_body("No material findings.")),
    ));

    let report = assembler(provider.clone())
        .assemble(&completed_scan(Vec::new()), "Alex Drake")
        .await;

    assert!(!report.has_attack_path());
    assert_eq!(
        section_kinds(&report.sections),
        vec![
            "titlePage",
            "executiveSummary",
            "osintFindings",
            "vulnerabilityTable",
            "chainOfCustody",
            "disclaimer",
        ]
    );

    // Only the summary call reached the completion provider.
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn assembled_report_carries_all_sections_in_fixed_order() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .on(
                SUMMARY_NEEDLE,
                CannedResponse::json(&summary_body("Two findings require attention.")),
            )
            .on(STORY_NEEDLE, CannedResponse::json(&story_body(3))),
    );

    let scan = completed_scan(vec![
        vulnerability(0, "Stored XSS", Severity::Medium, Some(Severity::High)),
        vulnerability(1, "Weak TLS Configuration", Severity::Low, None),
    ]);

    let report = assembler(provider).assemble(&scan, "Alex Drake").await;

    assert_eq!(
        section_kinds(&report.sections),
        vec![
            "titlePage",
            "executiveSummary",
            "attackPath",
            "osintFindings",
            "vulnerabilityTable",
            "vulnerabilityDetail",
            "vulnerabilityDetail",
            "chainOfCustody",
            "disclaimer",
        ]
    );

    let story = report
        .sections
        .iter()
        .find_map(|section| match section {
            ReportSection::AttackPath {
                content: SectionContent::Ready(story),
            } => Some(story),
            _ => None,
        })
        .expect("attack path should be ready");
    assert_eq!(story.steps.len(), 3);
    assert_eq!(story.steps[0].step, 1);

    let rows = report
        .sections
        .iter()
        .find_map(|section| match section {
            ReportSection::VulnerabilityTable { rows } => Some(rows),
            _ => None,
        })
        .expect("vulnerability table present");
    assert_eq!(rows[0].severity, "High", "assessed severity wins");
    assert_eq!(rows[1].severity, "Low", "raw severity is the fallback");
}

#[tokio::test]
async fn failed_story_degrades_to_placeholder_section() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .on(
                SUMMARY_NEEDLE,
                CannedResponse::json(&summary_body("One finding requires attention.")),
            )
            .on(
                STORY_NEEDLE,
                CannedResponse::provider_error("story backend offline"),
            ),
    );

    let scan = completed_scan(vec![vulnerability(
        0,
        "Stored XSS",
        Severity::Medium,
        Some(Severity::High),
    )]);

    let report = assembler(provider).assemble(&scan, "Alex Drake").await;

    let attack_path = report
        .sections
        .iter()
        .find_map(|section| match section {
            ReportSection::AttackPath { content } => Some(content),
            _ => None,
        })
        .expect("degraded attack path section still present");
    assert!(matches!(attack_path, SectionContent::Unavailable { .. }));

    // The other sections are unaffected.
    let summary = report
        .sections
        .iter()
        .find_map(|section| match section {
            ReportSection::ExecutiveSummary { content } => Some(content),
            _ => None,
        })
        .unwrap();
    assert!(summary.is_ready());
}

#[tokio::test]
async fn failed_summary_degrades_only_that_section() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .on(
                SUMMARY_NEEDLE,
                CannedResponse::provider_error("summary backend offline"),
            )
            .on(STORY_NEEDLE, CannedResponse::json(&story_body(4))),
    );

    let scan = completed_scan(vec![vulnerability(
        0,
        "Stored XSS",
        Severity::Medium,
        None,
    )]);

    let report = assembler(provider).assemble(&scan, "Alex Drake").await;

    let summary = report
        .sections
        .iter()
        .find_map(|section| match section {
            ReportSection::ExecutiveSummary { content } => Some(content),
            _ => None,
        })
        .unwrap();
    assert!(matches!(summary, SectionContent::Unavailable { .. }));

    assert!(report.has_attack_path());
}

#[tokio::test]
async fn rendered_document_paginates_sections_with_footers() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .on(
                SUMMARY_NEEDLE,
                CannedResponse::json(&summary_body("One finding requires attention.")),
            )
            .on(STORY_NEEDLE, CannedResponse::json(&story_body(3))),
    );

    let scan = completed_scan(vec![vulnerability(
        0,
        "Stored XSS",
        Severity::Medium,
        Some(Severity::High),
    )]);

    let report = assembler(provider).assemble(&scan, "Alex Drake").await;
    let document = DocumentRenderer::new().render(&report);

    assert_eq!(document.pages.len(), report.sections.len());
    assert!(document.pages[0].body.contains("Alex Drake"));
    assert!(document
        .pages
        .last()
        .unwrap()
        .footer
        .contains(&format!("Page {} of {}", document.pages.len(), document.pages.len())));

    let text = document.to_text();
    assert!(text.contains("Step 1"));
    assert!(text.contains("Chain of Custody"));
}

#[tokio::test]
async fn csv_export_rows_match_scan_findings() {
    let scan = completed_scan(vec![
        vulnerability(0, "Stored XSS", Severity::Medium, Some(Severity::High)),
        vulnerability(1, "Weak TLS Configuration", Severity::Low, None),
    ]);

    let bytes = CsvExporter::new().generate(&scan).await.unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Stored XSS"));
    assert!(lines[1].contains(",High,"));
    assert!(lines[2].contains(",Low,"));
}
