// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use super::{Report, ReportSection, SectionContent, VulnerabilityRow};
use crate::completion::{PromptTemplate, StructuredClient};
use crate::errors::CompletionError;
use crate::osint::{OsintAggregator, OsintRecord};
use crate::story::AttackStoryGenerator;
use crate::types::Scan;

const PRODUCT_NAME: &str = "VigilanteAI";

const SUMMARY_PROMPT: PromptTemplate = PromptTemplate::new(
    "summarize_scan_results",
    "You are an AI-powered security analyst writing for a non-technical executive audience.",
    r#"Summarize the vulnerability findings below in three to five sentences of plain prose: overall risk posture, the most important findings, and the most urgent remediation themes.

Respond with a JSON object containing a single 'summary' field holding the prose.

**Findings (JSON):**
{{scanOutput}}
"#,
);

#[derive(Debug, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SummaryInput {
    #[validate(length(min = 2))]
    scan_output: String,
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary: String,
}

/// Merges heterogeneous async data sources into one ordered report.
///
/// The three gathering calls (summary, OSINT, attack story) run
/// independently; a failure in any one degrades that section to an
/// explicit unavailable placeholder and never aborts assembly.
pub struct ReportAssembler {
    client: StructuredClient,
    osint: OsintAggregator,
    story: AttackStoryGenerator,
}

impl ReportAssembler {
    pub fn new(
        client: StructuredClient,
        osint: OsintAggregator,
        story: AttackStoryGenerator,
    ) -> Self {
        Self {
            client,
            osint,
            story,
        }
    }

    pub async fn assemble(&self, scan: &Scan, prepared_for: &str) -> Report {
        let summary_leg = async {
            match self.summarize(scan).await {
                Ok(summary) => SectionContent::Ready(summary),
                Err(e) => {
                    warn!(scan_id = %scan.id, error = %e, "Executive summary unavailable");
                    SectionContent::Unavailable {
                        reason: e.to_string(),
                    }
                }
            }
        };

        let osint_leg = async {
            match self.osint.enrich(&scan.url).await {
                Ok(record) => SectionContent::Ready(record),
                Err(e) => {
                    warn!(scan_id = %scan.id, error = %e, "OSINT findings unavailable");
                    SectionContent::Unavailable {
                        reason: e.to_string(),
                    }
                }
            }
        };

        // No attack path is generated (or rendered) for a clean scan.
        let story_leg = async {
            if scan.vulnerabilities.is_empty() {
                return None;
            }
            let osint = match self.osint.enrich(&scan.url).await {
                Ok(record) => record,
                Err(e) => OsintRecord::unavailable(&e.to_string()),
            };
            match self.story.generate(scan, &osint).await {
                Ok(story) => Some(SectionContent::Ready(story)),
                Err(e) => {
                    warn!(scan_id = %scan.id, error = %e, "Attack path unavailable");
                    Some(SectionContent::Unavailable {
                        reason: e.to_string(),
                    })
                }
            }
        };

        let (summary, osint, story) = tokio::join!(summary_leg, osint_leg, story_leg);

        let mut sections = vec![
            ReportSection::TitlePage {
                product: PRODUCT_NAME.to_string(),
                target: scan.url.clone(),
                generated_at: scan
                    .completed_at
                    .clone()
                    .unwrap_or_else(|| Utc::now().to_rfc3339()),
                prepared_for: prepared_for.to_string(),
            },
            ReportSection::ExecutiveSummary { content: summary },
        ];

        if let Some(content) = story {
            sections.push(ReportSection::AttackPath { content });
        }

        sections.push(ReportSection::OsintFindings { content: osint });
        sections.push(ReportSection::VulnerabilityTable {
            rows: scan.vulnerabilities.iter().map(VulnerabilityRow::from).collect(),
        });

        for (index, vulnerability) in scan.vulnerabilities.iter().enumerate() {
            sections.push(ReportSection::VulnerabilityDetail {
                index: index + 1,
                vulnerability: vulnerability.clone(),
            });
        }

        sections.push(ReportSection::ChainOfCustody {
            custody: scan.chain_of_custody.clone(),
        });
        sections.push(ReportSection::Disclaimer {
            paragraphs: disclaimer_paragraphs(),
        });

        Report {
            target: scan.url.clone(),
            generated_at: Utc::now().to_rfc3339(),
            sections,
        }
    }

    async fn summarize(&self, scan: &Scan) -> Result<String, CompletionError> {
        let input = SummaryInput {
            scan_output: serde_json::to_string(&scan.vulnerabilities)
                .map_err(|e| CompletionError::schema(format!("findings serialization failed: {e}"), ""))?,
        };
        let output: SummaryOutput = self.client.complete(&SUMMARY_PROMPT, &input).await?;
        Ok(output.summary)
    }
}

fn disclaimer_paragraphs() -> Vec<String> {
    vec![
        format!(
            "{PRODUCT_NAME} is a cybersecurity research and educational tool designed to assist \
             users in identifying potential vulnerabilities on systems they own or have explicit \
             authorization to test. It is intended solely for lawful and ethical use in compliance \
             with applicable cybersecurity and data protection laws."
        ),
        "You must only scan systems, websites, or networks that you personally own or for which \
         you have explicit, written consent from the owner. Unauthorized vulnerability scanning, \
         penetration testing, or exploitation of third-party systems may violate regional \
         cybersecurity regulations."
            .to_string(),
        "Engaging in unauthorized scanning or data probing activities on systems without \
         permission is illegal and may lead to civil or criminal penalties. Always obtain proper \
         authorization before running any scan."
            .to_string(),
        format!(
            "{PRODUCT_NAME} supports responsible disclosure practices. If vulnerabilities are \
             discovered, users are encouraged to notify affected parties responsibly and in good \
             faith."
        ),
    ]
}
