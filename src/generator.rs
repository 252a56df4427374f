// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Vulnerability generation: turns a raw scan-log artifact into a
//! structured list of candidate findings via the completion client.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::completion::{PromptTemplate, StructuredClient};
use crate::errors::GenerationError;
use crate::types::GeneratedVulnerability;

const GENERATION_PROMPT: PromptTemplate = PromptTemplate::new(
    "generate_vulnerabilities",
    "You are an AI-powered security analyst. Your task is to analyze the output of a web \
     vulnerability scan and report the findings as structured JSON.",
    r#"Convert the raw scan alerts below into a JSON object with a single key "vulnerabilities" holding an array of vulnerability objects. Each object must contain the following fields: 'name', 'description', 'severity' (one of 'Critical', 'High', 'Medium', 'Low'), 'cwe', and 'remediation'. Include an 'evidence' field where the scan output supports one.

Here is the scan output:
{{scanOutput}}
"#,
);

/// Simulated raw output in the shape a tool like ZAP or Nikto would
/// produce. The scan-log producer is an external collaborator; this
/// artifact is the default input for demo and headless runs.
pub const SIMULATED_SCAN_ARTIFACT: &str = r#"
{
  "site": "https://example.com",
  "alerts": [
    {
      "pluginid": "10021",
      "alert": "X-Content-Type-Options Header Missing",
      "name": "X-Content-Type-Options Header Missing",
      "risk": "Low",
      "description": "The X-Content-Type-Options header is not set. This could allow an attacker to perform MIME-sniffing attacks.",
      "solution": "Ensure that the X-Content-Type-Options header is set to 'nosniff' for all responses."
    },
    {
      "pluginid": "40012",
      "alert": "Cross-Domain JavaScript Source File Inclusion",
      "name": "Cross-Domain JavaScript Source File Inclusion",
      "risk": "Medium",
      "description": "The page includes a script from a third-party domain. This could expose the site to security risks if the third-party domain is compromised.",
      "solution": "Host all JavaScript files on the same domain as the application."
    },
    {
      "pluginid": "90022",
      "alert": "Application Error Disclosure",
      "name": "Application Error Disclosure",
      "risk": "Medium",
      "description": "The application may be leaking error messages or stack traces. This can reveal sensitive information about the application's internals.",
      "solution": "Configure the application to show generic error pages instead of detailed error messages."
    }
  ]
}
"#;

#[derive(Debug, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
struct GenerationInput {
    #[validate(length(min = 1))]
    scan_output: String,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    vulnerabilities: Vec<GeneratedVulnerability>,
}

/// Produces candidate vulnerabilities from a raw scan artifact. A
/// failure here is fatal to the scan; there is no meaningful partial
/// vulnerability list.
#[derive(Clone)]
pub struct VulnerabilityGenerator {
    client: StructuredClient,
}

impl VulnerabilityGenerator {
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        raw_scan_artifact: &str,
    ) -> Result<Vec<GeneratedVulnerability>, GenerationError> {
        let input = GenerationInput {
            scan_output: raw_scan_artifact.to_string(),
        };

        let output: GenerationOutput = self
            .client
            .complete(&GENERATION_PROMPT, &input)
            .await?;

        Ok(output.vulnerabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn generation_output_parses_model_shape() {
        let raw = r#"{
            "vulnerabilities": [
                {
                    "name": "Missing Security Header",
                    "description": "X-Content-Type-Options is not set.",
                    "severity": "Low",
                    "cwe": "CWE-693",
                    "remediation": "Set the header to nosniff."
                }
            ]
        }"#;
        let output: GenerationOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(output.vulnerabilities.len(), 1);
        assert_eq!(output.vulnerabilities[0].severity, Severity::Low);
        assert!(output.vulnerabilities[0].evidence.is_none());
    }

    #[test]
    fn invalid_severity_is_a_parse_error() {
        let raw = r#"{
            "vulnerabilities": [
                {
                    "name": "Bad",
                    "description": "d",
                    "severity": "Informational",
                    "cwe": "CWE-1",
                    "remediation": "r"
                }
            ]
        }"#;
        assert!(serde_json::from_str::<GenerationOutput>(raw).is_err());
    }

    #[test]
    fn simulated_artifact_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(SIMULATED_SCAN_ARTIFACT).unwrap();
        assert_eq!(value["alerts"].as_array().unwrap().len(), 3);
    }
}
