// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Attack-path reconstruction: an ordered narrative of plausible
//! attacker steps grounded in the scan findings and OSINT data.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::completion::{PromptTemplate, StructuredClient};
use crate::errors::CompletionError;
use crate::osint::OsintRecord;
use crate::types::{AttackStory, Scan, StoryStep};

const STORY_PROMPT: PromptTemplate = PromptTemplate::new(
    "generate_attack_story",
    "You are a creative security analyst tasked with creating a plausible attack narrative.",
    r#"Based on the provided scan results (including OSINT and vulnerabilities), construct a step-by-step story of how an attacker might compromise the target.

The story should be a logical sequence of 3-5 steps. Start with reconnaissance and pivot based on the findings.

**Scan Details (JSON):**
{{scanDetails}}

**Instructions:**
1. Create a sequence of 3-5 steps.
2. For each step, provide a clear 'title' and a 'description'.
3. The description should explain the attacker's action and goal for that step.
4. Connect the steps logically. For example, if the host data shows an open database port, a later step might be "Attempt to Exploit Database." If a critical XSS vulnerability is found, a step should involve "User Session Hijacking."
5. Be creative but ground the story in the provided data.

Respond with a JSON object of the form:
{
  "attackStory": [
    { "step": 1, "title": "Information Gathering", "description": "The attacker uses WHOIS and SSL records to map the organization's infrastructure and find related subdomains." },
    { "step": 2, "title": "Port Scanning", "description": "Using exposed host data, the attacker identifies an open database port (3306) on the main server." },
    { "step": 3, "title": "Exploitation", "description": "The attacker leverages a known SQL Injection vulnerability on the login page to bypass authentication." }
  ]
}
"#,
);

#[derive(Debug, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
struct StoryInput {
    #[validate(length(min = 2))]
    scan_details: String,
}

#[derive(Debug, Deserialize)]
struct StoryOutput {
    #[serde(rename = "attackStory")]
    attack_story: Vec<StoryStep>,
}

/// Generates the attack narrative for a completed scan.
#[derive(Clone)]
pub struct AttackStoryGenerator {
    client: StructuredClient,
}

impl AttackStoryGenerator {
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        scan: &Scan,
        osint: &OsintRecord,
    ) -> Result<AttackStory, CompletionError> {
        let details = serde_json::json!({
            "scan": scan,
            "osint": osint,
        });

        let input = StoryInput {
            scan_details: details.to_string(),
        };

        let output: StoryOutput = self.client.complete(&STORY_PROMPT, &input).await?;
        validate_step_sequence(&output.attack_story)?;

        Ok(AttackStory {
            steps: output.attack_story,
        })
    }
}

/// Step numbers must be contiguous starting at 1; anything else means
/// the model broke the output contract.
fn validate_step_sequence(steps: &[StoryStep]) -> Result<(), CompletionError> {
    if steps.is_empty() {
        return Err(CompletionError::schema("attack story has no steps", ""));
    }
    for (index, step) in steps.iter().enumerate() {
        let expected = index as u32 + 1;
        if step.step != expected {
            return Err(CompletionError::schema(
                format!(
                    "attack story steps are not contiguous: expected step {expected}, got {}",
                    step.step
                ),
                "",
            ));
        }
    }
    Ok(())
}
