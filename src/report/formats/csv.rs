// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::Result;
use csv::Writer;

use crate::report::VulnerabilityRow;
use crate::types::Scan;

/// Flat tabular export, one row per vulnerability with the effective
/// severity.
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub async fn generate(&self, scan: &Scan) -> Result<Vec<u8>> {
        let mut wtr = Writer::from_writer(vec![]);

        wtr.write_record([
            "ID",
            "Name",
            "Severity",
            "Description",
            "CWE",
            "Evidence",
            "Remediation",
        ])?;

        for vuln in &scan.vulnerabilities {
            let row = VulnerabilityRow::from(vuln);
            wtr.write_record([
                &row.id,
                &row.name,
                &row.severity,
                &row.description,
                &row.cwe,
                &row.evidence,
                &row.remediation,
            ])?;
        }

        let data = wtr.into_inner()?;
        Ok(data)
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
