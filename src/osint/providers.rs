// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - OSINT Intelligence Providers
 * Read-only lookups against third-party intelligence APIs.
 * Every provider degrades to an explicit non-error outcome.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use std::net::IpAddr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outcome of a single provider lookup. `Unconfigured` (no credential)
/// and `Unavailable` (provider errored) are distinct states so callers
/// never conflate "we did not ask" with "we asked and got nothing".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ProviderResult<T> {
    Available(T),
    Unconfigured,
    Unavailable { reason: String },
}

impl<T> ProviderResult<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, ProviderResult::Available(_))
    }

    pub fn as_available(&self) -> Option<&T> {
        match self {
            ProviderResult::Available(value) => Some(value),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Ingress types, validated by shape at the provider boundary
// ---------------------------------------------------------------------------

/// Malware-analysis verdict counts for a domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisStats {
    #[serde(default)]
    pub harmless: u64,
    #[serde(default)]
    pub malicious: u64,
    #[serde(default)]
    pub suspicious: u64,
    #[serde(default)]
    pub undetected: u64,
    #[serde(default)]
    pub timeout: u64,
}

/// Domain reputation report. Field names follow the provider wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReputationReport {
    #[serde(default)]
    pub last_analysis_stats: AnalysisStats,
    #[serde(default)]
    pub reputation: i64,
    #[serde(default)]
    pub last_modification_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReputationEnvelope {
    data: ReputationData,
}

#[derive(Debug, Deserialize)]
struct ReputationData {
    attributes: ReputationReport,
}

/// Domain registration record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub registrar_name: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub expires_date: Option<String>,
    #[serde(default)]
    pub registrant: Option<RegistrantContact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantContact {
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistrationEnvelope {
    #[serde(rename = "WhoisRecord")]
    whois_record: RegistrationRecord,
}

/// Host exposure report for a resolved IP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostReport {
    #[serde(default)]
    pub ip_str: Option<String>,
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub isp: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// One certificate-transparency issuance record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateIssuance {
    pub id: String,
    #[serde(default)]
    pub dns_names: Vec<String>,
    #[serde(default)]
    pub issuer: Option<CertificateIssuer>,
    #[serde(default)]
    pub not_before: Option<String>,
    #[serde(default)]
    pub not_after: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateIssuer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Reputation/malware-analysis lookup by domain (VirusTotal-compatible).
pub struct ReputationProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl ReputationProvider {
    pub fn new(api_key: Option<String>, base_url: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url,
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn lookup(&self, domain: &str) -> ProviderResult<ReputationReport> {
        let Some(key) = self.api_key.as_deref() else {
            debug!(provider = "reputation", "No credential configured, skipping lookup");
            return ProviderResult::Unconfigured;
        };

        match self.fetch(key, domain).await {
            Ok(report) => ProviderResult::Available(report),
            Err(e) => {
                warn!(provider = "reputation", domain = domain, error = %e, "Lookup failed");
                ProviderResult::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch(&self, key: &str, domain: &str) -> Result<ReputationReport> {
        let url = format!("{}/api/v3/domains/{}", self.base_url, domain);
        let response = self
            .client
            .get(&url)
            .header("x-apikey", key)
            .send()
            .await
            .context("reputation request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("reputation provider returned {status}");
        }

        let envelope: ReputationEnvelope = response
            .json()
            .await
            .context("reputation response failed schema validation")?;
        Ok(envelope.data.attributes)
    }
}

/// Domain registration lookup (WhoisXML-compatible).
pub struct RegistrationProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl RegistrationProvider {
    pub fn new(api_key: Option<String>, base_url: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url,
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn lookup(&self, domain: &str) -> ProviderResult<RegistrationRecord> {
        let Some(key) = self.api_key.as_deref() else {
            debug!(provider = "registration", "No credential configured, skipping lookup");
            return ProviderResult::Unconfigured;
        };

        match self.fetch(key, domain).await {
            Ok(record) => ProviderResult::Available(record),
            Err(e) => {
                warn!(provider = "registration", domain = domain, error = %e, "Lookup failed");
                ProviderResult::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch(&self, key: &str, domain: &str) -> Result<RegistrationRecord> {
        let url = format!("{}/whoisserver/WhoisService", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", key),
                ("domainName", domain),
                ("outputFormat", "JSON"),
            ])
            .send()
            .await
            .context("registration request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("registration provider returned {status}");
        }

        let envelope: RegistrationEnvelope = response
            .json()
            .await
            .context("registration response failed schema validation")?;
        Ok(envelope.whois_record)
    }
}

/// Host/port exposure lookup by IP (Shodan-compatible).
pub struct HostProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl HostProvider {
    pub fn new(api_key: Option<String>, base_url: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url,
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn lookup(&self, ip: IpAddr) -> ProviderResult<HostReport> {
        let Some(key) = self.api_key.as_deref() else {
            debug!(provider = "host", "No credential configured, skipping lookup");
            return ProviderResult::Unconfigured;
        };

        match self.fetch(key, ip).await {
            Ok(report) => ProviderResult::Available(report),
            Err(e) => {
                warn!(provider = "host", ip = %ip, error = %e, "Lookup failed");
                ProviderResult::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch(&self, key: &str, ip: IpAddr) -> Result<HostReport> {
        let url = format!("{}/shodan/host/{}", self.base_url, ip);
        let response = self
            .client
            .get(&url)
            .query(&[("key", key)])
            .send()
            .await
            .context("host request failed")?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            bail!("no information available for IP {ip}");
        }
        if !status.is_success() {
            bail!("host provider returned {status}");
        }

        response
            .json()
            .await
            .context("host response failed schema validation")
    }
}

/// Certificate-transparency issuance lookup by domain
/// (CertSpotter-compatible).
pub struct CertificateProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl CertificateProvider {
    pub fn new(api_key: Option<String>, base_url: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url,
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn lookup(&self, domain: &str) -> ProviderResult<Vec<CertificateIssuance>> {
        let Some(key) = self.api_key.as_deref() else {
            debug!(provider = "certificates", "No credential configured, skipping lookup");
            return ProviderResult::Unconfigured;
        };

        match self.fetch(key, domain).await {
            Ok(issuances) => ProviderResult::Available(issuances),
            Err(e) => {
                warn!(provider = "certificates", domain = domain, error = %e, "Lookup failed");
                ProviderResult::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch(&self, key: &str, domain: &str) -> Result<Vec<CertificateIssuance>> {
        let url = format!("{}/v1/issuances", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(key)
            .query(&[
                ("domain", domain),
                ("include_subdomains", "true"),
                ("expand", "dns_names"),
                ("expand", "issuer"),
            ])
            .send()
            .await
            .context("certificate request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("certificate provider returned {status}");
        }

        response
            .json()
            .await
            .context("certificate response failed schema validation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_result_serializes_tagged() {
        let available = ProviderResult::Available(AnalysisStats::default());
        let value = serde_json::to_value(&available).unwrap();
        assert_eq!(value["status"], "available");
        assert_eq!(value["data"]["malicious"], 0);

        let unconfigured: ProviderResult<AnalysisStats> = ProviderResult::Unconfigured;
        assert_eq!(
            serde_json::to_value(&unconfigured).unwrap()["status"],
            "unconfigured"
        );

        let unavailable: ProviderResult<AnalysisStats> = ProviderResult::Unavailable {
            reason: "timeout".to_string(),
        };
        let value = serde_json::to_value(&unavailable).unwrap();
        assert_eq!(value["status"], "unavailable");
        assert_eq!(value["data"]["reason"], "timeout");
    }

    #[test]
    fn reputation_report_tolerates_missing_optionals() {
        let report: ReputationReport = serde_json::from_str(
            r#"{ "last_analysis_stats": { "malicious": 2 }, "reputation": -5 }"#,
        )
        .unwrap();
        assert_eq!(report.last_analysis_stats.malicious, 2);
        assert_eq!(report.last_analysis_stats.harmless, 0);
        assert_eq!(report.reputation, -5);
        assert!(report.whois.is_none());
    }

    #[test]
    fn unknown_wire_fields_are_ignored() {
        let report: HostReport = serde_json::from_str(
            r#"{ "ip_str": "93.184.216.34", "ports": [80, 443], "asn": "AS15133", "data": [] }"#,
        )
        .unwrap();
        assert_eq!(report.ports, vec![80, 443]);
        assert_eq!(report.ip_str.as_deref(), Some("93.184.216.34"));
    }
}
