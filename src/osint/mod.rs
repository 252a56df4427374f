// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! OSINT aggregation: concurrent lookups against independent
//! intelligence providers, merged into one sparse record. A provider
//! failure degrades to an absent sub-record; it never fails the
//! aggregate.

pub mod providers;

use std::net::IpAddr;
use std::time::Duration;

use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::config::OsintConfig;
use crate::errors::{OsintError, PipelineError, PipelineResult};

pub use providers::{
    AnalysisStats, CertificateIssuance, CertificateIssuer, CertificateProvider, HostProvider,
    HostReport, ProviderResult, RegistrantContact, RegistrationProvider, RegistrationRecord,
    ReputationProvider, ReputationReport,
};

/// Sparse aggregate of independently-sourced intelligence. Each
/// sub-record is present, unconfigured, or unavailable on its own; the
/// merge is order-independent because every provider contributes a
/// disjoint field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OsintRecord {
    pub reputation: ProviderResult<ReputationReport>,
    pub registration: ProviderResult<RegistrationRecord>,
    pub host: ProviderResult<HostReport>,
    pub certificates: ProviderResult<Vec<CertificateIssuance>>,
}

impl OsintRecord {
    /// A record with every sub-lookup marked unavailable, used when
    /// enrichment itself could not run.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            reputation: ProviderResult::Unavailable {
                reason: reason.to_string(),
            },
            registration: ProviderResult::Unavailable {
                reason: reason.to_string(),
            },
            host: ProviderResult::Unavailable {
                reason: reason.to_string(),
            },
            certificates: ProviderResult::Unavailable {
                reason: reason.to_string(),
            },
        }
    }

    pub fn available_count(&self) -> usize {
        [
            self.reputation.is_available(),
            self.registration.is_available(),
            self.host.is_available(),
            self.certificates.is_available(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Aggregates all configured intelligence providers for one target.
pub struct OsintAggregator {
    reputation: ReputationProvider,
    registration: RegistrationProvider,
    host: HostProvider,
    certificates: CertificateProvider,
    resolver: Option<TokioResolver>,
}

impl OsintAggregator {
    pub fn new(config: &OsintConfig) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                PipelineError::Configuration(format!("Failed to create OSINT HTTP client: {e}"))
            })?;

        // A host without usable resolver configuration degrades the
        // host lookup instead of blocking aggregator construction.
        let resolver = match TokioResolver::builder(TokioConnectionProvider::default()) {
            Ok(builder) => Some(builder.build()),
            Err(e) => {
                warn!(error = %e, "System resolver unavailable, host lookups will degrade");
                None
            }
        };

        Ok(Self {
            reputation: ReputationProvider::new(
                config.reputation_api_key.clone(),
                config.reputation_base_url.clone(),
                client.clone(),
            ),
            registration: RegistrationProvider::new(
                config.registration_api_key.clone(),
                config.registration_base_url.clone(),
                client.clone(),
            ),
            host: HostProvider::new(
                config.host_api_key.clone(),
                config.host_base_url.clone(),
                client.clone(),
            ),
            certificates: CertificateProvider::new(
                config.certificate_api_key.clone(),
                config.certificate_base_url.clone(),
                client,
            ),
            resolver,
        })
    }

    /// Enrich a target URL or bare hostname with OSINT data. All
    /// configured providers are queried concurrently; the only hard
    /// failure is a target that does not parse to a hostname.
    pub async fn enrich(&self, target: &str) -> Result<OsintRecord, OsintError> {
        let domain = extract_domain(target)?;
        info!(domain = %domain, "Enriching target with OSINT data");

        let host_lookup = async {
            if !self.host.is_configured() {
                return ProviderResult::Unconfigured;
            }
            match self.resolve_ip(&domain).await {
                Ok(ip) => self.host.lookup(ip).await,
                Err(reason) => {
                    warn!(domain = %domain, reason = %reason, "DNS resolution failed, skipping host lookup");
                    ProviderResult::Unavailable { reason }
                }
            }
        };

        let (reputation, registration, host, certificates) = tokio::join!(
            self.reputation.lookup(&domain),
            self.registration.lookup(&domain),
            host_lookup,
            self.certificates.lookup(&domain),
        );

        let record = OsintRecord {
            reputation,
            registration,
            host,
            certificates,
        };
        info!(
            domain = %domain,
            available = record.available_count(),
            "OSINT enrichment finished"
        );
        Ok(record)
    }

    async fn resolve_ip(&self, domain: &str) -> Result<IpAddr, String> {
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| "system resolver unavailable".to_string())?;
        let lookup = resolver
            .lookup_ip(domain)
            .await
            .map_err(|e| e.to_string())?;
        lookup
            .iter()
            .next()
            .ok_or_else(|| format!("no addresses found for {domain}"))
    }
}

/// Pull the hostname out of a full URL or a bare host string.
pub fn extract_domain(target: &str) -> Result<String, OsintError> {
    if let Ok(url) = Url::parse(target) {
        if let Some(host) = url.host_str() {
            return Ok(host.to_string());
        }
    }

    let with_scheme = format!("https://{target}");
    Url::parse(&with_scheme)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| OsintError::InvalidTarget {
            target: target.to_string(),
            reason: "no hostname could be extracted".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_domain_from_url() {
        assert_eq!(
            extract_domain("https://example.com/path?q=1").unwrap(),
            "example.com"
        );
        assert_eq!(extract_domain("http://sub.example.org").unwrap(), "sub.example.org");
    }

    #[test]
    fn extract_domain_from_bare_host() {
        assert_eq!(extract_domain("example.com").unwrap(), "example.com");
        assert_eq!(extract_domain("localhost:8080").unwrap(), "localhost");
    }

    #[test]
    fn extract_domain_rejects_garbage() {
        assert!(extract_domain("not a url at all").is_err());
        assert!(extract_domain("").is_err());
    }

    #[test]
    fn unavailable_record_has_no_available_sections() {
        let record = OsintRecord::unavailable("enrichment skipped");
        assert_eq!(record.available_count(), 0);
        assert!(!record.reputation.is_available());
    }
}
