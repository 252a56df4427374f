// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - VigilanteAI Scan Pipeline CLI
 * Runs the scan pipeline end-to-end against one target and writes the
 * report exports.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

use vigilante_scanner::assessor::SeverityAssessor;
use vigilante_scanner::completion::{create_provider, StructuredClient};
use vigilante_scanner::config::AppConfig;
use vigilante_scanner::generator::VulnerabilityGenerator;
use vigilante_scanner::orchestrator::{ProgressReporter, ScanEvent, ScanOrchestrator, ScanRequest};
use vigilante_scanner::osint::OsintAggregator;
use vigilante_scanner::report::formats::{CsvExporter, DocumentRenderer};
use vigilante_scanner::report::ReportAssembler;
use vigilante_scanner::store::MemoryScanStore;
use vigilante_scanner::story::AttackStoryGenerator;
use vigilante_scanner::types::{ChainOfCustody, ScanStatus};

#[derive(Parser, Debug)]
#[command(
    name = "vigilante-scanner",
    version,
    about = "AI-assisted vulnerability scan pipeline"
)]
struct Cli {
    /// Target URL to scan
    #[arg(long)]
    url: String,

    /// Owner id recorded on the scan document
    #[arg(long, default_value = "local-operator")]
    owner: String,

    /// Completion provider: claude or ollama
    #[arg(long)]
    provider: Option<String>,

    /// Write the flat CSV export to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the paginated report document to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(provider) = cli.provider.clone() {
        config.completion.provider = provider;
    }

    let provider = create_provider(&config.completion).context("Failed to create provider")?;
    info!("Completion provider ready");
    let client = StructuredClient::new(Arc::from(provider));

    let store = Arc::new(MemoryScanStore::new());
    let (reporter, mut events) = ProgressReporter::channel();

    // Mirror the event stream to stdout the way the dashboard would.
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ScanEvent::Log { message } => println!("> {message}"),
                ScanEvent::Progress { percent } => println!("  [{percent}%]"),
                ScanEvent::StatusChange { status } => println!("== {status} =="),
            }
        }
    });

    let orchestrator = ScanOrchestrator::new(
        store.clone(),
        VulnerabilityGenerator::new(client.clone()),
        SeverityAssessor::new(client.clone(), config.orchestrator.assessment_concurrency),
        &config.orchestrator,
        reporter,
    );

    let request = ScanRequest {
        owner_id: cli.owner.clone(),
        url: cli.url.clone(),
        custody: ChainOfCustody {
            user_id: cli.owner.clone(),
            user_ip: "127.0.0.1".to_string(),
            user_agent: format!("vigilante-scanner-cli/{}", env!("CARGO_PKG_VERSION")),
            timestamp: Utc::now().to_rfc3339(),
        },
        scan_artifact: None,
    };

    let scan = orchestrator.run(request).await?;
    // Dropping the orchestrator closes the event channel and lets the
    // printer task drain and exit.
    drop(orchestrator);
    let _ = printer.await;

    println!();
    println!("Scan {} finished: {}", scan.id, scan.status);
    let [critical, high, medium, low] = scan.severity_counts();
    println!("Findings: {critical} critical, {high} high, {medium} medium, {low} low");

    if scan.status != ScanStatus::Completed {
        return Ok(());
    }

    let assembler = ReportAssembler::new(
        client.clone(),
        OsintAggregator::new(&config.osint).context("Failed to create OSINT aggregator")?,
        AttackStoryGenerator::new(client),
    );
    let report = assembler.assemble(&scan, &cli.owner).await;

    if let Some(path) = cli.csv {
        let bytes = CsvExporter::new().generate(&scan).await?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write CSV export to {}", path.display()))?;
        println!("CSV export written to {}", path.display());
    }

    if let Some(path) = cli.report {
        let document = DocumentRenderer::new().render(&report);
        std::fs::write(&path, document.to_text())
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!(
            "Report written to {} ({} pages)",
            path.display(),
            document.pages.len()
        );
    }

    Ok(())
}
