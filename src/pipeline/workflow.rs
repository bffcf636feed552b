use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::browser::session::BrowserSession;
use crate::browser::DocumentPage;
use crate::config::{sink_targets_from_env, Config};
use crate::error::ScrapeError;
use crate::extract::heuristic::HeuristicTuning;
use crate::extract::{build_batch, extract_reviews, Extracted};
use crate::interaction::convergence::wait_for_content_ready;
use crate::interaction::loader::{load_more, ScrollPolicy};
use crate::interaction::overlays::{dismiss_overlays, DismissScope, DISMISS_LABELS};
use crate::interaction::panel::{open_content_panel, PanelTrigger};
use crate::reporting::{diagnostics, json as json_report};
use crate::sinks::transport::ReqwestTransport;
use crate::sinks::{build_sinks, dispatch, Sink};
use crate::types::HarvestResult;

/// Everything the page-driving phase needs, detached from the CLI surface.
#[derive(Debug, Clone)]
pub struct HarvestPlan {
    pub trigger: PanelTrigger,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
    pub scroll: ScrollPolicy,
    pub tuning: HeuristicTuning,
}

impl HarvestPlan {
    pub fn from_config(config: &Config) -> Self {
        Self {
            trigger: PanelTrigger::default(),
            ready_timeout: config.ready_timeout,
            poll_interval: config.poll_interval,
            scroll: config.scroll,
            tuning: HeuristicTuning::default(),
        }
    }
}

pub async fn run(config: Config) -> Result<HarvestResult> {
    let start = Instant::now();

    // Credentials are checked before a browser is ever launched.
    let targets = if config.dry_run {
        println!("{} Dry run: reviews will only be saved locally", "[*]".cyan());
        Vec::new()
    } else {
        let targets = sink_targets_from_env(config.sheet.as_ref()).map_err(ScrapeError::from)?;
        let labels: Vec<&str> = targets.iter().map(|t| t.label()).collect();
        println!("{} Delivering to: {}", "[*]".cyan(), labels.join(", "));
        targets
    };

    println!("{} Harvesting reviews from {}...\n", "[*]".cyan().bold(), config.url);

    let session = BrowserSession::launch(config.chrome_bin.clone()).await?;
    let driven = drive(&session, &config).await;
    session.close().await;
    let extracted = driven?;

    let sinks = build_sinks(&targets, Arc::new(ReqwestTransport::new()?));
    let result = settle(&config.url, &config.output, extracted, &sinks).await?;

    print_summary(&result, &config.output, start.elapsed());
    Ok(result)
}

async fn drive(session: &BrowserSession, config: &Config) -> Result<Extracted, ScrapeError> {
    let page = session.new_tab().await?;
    drive_page(
        &page,
        &config.url,
        Duration::from_secs(config.timeout),
        &config.output,
        &HarvestPlan::from_config(config),
    )
    .await
}

/// Navigate, then run the page phase. Any failure once the tab exists leaves diagnostics behind.
pub async fn drive_page(
    page: &dyn DocumentPage,
    url: &str,
    navigation_timeout: Duration,
    output: &Path,
    plan: &HarvestPlan,
) -> Result<Extracted, ScrapeError> {
    let outcome = match page.navigate(url, navigation_timeout).await {
        Ok(()) => harvest(page, plan).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &outcome {
        eprintln!("{} {}", "[!]".red().bold(), e);
        let captured = diagnostics::capture(page, output).await;
        for path in [captured.screenshot, captured.markup].into_iter().flatten() {
            eprintln!("    {} saved {}", "→".dimmed(), path.display());
        }
    }
    outcome
}

/// Overlays, panel, convergence, lazy loading and extraction, in that order.
pub async fn harvest(page: &dyn DocumentPage, plan: &HarvestPlan) -> Result<Extracted, ScrapeError> {
    dismiss_overlays(page, DISMISS_LABELS, DismissScope::Everywhere).await;

    let panel = open_content_panel(page, &plan.trigger).await;
    match panel.strategy {
        Some(name) => println!("{} Opened reviews panel via {}", "[✓]".green(), name),
        None => println!("{} Reviews trigger not found, waiting on the page itself", "[!]".yellow()),
    }

    // The panel can surface its own prompts; the panel dialog itself stays open.
    dismiss_overlays(page, DISMISS_LABELS, DismissScope::OutsideDialogs).await;

    let probe = wait_for_content_ready(page, plan.ready_timeout, plan.poll_interval).await?;
    debug!(items = probe.items(), dialog_open = probe.dialog_open, "content ready");

    let loaded = load_more(page, &plan.scroll).await;
    println!(
        "{} Review list loaded: {} → {} items",
        "[*]".cyan(),
        loaded.items_before,
        loaded.items_after
    );

    Ok(extract_reviews(page, &plan.tuning).await)
}

/// Build the final batch, hand it to the sinks and persist the result.
pub async fn settle(url: &str, output: &Path, extracted: Extracted, sinks: &[Box<dyn Sink>]) -> Result<HarvestResult> {
    let batch = build_batch(extracted.records);
    info!(records = batch.len(), "batch ready");

    let reports = dispatch(&batch, sinks).await;

    let result = HarvestResult {
        url: url.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        mode: extracted.mode,
        items_found: extracted.items_found,
        records: batch.records,
        sinks: reports,
    };
    json_report::write(output, &result)?;
    Ok(result)
}

fn print_summary(result: &HarvestResult, output: &Path, elapsed: Duration) {
    println!("\n{}", "=".repeat(60).dimmed());
    println!(
        "{} Harvest complete for {} in {:.1}s",
        "[✓]".green().bold(),
        result.url,
        elapsed.as_secs_f64()
    );
    println!(
        "{} Extraction mode: {} ({} items seen)",
        "[*]".cyan(),
        result.mode.map(|m| m.as_str()).unwrap_or("none"),
        result.items_found
    );
    println!(
        "{} Reviews extracted: {}",
        "[*]".cyan(),
        result.records.len().to_string().bold()
    );
    for report in &result.sinks {
        let failed = report.failed();
        println!(
            "{} {}: {} delivered, {} failed",
            if failed > 0 { "[!]".yellow().bold() } else { "[✓]".green().bold() },
            report.sink.cyan(),
            report.delivered().to_string().green(),
            if failed > 0 {
                failed.to_string().red().bold()
            } else {
                failed.to_string().normal()
            }
        );
    }
    println!("{} Results saved to: {}", "[*]".cyan(), output.display());
    println!("{}", "=".repeat(60).dimmed());
}
