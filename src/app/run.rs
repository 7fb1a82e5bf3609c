// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

use crate::app::console::{Console, ConsoleOpts};
use crate::app::output::{self, styles, OutputType};
use crate::app::{AppConfig, ExitStatus};
use crate::authority::Classifier;
use crate::batch::{BatchDriver, BatchOutcome};
use crate::request::{parse_requests, CheckRequest};
use crate::resolver::DohResolver;

pub async fn run(app_config: &AppConfig) -> Result<ExitStatus> {
    info!("nsauth running.");
    let console = Console::new(ConsoleOpts::from(app_config));

    let requests = match load_requests(app_config).await {
        Ok(requests) => requests,
        Err(err) => {
            console.error(format!("{:#}", err));
            return Ok(ExitStatus::Abort);
        }
    };
    if requests.is_empty() {
        console.error("No valid check requests found; expecting lines like 'example.co.za, ns1.example.com'.");
        return Ok(ExitStatus::Abort);
    }
    debug!("Loaded {} check requests.", requests.len());

    let resolver_opts = app_config.doh_resolver_opts();
    let batch_opts = app_config.batch_opts();
    console.print_opts(&resolver_opts, &batch_opts);
    console.print_estimates(requests.len(), &batch_opts);

    let cancelled = Arc::new(AtomicBool::new(false));
    spawn_cancellation_handler(cancelled.clone());

    let driver = BatchDriver::new(
        DohResolver::new(resolver_opts),
        Classifier::new(app_config.classifier_opts()),
        batch_opts,
    )
    .with_cancellation(cancelled);

    let start_time = Instant::now();
    let outcome = driver
        .run(&requests, |completed, total| {
            if let Some(request) = requests.get(completed.saturating_sub(1)) {
                console.print_progress(request.domain(), completed, total);
            }
        })
        .await
        .context("Failed to check nameservers")?;
    let total_run_time = Instant::now() - start_time;

    console.print_statistics(&outcome, total_run_time);
    if outcome.is_cancelled() {
        console.print_cancelled(&outcome);
    }

    write_output(app_config, &outcome).await?;

    console.print_verdict(&outcome);
    console.print_finished();

    Ok(exit_status(&outcome))
}

async fn load_requests(app_config: &AppConfig) -> Result<Vec<CheckRequest>> {
    match app_config.input_file.as_deref() {
        Some("-") => read_requests(tokio::io::stdin())
            .await
            .context("Failed to read check requests from stdin"),
        Some(path) => {
            let buf = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read check requests from file '{}'", path))?;
            Ok(parse_requests(&buf))
        }
        None => {
            let domain_name = app_config
                .domain_name
                .as_deref()
                .context("No domain name to check specified")?;
            let nameservers = app_config
                .nameservers
                .as_deref()
                .context("No nameservers to check specified")?;
            let request =
                CheckRequest::new(domain_name, nameservers).context("Failed to create check request")?;
            Ok(vec![request])
        }
    }
}

async fn read_requests<R: AsyncRead + Unpin>(mut reader: R) -> Result<Vec<CheckRequest>> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).await?;
    Ok(parse_requests(&buf))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Finish the current check, then stop the batch
    Cancel,
    /// The batch is already cancelled, but the user does not want to wait
    Exit,
}

fn on_interrupt(cancelled: &AtomicBool) -> Interrupt {
    if cancelled.swap(true, Ordering::SeqCst) {
        Interrupt::Exit
    } else {
        Interrupt::Cancel
    }
}

fn spawn_cancellation_handler(cancelled: Arc<AtomicBool>) {
    tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for interrupt signal: {}", err);
                return;
            }
            match on_interrupt(&cancelled) {
                Interrupt::Cancel => {
                    info!("Received interrupt; cancelling after the current check. Interrupt again to exit immediately.")
                }
                Interrupt::Exit => {
                    warn!("Received second interrupt; exiting without results.");
                    std::process::exit(ExitStatus::Abort as i32);
                }
            }
        }
    });
}

async fn write_output(app_config: &AppConfig, outcome: &BatchOutcome) -> Result<()> {
    match app_config.output_file.as_deref() {
        Some(path) => {
            if app_config.output == OutputType::Summary {
                // Files do not render terminal colors
                styles::no_color_mode();
            }
            let mut buf = Vec::new();
            output::output(&app_config.output_config, &mut buf, outcome)?;
            tokio::fs::write(path, buf)
                .await
                .with_context(|| format!("Failed to write results to file '{}'", path))?;
            info!("Wrote {} results to '{}'.", outcome.len(), path);
            Ok(())
        }
        None => output::output_to_stdout(&app_config.output_config, outcome),
    }
}

fn exit_status(outcome: &BatchOutcome) -> ExitStatus {
    if outcome.is_cancelled() {
        ExitStatus::Abort
    } else if outcome.is_fully_authoritative() {
        ExitStatus::Ok
    } else {
        ExitStatus::CheckFailed
    }
}
