// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Sequential, rate limited checks of many domains.
//!
//! Requests are checked strictly one after another in input order with a fixed delay between two
//! lookups to stay below the rate limits of public DNS-over-HTTPS services. A failed lookup never
//! aborts a batch; it becomes an `Error`-status result.

use std::slice::Iter;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::authority::{AuthorityStatus, CheckResult, Classifier};
use crate::request::CheckRequest;
use crate::resolver::{AuthorityLookup, DohResolver};
use crate::statistics::{Statistics, StatusCounts};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct BatchOpts {
    /// Pause between two consecutive lookups
    pub delay: Duration,
}

impl BatchOpts {
    pub fn new(delay: Duration) -> BatchOpts {
        BatchOpts { delay }
    }
}

impl Default for BatchOpts {
    fn default() -> Self {
        BatchOpts::new(Duration::from_millis(200))
    }
}

pub struct BatchDriver<L> {
    lookup: L,
    classifier: Classifier,
    opts: BatchOpts,
    cancelled: Option<Arc<AtomicBool>>,
}

impl<L: AuthorityLookup> BatchDriver<L> {
    pub fn new(lookup: L, classifier: Classifier, opts: BatchOpts) -> BatchDriver<L> {
        BatchDriver {
            lookup,
            classifier,
            opts,
            cancelled: None,
        }
    }

    /// Stops the batch before the next request once `cancelled` is set.
    pub fn with_cancellation(self, cancelled: Arc<AtomicBool>) -> BatchDriver<L> {
        BatchDriver {
            cancelled: Some(cancelled),
            ..self
        }
    }

    #[instrument(name = "check", level = "info", skip(self, request), fields(domain = %request.domain()))]
    pub async fn check(&self, request: &CheckRequest) -> CheckResult {
        let resolution = self.lookup.lookup_authoritative_nameservers(request.domain()).await;
        let result = self.classifier.check_result(request, resolution);
        info!("Status {}", result.status());

        result
    }

    /// Checks all `requests` in order and calls `progress` with `(completed, total)` after each one.
    ///
    /// Fails only if `requests` is empty.
    pub async fn run<P>(&self, requests: &[CheckRequest], mut progress: P) -> Result<BatchOutcome>
    where
        P: FnMut(usize, usize),
    {
        if requests.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let total = requests.len();
        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for (i, request) in requests.iter().enumerate() {
            if i > 0 && !self.opts.delay.is_zero() {
                tokio::time::sleep(self.opts.delay).await;
            }
            // A cancellation during the delay must prevent the next lookup
            if self.is_cancelled() {
                info!("Batch cancelled after {} of {} checks", i, total);
                cancelled = true;
                break;
            }

            results.push(self.check(request).await);
            progress(i + 1, total);
        }
        debug!("Finished {} checks", results.len());

        Ok(BatchOutcome::new(results, cancelled))
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .map(|x| x.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

/// Checks `requests` against Google Public DNS with default options.
pub async fn run_batch<P>(requests: &[CheckRequest], progress: P) -> Result<BatchOutcome>
where
    P: FnMut(usize, usize),
{
    BatchDriver::new(DohResolver::default(), Classifier::default(), BatchOpts::default())
        .run(requests, progress)
        .await
}

/// Results of a batch run in input order together with their counts per status.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    results: Vec<CheckResult>,
    statistics: StatusCounts,
    cancelled: bool,
}

impl BatchOutcome {
    pub fn new(results: Vec<CheckResult>, cancelled: bool) -> BatchOutcome {
        let statistics = StatusCounts::from_results(&results);
        BatchOutcome {
            results,
            statistics,
            cancelled,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> Iter<CheckResult> {
        self.results.iter()
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn counts(&self) -> &StatusCounts {
        &self.statistics
    }

    /// True if the batch stopped before all requests were checked.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_fully_authoritative(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(CheckResult::is_fully_authoritative)
    }

    pub fn filtered(&self, filter: ResultFilter) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |x| filter.accepts(x.status()))
    }
}

impl<'a> Statistics<'a> for BatchOutcome {
    type StatsOut = StatusCounts;

    fn statistics(&'a self) -> Self::StatsOut {
        self.statistics
    }
}

impl IntoIterator for BatchOutcome {
    type Item = CheckResult;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchOutcome {
    type Item = &'a CheckResult;
    type IntoIter = Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Selects check results for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFilter {
    #[default]
    All,
    Authoritative,
    /// Partial matches and mismatches
    Issues,
    Errors,
}

impl ResultFilter {
    pub fn accepts(&self, status: AuthorityStatus) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Authoritative => status == AuthorityStatus::Authoritative,
            ResultFilter::Issues => status.is_issue(),
            ResultFilter::Errors => status == AuthorityStatus::Error,
        }
    }
}

impl FromStr for ResultFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(ResultFilter::All),
            "authoritative" => Ok(ResultFilter::Authoritative),
            "issues" => Ok(ResultFilter::Issues),
            "errors" => Ok(ResultFilter::Errors),
            _ => Err(Error::ParserError {
                what: s.to_string(),
                to: "ResultFilter",
                why: "invalid filter".to_string(),
            }),
        }
    }
}
