// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;
use std::time::Duration;

use yansi::{Paint, Painted};

use crate::app::output::styles::{
    self, attention_prefix, caption_prefix, error_prefix, finished_prefix, info_prefix, itemization_prefix,
    ok_prefix,
};
use crate::app::output::OutputType;
use crate::app::AppConfig;
use crate::batch::{BatchOpts, BatchOutcome};
use crate::resolver::DohResolverOpts;
use crate::statistics::Statistics;

#[derive(Debug, Default)]
pub struct ConsoleOpts {
    quiet: bool,
    /// Results go to stdout in a machine readable format, so any chatter would corrupt them
    machine_readable_stdout: bool,
}

impl From<&AppConfig> for ConsoleOpts {
    fn from(app_config: &AppConfig) -> Self {
        ConsoleOpts {
            quiet: app_config.quiet,
            machine_readable_stdout: app_config.output != OutputType::Summary && app_config.output_file.is_none(),
        }
    }
}

#[derive(Debug)]
pub struct Console {
    opts: ConsoleOpts,
}

impl Console {
    pub fn new(opts: ConsoleOpts) -> Console {
        Console { opts }
    }

    pub fn print_opts(&self, resolver_opts: &DohResolverOpts, batch_opts: &BatchOpts) {
        if self.not_quiet() {
            self.caption(format!(
                "{}: endpoint={}, timeout={}, delay={}",
                Fmt::emph("Options"),
                resolver_opts.url,
                humantime::format_duration(resolver_opts.timeout),
                humantime::format_duration(batch_opts.delay),
            ));
        }
    }

    pub fn print_estimates(&self, num_requests: usize, batch_opts: &BatchOpts) {
        if self.not_quiet() {
            let domains_str = if num_requests > 1 {
                format!("{} domains", num_requests)
            } else {
                "1 domain".to_string()
            };
            let min_duration = batch_opts.delay * num_requests.saturating_sub(1) as u32;
            self.info(format!(
                "Checking {}; this takes at least {}.",
                domains_str,
                humantime::format_duration(min_duration)
            ));
        }
    }

    pub fn print_progress(&self, domain: &str, completed: usize, total: usize) {
        if self.not_quiet() {
            self.itemize(format!("Checked {} ({}/{})", domain, completed, total));
        }
    }

    pub fn print_statistics(&self, outcome: &BatchOutcome, total_run_time: Duration) {
        if self.not_quiet() {
            self.info(format!(
                "Finished {} within {} ms of total run time.",
                outcome.statistics(),
                total_run_time.as_millis()
            ));
        }
    }

    pub fn print_cancelled(&self, outcome: &BatchOutcome) {
        if self.not_quiet() {
            self.attention(format!(
                "Cancelled; results are incomplete with only {} domains checked.",
                outcome.len()
            ));
        }
    }

    pub fn print_verdict(&self, outcome: &BatchOutcome) {
        if !self.not_quiet() {
            return;
        }
        if outcome.is_fully_authoritative() {
            self.ok("All nameservers are authoritative.");
        } else {
            self.failed("Some nameservers are not authoritative.");
        }
    }

    pub fn print_finished(&self) {
        if self.not_quiet() {
            self.finished();
        }
    }

    pub fn emphasize<T: fmt::Display>(&self, item: T) {
        println!("{}", Fmt::emph(&item))
    }

    pub fn info<T: AsRef<str>>(&self, str: T) {
        println!("{} {}", info_prefix(), str.as_ref());
    }

    pub fn attention<T: AsRef<str>>(&self, str: T) {
        println!("{} {}", Fmt::attention(attention_prefix()), str.as_ref());
    }

    pub fn finished(&self) {
        self.emphasize(format!("{} Finished.", finished_prefix()));
    }

    pub fn caption<T: AsRef<str>>(&self, str: T) {
        self.emphasize(format!("{} {}", caption_prefix(), str.as_ref()));
    }

    pub fn failed<T: AsRef<str>>(&self, str: T) {
        println!("{} {}", Fmt::error(error_prefix()), str.as_ref());
    }

    /// Errors go to stderr and are printed even in quiet mode.
    pub fn error<T: AsRef<str>>(&self, str: T) {
        eprintln!("{} {}", Fmt::error(error_prefix()), str.as_ref());
    }

    pub fn ok<T: AsRef<str>>(&self, str: T) {
        println!("{} {}", Fmt::ok(ok_prefix()), str.as_ref());
    }

    pub fn itemize<T: AsRef<str>>(&self, str: T) {
        println!(" {} {}", itemization_prefix(), str.as_ref());
    }

    /** Check if informational output should be printed
     *
     * This is false, if `quiet` is set or results are written to stdout as JSON or CSV.
     */
    pub fn not_quiet(&self) -> bool {
        !self.opts.quiet && !self.opts.machine_readable_stdout
    }
}

pub struct Fmt {}

impl Fmt {
    pub fn emph<T: fmt::Display + ?Sized>(item: &T) -> Painted<&T> {
        item.paint(styles::EMPH)
    }

    pub fn attention<T: fmt::Display + ?Sized>(item: &T) -> Painted<&T> {
        item.paint(styles::ATTENTION)
    }

    pub fn error<T: fmt::Display + ?Sized>(item: &T) -> Painted<&T> {
        item.paint(styles::ERROR)
    }

    pub fn ok<T: fmt::Display + ?Sized>(item: &T) -> Painted<&T> {
        item.paint(styles::OK)
    }
}
