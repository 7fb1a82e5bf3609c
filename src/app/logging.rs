// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::ffi::OsString;

use anyhow::Result;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

pub struct Logging {
    verbosity: u8,
    rust_log: Option<OsString>,
    color: bool,
    debug: bool,
}

impl Logging {
    pub fn new(verbosity: u8, rust_log: Option<OsString>, color: bool, debug: bool) -> Logging {
        Logging {
            verbosity,
            rust_log,
            color,
            debug,
        }
    }

    fn log_level(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    pub fn start(self) -> Result<()> {
        // Subscribe to all log crate log messages and transform them to a tracing events
        LogTracer::init()?;

        let log_level = Logging::log_level(self.verbosity);
        let filter = if self.rust_log.is_some() {
            // This is controlled by the env variable RUST_LOG and overrides the max level, if set
            EnvFilter::from_default_env()
        } else {
            // If RUST_LOG is not set, use `-v` arg to determine log level
            EnvFilter::from(format!("{}={}", env!("CARGO_CRATE_NAME"), log_level))
        };

        // Results may go to stdout, so logs always go to stderr
        let fmt = if self.debug {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(self.color)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_target(true)
                .with_span_events(FmtSpan::FULL)
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(self.color)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_target(false)
        };

        let registry = tracing_subscriber::registry().with(filter).with(fmt);
        set_global_default(registry)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use super::*;

    #[test]
    fn verbosity_to_log_level() {
        assert_that(&Logging::log_level(0)).is_equal_to(LevelFilter::WARN);
        assert_that(&Logging::log_level(1)).is_equal_to(LevelFilter::INFO);
        assert_that(&Logging::log_level(2)).is_equal_to(LevelFilter::DEBUG);
        assert_that(&Logging::log_level(7)).is_equal_to(LevelFilter::TRACE);
    }
}
