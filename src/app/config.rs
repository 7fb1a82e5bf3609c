// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::convert::TryFrom;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::app::output::summary::SummaryOptions;
use crate::app::output::{JsonOptions, OutputConfig, OutputType};
use crate::authority::ClassifierOpts;
use crate::batch::{BatchOpts, ResultFilter};
use crate::resolver::DohResolverOpts;

#[derive(Debug)]
pub struct AppConfig {
    pub domain_name: Option<String>,
    pub nameservers: Option<Vec<String>>,
    /// `-` reads from stdin
    pub input_file: Option<String>,
    pub doh_url: String,
    pub timeout: Duration,
    pub delay: Duration,
    pub propagation_window: String,
    pub quiet: bool,
    pub output: OutputType,
    pub output_config: OutputConfig,
    pub output_file: Option<String>,
    pub filter: ResultFilter,
}

impl TryFrom<&ArgMatches> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: &ArgMatches) -> std::result::Result<Self, Self::Error> {
        let output = args
            .get_one::<String>("output")
            .map(|x| OutputType::try_from(x.as_str()).context("failed to parse output type"))
            .context("no output type specified")??;
        let filter = args
            .get_one::<String>("filter")
            .map(|x| ResultFilter::from_str(x).context("failed to parse filter"))
            .context("no filter specified")??;
        let config = AppConfig {
            domain_name: args.get_one::<String>("domain name").cloned(),
            nameservers: args.get_many::<String>("nameservers").map(|xs| xs.cloned().collect()),
            input_file: args.get_one::<String>("input-file").cloned(),
            doh_url: args
                .get_one::<String>("doh-url")
                .cloned()
                .context("no DoH endpoint specified")?,
            timeout: duration(args, "timeout")?,
            delay: duration(args, "delay")?,
            propagation_window: args
                .get_one::<String>("propagation-window")
                .cloned()
                .context("no propagation window specified")?,
            quiet: args.get_flag("quiet"),
            output_config: output_config(output, filter, args)?,
            output,
            output_file: args.get_one::<String>("output-file").cloned(),
            filter,
        };

        Ok(config)
    }
}

impl AppConfig {
    pub fn doh_resolver_opts(&self) -> DohResolverOpts {
        DohResolverOpts::new(self.doh_url.clone(), self.timeout)
    }

    pub fn classifier_opts(&self) -> ClassifierOpts {
        ClassifierOpts::new(self.propagation_window.clone())
    }

    pub fn batch_opts(&self) -> BatchOpts {
        BatchOpts::new(self.delay)
    }
}

fn duration(args: &ArgMatches, name: &str) -> Result<Duration> {
    let value = args
        .get_one::<String>(name)
        .with_context(|| format!("no {} specified", name))?;
    humantime::parse_duration(value).with_context(|| format!("failed to parse {}", name))
}

fn output_config(output_type: OutputType, filter: ResultFilter, args: &ArgMatches) -> Result<OutputConfig> {
    let options: Vec<&str> = args
        .get_many::<String>("output-options")
        .map(|xs| xs.map(String::as_str).collect())
        .unwrap_or_default();
    parse_output_options(output_type, filter, options)
}

fn parse_output_options(output_type: OutputType, filter: ResultFilter, options: Vec<&str>) -> Result<OutputConfig> {
    match output_type {
        OutputType::Summary => {
            let options = SummaryOptions::try_from(options).context("failed to parse summary options")?;
            Ok(OutputConfig::summary(options.with_filter(filter)))
        }
        OutputType::Json => {
            let options = JsonOptions::try_from(options).context("failed to parse json options")?;
            Ok(OutputConfig::json(options))
        }
        OutputType::Csv => Ok(OutputConfig::csv()),
    }
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use super::*;
    use crate::app::cli_parser::create_parser;

    fn config(args: &[&str]) -> Result<AppConfig> {
        let matches = create_parser().try_get_matches_from(args.iter().copied())?;
        AppConfig::try_from(&matches)
    }

    #[test]
    fn defaults() {
        let config = config(&["nsauth", "example.co.za", "ns1.example.com"]).unwrap();

        assert_that(&config.domain_name).is_equal_to(Some("example.co.za".to_string()));
        assert_that(&config.nameservers).is_equal_to(Some(vec!["ns1.example.com".to_string()]));
        assert_that(&config.doh_url.as_str()).is_equal_to("https://dns.google/resolve");
        assert_that(&config.timeout).is_equal_to(Duration::from_secs(10));
        assert_that(&config.delay).is_equal_to(Duration::from_millis(200));
        assert_that(&config.propagation_window.as_str()).is_equal_to("24-48 hours");
        assert_that(&config.output).is_equal_to(OutputType::Summary);
        assert_that(&config.filter).is_equal_to(ResultFilter::All);
        assert_that(&config.quiet).is_false();
    }

    #[test]
    fn batch_from_file() {
        let config = config(&[
            "nsauth",
            "--input",
            "domains.csv",
            "--output",
            "csv",
            "--delay",
            "1s",
            "--filter",
            "issues",
        ])
        .unwrap();

        assert_that(&config.input_file).is_equal_to(Some("domains.csv".to_string()));
        assert_that(&config.domain_name).is_none();
        assert_that(&config.output).is_equal_to(OutputType::Csv);
        assert_that(&config.batch_opts().delay).is_equal_to(Duration::from_secs(1));
        assert_that(&config.filter).is_equal_to(ResultFilter::Issues);
    }

    #[test]
    fn invalid_duration() {
        let config = config(&["nsauth", "--timeout", "soon", "example.co.za", "ns1.example.com"]);

        assert_that(&config).is_err();
    }

    #[test]
    fn resolver_opts_from_config() {
        let config = config(&[
            "nsauth",
            "--doh-url",
            "https://cloudflare-dns.com/dns-query",
            "--timeout",
            "1500ms",
            "example.co.za",
            "ns1.example.com",
        ])
        .unwrap();

        let opts = config.doh_resolver_opts();

        assert_that(&opts.url.as_str()).is_equal_to("https://cloudflare-dns.com/dns-query");
        assert_that(&opts.timeout).is_equal_to(Duration::from_millis(1500));
    }
}
