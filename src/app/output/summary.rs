// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::collections::HashSet;
use std::convert::TryFrom;
use std::io::Write;

use yansi::{Paint, Painted};

use super::styles::{self, attention_prefix, error_prefix, itemization_prefix, mismatch_prefix, ok_prefix};
use super::OutputFormat;
use crate::authority::{AuthorityStatus, CheckResult};
use crate::batch::{BatchOutcome, ResultFilter};
use crate::{Error, Result};

#[derive(Debug)]
pub struct SummaryOptions {
    /// Show requested and actual nameservers as well as suggestions
    human: bool,
    /// Reduce output to one line per domain
    condensed: bool,
    filter: ResultFilter,
}

impl SummaryOptions {
    pub fn new(human: bool, condensed: bool, filter: ResultFilter) -> SummaryOptions {
        SummaryOptions {
            human,
            condensed,
            filter,
        }
    }

    pub fn with_filter(self, filter: ResultFilter) -> SummaryOptions {
        SummaryOptions { filter, ..self }
    }

    pub fn human(&self) -> bool {
        self.human
    }

    pub fn condensed(&self) -> bool {
        self.condensed
    }

    pub fn filter(&self) -> ResultFilter {
        self.filter
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions {
            human: true,
            condensed: false,
            filter: ResultFilter::All,
        }
    }
}

impl<'a> TryFrom<Vec<&'a str>> for SummaryOptions {
    type Error = Error;

    fn try_from(values: Vec<&'a str>) -> std::result::Result<Self, Self::Error> {
        let options: HashSet<&str> = values.into_iter().collect();
        Ok(SummaryOptions {
            human: options.contains("human"),
            condensed: options.contains("condensed"),
            filter: ResultFilter::All,
        })
    }
}

#[derive(Debug, Default)]
pub struct SummaryFormat {
    opts: SummaryOptions,
}

impl SummaryFormat {
    pub fn new(opts: SummaryOptions) -> SummaryFormat {
        SummaryFormat { opts }
    }

    pub fn opts(&self) -> &SummaryOptions {
        &self.opts
    }
}

impl OutputFormat<BatchOutcome> for SummaryFormat {
    fn output<W: Write>(&self, writer: &mut W, data: &BatchOutcome) -> Result<()> {
        for result in data.filtered(self.opts.filter) {
            result.output(writer, &self.opts)?;
        }

        Ok(())
    }
}

trait SummaryFormatter {
    fn output<W: Write>(&self, writer: &mut W, opts: &SummaryOptions) -> Result<()>;
}

impl SummaryFormatter for CheckResult {
    fn output<W: Write>(&self, writer: &mut W, opts: &SummaryOptions) -> Result<()> {
        let icon = status_icon(self.status());

        if opts.condensed() {
            writeln!(writer, "{} {} {}", icon, self.domain(), self.status())?;
            return Ok(());
        }

        writeln!(writer, "{} {}: {}", icon, self.domain().paint(styles::EMPH), self.message())?;
        if opts.human() {
            itemize(writer, "Requested", &self.requested_nameservers().join(", "))?;
            if !self.actual_nameservers().is_empty() {
                itemize(writer, "Actual", &self.actual_nameservers().join(", "))?;
            }
            for suggestion in self.suggestions() {
                itemize(writer, "Suggestion", suggestion)?;
            }
        }

        Ok(())
    }
}

fn itemize<W: Write>(writer: &mut W, caption: &str, value: &str) -> Result<()> {
    writeln!(writer, " {} {}: {}", itemization_prefix(), caption, value)?;
    Ok(())
}

fn status_icon(status: AuthorityStatus) -> Painted<&'static str> {
    match status {
        AuthorityStatus::Authoritative => ok_prefix().paint(styles::OK),
        AuthorityStatus::PartialMatch => attention_prefix().paint(styles::ATTENTION),
        AuthorityStatus::NotAuthoritative => mismatch_prefix().paint(styles::ERROR),
        AuthorityStatus::Error => error_prefix().paint(styles::ERROR),
    }
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use super::*;
    use crate::authority::Classifier;
    use crate::request::CheckRequest;
    use crate::resolver::ResolutionError;

    fn outcome() -> BatchOutcome {
        let classifier = Classifier::default();
        let partial = CheckRequest::new("example.co.za", vec!["ns1.example.com", "ns9.example.com"]).unwrap();
        let failed = CheckRequest::new("unregistered.co.za", vec!["ns1.example.com"]).unwrap();
        let results = vec![
            classifier.check_result(
                &partial,
                Ok(vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()]),
            ),
            classifier.check_result(&failed, Err(ResolutionError::Timeout)),
        ];
        BatchOutcome::new(results, false)
    }

    fn render(opts: SummaryOptions) -> String {
        yansi::disable();
        let format = SummaryFormat::new(opts);
        let mut buf = Vec::new();
        format.output(&mut buf, &outcome()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn summary_options_try_from() {
        let opts = SummaryOptions::try_from(vec!["condensed"]).unwrap();

        assert_that(&opts.condensed()).is_true();
        assert_that(&opts.human()).is_false();
        assert_that(&opts.filter()).is_equal_to(ResultFilter::All);
    }

    #[test]
    fn human_summary_shows_nameservers_and_suggestions() {
        crate::utils::tests::logging::init();

        let text = render(SummaryOptions::default());

        assert_that(&text).contains("example.co.za: ");
        assert_that(&text).contains("Requested: ns1.example.com, ns9.example.com");
        assert_that(&text).contains("Actual: ns1.example.com, ns2.example.com");
        assert_that(&text).contains("Suggestion: Add missing nameservers: ns2.example.com");
        assert_that(&text).contains("unregistered.co.za: ");
    }

    #[test]
    fn condensed_summary_is_one_line_per_domain() {
        crate::utils::tests::logging::init();

        let text = render(SummaryOptions::new(false, true, ResultFilter::All));

        assert_that(&text.lines().count()).is_equal_to(2);
        assert_that(&text).contains("example.co.za Partial Match");
    }

    #[test]
    fn filtered_summary() {
        crate::utils::tests::logging::init();

        let text = render(SummaryOptions::new(false, true, ResultFilter::Errors));

        assert_that(&text.lines().count()).is_equal_to(1);
        assert_that(&text).contains("unregistered.co.za Error");
    }
}
