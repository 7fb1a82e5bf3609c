// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::collections::HashSet;
use std::convert::TryFrom;
use std::io::{self, Write};

use anyhow::Context;

use crate::batch::BatchOutcome;
use crate::export::{CsvExport, ExportFormat, JsonExport};
use crate::{Error, Result};

pub mod styles;
pub mod summary;

use summary::{SummaryFormat, SummaryOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Summary,
    Json,
    Csv,
}

impl TryFrom<&str> for OutputType {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "summary" => Ok(OutputType::Summary),
            "json" => Ok(OutputType::Json),
            "csv" => Ok(OutputType::Csv),
            _ => Err(Error::ParserError {
                what: value.to_string(),
                to: "OutputType",
                why: "invalid output type".to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct JsonOptions {
    /// Pretty formatting
    pretty: bool,
}

impl JsonOptions {
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

impl<'a> TryFrom<Vec<&'a str>> for JsonOptions {
    type Error = Error;

    fn try_from(values: Vec<&'a str>) -> std::result::Result<Self, Self::Error> {
        let options: HashSet<&str> = values.into_iter().collect();
        Ok(JsonOptions {
            pretty: options.contains("pretty"),
        })
    }
}

pub trait OutputFormat<T> {
    fn output<W: Write>(&self, writer: &mut W, data: &T) -> Result<()>;
}

#[derive(Debug)]
pub enum OutputConfig {
    Summary { format: SummaryFormat },
    Json { format: JsonExport },
    Csv { format: CsvExport },
}

impl OutputConfig {
    pub fn summary(opts: SummaryOptions) -> Self {
        OutputConfig::Summary {
            format: SummaryFormat::new(opts),
        }
    }

    pub fn json(opts: JsonOptions) -> Self {
        OutputConfig::Json {
            format: JsonExport::new(opts.pretty()),
        }
    }

    pub fn csv() -> Self {
        OutputConfig::Csv {
            format: CsvExport::default(),
        }
    }
}

#[derive(Debug)]
pub struct Output<'a> {
    config: &'a OutputConfig,
}

impl Output<'_> {
    pub fn new(config: &OutputConfig) -> Output<'_> {
        Output { config }
    }
}

impl OutputFormat<BatchOutcome> for Output<'_> {
    fn output<W: Write>(&self, writer: &mut W, data: &BatchOutcome) -> Result<()> {
        match self.config {
            OutputConfig::Summary { format } => format.output(writer, data),
            OutputConfig::Json { format } => {
                format.export(writer, data)?;
                // serde_json does not terminate its output
                writeln!(writer)?;
                Ok(())
            }
            OutputConfig::Csv { format } => format.export(writer, data),
        }
    }
}

pub fn output<W: Write>(config: &OutputConfig, writer: &mut W, data: &BatchOutcome) -> anyhow::Result<()> {
    let output = Output::new(config);
    output.output(writer, data).context("Failed to write results.")
}

pub fn output_to_stdout(config: &OutputConfig, data: &BatchOutcome) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    output(config, &mut handle, data).context("Failed to print results to stdout.")
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use super::*;
    use crate::authority::Classifier;
    use crate::request::CheckRequest;

    fn outcome() -> BatchOutcome {
        let classifier = Classifier::default();
        let request = CheckRequest::new("example.co.za", vec!["ns1.example.com"]).unwrap();
        let result = classifier.check_result(&request, Ok(vec!["ns1.example.com".to_string()]));
        BatchOutcome::new(vec![result], false)
    }

    #[test]
    fn output_type_try_from() {
        assert_that(&OutputType::try_from("csv")).is_ok().is_equal_to(OutputType::Csv);
        assert_that(&OutputType::try_from("xml")).is_err();
    }

    #[test]
    fn json_options_try_from() {
        let opts = JsonOptions::try_from(vec!["pretty"]).unwrap();

        assert_that(&opts.pretty()).is_true();
    }

    #[test]
    fn json_output_is_newline_terminated() {
        crate::utils::tests::logging::init();
        let config = OutputConfig::json(JsonOptions::default());
        let mut buf = Vec::new();

        let res = output(&config, &mut buf, &outcome());

        assert_that(&res).is_ok();
        let text = String::from_utf8(buf).unwrap();
        assert_that(&text.starts_with('{')).is_true();
        assert_that(&text.ends_with("}\n")).is_true();
    }

    #[test]
    fn csv_output() {
        crate::utils::tests::logging::init();
        let config = OutputConfig::csv();
        let mut buf = Vec::new();

        let res = output(&config, &mut buf, &outcome());

        assert_that(&res).is_ok();
        let text = String::from_utf8(buf).unwrap();
        assert_that(&text.lines().count()).is_equal_to(2);
    }
}
