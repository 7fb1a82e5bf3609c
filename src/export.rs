// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Flat, tabular projection of batch outcomes and their CSV and JSON serializations.

use std::io::Write;

use serde::Serialize;

use crate::authority::CheckResult;
use crate::batch::BatchOutcome;
use crate::Result;

pub static NAMESERVER_SEPARATOR: &str = "; ";
pub static SUGGESTION_SEPARATOR: &str = " | ";

/// One row per check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Requested Nameservers")]
    pub requested_nameservers: String,
    #[serde(rename = "Actual Nameservers")]
    pub actual_nameservers: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Suggestions")]
    pub suggestions: String,
}

impl From<&CheckResult> for ExportRow {
    fn from(result: &CheckResult) -> Self {
        ExportRow {
            domain: result.domain().to_string(),
            requested_nameservers: result.requested_nameservers().join(NAMESERVER_SEPARATOR),
            actual_nameservers: result.actual_nameservers().join(NAMESERVER_SEPARATOR),
            status: result.status().label().to_string(),
            message: result.message().to_string(),
            suggestions: result.suggestions().join(SUGGESTION_SEPARATOR),
        }
    }
}

impl BatchOutcome {
    pub fn rows(&self) -> impl Iterator<Item = ExportRow> + '_ {
        self.iter().map(ExportRow::from)
    }
}

pub trait ExportFormat {
    fn export<W: Write>(&self, writer: &mut W, outcome: &BatchOutcome) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct CsvExport {}

impl ExportFormat for CsvExport {
    fn export<W: Write>(&self, writer: &mut W, outcome: &BatchOutcome) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for row in outcome.rows() {
            csv.serialize(row)?;
        }
        csv.flush()?;

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct JsonExport {
    pretty: bool,
}

impl JsonExport {
    pub fn new(pretty: bool) -> JsonExport {
        JsonExport { pretty }
    }
}

impl ExportFormat for JsonExport {
    fn export<W: Write>(&self, writer: &mut W, outcome: &BatchOutcome) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, outcome)?;
        } else {
            serde_json::to_writer(writer, outcome)?;
        }

        Ok(())
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
        let request = CheckRequest::new("example.co.za", vec!["ns1.example.com", "ns9.example.com"]).unwrap();
        let failed = CheckRequest::new("unregistered.co.za", vec!["ns1.example.com"]).unwrap();
        let results = vec![
            classifier.check_result(
                &request,
                Ok(vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()]),
            ),
            classifier.check_result(&failed, Err(ResolutionError::NoAnswer { status: 3 })),
        ];
        BatchOutcome::new(results, false)
    }

    #[test]
    fn row_projection() {
        let outcome = outcome();

        let rows: Vec<_> = outcome.rows().collect();

        assert_that(&rows).has_length(2);
        assert_that(&rows[0].requested_nameservers).is_equal_to("ns1.example.com; ns9.example.com".to_string());
        assert_that(&rows[0].actual_nameservers).is_equal_to("ns1.example.com; ns2.example.com".to_string());
        assert_that(&rows[0].status).is_equal_to("partial".to_string());
        assert_that(&rows[0].suggestions).contains(" | Add missing nameservers: ns2.example.com | ");
        assert_that(&rows[1].actual_nameservers).is_equal_to(String::new());
        assert_that(&rows[1].status).is_equal_to("error".to_string());
    }

    #[test]
    fn csv_export() {
        let mut buf = Vec::new();

        let res = CsvExport::default().export(&mut buf, &outcome());

        assert_that(&res).is_ok();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<String> = csv.lines().map(ToString::to_string).collect();
        assert_that(&lines).has_length(3);
        assert_that(&lines[0])
            .is_equal_to("Domain,Requested Nameservers,Actual Nameservers,Status,Message,Suggestions".to_string());
        assert_that(&lines[1]).starts_with("example.co.za,ns1.example.com; ns9.example.com,ns1.example.com; ns2.example.com,partial,");
        assert_that(&lines[2]).starts_with("unregistered.co.za,ns1.example.com,,error,Unable to resolve domain nameservers,");
    }

    #[test]
    fn json_export() {
        let mut buf = Vec::new();

        let res = JsonExport::new(true).export(&mut buf, &outcome());

        assert_that(&res).is_ok();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_that(&json["results"].as_array().map(Vec::len)).is_equal_to(Some(2));
        assert_that(&json["results"][0]["status"]).is_equal_to(serde_json::json!("PartialMatch"));
        assert_that(&json["results"][1]["error"])
            .is_equal_to(serde_json::json!("no authoritative nameservers found (DNS status 3)"));
        assert_that(&json["results"][0].get("error")).is_none();
        assert_that(&json["statistics"]["errors"]).is_equal_to(serde_json::json!(1));
        assert_that(&json["cancelled"]).is_equal_to(serde_json::json!(false));
    }
}
