// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use serde::Serialize;

use crate::authority::{AuthorityStatus, CheckResult};

pub trait Statistics<'a> {
    type StatsOut;

    fn statistics(&'a self) -> Self::StatsOut;
}

/// Number of check results per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub authoritative: usize,
    pub partial_match: usize,
    pub not_authoritative: usize,
    pub errors: usize,
}

impl StatusCounts {
    pub fn from_results<'a, I: IntoIterator<Item = &'a CheckResult>>(results: I) -> StatusCounts {
        results.into_iter().fold(StatusCounts::default(), |mut counts, result| {
            match result.status() {
                AuthorityStatus::Authoritative => counts.authoritative += 1,
                AuthorityStatus::PartialMatch => counts.partial_match += 1,
                AuthorityStatus::NotAuthoritative => counts.not_authoritative += 1,
                AuthorityStatus::Error => counts.errors += 1,
            }
            counts
        })
    }

    pub fn count(&self, status: AuthorityStatus) -> usize {
        match status {
            AuthorityStatus::Authoritative => self.authoritative,
            AuthorityStatus::PartialMatch => self.partial_match,
            AuthorityStatus::NotAuthoritative => self.not_authoritative,
            AuthorityStatus::Error => self.errors,
        }
    }

    pub fn total(&self) -> usize {
        self.authoritative + self.partial_match + self.not_authoritative + self.errors
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{num} {checks} [Authoritative {auth}, Partial Match {partial}, Not Authoritative {not_auth}], {errs} Err",
            num = self.total(),
            checks = if self.total() == 1 { "check" } else { "checks" },
            auth = self.authoritative,
            partial = self.partial_match,
            not_auth = self.not_authoritative,
            errs = self.errors,
        )
    }
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use super::*;
    use crate::authority::Classifier;
    use crate::request::CheckRequest;
    use crate::resolver::ResolutionError;

    fn results() -> Vec<CheckResult> {
        let classifier = Classifier::default();
        let request = CheckRequest::new("example.co.za", vec!["ns1.example.com", "ns2.example.com"]).unwrap();
        let actual = vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()];
        vec![
            classifier.check_result(&request, Ok(actual.clone())),
            classifier.check_result(&request, Ok(vec!["ns1.example.com".to_string()])),
            classifier.check_result(&request, Ok(vec!["ns1.other.net".to_string()])),
            classifier.check_result(&request, Ok(actual)),
            classifier.check_result(&request, Err(ResolutionError::Timeout)),
        ]
    }

    #[test]
    fn counts_per_status() {
        let counts = StatusCounts::from_results(&results());

        assert_that(&counts).is_equal_to(StatusCounts {
            authoritative: 2,
            partial_match: 1,
            not_authoritative: 1,
            errors: 1,
        });
        assert_that(&counts.total()).is_equal_to(5);
        assert_that(&counts.count(AuthorityStatus::Error)).is_equal_to(1);
    }

    #[test]
    fn display() {
        let counts = StatusCounts::from_results(&results());

        assert_that(&counts.to_string()).is_equal_to(
            "5 checks [Authoritative 2, Partial Match 1, Not Authoritative 1], 1 Err".to_string(),
        );
    }
}
