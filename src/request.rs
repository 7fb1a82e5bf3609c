// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::nameserver::{normalize_domain, NameserverSet};
use crate::{Error, Result};

/// A domain together with the nameservers its owner intends to use.
///
/// The domain is non-empty and free of scheme and path; there is at least one nameserver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    domain: String,
    nameservers: NameserverSet,
}

impl CheckRequest {
    pub fn new<T: AsRef<str>, I: IntoIterator<Item = T>>(domain: &str, nameservers: I) -> Result<CheckRequest> {
        let normalized_domain = normalize_domain(domain);
        if normalized_domain.is_empty() {
            return Err(Error::ParserError {
                what: domain.to_string(),
                to: "CheckRequest",
                why: "domain name is empty".to_string(),
            });
        }

        let nameservers = NameserverSet::new(nameservers);
        if nameservers.is_empty() {
            return Err(Error::ParserError {
                what: domain.to_string(),
                to: "CheckRequest",
                why: "no nameservers given".to_string(),
            });
        }

        Ok(CheckRequest {
            domain: normalized_domain,
            nameservers,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn nameservers(&self) -> &NameserverSet {
        &self.nameservers
    }
}

/// Parses a single input line `domain, ns1, ns2, ...`; commas and tabs both separate fields.
impl FromStr for CheckRequest {
    type Err = Error;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split([',', '\t']).map(str::trim).collect();
        if parts.len() < 2 {
            return Err(Error::ParserError {
                what: line.to_string(),
                to: "CheckRequest",
                why: "expected a domain followed by at least one nameserver".to_string(),
            });
        }

        CheckRequest::new(parts[0], &parts[1..])
    }
}

/// Parses batch input into check requests.
///
/// Blank lines and lines starting with `#` are ignored. Lines that do not form a valid request
/// are skipped, too; nothing is ever checked for them.
pub fn parse_requests(input: &str) -> Vec<CheckRequest> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match CheckRequest::from_str(line) {
            Ok(request) => Some(request),
            Err(err) => {
                debug!("Skipping input line '{}': {}", line, err);
                None
            }
        })
        .collect()
}
