// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Classification of requested nameservers against the authoritative delegation of a domain.
//!
//! A requested nameserver *matches* if any actual nameserver equals it, is contained in it, or
//! contains it. Hence `ns1.example` matches `ns1.example.com`, but `ns1.example.com` also matches
//! `ns1.example.com.au`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::nameserver::NameserverSet;
use crate::request::CheckRequest;
use crate::resolver::{ResolutionError, ResolutionResult};
use crate::utils::serialize::ser_opt_to_string;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuthorityStatus {
    Authoritative,
    PartialMatch,
    NotAuthoritative,
    Error,
}

impl AuthorityStatus {
    /// Short status label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            AuthorityStatus::Authoritative => "success",
            AuthorityStatus::PartialMatch => "partial",
            AuthorityStatus::NotAuthoritative => "mismatch",
            AuthorityStatus::Error => "error",
        }
    }

    /// Partial matches and mismatches; both need action at the registrar.
    pub fn is_issue(&self) -> bool {
        matches!(self, AuthorityStatus::PartialMatch | AuthorityStatus::NotAuthoritative)
    }
}

impl fmt::Display for AuthorityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            AuthorityStatus::Authoritative => "Authoritative",
            AuthorityStatus::PartialMatch => "Partial Match",
            AuthorityStatus::NotAuthoritative => "Not Authoritative",
            AuthorityStatus::Error => "Error",
        };
        f.write_str(str)
    }
}

impl FromStr for AuthorityStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "success" | "authoritative" => Ok(AuthorityStatus::Authoritative),
            "partial" => Ok(AuthorityStatus::PartialMatch),
            "mismatch" => Ok(AuthorityStatus::NotAuthoritative),
            "error" => Ok(AuthorityStatus::Error),
            _ => Err(Error::ParserError {
                what: s.to_string(),
                to: "AuthorityStatus",
                why: "unknown status".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierOpts {
    /// Time it takes until delegation changes are visible, as shown to users
    pub propagation_window: String,
}

impl ClassifierOpts {
    pub fn new<T: Into<String>>(propagation_window: T) -> ClassifierOpts {
        ClassifierOpts {
            propagation_window: propagation_window.into(),
        }
    }
}

impl Default for ClassifierOpts {
    fn default() -> Self {
        ClassifierOpts::new("24-48 hours")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: AuthorityStatus,
    pub is_fully_authoritative: bool,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl Classification {
    fn new(status: AuthorityStatus, message: &str, suggestions: Vec<String>) -> Classification {
        Classification {
            status,
            is_fully_authoritative: status == AuthorityStatus::Authoritative,
            message: message.to_string(),
            suggestions,
        }
    }
}

/// Outcome of checking one domain. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    domain: String,
    requested_nameservers: Vec<String>,
    actual_nameservers: Vec<String>,
    status: AuthorityStatus,
    is_fully_authoritative: bool,
    message: String,
    suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "ser_opt_to_string")]
    error: Option<ResolutionError>,
}

impl CheckResult {
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn requested_nameservers(&self) -> &[String] {
        &self.requested_nameservers
    }

    pub fn actual_nameservers(&self) -> &[String] {
        &self.actual_nameservers
    }

    pub fn status(&self) -> AuthorityStatus {
        self.status
    }

    pub fn is_fully_authoritative(&self) -> bool {
        self.is_fully_authoritative
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// The resolution failure behind an `Error` status
    pub fn err(&self) -> Option<&ResolutionError> {
        self.error.as_ref()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

/// Checks whether `requested` matches `actual` under the loose matching rule.
pub fn is_match(requested: &str, actual: &str) -> bool {
    actual == requested || requested.contains(actual) || actual.contains(requested)
}

fn has_match<T: AsRef<str>>(nameserver: &str, candidates: &[T]) -> bool {
    candidates.iter().any(|x| is_match(nameserver, x.as_ref()))
}

/// Actual nameservers no requested nameserver matches.
pub fn missing_nameservers<'a>(requested: &[String], actual: &'a [String]) -> Vec<&'a str> {
    actual
        .iter()
        .filter(|x| !requested.iter().any(|req| is_match(req, x)))
        .map(String::as_str)
        .collect()
}

/// Classifies with default options; cf. [`Classifier::classify`].
pub fn classify(requested: &NameserverSet, actual: &[String]) -> Classification {
    Classifier::default().classify(requested, actual)
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    opts: ClassifierOpts,
}

impl Classifier {
    pub fn new(opts: ClassifierOpts) -> Classifier {
        Classifier { opts }
    }

    pub fn classify(&self, requested: &NameserverSet, actual: &[String]) -> Classification {
        let requested = requested.as_slice();
        let matched = requested.iter().filter(|req| has_match(req, actual)).count();
        debug!("{} of {} requested nameservers match", matched, requested.len());

        if matched > 0 && matched == requested.len() {
            self.authoritative()
        } else if matched > 0 {
            self.partial_match(requested, actual)
        } else {
            self.not_authoritative(actual)
        }
    }

    pub fn classify_failure(&self, err: &ResolutionError) -> Classification {
        match err {
            ResolutionError::NoAnswer { .. } => Classification::new(
                AuthorityStatus::Error,
                "Unable to resolve domain nameservers",
                vec![
                    "Verify the domain is registered and active".to_string(),
                    "Check if the domain has been delegated properly".to_string(),
                    format!(
                        "Ensure DNS propagation is complete (can take {})",
                        self.opts.propagation_window
                    ),
                ],
            ),
            ResolutionError::Timeout => Classification::new(
                AuthorityStatus::Error,
                "Request timeout - DNS server not responding",
                vec![
                    "Check your internet connection".to_string(),
                    "Try again in a few moments".to_string(),
                    "The DNS server may be experiencing issues".to_string(),
                ],
            ),
            ResolutionError::Transport { reason } => Classification::new(
                AuthorityStatus::Error,
                &format!("Error: {}", reason),
                vec![
                    "Check your internet connection".to_string(),
                    "Verify the domain name is correct".to_string(),
                    "Try again in a few moments".to_string(),
                ],
            ),
        }
    }

    /// Turns the resolution of `request` into its check result.
    pub fn check_result(&self, request: &CheckRequest, resolution: ResolutionResult<Vec<String>>) -> CheckResult {
        let (classification, actual_nameservers, error) = match resolution {
            Ok(actual) => (self.classify(request.nameservers(), &actual), actual, None),
            Err(err) => (self.classify_failure(&err), Vec::new(), Some(err)),
        };

        CheckResult {
            domain: request.domain().to_string(),
            requested_nameservers: request.nameservers().to_vec(),
            actual_nameservers,
            status: classification.status,
            is_fully_authoritative: classification.is_fully_authoritative,
            message: classification.message,
            suggestions: classification.suggestions,
            error,
        }
    }

    fn authoritative(&self) -> Classification {
        Classification::new(
            AuthorityStatus::Authoritative,
            "All nameservers are authoritative",
            vec![
                "Domain is properly configured".to_string(),
                "Nameserver changes can be made at the registrar".to_string(),
                "Any DNS changes will propagate from these nameservers".to_string(),
            ],
        )
    }

    fn partial_match(&self, requested: &[String], actual: &[String]) -> Classification {
        let missing = missing_nameservers(requested, actual);

        let mut suggestions = vec![
            "Update nameservers at your domain registrar to match exactly".to_string(),
            "Remove old/incorrect nameservers".to_string(),
        ];
        if !missing.is_empty() {
            suggestions.push(format!("Add missing nameservers: {}", missing.join(", ")));
        }
        suggestions.push(format!(
            "Wait {} for DNS propagation after making changes",
            self.opts.propagation_window
        ));

        Classification::new(
            AuthorityStatus::PartialMatch,
            "Some nameservers match, but not all",
            suggestions,
        )
    }

    fn not_authoritative(&self, actual: &[String]) -> Classification {
        Classification::new(
            AuthorityStatus::NotAuthoritative,
            "Requested nameservers are NOT authoritative",
            vec![
                format!("Current authoritative nameservers: {}", actual.join(", ")),
                "Update nameservers at your domain registrar (e.g., where you bought the domain)".to_string(),
                "For registries that only accept authoritative nameservers (e.g., .co.za), update via your registrar's control panel".to_string(),
                format!("After updating, wait {} for propagation", self.opts.propagation_window),
                "Verify the nameservers you want to use are correctly configured".to_string(),
            ],
        )
    }
}
