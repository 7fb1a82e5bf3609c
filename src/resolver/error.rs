// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use thiserror::Error;

/// Reasons why the authoritative nameservers of a domain could not be resolved.
///
/// These never abort a batch; each one becomes an `Error`-status check result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no authoritative nameservers found (DNS status {status})")]
    NoAnswer { status: u32 },
    #[error("request timed out")]
    Timeout,
    #[error("{reason}")]
    Transport { reason: String },
}

impl ResolutionError {
    pub fn is_no_answer(&self) -> bool {
        matches!(self, ResolutionError::NoAnswer { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ResolutionError::Timeout)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ResolutionError::Transport { .. })
    }
}

impl From<reqwest::Error> for ResolutionError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return ResolutionError::Timeout;
        }
        ResolutionError::Transport {
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ResolutionError {
    fn from(error: serde_json::Error) -> Self {
        ResolutionError::Transport {
            reason: format!("failed to parse DNS response: {}", error),
        }
    }
}
