// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! JSON body of DNS-over-HTTPS responses as served by Google Public DNS and Cloudflare.

use serde::Deserialize;

use crate::resolver::{ResolutionError, ResolutionResult};

/// DNS response code `NOERROR`.
pub const NOERROR: u32 = 0;
/// Resource record type of NS records.
pub const NS_RECORD_TYPE: u16 = 2;

#[derive(Debug, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status")]
    pub status: u32,
    #[serde(rename = "Answer")]
    pub answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
pub struct DohAnswer {
    #[serde(rename = "type")]
    pub record_type: u16,
    #[serde(default)]
    pub data: String,
}

impl DohResponse {
    /// Extracts the NS records of the answer section in the order the server returned them.
    ///
    /// Names are lowercased and their trailing root dot is removed.
    pub fn into_nameservers(self) -> ResolutionResult<Vec<String>> {
        let status = self.status;
        let answer = match self.answer {
            Some(answer) if status == NOERROR && !answer.is_empty() => answer,
            _ => return Err(ResolutionError::NoAnswer { status }),
        };

        // An answer without NS records, e.g. only a CNAME, resolves to no nameservers at all
        let nameservers = answer
            .into_iter()
            .filter(|x| x.record_type == NS_RECORD_TYPE)
            .map(|x| x.data.to_lowercase().trim_end_matches('.').to_string())
            .collect();

        Ok(nameservers)
    }
}
