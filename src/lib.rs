// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! nsauth checks whether a set of nameservers is the authoritative delegation of a domain.
//!
//! The library resolves the NS records of a domain via a DNS-over-HTTPS JSON API, compares them to
//! the nameservers a user intends to use and classifies the result as authoritative, partial
//! match, not authoritative, or error. Each result carries suggestions on how to fix the delegation at the
//! registrar. Lists of domains are checked sequentially and rate limited by the [`batch`] driver.
//!
//! ```no_run
//! # async fn example() -> nsauth::Result<()> {
//! use nsauth::batch::{BatchDriver, BatchOpts};
//! use nsauth::resolver::DohResolver;
//! use nsauth::{CheckRequest, Classifier};
//!
//! let request = CheckRequest::new("example.co.za", vec!["ns1.example.com", "ns2.example.com"])?;
//! let driver = BatchDriver::new(DohResolver::default(), Classifier::default(), BatchOpts::default());
//! let outcome = driver.run(&[request], |completed, total| println!("{}/{}", completed, total)).await?;
//! # Ok(())
//! # }
//! ```

pub mod authority;
pub mod batch;
pub mod error;
pub mod export;
pub mod nameserver;
pub mod request;
pub mod resolver;
pub mod statistics;
mod utils;

#[cfg(feature = "app-cli")]
pub mod app;

pub use authority::{classify, AuthorityStatus, CheckResult, Classification, Classifier, ClassifierOpts};
pub use batch::{run_batch, BatchOutcome};
pub use error::Error;
pub use nameserver::{normalize, NameserverSet};
pub use request::CheckRequest;
pub use resolver::ResolutionError;

pub type Result<T> = std::result::Result<T, Error>;
