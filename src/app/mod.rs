// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

pub mod cli_parser;
pub mod config;
pub mod console;
pub mod logging;
pub mod output;
pub mod run;

pub use config::AppConfig;

/// `ExitStatus` represents the exit states that will be return to the OS after termination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// All nameservers are authoritative.
    Ok = 0,
    /// CLI argument parsing failed.
    CliParsingFailed = 1,
    /// Configuration derived from CLI arguments is invalid.
    ConfigParsingFailed = 2,
    /// An unrecoverable error occurred. This is worst case and should not happen.
    UnrecoverableError = 3,
    /// At least one domain is not fully authoritatively delegated to its requested nameservers or could not be checked.
    CheckFailed = 11,
    /// No checks could be run, or the batch has been cancelled.
    Abort = 12,
}
