// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::convert::TryFrom;
use std::env;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::ArgMatches;
use tracing::{error, info};

use nsauth::app::logging::Logging;
use nsauth::app::output::styles;
use nsauth::app::{cli_parser, run, AppConfig, ExitStatus};

#[tokio::main]
async fn main() {
    let res = do_main().await;

    let exit_status = match res {
        Ok(exit_status) => exit_status,
        Err(err) => {
            eprintln!("Failed: {:#}", err);
            ExitStatus::UnrecoverableError
        }
    };

    std::process::exit(exit_status as i32);
}

async fn do_main() -> Result<ExitStatus> {
    let args = match cli_parser::create_parser().try_get_matches() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(ExitStatus::Ok);
        }
        Err(err) => {
            err.print()?;
            return Ok(ExitStatus::CliParsingFailed);
        }
    };

    setup_terminal(&args);
    start_logging(&args)?;
    info!("Parsed args and set up logging.");

    let app_config = match AppConfig::try_from(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to parse configuration: {:#}", err);
            eprintln!("Failed to parse configuration: {:#}", err);
            return Ok(ExitStatus::ConfigParsingFailed);
        }
    };
    info!("Parsed configuration.");

    run::run(&app_config).await
}

fn setup_terminal(args: &ArgMatches) {
    if args.get_flag("no-color") {
        styles::no_color_mode();
    }
    if args.get_flag("ascii") {
        styles::ascii_mode();
    }
}

fn start_logging(args: &ArgMatches) -> Result<()> {
    let color = !args.get_flag("no-color");
    let debug = args.get_flag("debug");

    Logging::new(args.get_count("v"), env::var_os("RUST_LOG"), color, debug).start()
}
