// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! This file is used by the build script. Therefore everything generating the command line parser must be included
//! here and may only depend on `clap` itself.

use clap::{Arg, ArgAction, Command};

pub static SUPPORTED_OUTPUT_FORMATS: [&str; 3] = ["summary", "json", "csv"];

pub static SUPPORTED_FILTERS: [&str; 4] = ["all", "authoritative", "issues", "errors"];

pub fn create_parser() -> Command {
    Command::new("nsauth")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("domain name")
                .index(1)
                .value_name("DOMAIN")
                .required_unless_present("input-file")
                .help("domain name to check")
                .long_help("* DOMAIN may be any registered domain name, e.g., example.co.za"),
        )
        .arg(
            Arg::new("nameservers")
                .index(2)
                .value_name("NAMESERVER")
                .num_args(1..)
                .required_unless_present("input-file")
                .help("nameservers that are supposed to be authoritative for the domain"),
        )
        .arg(
            Arg::new("input-file")
                .short('f')
                .long("input")
                .value_name("FILE")
                .conflicts_with_all(["domain name", "nameservers"])
                .help("Checks all domains from file; '-' reads from stdin")
                .long_help(
                    "* FILE contains one domain per line followed by its nameservers, separated by commas or tabs
  Example: example.co.za, ns1.example.com, ns2.example.com
  Empty lines and lines starting with '#' are ignored",
                ),
        )
        .arg(
            Arg::new("doh-url")
                .long("doh-url")
                .value_name("URL")
                .default_value("https://dns.google/resolve")
                .help("Sets DNS-over-HTTPS JSON API endpoint to query"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("DURATION")
                .default_value("10s")
                .help("Sets timeout for each DNS query, e.g. '10s' or '1500ms'"),
        )
        .arg(
            Arg::new("delay")
                .long("delay")
                .value_name("DURATION")
                .default_value("200ms")
                .help("Sets delay between two DNS queries to stay below rate limits"),
        )
        .arg(
            Arg::new("propagation-window")
                .long("propagation-window")
                .value_name("TEXT")
                .default_value("24-48 hours")
                .help("Sets the DNS propagation time shown in suggestions"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .default_value("summary")
                .value_parser(SUPPORTED_OUTPUT_FORMATS)
                .help("Sets the output format for result presentation"),
        )
        .arg(
            Arg::new("output-options")
                .long("output-options")
                .value_name("OPTIONS")
                .num_args(1..)
                .value_delimiter(',')
                .default_value_if("output", "json", Some("pretty"))
                .default_value_if("output", "summary", Some("human"))
                .help("Sets output options")
                .long_help(
                    "* Json: 'pretty': Prettifies output
* Summary: 'human': Shows nameservers and suggestions, 'condensed': Shows one line per domain
* Csv: no options",
                ),
        )
        .arg(
            Arg::new("output-file")
                .long("output-file")
                .value_name("FILE")
                .help("Writes results to file instead of stdout"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .value_name("FILTER")
                .default_value("all")
                .value_parser(SUPPORTED_FILTERS)
                .help("Shows only matching results in summary output; 'issues' are partial matches and mismatches"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Does not print anything but results"),
        )
        // This is a special option that is not reflected in AppConfig, but is checked during
        // setup in `nsauth.rs`.
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disables colorful output"),
        )
        // This is a special option that is not reflected in AppConfig, but is checked during
        // setup in `nsauth.rs` and sets the global AtomicBool of `nsauth::app::output::styles`.
        .arg(
            Arg::new("ascii")
                .long("ascii")
                .action(ArgAction::SetTrue)
                .help("Uses only ASCII compatible characters for output"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Uses debug formatting for logging -- much more verbose"),
        )
        .arg(
            Arg::new("v")
                .short('v')
                .action(ArgAction::Count)
                .help("Sets the level of verbosity"),
        )
}
