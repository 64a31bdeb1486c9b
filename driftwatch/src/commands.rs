use crate::CLAP_STYLING;
use clap::{Arg, arg, command};
use driftwatch_core::config::{DEFAULT_REPORT_NAME, DEFAULT_REPORTS_DIR};
use driftwatch_scanner::frontend::DEFAULT_API_PREFIX;
use url::Url;

pub const DEFAULT_FRONTEND_ROOT: &str = "frontend/src";
pub const DEFAULT_BACKEND_ROOT: &str = "backend/src";
pub const DEFAULT_ACTUATOR_URL: &str = "http://localhost:8080/actuator/mappings";

fn scan_args() -> Vec<Arg> {
    vec![
        arg!(-f --"frontend" <DIR>)
            .required(false)
            .help("Root of the frontend source tree")
            .default_value(DEFAULT_FRONTEND_ROOT),
        arg!(-b --"backend" <DIR>)
            .required(false)
            .help("Root of the backend source tree")
            .default_value(DEFAULT_BACKEND_ROOT),
        arg!(--"api-prefix" <PREFIX>)
            .required(false)
            .help("Path prefix that marks a string literal as an API call")
            .default_value(DEFAULT_API_PREFIX),
    ]
}

fn report_args() -> Vec<Arg> {
    vec![
        arg!(-o --"output-dir" <DIR>)
            .required(false)
            .help("Directory for the integration report (default: the reports directory)"),
        arg!(-n --"report-name" <NAME>)
            .required(false)
            .help("File name of the integration report")
            .default_value(DEFAULT_REPORT_NAME),
        arg!(--"format" <FORMAT>)
            .required(false)
            .help("Report format: markdown, json")
            .value_parser(["markdown", "md", "json"])
            .default_value("markdown"),
    ]
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("driftwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("driftwatch")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Log stage progress to stderr (RUST_LOG overrides)")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-r --"reports-dir" <DIR>)
                .required(false)
                .help("Directory holding hit files, actuator dumps and inventories")
                .default_value(DEFAULT_REPORTS_DIR)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about("Extract API call sites, page routes and controller mappings into hit files")
                .args(scan_args()),
        )
        .subcommand(
            command!("process").about(
                "Turn hit files into frontend and backend inventories. Prefers a saved actuator \
                dump over static mapping hits.",
            ),
        )
        .subcommand(
            command!("mappings")
                .about("Build the backend inventory from a saved actuator dump (required)"),
        )
        .subcommand(
            command!("fetch-mappings")
                .about("Download a live actuator mappings document into the reports directory")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Actuator mappings endpoint")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_ACTUATOR_URL),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                ),
        )
        .subcommand(
            command!("compare")
                .about("Match the inventories and write the integration report")
                .args(report_args()),
        )
        .subcommand(
            command!("run")
                .about("Scan, process and compare in one go")
                .args(scan_args())
                .args(report_args()),
        )
}
