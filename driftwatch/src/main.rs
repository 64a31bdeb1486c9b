use colored::Colorize;
use driftwatch::commands::command_argument_builder;
use driftwatch::handlers::{
    handle_compare, handle_fetch_mappings, handle_mappings, handle_process, handle_run,
    handle_scan, init_logging,
};
use driftwatch_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_logging(chosen_command.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("scan", primary_command)) => handle_scan(primary_command),
        Some(("process", primary_command)) => handle_process(primary_command),
        Some(("mappings", primary_command)) => handle_mappings(primary_command),
        Some(("fetch-mappings", primary_command)) => handle_fetch_mappings(primary_command).await,
        Some(("compare", primary_command)) => handle_compare(primary_command),
        Some(("run", primary_command)) => handle_run(primary_command),
        // No subcommand provided, just show the banner
        None => return,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
