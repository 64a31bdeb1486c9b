pub mod actuator;
pub mod backend;
pub mod config;
pub mod error;
pub mod frontend;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
     _      _  __ _                    _       _
  __| |_ __(_)/ _| |___      ____ _| |_ ___| |__
 / _` | '__| | |_| __\ \ /\ / / _` | __/ __| '_ \
| (_| | |  | |  _| |_ \ V  V / (_| | || (__| | | |
 \__,_|_|  |_|_|  \__| \_/\_/ \__,_|\__\___|_| |_|
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "frontend ↔ backend endpoint reconciliation".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
