use clap::Parser;
use regex_filter::cli::dispatch;
use regex_filter::cli::Cli;
use regex_filter::RuleStore;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = RuleStore::new(cli.config);
    let report = dispatch::run(cli.command, &store);

    if report.success {
        println!("{}", report.message);
    } else {
        eprintln!("\x1b[31merror\x1b[0m: {}", report.message);
    }

    process::exit(report.exit_code());
}
