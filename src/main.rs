mod cli;
mod config;
mod controller;
mod lifecycle;
mod logging;
mod mock;
mod model;
mod tui;

use std::env;
use std::process;

use clap::Parser;

use cli::Cli;
use config::Config;
use logging::LogTarget;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }
    };

    let target = if cli.is_headless() {
        LogTarget::Stderr
    } else {
        let dir = Config::dir().unwrap_or_else(env::temp_dir);
        LogTarget::File(dir.join("drover.log"))
    };
    if let Err(e) = logging::init(&config.log_filter, target) {
        eprintln!("{e}");
        process::exit(1);
    }

    if let Err(e) = cli::run(cli, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
