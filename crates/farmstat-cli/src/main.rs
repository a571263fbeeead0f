//! Farmstat CLI - console record manager for farm statistics datasets.

mod cli;
mod commands;
mod console;
mod display;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Info } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n{}", commands::FAREWELL);
        std::process::exit(0);
    }) {
        log::warn!("could not install Ctrl-C handler: {}", e);
    }

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => commands::menu::run(cli.data, cli.max_records, cli.verbose),

        Commands::Filter {
            conditions,
            or,
            case_sensitive,
            export,
            stats,
            unique,
            json,
        } => commands::filter::run(
            cli.data,
            cli.max_records,
            conditions,
            or,
            case_sensitive,
            export,
            stats,
            unique,
            json,
            cli.verbose,
        ),

        Commands::Top { n, by, asc } => {
            commands::top::run(cli.data, cli.max_records, n, by, asc, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
