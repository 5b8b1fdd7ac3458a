//! XML table explorer CLI.

use clap::Parser;
use xtab_cli::cli::{Cli, Command};
use xtab_cli::commands::{run_convert, run_inspect, run_values};
use xtab_cli::logging::init_logging;
use xtab_cli::render::{print_convert, print_inspect};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Convert(args) => match run_convert(&args) {
            Ok(result) => {
                print_convert(&result);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Inspect(args) => match run_inspect(&args) {
            Ok(loaded) => {
                print_inspect(&loaded);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Values(args) => match run_values(&args) {
            Ok(values) => {
                for value in values {
                    println!("{value}");
                }
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}
