use std::time::Duration;

use simpleclock::Session;

mod cli;
mod exit;
mod logging;
use clap::Parser;
use cli::ClockCli;

fn main() {
    let args = ClockCli::parse();
    logging::init_logging(args.log_level);

    let session = Session::serial().with_timeout(Duration::from_millis(args.timeout_ms));

    let result = args
        .command_type
        .to_logical()
        .and_then(|command| session.perform_exchange(&command, &args.endpoint()));

    match result {
        Ok(response) => {
            println!("{}", response);
            std::process::exit(exit::SUCCESS);
        }
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(exit::code_for(&err));
        }
    }
}
