use clap::Parser;
use tally::cli::commands::Cli;
use tally::cli::handlers;
use tally::logging;

fn main() {
    let cli = Cli::parse();

    // No subcommand launches the board
    if let Err(e) = handlers::dispatch(cli) {
        log::error!("event=command_failed error={}", e);
        logging::shutdown_logging();
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    logging::shutdown_logging();
}
