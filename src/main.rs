use clap::{CommandFactory, Parser};
use nutnr_processor::cli::{args::Args, commands};
use std::process;

/// Exit code for runs that finished but found problems
const EXIT_PROBLEMS_FOUND: i32 = 2;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal() => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(nutnr_processor::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(stats) if stats.is_clean() => process::exit(0),
        Ok(_) => process::exit(EXIT_PROBLEMS_FOUND),
        Err(error) => {
            // {:#} prints the whole source chain
            eprintln!("Error: {:#}", anyhow::Error::new(error));
            process::exit(1);
        }
    }
}

/// Resolves on CTRL+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
