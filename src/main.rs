use anyhow::Context;
use aqi_processor::{AqiError, ProcessingStats};
use aqi_processor::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    // Without a subcommand, show help and exit cleanly
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let result = tokio::runtime::Runtime::new()
        .context("Failed to create async runtime")
        .and_then(|runtime| {
            runtime.block_on(async {
                let outcome: anyhow::Result<ProcessingStats> = tokio::select! {
                    result = commands::run(args) => result.map_err(anyhow::Error::from),
                    signal = tokio::signal::ctrl_c() => match signal {
                        Ok(()) => {
                            eprintln!("\nReceived CTRL+C, shutting down...");
                            Err(AqiError::processing_interrupted(
                                "Processing interrupted by user",
                            )
                            .into())
                        }
                        Err(e) => Err(anyhow::Error::from(e)
                            .context("Failed to install CTRL+C signal handler")),
                    },
                };
                outcome
            })
        });

    match result {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn show_help_and_commands() {
    println!("AQI Processor - Barcelona Air-Quality Data Pipeline");
    println!("===================================================");
    println!();
    println!("Clean the monthly air-quality files of the Barcelona open-data portal,");
    println!("compute Air Quality Index tables and attach daily weather.");
    println!();
    println!("USAGE:");
    println!("    aqi-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    clean       Melt monthly files into the clean long table");
    println!("    aqi         Compute aggregate and/or individual AQI tables");
    println!("    meteo       Attach daily precipitation and wind to the AQI table");
    println!("    run         Run every stage in sequence");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    aqi-processor run --input data --output output");
    println!("    aqi-processor aqi --mode individual --format parquet");
    println!("    aqi-processor meteo --meteo-file Dades_meteorologiques_XEMA.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    aqi-processor <COMMAND> --help");
}
