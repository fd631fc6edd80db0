// CLI binary entry point for opusmux
//
// This is the main entry point for the opusmux command-line tool.

mod cli;

use clap::Parser;
use std::process;

use cli::commands;
use cli::{Cli, Commands, OutputFormatter};

fn init_tracing(verbose: bool) {
    let default = if verbose { "opusmux=debug" } else { "opusmux=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter = OutputFormatter::new(cli.format.clone(), cli.quiet);

    let result = match &cli.command {
        Commands::Convert {
            input,
            output,
            audio,
            no_verify,
        } => commands::command_convert(
            input,
            output.clone(),
            &audio.to_config(),
            *no_verify,
            &formatter,
        ),
        Commands::Batch {
            directory,
            pattern,
            audio,
        } => commands::command_batch(directory, pattern, &audio.to_config(), &formatter),
        Commands::Verify { files } => commands::command_verify(files, &formatter),
        Commands::Info { files } => commands::command_info(files, &formatter),
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        process::exit(1);
    }
}
