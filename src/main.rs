use clap::Parser;
use tracing_subscriber::EnvFilter;

use mirdeep2gff::cli::{self, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("mirdeep2gff=debug,info")
    } else {
        EnvFilter::new("mirdeep2gff=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Convert(args) => {
            cli::convert::run(args, cli.format, cli.verbose)?;
        }
        Commands::Tables(args) => {
            cli::tables::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
