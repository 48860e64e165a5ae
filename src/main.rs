use clap::Parser;
use planner::Planner;
use tracing_subscriber::EnvFilter;

mod cli;
mod conf;
mod planner;
mod source;

/// Main entry point for the vacation planner
///
/// # Usage Examples
/// ```bash
/// # Bridge-day suggestions for the configured year
/// pto-planner -c config.toml suggest
///
/// # Mini breaks over the summer, as JSON
/// pto-planner -c config.toml --json suggest -s mini-breaks --from 2024-06-01 --to 2024-09-30
///
/// # Book a range and check the budget
/// pto-planner -c config.toml apply 2024-12-23 2024-12-27 --name "Christmas"
/// pto-planner -c config.toml pto show
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays scriptable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = cli::Cli::parse();

    let mut planner = Planner::new(cli.conf().clone(), cli.json());
    let output = planner.run(cli.command()).await?;

    print!("{}", output);
    Ok(())
}
