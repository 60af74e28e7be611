//! Erz-Harvester main entry point
//!
//! Command-line interface for the construction-catalog harvester.

use clap::Parser;
use erz_harvester::config::load_config;
use erz_harvester::harvester::harvest;
use erz_harvester::output::print_summary;
use erz_harvester::transport::load_proxy_list;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Erz-Harvester: a checkpointed construction-catalog crawler
///
/// Walks the registry's region → complex → building hierarchy, normalizes
/// each building into a flat record, and appends results to a dated CSV
/// file at every region boundary.
#[derive(Parser, Debug)]
#[command(name = "erz-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A checkpointed construction-catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without any network activity
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("erz_harvester=info,warn"),
            1 => EnvFilter::new("erz_harvester=debug,info"),
            2 => EnvFilter::new("erz_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the harvest plan
///
/// Loads the proxy list so an empty or malformed file fails here, exactly as
/// it would at the start of a real run.
fn handle_dry_run(
    config: &erz_harvester::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Erz-Harvester Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Request timeout: {}s", config.api.request_timeout_secs);
    println!("  Complex page bound: {}", config.api.complex_page_bound);

    println!("\nClient:");
    println!("  Proxy file: {}", config.client.proxy_file);
    println!("  User-agent pool: {} entries", config.client.user_agents.len());
    println!(
        "  Detail requests proxied: {}",
        if config.client.use_proxy { "yes" } else { "no" }
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    let proxies = load_proxy_list(std::path::Path::new(&config.client.proxy_file))?;
    println!("\n✓ Configuration is valid");
    println!("✓ {} proxies loaded for rotation", proxies.len());

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: erz_harvester::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match harvest(config).await {
        Ok(stats) => {
            print_summary(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
