//! Harvester module: crawl orchestration
//!
//! Ties the catalog enumerator, record fetcher, normalizer, and checkpointed
//! writer together into one sequential harvest run.

mod coordinator;

pub use coordinator::{run_harvest, Coordinator};

use crate::config::Config;
use crate::output::RunStats;
use crate::Result;

/// Runs a complete harvest operation
///
/// # Example
///
/// ```no_run
/// use erz_harvester::config::load_config;
/// use erz_harvester::harvester::harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let stats = harvest(config).await?;
/// println!("Wrote {} records", stats.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: Config) -> Result<RunStats> {
    run_harvest(config).await
}
