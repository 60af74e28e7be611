//! Run-level statistics
//!
//! Aggregated by the orchestrator and reported once at the end of a run.

use std::time::Duration;

/// Summary of one harvest run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Records successfully normalized and written
    pub records_written: u64,

    /// Regions enumerated
    pub regions_processed: u64,

    /// Complexes skipped because their building listing failed
    pub complexes_skipped: u64,

    /// Buildings skipped due to fetch or normalization failures
    pub buildings_skipped: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Prints the run summary to stdout in a formatted manner
pub fn print_summary(stats: &RunStats) {
    println!("=== Harvest Summary ===\n");
    println!("  Records written: {}", stats.records_written);
    println!("  Regions processed: {}", stats.regions_processed);
    println!("  Complexes skipped: {}", stats.complexes_skipped);
    println!("  Buildings skipped: {}", stats.buildings_skipped);
    println!("  Elapsed: {}s", stats.elapsed.as_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_are_zeroed() {
        let stats = RunStats::default();
        assert_eq!(stats.records_written, 0);
        assert_eq!(stats.buildings_skipped, 0);
        assert_eq!(stats.elapsed, Duration::ZERO);
    }
}
