//! Harvest coordinator - main crawl orchestration logic
//!
//! Drives the region → complex → building hierarchy in order, accumulates
//! normalized records in an in-memory buffer, and flushes that buffer to the
//! checkpointed writer at every region boundary, so a crash loses at most one
//! region's in-flight work.

use crate::catalog::{Catalog, ComplexId, Region};
use crate::config::Config;
use crate::output::{CheckpointedWriter, RunStats};
use crate::record::{fetch_building, normalize, BuildingRecord};
use crate::state::CrawlPhase;
use crate::transport::Transport;
use crate::{ConfigError, HarvestError, Result};
use chrono::{Local, NaiveDate};
use std::path::Path;
use std::time::{Duration, Instant};
use url::Url;

/// A progress line is emitted every this many records
const PROGRESS_INTERVAL: u64 = 100;

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    transport: Transport,
    base: Url,
    writer: CheckpointedWriter,
    phase: CrawlPhase,
    /// Records normalized since the last region boundary
    buffer: Vec<BuildingRecord>,
    stats: RunStats,
    collected_on: NaiveDate,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Loads the proxy pool, fixes the run's identification header, and
    /// prepares the dated output file. All configuration failures abort here,
    /// before the first network request.
    pub fn new(config: Config) -> Result<Self> {
        let base = Url::parse(&config.api.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        let timeout = Duration::from_secs(config.api.request_timeout_secs);
        let transport = Transport::new(&config.client, timeout)?;

        let collected_on = Local::now().date_naive();
        let writer =
            CheckpointedWriter::initialize(Path::new(&config.output.directory), collected_on)?;
        tracing::info!("Output file: {}", writer.path().display());

        Ok(Self {
            config,
            transport,
            base,
            writer,
            phase: CrawlPhase::Init,
            buffer: Vec::new(),
            stats: RunStats::default(),
            collected_on,
        })
    }

    /// Runs the main harvest loop
    ///
    /// 1. Fetch the region dictionary
    /// 2. For each region, list complexes, then each complex's buildings
    /// 3. Fetch and normalize each building into the buffer
    /// 4. Flush the buffer at every region boundary
    pub async fn run(&mut self) -> Result<RunStats> {
        let start = Instant::now();
        tracing::info!(
            "Starting harvest with {} proxies in rotation",
            self.transport.proxy_count()
        );

        let catalog = Catalog::new(
            &self.transport,
            self.base.clone(),
            self.config.api.complex_page_bound,
        );

        advance(&mut self.phase, CrawlPhase::EnumeratingRegions)?;
        let regions = catalog.list_regions().await?;
        tracing::info!("Catalog lists {} regions", regions.len());

        for region in &regions {
            tracing::info!("Processing region {}", region.title);
            advance(&mut self.phase, CrawlPhase::EnumeratingComplexes)?;

            let complexes = match catalog.list_complexes(region).await {
                Ok(complexes) => complexes,
                Err(e) => {
                    // The region yields nothing, but the run continues
                    tracing::error!("Failed to list complexes for {}: {}", region.title, e);
                    Vec::new()
                }
            };

            advance(&mut self.phase, CrawlPhase::EnumeratingBuildings)?;
            for complex in &complexes {
                harvest_complex(
                    &catalog,
                    &self.transport,
                    region,
                    complex,
                    self.config.client.use_proxy,
                    self.collected_on,
                    &mut self.buffer,
                    &mut self.stats,
                )
                .await;
            }

            // Region boundary: drain the buffer to durable storage
            advance(&mut self.phase, CrawlPhase::Flushing)?;
            let batch = std::mem::take(&mut self.buffer);
            let written = self.writer.append_batch(&batch)?;
            if written > 0 {
                tracing::info!(
                    "Checkpoint saved: {} records flushed for {}",
                    written,
                    region.title
                );
            }
            self.stats.regions_processed += 1;
        }

        advance(&mut self.phase, CrawlPhase::Done)?;
        self.stats.elapsed = start.elapsed();
        tracing::info!(
            "Harvest complete: {} records in {}s",
            self.stats.records_written,
            self.stats.elapsed.as_secs()
        );

        Ok(self.stats.clone())
    }

    /// Current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }
}

/// Harvests every building of one complex into the buffer
///
/// Failure isolation: a failed building listing skips the whole complex; a
/// failed detail fetch or normalization skips only that building. Neither
/// disturbs the buffer contents accumulated so far.
#[allow(clippy::too_many_arguments)]
async fn harvest_complex(
    catalog: &Catalog<'_>,
    transport: &Transport,
    region: &Region,
    complex: &ComplexId,
    use_proxy: bool,
    collected_on: NaiveDate,
    buffer: &mut Vec<BuildingRecord>,
    stats: &mut RunStats,
) {
    let refs = match catalog.list_building_refs(region, complex).await {
        Ok(refs) => refs,
        Err(e) => {
            tracing::warn!("Skipping complex {}: {}", complex.0, e);
            stats.complexes_skipped += 1;
            return;
        }
    };

    for building in &refs {
        let payload = match fetch_building(catalog, transport, region, building, use_proxy).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Skipping building {}: {}", building.id, e);
                stats.buildings_skipped += 1;
                continue;
            }
        };

        match normalize(&payload.body, collected_on) {
            Ok(record) => {
                buffer.push(record);
                stats.records_written += 1;
                if stats.records_written % PROGRESS_INTERVAL == 0 {
                    tracing::info!("Processed {} records", stats.records_written);
                }
            }
            Err(e) => {
                tracing::error!("Skipping building {}: {}", building.id, e);
                stats.buildings_skipped += 1;
            }
        }
    }
}

/// Applies a phase transition, rejecting illegal ones
fn advance(phase: &mut CrawlPhase, next: CrawlPhase) -> Result<()> {
    if !phase.can_transition(next) {
        return Err(HarvestError::InvalidTransition {
            from: *phase,
            to: next,
        });
    }
    tracing::trace!("Phase {} -> {}", phase, next);
    *phase = next;
    Ok(())
}

/// Runs a complete harvest with the given configuration
pub async fn run_harvest(config: Config) -> Result<RunStats> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accepts_legal_transition() {
        let mut phase = CrawlPhase::Init;
        advance(&mut phase, CrawlPhase::EnumeratingRegions).unwrap();
        assert_eq!(phase, CrawlPhase::EnumeratingRegions);
    }

    #[test]
    fn test_advance_rejects_illegal_transition() {
        let mut phase = CrawlPhase::Init;
        let err = advance(&mut phase, CrawlPhase::Flushing).unwrap_err();
        assert!(matches!(err, HarvestError::InvalidTransition { .. }));
        // Phase is left untouched on rejection
        assert_eq!(phase, CrawlPhase::Init);
    }
}
